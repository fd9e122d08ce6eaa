//! Sample dataset loading.
//!
//! The dataset is a JSON array of `[unix_ms, value]` pairs in ascending
//! timestamp order. It is read once per [`SampleStore`] and shared by every
//! request afterwards.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::DateTime;
use overflow_types::Sample;
use thiserror::Error;
use tokio::sync::OnceCell;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Errors that can occur while loading a sample dataset.
#[derive(Debug, Error)]
pub enum DatasetError {
    /// The dataset file could not be read.
    #[error("Read error for {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file is not a JSON array of numeric arrays.
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// A row parsed as JSON but is not a valid sample.
    #[error("Malformed row {index}: {reason}")]
    MalformedRow { index: usize, reason: String },

    /// The background load task panicked or was cancelled.
    #[error("Dataset load task failed: {0}")]
    Task(String),
}

/// Parse a dataset from its JSON text.
///
/// Rows are kept in file order; the file is trusted to be ascending.
pub fn parse_samples(json: &str) -> Result<Vec<Sample>, DatasetError> {
    let rows: Vec<Vec<f64>> = serde_json::from_str(json)?;
    rows.iter()
        .enumerate()
        .map(|(index, row)| {
            parse_row(row).map_err(|reason| DatasetError::MalformedRow { index, reason })
        })
        .collect()
}

/// Read and parse a dataset file.
pub fn load_samples(path: &Path) -> Result<Vec<Sample>, DatasetError> {
    let content = fs::read_to_string(path).map_err(|source| DatasetError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse_samples(&content)
}

fn parse_row(row: &[f64]) -> Result<Sample, String> {
    let &[timestamp, value] = row else {
        return Err(format!("expected [timestamp, value], got {} elements", row.len()));
    };

    if !timestamp.is_finite() || timestamp.fract() != 0.0 {
        return Err(format!("timestamp {} is not a whole number of milliseconds", timestamp));
    }
    let timestamp_ms = timestamp as i64;
    if DateTime::from_timestamp_millis(timestamp_ms).is_none() {
        return Err(format!("timestamp {} is out of range", timestamp));
    }

    if !value.is_finite() || value < 0.0 {
        return Err(format!("value {} is not a finite non-negative number", value));
    }

    Ok(Sample::new(timestamp_ms, value))
}

/// A lazily loaded, shared sample dataset.
///
/// The first call to [`SampleStore::samples`] reads the file; concurrent
/// callers wait for that single load. Later calls return the cached samples.
/// A failed load is not cached, so the next call tries again.
#[derive(Debug)]
pub struct SampleStore {
    path: PathBuf,
    description: String,
    samples: OnceCell<Arc<[Sample]>>,
}

impl SampleStore {
    /// Create a store backed by the dataset file at `path`.
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref().to_path_buf();
        let description = format!("file: {}", path.display());
        Self {
            path,
            description,
            samples: OnceCell::new(),
        }
    }

    /// Create a store that already holds `samples`.
    pub fn from_samples(samples: Vec<Sample>) -> Self {
        Self {
            path: PathBuf::new(),
            description: format!("memory: {} samples", samples.len()),
            samples: OnceCell::new_with(Some(Arc::from(samples))),
        }
    }

    /// Human-readable description of where samples come from.
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Whether the dataset has been loaded.
    pub fn is_loaded(&self) -> bool {
        self.samples.initialized()
    }

    /// Get the samples, loading them on first use.
    pub async fn samples(&self) -> Result<Arc<[Sample]>, DatasetError> {
        self.samples
            .get_or_try_init(|| self.load())
            .await
            .map(Arc::clone)
    }

    /// Start loading in the background so the first request does not pay for it.
    pub fn warm(self: &Arc<Self>) -> JoinHandle<()> {
        let store = Arc::clone(self);
        tokio::spawn(async move {
            if let Err(e) = store.samples().await {
                warn!(source = %store.description, error = %e, "dataset warm-up failed");
            }
        })
    }

    async fn load(&self) -> Result<Arc<[Sample]>, DatasetError> {
        debug!(source = %self.description, "loading dataset");
        let path = self.path.clone();
        let samples = tokio::task::spawn_blocking(move || load_samples(&path))
            .await
            .map_err(|e| DatasetError::Task(e.to_string()))??;

        info!(
            source = %self.description,
            samples = samples.len(),
            "dataset loaded"
        );
        Ok(Arc::from(samples))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn bundled_dataset() -> PathBuf {
        Path::new(env!("CARGO_MANIFEST_DIR")).join("data/overflow-timeseries.json")
    }

    fn temp_dataset(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{}", content).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn parse_valid_rows() {
        let samples = parse_samples("[[1703160000000, 0.0], [1703160120000, 0.125]]").unwrap();
        assert_eq!(
            samples,
            vec![
                Sample::new(1_703_160_000_000, 0.0),
                Sample::new(1_703_160_120_000, 0.125),
            ]
        );
    }

    #[test]
    fn parse_accepts_float_timestamps_without_fraction() {
        let samples = parse_samples("[[1703160000000.0, 0.5]]").unwrap();
        assert_eq!(samples[0].timestamp_ms, 1_703_160_000_000);
    }

    #[test]
    fn parse_empty_array() {
        assert!(parse_samples("[]").unwrap().is_empty());
    }

    #[test]
    fn parse_rejects_wrong_row_length() {
        let err = parse_samples("[[1703160000000, 0.1], [1703160120000]]").unwrap_err();
        assert!(matches!(err, DatasetError::MalformedRow { index: 1, .. }));
    }

    #[test]
    fn parse_rejects_fractional_timestamp() {
        let err = parse_samples("[[1703160000000.5, 0.1]]").unwrap_err();
        assert!(matches!(err, DatasetError::MalformedRow { index: 0, .. }));
    }

    #[test]
    fn parse_rejects_negative_value() {
        let err = parse_samples("[[1703160000000, -0.1]]").unwrap_err();
        assert!(err.to_string().contains("non-negative"));
    }

    #[test]
    fn parse_rejects_invalid_json() {
        let err = parse_samples("not valid json").unwrap_err();
        assert!(matches!(err, DatasetError::Parse(_)));
        assert!(err.to_string().contains("Parse error"));
    }

    #[test]
    fn load_missing_file() {
        let err = load_samples(Path::new("/nonexistent/path/overflow.json")).unwrap_err();
        assert!(matches!(err, DatasetError::Read { .. }));
        assert!(err.to_string().contains("Read error"));
    }

    #[test]
    fn bundled_dataset_is_ascending() {
        let samples = load_samples(&bundled_dataset()).unwrap();
        assert!(!samples.is_empty());
        assert!(samples
            .windows(2)
            .all(|w| w[0].timestamp_ms < w[1].timestamp_ms));
    }

    #[tokio::test]
    async fn store_loads_file_once() {
        let file = temp_dataset("[[1703160000000, 0.2], [1703160120000, 0.0]]");
        let store = SampleStore::new(file.path());
        assert!(!store.is_loaded());

        let first = store.samples().await.unwrap();
        assert_eq!(first.len(), 2);
        assert!(store.is_loaded());

        // The cached copy survives the file changing underneath.
        std::fs::write(file.path(), "[]").unwrap();
        let second = store.samples().await.unwrap();
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[tokio::test]
    async fn concurrent_callers_share_one_load() {
        let file = temp_dataset("[[1703160000000, 0.2]]");
        let store = Arc::new(SampleStore::new(file.path()));

        let tasks: Vec<_> = (0..8)
            .map(|_| {
                let store = Arc::clone(&store);
                tokio::spawn(async move { store.samples().await.unwrap() })
            })
            .collect();

        let mut loaded = Vec::new();
        for task in tasks {
            loaded.push(task.await.unwrap());
        }
        assert!(loaded.windows(2).all(|w| Arc::ptr_eq(&w[0], &w[1])));
    }

    #[tokio::test]
    async fn failed_load_is_retried() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("late.json");
        let store = SampleStore::new(&path);

        assert!(matches!(store.samples().await, Err(DatasetError::Read { .. })));
        assert!(!store.is_loaded());

        std::fs::write(&path, "[[1703160000000, 0.3]]").unwrap();
        assert_eq!(store.samples().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn warm_loads_in_background() {
        let file = temp_dataset("[[1703160000000, 0.2]]");
        let store = Arc::new(SampleStore::new(file.path()));

        store.warm().await.unwrap();
        assert!(store.is_loaded());
    }

    #[tokio::test]
    async fn from_samples_is_preloaded() {
        let store = SampleStore::from_samples(vec![Sample::new(0, 1.0)]);
        assert!(store.is_loaded());
        assert_eq!(store.description(), "memory: 1 samples");
        assert_eq!(store.samples().await.unwrap().len(), 1);
    }
}

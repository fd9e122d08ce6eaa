//! Example: Detecting overflow events in a dataset file
//!
//! Loads a `[[unix_ms, value], ...]` dataset and prints every detected
//! event, without starting the HTTP server.
//!
//! # Usage
//!
//! ```bash
//! cargo run --example scan_file -- data/overflow-timeseries.json 0.14 5 10
//! ```
//!
//! Arguments after the path are threshold, minimum duration (minutes) and
//! maximum gap (minutes); omitted ones take the `/events` defaults.

use std::env;
use std::path::Path;

use overflow_detector::detect;
use overflow_server::{load_samples, EventBody, EventsQuery};

fn main() {
    let mut args = env::args().skip(1);
    let path = args.next().unwrap_or_else(|| {
        eprintln!(
            "Usage: cargo run --example scan_file -- \
             <dataset.json> [threshold] [minDuration] [maxGap]"
        );
        std::process::exit(1);
    });

    let mut query = EventsQuery::default();
    let mut number = |name: &str, default: f64| match args.next() {
        Some(raw) => raw.parse().unwrap_or_else(|_| {
            eprintln!("{} must be a number, got {:?}", name, raw);
            std::process::exit(1);
        }),
        None => default,
    };
    query.threshold = number("threshold", query.threshold);
    query.min_duration_minutes = number("minDuration", query.min_duration_minutes);
    query.max_gap_minutes = number("maxGap", query.max_gap_minutes);

    let samples = match load_samples(Path::new(&path)) {
        Ok(samples) => samples,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };
    println!("Loaded {} samples from {}", samples.len(), path);

    let events = query
        .to_params()
        .map_err(|e| e.to_string())
        .and_then(|params| detect(&samples, params).map_err(|e| e.to_string()));
    let events = match events {
        Ok(events) => events,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    let mut count = 0;
    for event in events {
        count += 1;
        match EventBody::from_event(&event) {
            Some(body) => println!(
                "  {} .. {}  {:>6.1} min  peak {:.3}",
                body.start.to_rfc3339(),
                body.end.to_rfc3339(),
                body.duration_minutes,
                body.peak_value
            ),
            None => println!("  {:?}", event),
        }
    }
    println!("{} events", count);
}

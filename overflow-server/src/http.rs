//! HTTP API serving detected overflow events.
//!
//! Routes:
//!
//! - `GET /events?threshold=&minDuration=&maxGap=` - JSON array of events
//! - `GET /_health`, `/health`, `/healthz` - liveness probe
//!
//! Errors are returned as RFC 7807 problem documents. Bad parameters are a
//! `400`, a dataset that cannot be loaded is a `500`.
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use overflow_server::{EventsApi, EventsQuery, SampleStore, Server};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let store = Arc::new(SampleStore::new("overflow-timeseries.json"));
//!     let api = EventsApi::new(store, EventsQuery::default());
//!
//!     let server = Server::bind("127.0.0.1:8080", api).await?;
//!     server.run_until(async { let _ = tokio::signal::ctrl_c().await; }).await?;
//!     Ok(())
//! }
//! ```

use std::convert::Infallible;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::header::{HeaderValue, CONTENT_TYPE};
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Method, Request, Response, StatusCode, Uri};
use hyper_util::rt::TokioIo;
use overflow_detector::detect;
use serde::Serialize;
use tokio::net::{TcpListener, ToSocketAddrs};
use tracing::{debug, error, info, warn};

use crate::dataset::SampleStore;
use crate::query::EventsQuery;
use crate::response::{EventBody, Problem};

const EVENTS_PATH: &str = "/events";
const HEALTH_PATHS: &[&str] = &["/_health", "/health", "/healthz"];

const JSON: &str = "application/json; charset=utf-8";
const PROBLEM_JSON: &str = "application/problem+json; charset=utf-8";

/// Request handling state for the events API.
#[derive(Debug)]
pub struct EventsApi {
    store: Arc<SampleStore>,
    defaults: EventsQuery,
}

impl EventsApi {
    /// Create an API over `store`, using `defaults` for omitted query parameters.
    pub fn new(store: Arc<SampleStore>, defaults: EventsQuery) -> Self {
        Self { store, defaults }
    }

    /// The backing sample store.
    pub fn store(&self) -> &Arc<SampleStore> {
        &self.store
    }

    /// Route a request by method and URI.
    pub async fn handle(&self, method: &Method, uri: &Uri) -> Response<Full<Bytes>> {
        let path = uri.path();

        if path == EVENTS_PATH {
            if method != Method::GET {
                return method_not_allowed(method);
            }
            self.events(uri.query()).await
        } else if HEALTH_PATHS.contains(&path) {
            if method != Method::GET {
                return method_not_allowed(method);
            }
            text(StatusCode::OK, "OK")
        } else {
            problem(StatusCode::NOT_FOUND, format!("No route for {}", path))
        }
    }

    async fn events(&self, query: Option<&str>) -> Response<Full<Bytes>> {
        let params = match EventsQuery::parse(query, self.defaults).and_then(|q| q.to_params()) {
            Ok(params) => params,
            Err(e) => {
                debug!(error = %e, "rejected events query");
                return problem(StatusCode::BAD_REQUEST, e.to_string());
            }
        };

        let samples = match self.store.samples().await {
            Ok(samples) => samples,
            Err(e) => {
                error!(source = %self.store.description(), error = %e, "dataset unavailable");
                return problem(StatusCode::INTERNAL_SERVER_ERROR, "Sample dataset is unavailable");
            }
        };

        let events = match detect(samples.iter(), params) {
            Ok(events) => events,
            Err(e) => {
                debug!(error = %e, "rejected detection parameters");
                return problem(StatusCode::BAD_REQUEST, e.to_string());
            }
        };

        let bodies: Option<Vec<EventBody>> = events.map(|e| EventBody::from_event(&e)).collect();
        let Some(bodies) = bodies else {
            error!("event timestamp outside the representable range");
            return problem(StatusCode::INTERNAL_SERVER_ERROR, "Event timestamp out of range");
        };

        debug!(
            threshold = params.threshold,
            min_duration_ms = params.min_duration.as_millis(),
            max_gap_ms = params.max_gap.as_millis(),
            events = bodies.len(),
            "events detected"
        );
        json(StatusCode::OK, JSON, &bodies)
    }
}

/// Serve `api` on an already bound listener until the task is dropped or aborted.
///
/// Each connection is served on its own task. Accept errors are logged and
/// the loop keeps going.
pub async fn serve(listener: TcpListener, api: Arc<EventsApi>) {
    loop {
        let (stream, peer) = match listener.accept().await {
            Ok(accepted) => accepted,
            Err(e) => {
                warn!(error = %e, "accept failed");
                continue;
            }
        };
        let io = TokioIo::new(stream);
        let api = Arc::clone(&api);

        tokio::spawn(async move {
            let service = service_fn(move |req: Request<hyper::body::Incoming>| {
                let api = Arc::clone(&api);
                async move {
                    let response = api.handle(req.method(), req.uri()).await;
                    debug!(
                        method = %req.method(),
                        path = req.uri().path(),
                        status = response.status().as_u16(),
                        "request served"
                    );
                    Ok::<_, Infallible>(response)
                }
            });

            if let Err(e) = http1::Builder::new().serve_connection(io, service).await {
                debug!(peer = %peer, error = %e, "connection error");
            }
        });
    }
}

/// A bound events server.
#[derive(Debug)]
pub struct Server {
    listener: TcpListener,
    api: Arc<EventsApi>,
}

impl Server {
    /// Bind to `addr`.
    pub async fn bind<A: ToSocketAddrs>(addr: A, api: EventsApi) -> std::io::Result<Self> {
        let listener = TcpListener::bind(addr).await?;
        Ok(Self {
            listener,
            api: Arc::new(api),
        })
    }

    /// The address actually bound (useful with port 0).
    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Serve until `shutdown` resolves. In-flight connections are dropped.
    pub async fn run_until<F>(self, shutdown: F) -> std::io::Result<()>
    where
        F: Future<Output = ()>,
    {
        let addr = self.local_addr()?;
        info!(%addr, "serving overflow events");

        tokio::select! {
            _ = serve(self.listener, self.api) => {}
            _ = shutdown => info!("shutdown requested"),
        }
        Ok(())
    }

    /// Spawn the server on the runtime. Abort the handle to stop it.
    pub fn spawn(self) -> tokio::task::JoinHandle<()> {
        tokio::spawn(serve(self.listener, self.api))
    }
}

fn with_content_type(
    mut response: Response<Full<Bytes>>,
    content_type: &'static str,
) -> Response<Full<Bytes>> {
    response
        .headers_mut()
        .insert(CONTENT_TYPE, HeaderValue::from_static(content_type));
    response
}

fn respond(status: StatusCode, content_type: &'static str, body: Bytes) -> Response<Full<Bytes>> {
    let mut response = Response::new(Full::new(body));
    *response.status_mut() = status;
    with_content_type(response, content_type)
}

fn text(status: StatusCode, body: &'static str) -> Response<Full<Bytes>> {
    respond(status, "text/plain; charset=utf-8", Bytes::from_static(body.as_bytes()))
}

fn json<T: Serialize>(
    status: StatusCode,
    content_type: &'static str,
    body: &T,
) -> Response<Full<Bytes>> {
    match serde_json::to_vec(body) {
        Ok(bytes) => respond(status, content_type, Bytes::from(bytes)),
        Err(e) => {
            error!(error = %e, "response serialization failed");
            text(StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error")
        }
    }
}

fn problem(status: StatusCode, detail: impl Into<String>) -> Response<Full<Bytes>> {
    json(status, PROBLEM_JSON, &Problem::new(status, detail))
}

fn method_not_allowed(method: &Method) -> Response<Full<Bytes>> {
    problem(
        StatusCode::METHOD_NOT_ALLOWED,
        format!("{} is not supported", method),
    )
}

//! The HTTP server.
//!
//! One hyper http1 connection task per accepted socket. For each request
//! the pipeline is: built-in endpoints, bearer token resolution, route
//! match, body collection, extraction context, registry dispatch, and
//! error-envelope rendering. Everything below the built-ins runs inside a
//! per-request tracing span and is recorded against the request metrics.

use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use bytes::Bytes;
use http::{header, Request, Response, StatusCode};
use http_body_util::{BodyExt, Full};
use hyper::body::Incoming;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::TokioIo;
use tokio::net::TcpListener;
use tracing::Instrument;

use quill_api::{routes, ApiState, HandlerRegistry};
use quill_core::{ApiError, ErrorEnvelope, RequestContext};
use quill_extract::ExtractionContext;
use quill_router::Router;
use quill_telemetry::InFlightGuard;

use crate::auth::TokenTable;
use crate::config::AppConfig;
use crate::shutdown::{ConnectionTracker, ShutdownSignal};

/// Response body type served by the server.
pub type ResponseBody = Full<Bytes>;

/// Full HTTP response type.
pub type HttpResponse = Response<ResponseBody>;

/// Server startup and runtime errors.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// The listener could not bind.
    #[error("Bind error: {0}")]
    Bind(String),
}

/// The Quill HTTP server.
pub struct Server {
    config: AppConfig,
    router: Router,
    registry: HandlerRegistry,
    tokens: TokenTable,
    state: ApiState,
    ready: AtomicBool,
    started: Instant,
}

impl Server {
    /// Assembles the server from configuration and shared state.
    #[must_use]
    pub fn new(config: AppConfig, state: ApiState) -> Self {
        let tokens = TokenTable::from_settings(&config.auth);
        Self {
            config,
            router: routes::router(),
            registry: routes::registry(),
            tokens,
            state,
            ready: AtomicBool::new(true),
            started: Instant::now(),
        }
    }

    /// The configuration the server was built with.
    #[must_use]
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Runs until SIGTERM or SIGINT.
    pub async fn run(self) -> Result<(), ServerError> {
        let shutdown = ShutdownSignal::with_os_signals();
        self.run_with_shutdown(shutdown).await
    }

    /// Runs until the given signal triggers, then drains connections.
    pub async fn run_with_shutdown(self, shutdown: ShutdownSignal) -> Result<(), ServerError> {
        let addr = self
            .config
            .socket_addr()
            .map_err(|e| ServerError::Bind(e.to_string()))?;
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|e| ServerError::Bind(format!("Failed to bind to {addr}: {e}")))?;

        tracing::info!(%addr, tokens = self.tokens.len(), "Server listening");

        let server = Arc::new(self);
        let tracker = ConnectionTracker::new();

        loop {
            tokio::select! {
                result = listener.accept() => {
                    match result {
                        Ok((stream, remote_addr)) => {
                            let server = Arc::clone(&server);
                            let token = tracker.acquire();
                            let shutdown = shutdown.clone();

                            tokio::spawn(async move {
                                if let Err(e) = server.handle_connection(stream, remote_addr, shutdown).await {
                                    tracing::error!(%remote_addr, error = %e, "Connection error");
                                }
                                drop(token);
                            });
                        }
                        Err(e) => {
                            tracing::error!(error = %e, "Failed to accept connection");
                        }
                    }
                }

                _ = shutdown.recv() => {
                    tracing::info!("Shutdown signal received, stopping server");
                    break;
                }
            }
        }

        server.ready.store(false, Ordering::SeqCst);

        let timeout = server.config.server.shutdown_timeout();
        tracing::info!(
            active = tracker.active_connections(),
            ?timeout,
            "Draining connections"
        );
        tokio::select! {
            _ = tracker.drained() => {
                tracing::info!("All connections closed");
            }
            _ = tokio::time::sleep(timeout) => {
                tracing::warn!(
                    active = tracker.active_connections(),
                    "Shutdown timeout reached with connections still active"
                );
            }
        }

        tracing::info!("Server stopped");
        Ok(())
    }

    async fn handle_connection(
        self: &Arc<Self>,
        stream: tokio::net::TcpStream,
        remote_addr: SocketAddr,
        shutdown: ShutdownSignal,
    ) -> Result<(), hyper::Error> {
        let io = TokioIo::new(stream);
        let server = Arc::clone(self);

        let service = service_fn(move |req: Request<Incoming>| {
            let server = Arc::clone(&server);
            async move { server.handle_request(req).await }
        });

        let conn = http1::Builder::new().serve_connection(io, service);

        tokio::select! {
            result = conn => result,
            _ = shutdown.recv() => {
                tracing::debug!(%remote_addr, "Connection closed by shutdown");
                Ok(())
            }
        }
    }

    async fn handle_request(
        self: &Arc<Self>,
        req: Request<Incoming>,
    ) -> Result<HttpResponse, Infallible> {
        let method = req.method().clone();
        let path = req.uri().path().to_string();

        match (method.as_str(), path.as_str()) {
            ("GET", "/health") => return Ok(self.handle_health()),
            ("GET", "/ready") => return Ok(self.handle_ready()),
            ("GET", "/metrics") => return Ok(handle_metrics()),
            _ => {}
        }

        let request_id = req
            .headers()
            .get("x-request-id")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        let _in_flight = InFlightGuard::new();
        let start = Instant::now();

        // Route before auth so a 404 never depends on credentials; a bad
        // token on a real route is still a 401 before the handler runs.
        let Some((methods, params)) = self.router.match_path(&path) else {
            return Ok(error_response(
                &ApiError::not_found(format!("No route for {path}")),
                request_id.as_deref(),
            ));
        };
        let Some(operation_id) = methods.operation(&method) else {
            return Ok(method_not_allowed(
                &methods.allowed_methods(),
                request_id.as_deref(),
            ));
        };
        let operation_id = operation_id.to_string();

        let mut ctx = RequestContext::new().with_operation_id(&operation_id);
        if let Some(id) = request_id {
            ctx = ctx.with_request_id(id);
        }

        let span = tracing::info_span!(
            "request",
            method = %method,
            path = %path,
            operation = %operation_id,
            request_id = %ctx.request_id()
        );

        let response = async {
            let caller = match self.tokens.resolve(
                req.headers()
                    .get(header::AUTHORIZATION)
                    .and_then(|v| v.to_str().ok()),
            ) {
                Ok(caller) => caller,
                Err(e) => return error_response(&e, Some(ctx.request_id())),
            };
            let ctx = ctx.with_caller(caller);

            let (parts, body) = req.into_parts();
            let timeout = self.config.server.request_timeout();
            let body = match tokio::time::timeout(timeout, body.collect()).await {
                Ok(Ok(collected)) => collected.to_bytes(),
                Ok(Err(e)) => {
                    return error_response(
                        &ApiError::validation(format!("Failed to read request body: {e}")),
                        Some(ctx.request_id()),
                    );
                }
                Err(_) => {
                    tracing::warn!("Request body collection timed out");
                    return plain_error(
                        StatusCode::REQUEST_TIMEOUT,
                        "REQUEST_TIMEOUT",
                        "Request body collection timed out",
                    );
                }
            };

            let extraction =
                ExtractionContext::new(parts.method, parts.uri, parts.headers, body, params);

            let Some(handler) = self.registry.get(&operation_id) else {
                tracing::error!("No handler registered for matched operation");
                return plain_error(
                    StatusCode::NOT_IMPLEMENTED,
                    "HANDLER_NOT_IMPLEMENTED",
                    &format!("No handler registered for operation: {operation_id}"),
                );
            };

            let request_id = ctx.request_id().to_string();
            let result = tokio::time::timeout(
                timeout,
                handler(self.state.clone(), ctx, extraction),
            )
            .await;

            match result {
                Ok(Ok(response)) => response.map(Full::new),
                Ok(Err(e)) => {
                    if e.status_code().is_server_error() {
                        tracing::error!(error = %e, "Handler failed");
                    } else {
                        tracing::debug!(error = %e, "Request rejected");
                    }
                    error_response(&e, Some(&request_id))
                }
                Err(_) => {
                    tracing::warn!("Handler execution timed out");
                    plain_error(
                        StatusCode::GATEWAY_TIMEOUT,
                        "HANDLER_TIMEOUT",
                        "Handler execution timed out",
                    )
                }
            }
        }
        .instrument(span)
        .await;

        quill_telemetry::metrics::record_request(
            &operation_id,
            response.status().as_u16(),
            start.elapsed(),
        );
        Ok(response)
    }

    fn handle_health(&self) -> HttpResponse {
        let body = serde_json::json!({
            "status": "healthy",
            "service": "quill",
            "version": env!("CARGO_PKG_VERSION"),
            "uptime_seconds": self.started.elapsed().as_secs(),
        });
        json_response(StatusCode::OK, body.to_string())
    }

    fn handle_ready(&self) -> HttpResponse {
        let ready = self.ready.load(Ordering::SeqCst);
        let status = if ready {
            StatusCode::OK
        } else {
            StatusCode::SERVICE_UNAVAILABLE
        };
        json_response(status, format!(r#"{{"ready":{ready}}}"#))
    }
}

fn handle_metrics() -> HttpResponse {
    match quill_telemetry::render_metrics() {
        Some(text) => Response::builder()
            .status(StatusCode::OK)
            .header(header::CONTENT_TYPE, "text/plain; version=0.0.4")
            .body(Full::new(Bytes::from(text)))
            .unwrap_or_else(|_| Response::new(Full::new(Bytes::new()))),
        None => json_response(
            StatusCode::SERVICE_UNAVAILABLE,
            r#"{"error":"metrics not initialized"}"#.to_string(),
        ),
    }
}

fn json_response(status: StatusCode, body: String) -> HttpResponse {
    Response::builder()
        .status(status)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Full::new(Bytes::from(body)))
        .unwrap_or_else(|_| Response::new(Full::new(Bytes::new())))
}

/// Renders an [`ApiError`] as its envelope.
fn error_response(error: &ApiError, request_id: Option<&str>) -> HttpResponse {
    let envelope: ErrorEnvelope = error.to_envelope(request_id);
    let body = serde_json::to_string(&envelope)
        .unwrap_or_else(|_| r#"{"error":{"code":"INTERNAL_ERROR"}}"#.to_string());
    json_response(error.status_code(), body)
}

fn plain_error(status: StatusCode, code: &str, message: &str) -> HttpResponse {
    let body = serde_json::json!({
        "error": { "code": code, "message": message }
    });
    json_response(status, body.to_string())
}

fn method_not_allowed(allowed: &[http::Method], request_id: Option<&str>) -> HttpResponse {
    let allow = allowed
        .iter()
        .map(http::Method::as_str)
        .collect::<Vec<_>>()
        .join(", ");
    let body = serde_json::json!({
        "error": {
            "code": "METHOD_NOT_ALLOWED",
            "message": format!("Allowed methods: {allow}"),
        },
        "request_id": request_id,
    });

    Response::builder()
        .status(StatusCode::METHOD_NOT_ALLOWED)
        .header(header::ALLOW, allow)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Full::new(Bytes::from(body.to_string())))
        .unwrap_or_else(|_| Response::new(Full::new(Bytes::new())))
}

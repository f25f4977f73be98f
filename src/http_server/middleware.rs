//! Request logging and panic recovery layers

use std::any::Any;
use std::time::Instant;

use axum::{
    body::Body,
    extract::{Request, State},
    http::Response as HttpResponse,
    middleware::Next,
    response::{IntoResponse, Response},
};
use tower_http::catch_panic::ResponseForPanic;

use crate::observability::{Event, Logger};

use super::errors::ApiError;

/// Log one `HTTP_REQUEST` line per completed request
pub async fn log_requests(State(logger): State<Logger>, req: Request, next: Next) -> Response {
    let method = req.method().clone();
    let path = req.uri().path().to_owned();
    let started = Instant::now();

    let response = next.run(req).await;

    let elapsed_ms = started.elapsed().as_millis().to_string();
    logger.info(
        Event::HttpRequest,
        &[
            ("duration_ms", &elapsed_ms),
            ("method", method.as_str()),
            ("path", &path),
            ("status", response.status().as_str()),
        ],
    );
    response
}

/// Turns a handler panic into a 500 envelope and logs it
#[derive(Debug, Clone)]
pub struct PanicResponder {
    logger: Logger,
}

impl PanicResponder {
    pub fn new(logger: Logger) -> Self {
        Self { logger }
    }
}

impl ResponseForPanic for PanicResponder {
    type ResponseBody = Body;

    fn response_for_panic(&mut self, err: Box<dyn Any + Send + 'static>) -> HttpResponse<Body> {
        let detail = if let Some(s) = err.downcast_ref::<String>() {
            s.as_str()
        } else if let Some(s) = err.downcast_ref::<&str>() {
            s
        } else {
            "unknown panic payload"
        };

        self.logger.error(Event::RequestPanic, &[("panic", detail)]);
        ApiError::Internal("internal server error").into_response()
    }
}

//! # HTTP Server
//!
//! Combines the record and health routers with the middleware stack and
//! runs them until a shutdown future resolves.
//!
//! Layer order, outermost first: panic recovery, request logging, CORS.

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::{middleware, Router};
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinError;
use tower_http::catch_panic::CatchPanicLayer;

use crate::observability::{Event, Logger};
use crate::service::RecordService;

use super::config::HttpServerConfig;
use super::errors::ServerError;
use super::health_routes::health_routes;
use super::middleware::{log_requests, PanicResponder};
use super::record_routes::{record_routes, RecordState};

/// HTTP server for the habit record API
pub struct HttpServer {
    config: HttpServerConfig,
    router: Router,
    service: RecordService,
    logger: Logger,
}

impl HttpServer {
    /// Create a new HTTP server over the given service
    pub fn new(config: HttpServerConfig, service: RecordService, logger: Logger) -> Self {
        let router = Self::build_router(&config, service.clone(), logger.clone());
        Self {
            config,
            router,
            service,
            logger,
        }
    }

    /// Build the combined router with all endpoints and layers
    pub fn build_router(config: &HttpServerConfig, service: RecordService, logger: Logger) -> Router {
        let record_state = Arc::new(RecordState::new(service, logger.clone()));

        Router::new()
            .merge(health_routes())
            .nest("/api", record_routes(record_state))
            .layer(config.cors_layer())
            .layer(middleware::from_fn_with_state(logger.clone(), log_requests))
            .layer(CatchPanicLayer::custom(PanicResponder::new(logger)))
    }

    /// Get the socket address
    pub fn socket_addr(&self) -> String {
        self.config.socket_addr()
    }

    /// Get the router (for testing)
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Bind the configured address and serve until `shutdown` resolves
    pub async fn run_until<F>(self, shutdown: F) -> Result<(), ServerError>
    where
        F: Future<Output = ()>,
    {
        let addr: SocketAddr = self
            .config
            .socket_addr()
            .parse()
            .map_err(|_| ServerError::InvalidAddress(self.config.socket_addr()))?;

        let listener = TcpListener::bind(addr).await?;
        self.serve(listener, shutdown).await
    }

    /// Serve on an already bound listener until `shutdown` resolves.
    ///
    /// On shutdown: stop accepting, give in-flight requests up to
    /// `shutdown_timeout` to finish, then close the store.
    pub async fn serve<F>(self, listener: TcpListener, shutdown: F) -> Result<(), ServerError>
    where
        F: Future<Output = ()>,
    {
        let local_addr = listener.local_addr()?;
        self.logger
            .info(Event::Serving, &[("addr", &local_addr.to_string())]);

        let (stop_tx, stop_rx) = oneshot::channel::<()>();
        let server = axum::serve(listener, self.router).with_graceful_shutdown(async move {
            let _ = stop_rx.await;
        });
        let mut serving = tokio::spawn(async move { server.await });

        let outcome = tokio::select! {
            joined = &mut serving => flatten(joined),
            () = shutdown => {
                self.logger.info(Event::ShutdownStart, &[]);
                let _ = stop_tx.send(());

                match tokio::time::timeout(self.config.shutdown_timeout(), &mut serving).await {
                    Ok(joined) => flatten(joined),
                    Err(_) => {
                        self.logger.warn(
                            Event::ShutdownTimedOut,
                            &[("timeout_secs", &self.config.shutdown_timeout_secs.to_string())],
                        );
                        serving.abort();
                        Ok(())
                    }
                }
            }
        };

        self.service.repository().close().await;
        self.logger.info(Event::DatabaseClosed, &[]);
        self.logger.info(Event::ShutdownComplete, &[]);

        outcome
    }
}

fn flatten(joined: Result<std::io::Result<()>, JoinError>) -> Result<(), ServerError> {
    match joined {
        Ok(result) => result.map_err(ServerError::from),
        Err(e) => Err(ServerError::Task(e.to_string())),
    }
}

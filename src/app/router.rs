use crate::handler::health::health_handler;
use crate::receiver::{ReceiverState, otlp_routes};
use axum::Router;
use axum::routing::get;

/// Build the HTTP router (health + OTLP signals).
pub fn main_router(receiver: ReceiverState) -> Router {
    let v1_health_router = Router::new().route("/v1/health", get(health_handler));

    Router::new()
        .merge(v1_health_router)
        .merge(otlp_routes(receiver))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::MockConsumer;
    use axum_test::TestServer;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_health_endpoint_returns_healthy() {
        let receiver = ReceiverState::otlp(1024, Arc::new(MockConsumer::new()));
        let server = TestServer::new(main_router(receiver)).unwrap();

        let response = server.get("/v1/health").await;

        response.assert_status_ok();
        response.assert_text("Healthy");
    }

    #[tokio::test]
    async fn test_signal_routes_reject_get() {
        let receiver = ReceiverState::otlp(1024, Arc::new(MockConsumer::new()));
        let server = TestServer::new(main_router(receiver)).unwrap();

        let response = server.get("/v1/traces").expect_failure().await;

        response.assert_status(axum::http::StatusCode::METHOD_NOT_ALLOWED);
    }
}

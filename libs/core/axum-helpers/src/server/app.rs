use super::shutdown::ShutdownCoordinator;
use crate::errors::handlers::{method_not_allowed, not_found};
use axum::Router;
use core_config::server::ServerConfig;
use std::future::Future;
use std::io;
use std::time::Duration;
use tokio::net::TcpListener;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::{Level, info, warn};
use utoipa::OpenApi;

/// Path the OpenAPI document is served from.
pub const OPENAPI_JSON_PATH: &str = "/openapi.json";

/// Creates a configured Axum router with common middleware and documentation.
///
/// This function sets up:
/// - OpenAPI documentation (Swagger UI at `/docs`, ReDoc at `/redoc`,
///   raw document at `/openapi.json`)
/// - Request tracing
/// - JSON 404 and 405 fallbacks
///
/// Routes are merged at the root, so `apis` decides its own paths.
/// Health endpoints should be merged by the app using `health_router()`.
///
/// # Example
/// ```ignore
/// use utoipa::OpenApi;
/// use axum_helpers::server::create_router;
///
/// #[derive(OpenApi)]
/// #[openapi(paths(/* your paths */))]
/// struct ApiDoc;
///
/// let api_routes = domain_items::handlers::router(service);
/// let router = create_router::<ApiDoc>(api_routes);
/// ```
pub fn create_router<T>(apis: Router) -> Router
where
    T: OpenApi + 'static,
{
    use utoipa_redoc::{Redoc, Servable as RedocServable};
    use utoipa_swagger_ui::SwaggerUi;

    Router::new()
        .merge(SwaggerUi::new("/docs").url(OPENAPI_JSON_PATH, T::openapi()))
        .merge(Redoc::with_url("/redoc", T::openapi()))
        .merge(apis)
        .fallback(not_found)
        .method_not_allowed_fallback(method_not_allowed)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
}

/// Serve `router` until SIGINT/SIGTERM, then run `cleanup`.
///
/// `cleanup` runs on every exit path: after a graceful shutdown, after a
/// server error, and when the listener fails to bind. It is bounded by
/// `shutdown_timeout`.
///
/// # Example
/// ```ignore
/// use std::time::Duration;
/// use axum_helpers::server::serve;
///
/// let cleanup = async move {
///     database::mongodb::disconnect(client).await;
/// };
///
/// serve(router, &config.server, Duration::from_secs(30), cleanup).await?;
/// ```
pub async fn serve<F>(
    router: Router,
    server_config: &ServerConfig,
    shutdown_timeout: Duration,
    cleanup: F,
) -> io::Result<()>
where
    F: Future<Output = ()> + Send,
{
    serve_until(
        router,
        server_config,
        ShutdownCoordinator::default(),
        shutdown_timeout,
        cleanup,
    )
    .await
}

/// Same as [`serve`], but shutdown is driven by `coordinator`.
///
/// OS signals still trigger shutdown; calling `coordinator.shutdown()`
/// from elsewhere does too.
pub async fn serve_until<F>(
    router: Router,
    server_config: &ServerConfig,
    coordinator: ShutdownCoordinator,
    shutdown_timeout: Duration,
    cleanup: F,
) -> io::Result<()>
where
    F: Future<Output = ()> + Send,
{
    let serve_result = run(router, server_config, coordinator).await;

    info!("Starting cleanup tasks (timeout: {:?})", shutdown_timeout);
    match tokio::time::timeout(shutdown_timeout, cleanup).await {
        Ok(_) => info!("Cleanup completed successfully"),
        Err(_) => warn!(
            "Cleanup exceeded timeout of {:?}, forcing shutdown",
            shutdown_timeout
        ),
    }

    serve_result
}

async fn run(
    router: Router,
    server_config: &ServerConfig,
    coordinator: ShutdownCoordinator,
) -> io::Result<()> {
    let listener = TcpListener::bind(server_config.address())
        .await
        .inspect_err(|e| tracing::error!("Failed to bind {}: {}", server_config.address(), e))?;

    info!("Server ready on http://{}", listener.local_addr()?);

    axum::serve(listener, router.into_make_service())
        .with_graceful_shutdown(async move { coordinator.wait().await })
        .await
        .inspect_err(|e| {
            tracing::error!("Server encountered an error: {:?}", e);
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http::Request, http::StatusCode, routing::get};
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, Ordering};
    use tower::ServiceExt;

    #[derive(OpenApi)]
    #[openapi(info(title = "Test API", version = "0.0.1"))]
    struct TestDoc;

    fn app() -> Router {
        create_router::<TestDoc>(Router::new().route("/ping", get(|| async { "pong" })))
    }

    #[tokio::test]
    async fn test_openapi_json_is_served() {
        let response = app()
            .oneshot(
                Request::builder()
                    .uri(OPENAPI_JSON_PATH)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_unknown_route_returns_json_404() {
        let response = app()
            .oneshot(Request::builder().uri("/nope").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_wrong_method_returns_405() {
        let response = app()
            .oneshot(
                Request::builder()
                    .method("DELETE")
                    .uri("/ping")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    }

    #[tokio::test]
    async fn test_cleanup_runs_after_shutdown() {
        let cleaned = Arc::new(AtomicBool::new(false));
        let flag = cleaned.clone();
        let coordinator = ShutdownCoordinator::default();
        let config = ServerConfig::new("127.0.0.1".to_string(), 0);

        let trigger = coordinator.clone();
        let server = tokio::spawn(async move {
            serve_until(app(), &config, coordinator, Duration::from_secs(1), async move {
                flag.store(true, Ordering::SeqCst);
            })
            .await
        });

        trigger.shutdown();
        let result = tokio::time::timeout(Duration::from_secs(5), server)
            .await
            .unwrap()
            .unwrap();

        assert!(result.is_ok());
        assert!(cleaned.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn test_cleanup_runs_when_bind_fails() {
        let cleaned = Arc::new(AtomicBool::new(false));
        let flag = cleaned.clone();
        let config = ServerConfig::new("256.0.0.1".to_string(), 0);

        let result = serve(app(), &config, Duration::from_secs(1), async move {
            flag.store(true, Ordering::SeqCst);
        })
        .await;

        assert!(result.is_err());
        assert!(cleaned.load(Ordering::SeqCst));
    }
}

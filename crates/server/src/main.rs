//! sahemind-rs server entry point.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{Router, middleware};
use sahemind_api::{AppState, auth_middleware, router as api_router};
use sahemind_common::Config;
use sahemind_core::{
    AuthService, EmotionClassifier, EmotionService, ForumService, HttpEmotionClassifier,
    JournalService, PostResponseService, PostService, UserService, VolunteerService,
};
use sahemind_db::repositories::{
    ForumRepository, JournalRepository, LikeRepository, PostRepository, PostResponseRepository,
    UserRepository,
};
use tokio::signal;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Waits for a shutdown signal (SIGINT or SIGTERM).
///
/// On Unix systems, this listens for both SIGINT (Ctrl+C) and SIGTERM.
/// On Windows, this only listens for Ctrl+C.
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            info!("Received SIGINT, initiating graceful shutdown...");
        },
        () = terminate => {
            info!("Received SIGTERM, initiating graceful shutdown...");
        },
    }
}

/// Wire repositories into services.
fn build_state(db: Arc<sea_orm::DatabaseConnection>, config: &Config) -> anyhow::Result<AppState> {
    let user_repo = UserRepository::new(Arc::clone(&db));
    let journal_repo = JournalRepository::new(Arc::clone(&db));
    let forum_repo = ForumRepository::new(Arc::clone(&db));
    let post_repo = PostRepository::new(Arc::clone(&db));
    let response_repo = PostResponseRepository::new(Arc::clone(&db));
    let like_repo = LikeRepository::new(Arc::clone(&db));

    let tz = config.volunteers.tz()?;

    let classifier = HttpEmotionClassifier::from_config(&config.emotion)?
        .map(|c| Arc::new(c) as Arc<dyn EmotionClassifier>);
    if classifier.is_none() {
        tracing::warn!("No emotion classifier URL configured; analysis will use the fallback");
    }

    Ok(AppState {
        auth_service: AuthService::new(user_repo.clone()),
        user_service: UserService::new(user_repo.clone()),
        volunteer_service: VolunteerService::new(user_repo.clone(), &config.volunteers)?,
        journal_service: JournalService::new(journal_repo, tz),
        forum_service: ForumService::new(forum_repo.clone(), user_repo.clone()),
        post_service: PostService::new(
            post_repo.clone(),
            forum_repo,
            user_repo.clone(),
            like_repo.clone(),
        ),
        response_service: PostResponseService::new(response_repo, post_repo, user_repo, like_repo),
        emotion_service: EmotionService::new(classifier),
    })
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "sahemind=debug,tower_http=debug".into()),
        )
        .init();

    info!("Starting sahemind-rs server...");

    // Load configuration
    let config = Config::discover()?;

    let db = sahemind_db::init(&config.database).await?;
    sahemind_db::migrate(&db).await?;

    let state = build_state(Arc::new(db), &config)?;

    let app = Router::new()
        .nest("/api", api_router())
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state);

    // Start server with graceful shutdown
    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;
    info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

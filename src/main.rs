use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use coursebook::{assistant, config, db, handlers, state::AppState};

#[tokio::main]
async fn main() {
  tracing_subscriber::registry()
    .with(
      tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "coursebook=debug,tower_http=debug".into()),
    )
    .with(tracing_subscriber::fmt::layer())
    .init();

  let db_path = config::load_database_path();
  let pool = db::init_db(&db_path).expect("Failed to initialize database");

  {
    let conn = pool.lock().expect("Database lock failed during startup");
    db::seed_demo_course(&conn).expect("Failed to seed demo course");
  }

  let assistant = match config::load_assistant_config() {
    Some(cfg) => {
      tracing::info!("Assistant enabled ({} via {})", cfg.model, cfg.base_url);
      Some(assistant::AssistantClient::new(cfg).expect("Failed to build assistant client"))
    }
    None => {
      tracing::info!("Assistant disabled: no ASSISTANT_API_KEY configured");
      None
    }
  };

  // CORS stays permissive: the SPA is served from another origin and the
  // gateway in front of this service handles auth
  let app = handlers::router(AppState::new(pool, assistant))
    .layer(TraceLayer::new_for_http())
    .layer(CorsLayer::permissive());

  let bind_addr = config::server_bind_addr();
  let listener = tokio::net::TcpListener::bind(&bind_addr)
    .await
    .unwrap_or_else(|_| panic!("Failed to bind to {}", bind_addr));

  tracing::info!("Server running on http://localhost:{}", config::SERVER_PORT);

  axum::serve(listener, app)
    .await
    .expect("Server failed to start");
}

//! Course Gate HTTP Server Binary
//!
//! Loads configuration, seeds the in-memory course reader and serves the API.
//!
//! # Usage
//!
//! ```bash
//! COURSE_GATE_FIXTURES=backend/fixtures/courses.json \
//!   cargo run --bin course-gate-server
//! ```
//!
//! # Environment Variables
//!
//! - `COURSE_GATE_CONFIG`: Path to a TOML config file
//! - `COURSE_GATE_FIXTURES`: JSON fixtures for the in-memory reader
//! - `COURSE_GATE_TOKEN_ADDRESS`: Reward token used when `rewardToken()` is zero
//! - `HOST`: Server host (default: 0.0.0.0)
//! - `PORT`: Server port (default: 8080)
//! - `RUST_LOG`: Log filter directives (default: info)

use std::net::SocketAddr;
use std::sync::Arc;

use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use course_gate::chain::{CourseReader, LocalCourseReader};
use course_gate::config::ServerConfig;
use course_gate::http::{create_router, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .with_thread_ids(true)
        .init();

    info!("Starting Course Gate HTTP Server");

    let config = ServerConfig::load()?;

    let reader = match &config.fixtures {
        Some(path) => {
            let reader = LocalCourseReader::from_json_file(path)?;
            info!("Loaded {} courses from {}", reader.course_count(), path.display());
            reader
        }
        None => {
            warn!("No fixtures configured, serving an empty course catalog");
            LocalCourseReader::new()
        }
    };
    if let Some(token) = &config.token_address {
        info!("Fallback reward token {}", token);
    }
    let reader: Arc<dyn CourseReader> =
        Arc::new(reader.with_token_address(config.token_address.clone()));

    let state = AppState::new(reader).with_countdown_interval(config.countdown_interval());
    let app = create_router(state);

    let addr: SocketAddr = config.bind_address().parse()?;
    info!("Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

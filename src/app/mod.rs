mod router;
pub mod server;
mod state;
pub mod tracing;

pub use router::main_router;

use crate::config;
use crate::error::AppError;

/// Application entry point. Initializes tracing, configuration, and starts the server.
pub async fn run() -> Result<(), AppError> {
    // Handle healthcheck subcommand (for Docker healthcheck in distroless image)
    if std::env::args().nth(1).as_deref() == Some("healthcheck") {
        match crate::healthcheck().await {
            Ok(()) => std::process::exit(0),
            Err(e) => {
                eprintln!("{e}");
                std::process::exit(1)
            }
        }
    }

    tracing::init_tracing();

    let settings = config::get_configuration()?;
    ::tracing::info!(
        bind = %settings.bind_address(),
        max_payload_bytes = settings.max_payload_bytes,
        "Loaded settings"
    );

    let app_state = state::AppState::from_settings(&settings);
    let app = router::main_router(app_state.receiver);

    server::serve(app, &settings.bind_address()).await
}

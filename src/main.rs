use std::sync::Arc;

use voice_onboard::config::Config;
use voice_onboard::knowledge::PlaceholderKnowledgeBase;
use voice_onboard::server::{self, AppState};
use voice_onboard::session::{SessionRegistry, SessionService};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let config = Config::from_env()?;

    eprintln!("🎙  Voice Onboard v{}", env!("CARGO_PKG_VERSION"));
    eprintln!("   LiveKit: {}", config.livekit_url);
    eprintln!("   Session API: http://0.0.0.0:{}/api/voice-session", config.port);
    eprintln!("   Control WS: ws://0.0.0.0:{}/ws/{{room_name}}", config.port);
    eprintln!(
        "   Session timeout: {}s\n",
        config.session_timeout.as_secs()
    );

    let registry = SessionRegistry::new();
    let service = SessionService::new(&config, Arc::clone(&registry));

    let state = AppState {
        service,
        registry,
        knowledge: Arc::new(PlaceholderKnowledgeBase),
    };
    let app = server::routes(state);

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", config.port)).await?;
    tracing::info!(port = config.port, "Voice onboarding server started");
    axum::serve(listener, app).await?;

    Ok(())
}

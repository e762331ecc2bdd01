//! Nightwire demo: a scripted session on the process-wide bus, locator and
//! UI manager.
//!
//! Set `RUST_LOG=debug` to see every subscription and UI operation, and
//! `NIGHTWIRE_CONFIG` to point at a JSON config file.

mod app;
mod handlers;

use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use app::services::{AudioService, SceneService, TimeService};

fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "nightwire=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Nightwire demo");

    let app = app::bootstrap();
    info!("Ready: {}", app.ready.is_ready());

    app::run_demo(&app);

    if let Some(audio) = app.locator.get::<dyn AudioService>() {
        info!("Audio cues played: {:?}", audio.played());
    }
    if let Some(scenes) = app.locator.get::<SceneService>() {
        info!("Current scene: {}", scenes.current());
    }
    if let Some(time) = app.locator.get::<TimeService>() {
        info!("Game time: {:.3}s", time.elapsed());
    }

    println!("{}", app.bus.snapshot().to_json());

    app.shutdown();
}

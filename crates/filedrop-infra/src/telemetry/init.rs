use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const DEFAULT_FILTER: &str = "filedrop=info,sqlx=warn";

/// Install the global tracing subscriber.
///
/// `RUST_LOG` overrides the default filter. Production emits JSON lines, everything
/// else a compact human-readable format.
pub fn init_telemetry(json: bool) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_FILTER.into());

    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .try_init()?;
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().compact().with_target(false))
            .try_init()?;
    }

    tracing::debug!(json, "Tracing initialized");
    Ok(())
}

//! Diagnostic logging for the CLI.
//!
//! Events go to stderr so stdout carries nothing but IDs and decoded records,
//! which keeps the output safe to pipe. `RUST_LOG` overrides `--log-level`
//! when set.

use tracing_subscriber::{EnvFilter, filter::LevelFilter, layer::SubscriberExt, util::SubscriberInitExt};

pub fn init_telemetry(level: LevelFilter) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.to_string()));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_line_number(true),
        )
        .try_init()?;

    Ok(())
}

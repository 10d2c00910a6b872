use anyhow::Result;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

/// Default filter directive; `RUST_LOG` takes precedence when set.
pub fn default_directive(verbose: bool) -> &'static str {
    if verbose {
        "famicom_snake=debug,warn"
    } else {
        "famicom_snake=info,warn"
    }
}

/// Initialize the logging system with tracing.
pub fn init_logging(verbose: bool) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive(verbose)));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(true))
        .try_init()?;

    Ok(())
}

use tracing_subscriber::EnvFilter;

/// `RUST_LOG` wins; otherwise info for everything. Logs go to stderr so stdout stays JSON.
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .try_init();
}

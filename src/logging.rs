/// Tracing setup. Output goes to stderr so exports on stdout stay clean.
use tracing_subscriber::EnvFilter;

const FILTER_ENV: &str = "DAYLOG_LOG";

pub fn init() {
    let filter = EnvFilter::try_from_env(FILTER_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

use tracing::Subscriber;
use tracing_subscriber::EnvFilter;

/// Install the process-wide logger.
///
/// `RUST_LOG` takes precedence; otherwise `debug` when `verbose`, `warn` if not.
/// The global subscriber can only be set once per process, so later calls
/// leave the first one in place and return `false`.
pub fn init_logger(verbose: bool) -> bool {
    let directives = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    tracing::subscriber::set_global_default(build_subscriber(verbose, directives.as_deref()))
        .is_ok()
}

fn build_subscriber(verbose: bool, directives: Option<&str>) -> impl Subscriber + Send + Sync {
    let filter = directives
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new(if verbose { "debug" } else { "warn" }));

    tracing_subscriber::FmtSubscriber::builder()
        .with_env_filter(filter)
        .finish()
}

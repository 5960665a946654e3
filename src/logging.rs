//! Diagnostic logging setup

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Install a stderr subscriber
///
/// `RUST_LOG` wins when set; otherwise `verbose` selects `debug` for this
/// crate and `warn` is used elsewhere. Calling this twice is harmless.
pub fn init(verbose: bool) {
    let fallback = if verbose {
        "scout_extension=debug"
    } else {
        "warn"
    };

    let _ = tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback)))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init();
}

//! Tracing subscriber setup.
//!
//! Progress and info messages go to stdout at `INFO`; errors are not
//! logged here, `main` returns them and they land on stderr.

use tracing::level_filters::LevelFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{Layer, fmt};

/// Install the global subscriber. A second call is a no-op.
pub fn init_logging() {
    let fmt_layer = fmt::layer()
        .with_writer(std::io::stdout)
        .with_target(false)
        .without_time()
        .with_filter(LevelFilter::INFO);

    let _ = tracing_subscriber::registry().with(fmt_layer).try_init();
}

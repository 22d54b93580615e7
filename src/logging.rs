//! Tracing subscriber setup.
//!
//! Logs go to stderr, so failed dependency calls reach the error stream the
//! container runtime collects. `logging.format = "json"` switches to one JSON
//! object per line.

use tracing::Subscriber;
use tracing_subscriber::{fmt, fmt::MakeWriter, layer::SubscriberExt, EnvFilter};

pub type BoxedSubscriber = Box<dyn Subscriber + Send + Sync>;

/// Build the subscriber for `filter`, writing to `writer`.
pub fn subscriber<W>(filter: &str, json: bool, writer: W) -> BoxedSubscriber
where
    W: for<'a> MakeWriter<'a> + Send + Sync + 'static,
{
    let registry = tracing_subscriber::registry().with(EnvFilter::new(filter));
    if json {
        Box::new(registry.with(fmt::layer().json().with_writer(writer)))
    } else {
        Box::new(registry.with(fmt::layer().with_writer(writer)))
    }
}

/// Install the process-wide subscriber, writing to stderr.
pub fn init(filter: &str, json: bool) -> Result<(), tracing::subscriber::SetGlobalDefaultError> {
    tracing::subscriber::set_global_default(subscriber(filter, json, std::io::stderr))
}

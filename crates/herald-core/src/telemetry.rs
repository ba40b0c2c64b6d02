//! Tracing setup for the `herald` binary.
//!
//! stdout carries the user-facing output (progress lines, the simulated
//! thread, the optional JSON report), so every log line goes to stderr and
//! `herald --report > run.json` stays parseable.

use tracing::Level;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// HTTP stack crates kept at `warn` unless `RUST_LOG` says otherwise.
const QUIET_DEPENDENCIES: &[&str] = &["hyper", "hyper_util", "reqwest", "rustls", "h2"];

/// Filter directives used when `RUST_LOG` is unset or invalid.
fn default_directives(level: Level) -> String {
    let mut directives = vec![level.as_str().to_lowercase()];
    directives.extend(QUIET_DEPENDENCIES.iter().map(|krate| format!("{krate}=warn")));
    directives.join(",")
}

/// Install the global subscriber; only the first call in a process wins.
///
/// * `json`: newline-delimited JSON instead of human-readable lines
/// * `level`: herald verbosity when `RUST_LOG` is unset
pub fn init_tracing(json: bool, level: Level) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(level)));

    let json_layer = json.then(|| {
        fmt::layer()
            .with_target(false)
            .with_writer(std::io::stderr)
            .json()
    });
    let text_layer = (!json).then(|| {
        fmt::layer()
            .with_target(false)
            .with_writer(std::io::stderr)
    });

    tracing_subscriber::registry()
        .with(env_filter)
        .with(json_layer)
        .with(text_layer)
        .try_init()
        .ok();
}

//! Tracing subscriber setup.
//!
//! The filter comes from `RUST_LOG` when it is set and parses, otherwise from
//! the directive passed in (for example `"classroom_core=debug,info"`).

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Default directive for binaries and examples built on this crate.
pub const DEFAULT_DIRECTIVE: &str = "classroom_core=debug,classroom_models=debug,info";

fn filter(default_directive: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive))
}

/// Installs a human-readable subscriber.
///
/// Returns `false` if a global subscriber was already installed.
pub fn init(default_directive: &str) -> bool {
    tracing_subscriber::registry()
        .with(filter(default_directive))
        .with(tracing_subscriber::fmt::layer())
        .try_init()
        .is_ok()
}

/// Installs a subscriber that writes one JSON object per event.
///
/// Returns `false` if a global subscriber was already installed.
pub fn init_json(default_directive: &str) -> bool {
    tracing_subscriber::registry()
        .with(filter(default_directive))
        .with(tracing_subscriber::fmt::layer().json())
        .try_init()
        .is_ok()
}

//! Tracing setup shared by the binary and tests.

use std::io::{self, IsTerminal};

use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::time::FormatTime;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::{SubscriberInitExt, TryInitError};
use tracing_subscriber::{EnvFilter, fmt};

/// Workspace crates whose events are interesting at the default level.
pub const WORKSPACE_TARGETS: &[&str] = &[
    "oneflow_feasibility",
    "ai_llm_service",
    "api_knowledge",
    "rag_store",
    "doc_loader",
    "feasibility",
    "api",
];

/// RFC3339 UTC timer implemented via `chrono`.
/// Example output: `2025-09-12T10:20:30Z`
#[derive(Clone, Debug, Default)]
struct ChronoRfc3339Utc;

impl FormatTime for ChronoRfc3339Utc {
    fn format_time(&self, w: &mut Writer<'_>) -> std::fmt::Result {
        let now = chrono::Utc::now();
        w.write_str(&now.to_rfc3339_opts(chrono::SecondsFormat::Secs, true))
    }
}

/// Builds the default filter string: `warn` for dependencies, `level` for the workspace.
pub fn default_directives(level: &str) -> String {
    let mut s = String::from("warn");
    for t in WORKSPACE_TARGETS {
        s.push(',');
        s.push_str(t);
        s.push('=');
        s.push_str(level);
    }
    s
}

/// `RUST_LOG` when set and valid, otherwise [`default_directives`].
pub fn env_filter_or(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directives(level)))
}

/// Installs the global subscriber: env filter plus a compact fmt layer.
///
/// # Errors
/// Fails if a global subscriber is already set.
pub fn init(level: &str) -> Result<(), TryInitError> {
    let layer = fmt::layer()
        .with_timer(ChronoRfc3339Utc)
        .with_target(true)
        .with_line_number(true)
        .with_ansi(io::stdout().is_terminal())
        .compact();

    tracing_subscriber::registry()
        .with(env_filter_or(level))
        .with(layer)
        .try_init()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn directives_cover_every_workspace_crate() {
        let d = default_directives("debug");
        assert!(d.starts_with("warn,"));
        for t in WORKSPACE_TARGETS {
            assert!(d.contains(&format!("{t}=debug")));
        }
        assert!(EnvFilter::try_new(&d).is_ok());
    }
}

use std::io::IsTerminal;

use tracing_subscriber::EnvFilter;

/// Logs go to stderr so stdout carries only the tally. `RUST_LOG` wins over `verbose`.
pub fn init_cli_tracing(verbose: bool) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if verbose { "debug" } else { "warn" }));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_ansi(std::io::stderr().is_terminal())
        .compact()
        .try_init();
}

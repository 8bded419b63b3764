use tracing_subscriber::EnvFilter;

/// Installs the global subscriber. Everything goes to stderr: stdout belongs
/// to the REPL, or to the MCP stdio channel when running as a tool server.
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

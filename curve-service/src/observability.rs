use tracing_subscriber::EnvFilter;

/// Install the global fmt subscriber.
///
/// `RUST_LOG` directives are honored; `default_directive` is added on top so
/// the crate logs at a sensible level without any environment. Events go to
/// stderr, keeping stdout free for command output.
pub fn init_tracing(default_directive: &str) {
    let directive = default_directive
        .parse()
        .unwrap_or_else(|_| "curve_service=info".parse().expect("static directive"));
    let filter = EnvFilter::from_default_env().add_directive(directive);

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

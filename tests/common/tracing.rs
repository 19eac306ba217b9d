use std::sync::Once;

/// Install a stdout subscriber once per test binary, filtered by `RUST_LOG`.
///
/// Run with `RUST_LOG=trace_tree=trace` to see rows being materialized and
/// queue drains interleaved with the test output.
pub fn init_tracing_from_env() {
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        let env_filter = tracing_subscriber::EnvFilter::from_default_env();

        let subscriber = tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_writer(std::io::stdout);
        let _ = subscriber.try_init();
    });
}

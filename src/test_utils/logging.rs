use std::time::Instant;

use tracing::subscriber::DefaultGuard;
use tracing_subscriber::EnvFilter;

/// Per-test trace capture.
///
/// Installs a thread-local subscriber writing through the test harness, so
/// engine `debug!`/`warn!` lines show up next to a failing test only.
pub struct TestLogger {
    test_name: String,
    start_time: Instant,
    _guard: DefaultGuard,
}

impl TestLogger {
    pub fn new(test_name: &str) -> Self {
        let subscriber = tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::new("talentlens=debug"))
            .with_test_writer()
            .finish();
        let guard = tracing::subscriber::set_default(subscriber);

        println!("[TEST START] {test_name}");
        Self {
            test_name: test_name.to_string(),
            start_time: Instant::now(),
            _guard: guard,
        }
    }

    pub fn log_input<T: std::fmt::Debug>(&self, name: &str, value: &T) {
        println!("[INPUT] {name}: {value:?}");
    }

    pub fn pass(&self) {
        println!("[RESULT] {} PASSED in {:?}", self.test_name, self.start_time.elapsed());
    }
}

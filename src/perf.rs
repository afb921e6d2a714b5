use std::sync::OnceLock;
use std::time::Instant;

/// 慢操作阈值环境变量（毫秒）
pub const SLOW_OP_MS_ENV: &str = "CARBON_CONSTRUCT_SLOW_OP_MS";

static SLOW_OP_THRESHOLD_MS: OnceLock<u64> = OnceLock::new();

fn slow_threshold_ms() -> u64 {
    *SLOW_OP_THRESHOLD_MS.get_or_init(|| {
        std::env::var(SLOW_OP_MS_ENV)
            .ok()
            .and_then(|v| v.trim().parse::<u64>().ok())
            .unwrap_or(if cfg!(debug_assertions) { 50 } else { 200 })
    })
}

/// 耗时统计 Guard：drop 时记录 elapsed_ms 与处理的行数，超过阈值升级为 warn
///
/// ```ignore
/// let mut perf = carbon_construct::perf::PerfGuard::new("api.calculate");
/// perf.set_items(input.line_count());
/// ```
pub struct PerfGuard {
    op: &'static str,
    start: Instant,
    items: usize,
}

impl PerfGuard {
    pub fn new(op: &'static str) -> Self {
        Self {
            op,
            start: Instant::now(),
            items: 0,
        }
    }

    pub fn set_items(&mut self, items: usize) {
        self.items = items;
    }

    pub fn elapsed_ms(&self) -> u64 {
        self.start.elapsed().as_millis() as u64
    }
}

impl Drop for PerfGuard {
    fn drop(&mut self) {
        let elapsed_ms = self.elapsed_ms();
        if elapsed_ms >= slow_threshold_ms() {
            tracing::warn!(
                target: "perf",
                op = self.op,
                elapsed_ms,
                items = self.items,
                "slow operation"
            );
        } else {
            tracing::debug!(
                target: "perf",
                op = self.op,
                elapsed_ms,
                items = self.items,
                "done"
            );
        }
    }
}

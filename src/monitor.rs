//! CPU utilisation monitor.
//!
//! A periodic task on the tokio runtime that samples aggregate CPU counters once
//! per interval and prints the utilisation over that window. It shares nothing
//! with the install steps and stops when its cancellation token fires.

use crate::error::SetupError;
use parking_lot::RwLock;
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Cumulative CPU time counters, in clock ticks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CpuTimes {
    pub busy: u64,
    pub total: u64,
}

impl CpuTimes {
    /// Utilisation between `earlier` and `self`, clamped to [0, 100].
    pub fn percent_since(&self, earlier: &CpuTimes) -> f32 {
        let total = self.total.saturating_sub(earlier.total);
        if total == 0 {
            return 0.0;
        }
        let busy = self.busy.saturating_sub(earlier.busy).min(total);
        (busy as f64 / total as f64 * 100.0).clamp(0.0, 100.0) as f32
    }
}

/// Source of CPU counters.
pub trait CpuSampler: Send + 'static {
    fn sample(&mut self) -> Result<CpuTimes, SetupError>;
}

/// Reads the aggregate `cpu` line of `/proc/stat`.
#[derive(Debug, Default)]
pub struct ProcStatSampler;

impl CpuSampler for ProcStatSampler {
    fn sample(&mut self) -> Result<CpuTimes, SetupError> {
        let stat = std::fs::read_to_string("/proc/stat")?;
        parse_proc_stat(&stat)
    }
}

/// Parse the first line of `/proc/stat`.
///
/// Columns: user nice system idle iowait irq softirq steal guest guest_nice.
/// Idle time is idle + iowait; guest time is already counted in user/nice.
pub fn parse_proc_stat(stat: &str) -> Result<CpuTimes, SetupError> {
    let line = stat
        .lines()
        .find(|l| l.starts_with("cpu "))
        .ok_or_else(|| SetupError::Config("/proc/stat has no aggregate cpu line".to_string()))?;
    let fields: Vec<u64> = line
        .split_whitespace()
        .skip(1)
        .take(8)
        .map(|f| f.parse::<u64>())
        .collect::<Result<_, _>>()
        .map_err(|e| SetupError::Config(format!("Malformed /proc/stat cpu line: {}", e)))?;
    if fields.len() < 4 {
        return Err(SetupError::Config(
            "Malformed /proc/stat cpu line: too few columns".to_string(),
        ));
    }

    let total: u64 = fields.iter().sum();
    let idle = fields[3] + fields.get(4).copied().unwrap_or(0);
    Ok(CpuTimes {
        busy: total - idle,
        total,
    })
}

/// Readings collected so far.
#[derive(Debug, Clone, Default)]
pub struct MonitorStats {
    pub samples: u64,
    pub last_percent: Option<f32>,
    pub failures: u64,
}

/// Handle to a running monitor task.
pub struct CpuMonitor {
    token: CancellationToken,
    stats: Arc<RwLock<MonitorStats>>,
    task: JoinHandle<()>,
}

impl CpuMonitor {
    /// Spawn the monitor on `handle`. Readings are printed to stdout when `echo` is set.
    pub fn spawn<S: CpuSampler>(
        handle: &Handle,
        sampler: S,
        interval: Duration,
        echo: bool,
    ) -> Self {
        let token = CancellationToken::new();
        let stats = Arc::new(RwLock::new(MonitorStats::default()));
        let task = handle.spawn(Self::run(
            sampler,
            interval,
            echo,
            token.clone(),
            Arc::clone(&stats),
        ));
        info!(interval_ms = interval.as_millis() as u64, "CPU monitor started");
        Self { token, stats, task }
    }

    async fn run<S: CpuSampler>(
        mut sampler: S,
        interval: Duration,
        echo: bool,
        token: CancellationToken,
        stats: Arc<RwLock<MonitorStats>>,
    ) {
        let mut previous = match sampler.sample() {
            Ok(times) => Some(times),
            Err(e) => {
                warn!(error = %e, "Initial CPU sample failed");
                None
            }
        };

        loop {
            tokio::select! {
                _ = token.cancelled() => break,
                _ = tokio::time::sleep(interval) => {}
            }

            let current = match sampler.sample() {
                Ok(times) => times,
                Err(e) => {
                    stats.write().failures += 1;
                    warn!(error = %e, "CPU sample failed");
                    continue;
                }
            };

            if let Some(earlier) = previous {
                let percent = current.percent_since(&earlier);
                {
                    let mut stats = stats.write();
                    stats.samples += 1;
                    stats.last_percent = Some(percent);
                }
                if echo {
                    println!("CPU Usage: {:.1}%", percent);
                }
                debug!(cpu_percent = percent, "CPU sample");
            }
            previous = Some(current);
        }
        debug!("CPU monitor loop exited");
    }

    pub fn stats(&self) -> MonitorStats {
        self.stats.read().clone()
    }

    /// Signal the task to stop and wait for it on `handle`.
    ///
    /// Must be called from outside the runtime.
    pub fn shutdown(self, handle: &Handle) -> MonitorStats {
        self.token.cancel();
        if let Err(e) = handle.block_on(self.task) {
            warn!(error = %e, "CPU monitor task ended abnormally");
        }
        let stats = self.stats.read().clone();
        info!(samples = stats.samples, "CPU monitor stopped");
        stats
    }
}

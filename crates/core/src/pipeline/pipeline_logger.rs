use std::collections::HashMap;
use std::time::Instant;

/// Cross-cutting logger for pipeline orchestration events.
///
/// Keeps use cases independent of where progress ends up (log output,
/// nowhere, a test probe).
pub trait PipelineLogger: Send {
    /// Report item-level progress (frames for the encoder, files for the
    /// grouper).
    fn progress(&mut self, current: usize, total: usize);

    /// Record how long a named stage took for one item.
    fn timing(&mut self, stage: &str, duration_ms: f64);

    /// Add to a named counter (e.g. bytes copied, letterboxed frames).
    fn count(&mut self, name: &str, amount: u64);

    /// Log a human-readable status message.
    fn info(&mut self, message: &str);

    /// Emit an end-of-run summary. Default: no-op.
    fn summary(&self) {}
}

/// Discards all events.
pub struct NullPipelineLogger;

impl PipelineLogger for NullPipelineLogger {
    fn progress(&mut self, _current: usize, _total: usize) {}
    fn timing(&mut self, _stage: &str, _duration_ms: f64) {}
    fn count(&mut self, _name: &str, _amount: u64) {}
    fn info(&mut self, _message: &str) {}
}

/// CLI logger: throttled progress through `log::info!`, per-stage timing
/// and counters, and a summary report at the end of the run.
pub struct StdoutPipelineLogger {
    unit: &'static str,
    throttle: usize,
    timings: HashMap<String, Vec<f64>>,
    counters: HashMap<String, u64>,
    start_time: Instant,
    total_items: usize,
}

impl StdoutPipelineLogger {
    /// `unit` names what is being counted ("frames", "files"); progress is
    /// logged every `throttle` items and on the last one.
    pub fn new(unit: &'static str, throttle: usize) -> Self {
        Self {
            unit,
            throttle: throttle.max(1),
            timings: HashMap::new(),
            counters: HashMap::new(),
            start_time: Instant::now(),
            total_items: 0,
        }
    }

    /// Returns the formatted summary string, or `None` if nothing was recorded.
    pub fn summary_string(&self) -> Option<String> {
        if self.timings.is_empty() && self.counters.is_empty() {
            return None;
        }

        let elapsed_ms = self.start_time.elapsed().as_secs_f64() * 1000.0;
        let items = self.total_items;
        let unit = self.unit;
        let mut lines = Vec::new();

        lines.push(format!(
            "Run summary ({items} {unit}, {:.1}s total):",
            elapsed_ms / 1000.0
        ));

        let mut stages: Vec<_> = self.timings.keys().collect();
        stages.sort();
        for stage in stages {
            let durations = &self.timings[stage];
            let total_ms: f64 = durations.iter().sum();
            let avg_ms = if durations.is_empty() {
                0.0
            } else {
                total_ms / durations.len() as f64
            };
            lines.push(format!(
                "  {stage:12}: avg {avg_ms:6.1}ms  total {total_ms:7.0}ms"
            ));
        }

        let mut names: Vec<_> = self.counters.keys().collect();
        names.sort();
        for name in names {
            lines.push(format!("  {name}: {}", self.counters[name]));
        }

        if items > 0 && elapsed_ms > 0.0 {
            let rate = items as f64 / (elapsed_ms / 1000.0);
            lines.push(format!("  Throughput: {rate:.1} {unit}/s"));
        }

        Some(lines.join("\n"))
    }

    pub fn timings_for(&self, stage: &str) -> Option<&[f64]> {
        self.timings.get(stage).map(|v| v.as_slice())
    }

    pub fn counter(&self, name: &str) -> Option<u64> {
        self.counters.get(name).copied()
    }
}

impl PipelineLogger for StdoutPipelineLogger {
    fn progress(&mut self, current: usize, total: usize) {
        self.total_items = total;
        if total > 0 && (current % self.throttle == 0 || current == total) {
            let pct = current as f64 / total as f64 * 100.0;
            log::info!("Processing: {current}/{total} {} ({pct:.1}%)", self.unit);
        }
    }

    fn timing(&mut self, stage: &str, duration_ms: f64) {
        self.timings
            .entry(stage.to_string())
            .or_default()
            .push(duration_ms);
    }

    fn count(&mut self, name: &str, amount: u64) {
        *self.counters.entry(name.to_string()).or_default() += amount;
    }

    fn info(&mut self, message: &str) {
        log::info!("{message}");
    }

    fn summary(&self) {
        if let Some(text) = self.summary_string() {
            log::info!("\n\n{text}");
        }
    }
}

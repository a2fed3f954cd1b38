use std::collections::BTreeMap;

use burn::train::renderer::{MetricState, MetricsRenderer, TrainingProgress};

/// A renderer for TUI-disabled modes that writes progress to the log every `logging_steps`
/// iterations
pub struct Logging {
    logging_steps: usize,
    train: BTreeMap<String, String>,
    valid: BTreeMap<String, String>,
}

impl Logging {
    /// Create a new logging renderer
    pub fn new(logging_steps: usize) -> Self {
        Self {
            logging_steps: logging_steps.max(1),
            train: BTreeMap::new(),
            valid: BTreeMap::new(),
        }
    }

    fn should_log(&self, item: &TrainingProgress) -> bool {
        item.iteration % self.logging_steps == 0
            || item.progress.items_processed >= item.progress.items_total
    }
}

fn record(metrics: &mut BTreeMap<String, String>, state: MetricState) {
    let entry = match state {
        MetricState::Generic(entry) => entry,
        MetricState::Numeric(entry, _) => entry,
    };

    metrics.insert(entry.name, entry.formatted);
}

fn summary(metrics: &BTreeMap<String, String>) -> String {
    metrics
        .values()
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(" | ")
}

impl MetricsRenderer for Logging {
    fn update_train(&mut self, state: MetricState) {
        record(&mut self.train, state);
    }

    fn update_valid(&mut self, state: MetricState) {
        record(&mut self.valid, state);
    }

    fn render_train(&mut self, item: TrainingProgress) {
        if self.should_log(&item) {
            log::info!(
                "[train] epoch {}/{} iteration {} ({}/{}) {}",
                item.epoch,
                item.epoch_total,
                item.iteration,
                item.progress.items_processed,
                item.progress.items_total,
                summary(&self.train)
            );
        }
    }

    fn render_valid(&mut self, item: TrainingProgress) {
        if self.should_log(&item) {
            log::info!(
                "[valid] epoch {}/{} iteration {} ({}/{}) {}",
                item.epoch,
                item.epoch_total,
                item.iteration,
                item.progress.items_processed,
                item.progress.items_total,
                summary(&self.valid)
            );
        }
    }
}

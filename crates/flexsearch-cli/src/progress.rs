use flexsearch_retrieval::{IndexPhase, IndexProgress};
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use std::time::Duration;

/// Create a spinner for indeterminate progress
pub fn create_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    let style = ProgressStyle::with_template("{spinner:.blue} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
        .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "✓"]);
    pb.set_style(style);
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

/// Style for determinate progress
fn bar_style() -> ProgressStyle {
    ProgressStyle::with_template("{msg}\n[{bar:40.cyan/blue}] {pos}/{len} ({percent}%) ETA: {eta}")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▓▒░ ")
}

/// Finish a progress bar with success message
pub fn finish_success(pb: &ProgressBar, message: &str) {
    pb.finish_with_message(format!("✓ {}", message));
}

/// Progress display for an indexing run, one line per phase
pub struct IndexProgressBars {
    multi: MultiProgress,
    current: Option<(IndexPhase, ProgressBar)>,
}

impl IndexProgressBars {
    pub fn new() -> Self {
        Self { multi: MultiProgress::new(), current: None }
    }

    /// Feed one progress event from the indexer
    pub fn update(&mut self, progress: &IndexProgress) {
        let same_phase = matches!(&self.current, Some((phase, _)) if *phase == progress.phase);
        if !same_phase {
            self.finish_current();
            let pb = match progress.phase {
                IndexPhase::GeneratingEmbeddings | IndexPhase::StoringDocuments => {
                    let pb = self.multi.add(ProgressBar::new(progress.total as u64));
                    pb.set_style(bar_style());
                    pb
                }
                _ => self.multi.add(create_spinner(&progress.message)),
            };
            self.current = Some((progress.phase, pb));
        }

        if let Some((_, pb)) = &self.current {
            pb.set_message(progress.message.clone());
            if pb.length().is_some_and(|len| len > 0) {
                pb.set_position(progress.current as u64);
            }
        }
    }

    fn finish_current(&mut self) {
        if let Some((phase, pb)) = self.current.take() {
            finish_success(&pb, phase_label(phase));
        }
    }

    /// Mark the last phase as done
    pub fn finish(mut self) {
        self.finish_current();
    }

    /// Remove every bar, e.g. before printing an error
    pub fn abandon(mut self) {
        if let Some((_, pb)) = self.current.take() {
            pb.abandon();
        }
        let _ = self.multi.clear();
    }
}

pub fn phase_label(phase: IndexPhase) -> &'static str {
    match phase {
        IndexPhase::Validating => "Columns checked",
        IndexPhase::GeneratingEmbeddings => "Embeddings generated",
        IndexPhase::PreparingIndex => "Index ready",
        IndexPhase::StoringDocuments => "Documents stored",
        IndexPhase::Finalizing => "Index refreshed",
    }
}

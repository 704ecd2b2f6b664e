//! Progress reporting module
//!
//! A progress bar for the polishing loop, a [`Reporter`] that forwards
//! pipeline events to the `log` facade, and optional status lines for a
//! host process.

pub mod status;

pub use status::StatusLines;

use chuong_core::{Chunk, PipelineEvent, Reporter, Severity};
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::Arc;
use std::time::Duration;

const BAR_TEMPLATE: &str = "[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} chunks {msg}";

/// Progress bar over chunks
pub struct ProgressReporter {
    progress_bar: Option<ProgressBar>,
    hidden: bool,
}

impl ProgressReporter {
    /// Create a new progress reporter; a hidden reporter draws nothing
    pub fn new(hidden: bool) -> Self {
        Self {
            progress_bar: None,
            hidden,
        }
    }

    /// Initialize the bar for `total` chunks
    pub fn init_chunks(&mut self, total: u64) {
        if self.hidden {
            return;
        }

        let style = ProgressStyle::default_bar()
            .template(BAR_TEMPLATE)
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("##-");
        let pb = ProgressBar::new(total);
        pb.set_style(style);
        pb.enable_steady_tick(Duration::from_millis(100));

        self.progress_bar = Some(pb);
    }

    /// Advance past a finished or skipped chunk
    pub fn chunk_completed(&self, chunk: &Chunk, skipped: bool) {
        if let Some(pb) = &self.progress_bar {
            let verb = if skipped { "Skipped" } else { "Polished" };
            pb.set_message(format!("{verb}: {}", chunk.chunk_id));
            pb.inc(1);
        }
    }

    /// Finish progress reporting
    pub fn finish(&self) {
        if let Some(pb) = &self.progress_bar {
            pb.finish_with_message("Complete");
        }
    }

    /// Stop the bar without marking it complete
    pub fn abandon(&self) {
        if let Some(pb) = &self.progress_bar {
            pb.abandon();
        }
    }
}

/// Forwards pipeline events to `log`, and to status lines when enabled
#[derive(Default)]
pub struct LogReporter {
    status: Option<Arc<StatusLines>>,
}

impl LogReporter {
    /// Create a reporter; `status` also receives every event as a `LOG` line
    pub fn new(status: Option<Arc<StatusLines>>) -> Self {
        Self { status }
    }

    /// Shareable handle for the pipeline
    pub fn shared(status: Option<Arc<StatusLines>>) -> Arc<dyn Reporter> {
        Arc::new(Self::new(status))
    }
}

impl Reporter for LogReporter {
    fn report(&self, event: &PipelineEvent) {
        match event.severity() {
            Severity::Info => log::info!("{event}"),
            Severity::Warn => log::warn!("{event}"),
        }
        if let Some(status) = &self.status {
            status.log(&event.to_string());
        }
    }
}

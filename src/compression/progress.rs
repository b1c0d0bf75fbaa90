//! Stage completion events.
//!
//! The pipeline reports each stage boundary to a `ProgressObserver` together with a completion
//! fraction. Fractions are fixed per stage and stages always arrive in order, so the fraction
//! never goes down within one call. Stages a code path skips are still reported.
use log::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    // Compression
    Classified,
    Transformed,
    EntropyCoded,
    Framed,
    // Decompression
    Unframed,
    EntropyDecoded,
    Restored,
    Done,
}

impl Stage {
    /// Completion fraction reached when this stage ends.
    pub fn fraction(self) -> f32 {
        match self {
            Stage::Classified | Stage::Unframed => 0.1,
            Stage::Transformed => 0.5,
            Stage::EntropyDecoded => 0.6,
            Stage::EntropyCoded | Stage::Restored => 0.9,
            Stage::Framed | Stage::Done => 1.0,
        }
    }
}

/// Receives stage completion events.
pub trait ProgressObserver {
    fn on_stage(&mut self, stage: Stage, fraction: f32);
}

/// Ignores every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoProgress;

impl ProgressObserver for NoProgress {
    fn on_stage(&mut self, _stage: Stage, _fraction: f32) {}
}

/// Reports each stage at info level.
#[derive(Debug, Default, Clone)]
pub struct LogProgress {
    pub label: String,
}

impl ProgressObserver for LogProgress {
    fn on_stage(&mut self, stage: Stage, fraction: f32) {
        info!("{}: {:?} ({:.0}%)", self.label, stage, fraction * 100.0);
    }
}

/// Any closure taking (Stage, f32) can observe.
impl<F: FnMut(Stage, f32)> ProgressObserver for F {
    fn on_stage(&mut self, stage: Stage, fraction: f32) {
        self(stage, fraction)
    }
}

/// Report a stage with its fixed fraction.
pub(crate) fn report(progress: &mut dyn ProgressObserver, stage: Stage) {
    progress.on_stage(stage, stage.fraction());
}

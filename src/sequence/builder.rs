//! Ordered frame rendering
//!
//! Frames are synthesized in parallel but collected by index, so the output
//! order always matches the order of the requested parameters.

use crate::io::error::{GaborError, Result, invalid_parameter};
use crate::stimulus::{FrameParameters, Patch};
use rayon::prelude::*;

/// Receives a notification each time a frame finishes rendering
///
/// Calls may arrive from worker threads and out of frame order.
pub trait FrameObserver: Sync {
    /// Called once per rendered frame with the frame's sequence index
    fn frame_rendered(&self, index: usize);
}

/// Observer that ignores every notification
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl FrameObserver for NoopObserver {
    fn frame_rendered(&self, _index: usize) {}
}

/// Renders frame parameter lists into patch sequences
#[derive(Debug, Clone, Copy, Default)]
pub struct SequenceBuilder {
    threads: Option<usize>,
}

impl SequenceBuilder {
    /// Builder using rayon's default worker count
    pub const fn new() -> Self {
        Self { threads: None }
    }

    /// Builder with an explicit worker count; `1` renders sequentially
    pub const fn with_threads(threads: usize) -> Self {
        Self {
            threads: Some(threads),
        }
    }

    /// Configured worker count, if any
    pub const fn threads(&self) -> Option<usize> {
        self.threads
    }

    /// Render every frame in order
    ///
    /// # Errors
    ///
    /// See [`SequenceBuilder::render_with`]
    pub fn render(&self, frames: &[FrameParameters]) -> Result<Vec<Patch>> {
        self.render_with(frames, &NoopObserver)
    }

    /// Render every frame in order, reporting each completion to `observer`
    ///
    /// All parameters are validated before any pixel is computed.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `frames` is empty
    /// - Any frame fails parameter validation
    /// - Frames do not share one canvas size
    /// - The worker pool cannot be created
    #[tracing::instrument(level = "debug", skip_all, fields(frames = frames.len()))]
    pub fn render_with(
        &self,
        frames: &[FrameParameters],
        observer: &dyn FrameObserver,
    ) -> Result<Vec<Patch>> {
        let first = frames.first().ok_or(GaborError::EmptySequence)?;
        for (index, params) in frames.iter().enumerate() {
            params.validate()?;
            if params.size != first.size {
                return Err(invalid_parameter(
                    "size",
                    &params.size,
                    &format!("frame {index} differs from the sequence size {}", first.size),
                ));
            }
        }

        let pool = build_thread_pool(self.threads)?;
        let patches = pool.install(|| {
            frames
                .par_iter()
                .enumerate()
                .map(|(index, params)| -> Result<Patch> {
                    let patch = Patch::synthesize(params)?;
                    observer.frame_rendered(index);
                    Ok(patch)
                })
                .collect::<Result<Vec<_>>>()
        })?;

        tracing::debug!(rendered = patches.len(), "sequence rendered");
        Ok(patches)
    }
}

fn build_thread_pool(threads: Option<usize>) -> Result<rayon::ThreadPool> {
    if let Some(n) = threads
        && n == 0
    {
        return Err(invalid_parameter(
            "threads",
            &n,
            &"worker count must be at least 1 when set",
        ));
    }

    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(n) = threads {
        builder = builder.num_threads(n);
    }
    Ok(builder.build()?)
}

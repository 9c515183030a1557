//! Frame sequences for the spatial sweep and the temporal flicker ramp

/// Ordered, optionally parallel frame rendering
pub mod builder;
/// Integer spatial-frequency sweep
pub mod spatial;
/// Flicker ramp with contrast falloff
pub mod temporal;

pub use builder::{FrameObserver, SequenceBuilder};
pub use spatial::SpatialSweep;
pub use temporal::TemporalRamp;

//! Real-time audio mixing engine
//!
//! Mixes up to four stereo or mono input streams into one output inside a
//! real-time audio callback.
//!
//! Key features:
//! - Sample-accurate linear gain ramps (no clicks at block boundaries)
//! - Per-channel peak metering on the stereo path
//! - Float, split/planar and 8.24 fixed-point output sinks
//! - AVX2 SIMD for f32 <-> i16 format conversion with scalar fallback
//! - Allocation-free, lock-free hot path

pub mod convert;
pub mod fixed;
pub mod mono;
pub mod stereo;
pub mod types;

pub use convert::*;
pub use fixed::*;
pub use mono::*;
pub use stereo::*;
pub use types::*;

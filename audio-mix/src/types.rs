//! Shared limits, output sinks and contract validation

use thiserror::Error;

/// Fixed fan-in of both mixers. The hot path is sized for exactly four
/// inputs so the per-sample loop stays allocation-free and branch-predictable.
pub const MAX_INPUTS: usize = 4;

/// Smallest stereo block accepted by [`crate::StereoMixer::process`].
pub const MIN_BLOCK_FRAMES: usize = 2;

/// Largest block accepted by either mixer.
pub const MAX_BLOCK_FRAMES: usize = 2048;

/// Smallest mono block accepted by [`crate::MonoMixer::process`].
pub const MONO_MIN_BLOCK_FRAMES: usize = 8;

/// Mono block sizes must be a multiple of this.
pub const MONO_BLOCK_ALIGN: usize = 4;

/// Smallest frame count accepted by the format converters.
pub const MIN_CONVERT_FRAMES: usize = 4;

/// Extra trailing elements required on interleaved converter buffers.
pub const INTERLEAVED_MARGIN: usize = 16;

/// Extra trailing elements required on planar converter buffers.
pub const PLANAR_MARGIN: usize = 8;

/// Contract violation reported by the validation helpers.
///
/// The `process` operations and converters themselves never return errors;
/// they run on the real-time thread and enforce the same contracts with
/// `debug_assert!` only. Callers validate sizes here, off the hot path,
/// when they configure their buffers.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MixError {
    #[error("block size {frames} outside [{min}, {max}]")]
    BlockOutOfRange {
        frames: usize,
        min: usize,
        max: usize,
    },
    #[error("block size {frames} not a multiple of {align}")]
    BlockAlignment { frames: usize, align: usize },
    #[error("buffer holds {len} elements, contract requires {required}")]
    BufferTooSmall { len: usize, required: usize },
}

/// Check a stereo block size against [`MIN_BLOCK_FRAMES`]..[`MAX_BLOCK_FRAMES`].
pub fn validate_stereo_block(frames: usize) -> Result<(), MixError> {
    if !(MIN_BLOCK_FRAMES..=MAX_BLOCK_FRAMES).contains(&frames) {
        log::debug!("rejected stereo block of {frames} frames");
        return Err(MixError::BlockOutOfRange {
            frames,
            min: MIN_BLOCK_FRAMES,
            max: MAX_BLOCK_FRAMES,
        });
    }
    Ok(())
}

/// Check a mono block size: [`MONO_MIN_BLOCK_FRAMES`]..[`MAX_BLOCK_FRAMES`],
/// multiple of [`MONO_BLOCK_ALIGN`].
pub fn validate_mono_block(frames: usize) -> Result<(), MixError> {
    if !(MONO_MIN_BLOCK_FRAMES..=MAX_BLOCK_FRAMES).contains(&frames) {
        log::debug!("rejected mono block of {frames} frames");
        return Err(MixError::BlockOutOfRange {
            frames,
            min: MONO_MIN_BLOCK_FRAMES,
            max: MAX_BLOCK_FRAMES,
        });
    }
    if frames % MONO_BLOCK_ALIGN != 0 {
        log::debug!("rejected misaligned mono block of {frames} frames");
        return Err(MixError::BlockAlignment {
            frames,
            align: MONO_BLOCK_ALIGN,
        });
    }
    Ok(())
}

/// Check that a buffer of `len` elements satisfies `required`.
pub fn validate_buffer_len(len: usize, required: usize) -> Result<(), MixError> {
    if len < required {
        return Err(MixError::BufferTooSmall { len, required });
    }
    Ok(())
}

/// Minimum element count for an interleaved stereo converter buffer.
#[inline]
pub fn interleaved_buffer_len(frames: usize) -> usize {
    frames * 2 + INTERLEAVED_MARGIN
}

/// Minimum element count for a planar converter buffer.
#[inline]
pub fn planar_buffer_len(frames: usize) -> usize {
    frames + PLANAR_MARGIN
}

/// Destination of one stereo mix.
///
/// The variant selects both the channel layout (interleaved vs. split) and
/// the sample encoding (32-bit float vs. 8.24 fixed-point).
pub enum StereoSink<'a> {
    /// One interleaved L/R buffer, `frames * 2` floats minimum.
    Interleaved(&'a mut [f32]),
    /// Two planar buffers, `frames` floats each minimum.
    Split {
        left: &'a mut [f32],
        right: &'a mut [f32],
    },
    /// Interleaved output in 8.24 fixed-point.
    InterleavedFixed(&'a mut [i32]),
    /// Split output in 8.24 fixed-point.
    SplitFixed {
        left: &'a mut [i32],
        right: &'a mut [i32],
    },
}

/// Destination of one mono mix.
pub enum MonoSink<'a> {
    Float(&'a mut [f32]),
    Fixed(&'a mut [i32]),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stereo_block_range() {
        assert!(validate_stereo_block(1).is_err(), "1 frame below minimum");
        assert!(validate_stereo_block(2).is_ok());
        assert!(validate_stereo_block(2048).is_ok());
        assert!(validate_stereo_block(2049).is_err(), "above maximum");
    }

    #[test]
    fn test_mono_block_range_and_alignment() {
        assert!(validate_mono_block(4).is_err(), "4 frames below minimum");
        assert!(validate_mono_block(8).is_ok());
        assert_eq!(
            validate_mono_block(10),
            Err(MixError::BlockAlignment {
                frames: 10,
                align: 4
            }),
            "10 is not a multiple of 4"
        );
        assert!(validate_mono_block(2048).is_ok());
        assert!(validate_mono_block(2052).is_err(), "above maximum");
    }

    #[test]
    fn test_buffer_len_contract() {
        assert!(validate_buffer_len(interleaved_buffer_len(64), interleaved_buffer_len(64)).is_ok());
        assert_eq!(
            validate_buffer_len(128, interleaved_buffer_len(64)),
            Err(MixError::BufferTooSmall {
                len: 128,
                required: 144
            })
        );
    }

    #[test]
    fn test_margin_sizes() {
        assert_eq!(interleaved_buffer_len(100), 216);
        assert_eq!(planar_buffer_len(100), 108);
    }
}

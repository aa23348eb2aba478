//! Sample format conversion between 32-bit float and 16-bit integer
//!
//! Stateless, reentrant value transforms for moving audio between the float
//! mixing domain and 16-bit PCM. The interleaved directions carry AVX2
//! kernels (16 samples per iteration) with portable scalar fallbacks and
//! runtime CPU dispatch; both paths produce bit-identical output.
//!
//! Rounding is half-to-even, the x86 default conversion mode, so the SIMD
//! and scalar paths agree at the one-ULP level.
//!
//! Buffer contract: interleaved buffers must be sized
//! `frames * 2 + 16` elements minimum and planar buffers `frames + 8`, to
//! leave headroom for block-granular processing. The margins are
//! debug-asserted here and checkable off the hot path with
//! [`crate::types::validate_buffer_len`].

use crate::types::{interleaved_buffer_len, planar_buffer_len, MIN_CONVERT_FRAMES, PLANAR_MARGIN};

#[cfg(target_arch = "x86_64")]
use std::arch::x86_64::*;

/// Full scale of the 16-bit encoding.
const I16_SCALE: f32 = 32768.0;

#[inline]
fn quantize_i16(value: f32) -> i16 {
    // `as` saturates at the i16 extremes and maps NaN to 0
    (value * I16_SCALE).round_ties_even() as i16
}

/// Convert stereo interleaved f32 to stereo interleaved i16.
///
/// Scales to the 16-bit signed range, rounds half to even and saturates at
/// ±full scale (no wraparound). `frames` must be at least 4; both buffers
/// must hold `frames * 2 + 16` elements minimum.
pub fn f32_to_i16_interleaved(input: &[f32], output: &mut [i16], frames: usize) {
    debug_assert!(frames >= MIN_CONVERT_FRAMES, "minimum 4 frames");
    debug_assert!(input.len() >= interleaved_buffer_len(frames));
    debug_assert!(output.len() >= interleaved_buffer_len(frames));

    let samples = frames * 2;

    #[cfg(target_arch = "x86_64")]
    {
        if is_x86_feature_detected!("avx2") {
            unsafe {
                f32_to_i16_avx2(input, output, samples);
            }
            return;
        }
    }

    f32_to_i16_scalar(input, output, samples);
}

/// Convert two planar f32 channels to stereo interleaved i16.
///
/// Same scaling/rounding/saturation as [`f32_to_i16_interleaved`], reading
/// left and right from separate buffers. Each source must hold `frames + 8`
/// elements minimum, the destination `frames * 2 + 16`.
pub fn f32_to_i16_split(left: &[f32], right: &[f32], output: &mut [i16], frames: usize) {
    debug_assert!(frames >= MIN_CONVERT_FRAMES, "minimum 4 frames");
    debug_assert!(left.len() >= planar_buffer_len(frames));
    debug_assert!(right.len() >= planar_buffer_len(frames));
    debug_assert!(output.len() >= interleaved_buffer_len(frames));

    for k in 0..frames {
        output[k * 2] = quantize_i16(left[k]);
        output[k * 2 + 1] = quantize_i16(right[k]);
    }
}

/// Convert interleaved i16 to interleaved f32.
///
/// Inverse scaling (sample / 32768), producing floats nominally in
/// [-1.0, 1.0). `samples` counts 16-bit elements (stereo frames × 2) and
/// must be at least 4; both buffers must hold `samples + 8` elements
/// minimum.
pub fn i16_to_f32_interleaved(input: &[i16], output: &mut [f32], samples: usize) {
    debug_assert!(samples >= MIN_CONVERT_FRAMES, "minimum 4 samples");
    debug_assert!(input.len() >= samples + PLANAR_MARGIN);
    debug_assert!(output.len() >= samples + PLANAR_MARGIN);

    #[cfg(target_arch = "x86_64")]
    {
        if is_x86_feature_detected!("avx2") {
            unsafe {
                i16_to_f32_avx2(input, output, samples);
            }
            return;
        }
    }

    i16_to_f32_scalar(input, output, samples);
}

/// Scalar fallback for f32 → i16 (portable, slower).
pub fn f32_to_i16_scalar(input: &[f32], output: &mut [i16], samples: usize) {
    for i in 0..samples {
        output[i] = quantize_i16(input[i]);
    }
}

/// Scalar fallback for i16 → f32 (portable, slower).
pub fn i16_to_f32_scalar(input: &[i16], output: &mut [f32], samples: usize) {
    for i in 0..samples {
        output[i] = input[i] as f32 / I16_SCALE;
    }
}

/// f32 → i16 with AVX2, 8 samples per iteration.
///
/// # Safety
/// Requires AVX2 CPU support. Buffers must hold at least `samples` elements.
#[target_feature(enable = "avx2")]
#[cfg(target_arch = "x86_64")]
pub unsafe fn f32_to_i16_avx2(input: &[f32], output: &mut [i16], samples: usize) {
    let scale = _mm256_set1_ps(I16_SCALE);
    let max_val = _mm256_set1_ps(32767.0);
    let min_val = _mm256_set1_ps(-32768.0);

    let mut i = 0;
    while i + 8 <= samples {
        let mut val = _mm256_loadu_ps(input.as_ptr().add(i));

        // NaN → 0.0 (NaN != NaN comparison is false)
        let nan_mask = _mm256_cmp_ps(val, val, _CMP_EQ_OQ);
        val = _mm256_and_ps(val, nan_mask);

        // Scale, then clamp in the float domain so extreme inputs saturate
        // instead of taking the out-of-range integer conversion path
        let mut scaled = _mm256_mul_ps(val, scale);
        scaled = _mm256_min_ps(scaled, max_val);
        scaled = _mm256_max_ps(scaled, min_val);

        // Round-to-nearest-even conversion, then saturating pack to i16
        let ints = _mm256_cvtps_epi32(scaled);
        let packed = _mm256_packs_epi32(ints, ints);

        // Pack works per 128-bit lane; permute lanes 0 and 2 together
        let ordered = _mm256_permute4x64_epi64(packed, 0b00_00_10_00);
        _mm_storeu_si128(
            output.as_mut_ptr().add(i) as *mut __m128i,
            _mm256_castsi256_si128(ordered),
        );
        i += 8;
    }

    // Handle remaining samples (< 8)
    while i < samples {
        output[i] = quantize_i16(input[i]);
        i += 1;
    }
}

/// i16 → f32 with AVX2, 8 samples per iteration.
///
/// # Safety
/// Requires AVX2 CPU support. Buffers must hold at least `samples` elements.
#[target_feature(enable = "avx2")]
#[cfg(target_arch = "x86_64")]
pub unsafe fn i16_to_f32_avx2(input: &[i16], output: &mut [f32], samples: usize) {
    let inv_scale = _mm256_set1_ps(1.0 / I16_SCALE);

    let mut i = 0;
    while i + 8 <= samples {
        let raw = _mm_loadu_si128(input.as_ptr().add(i) as *const __m128i);
        let wide = _mm256_cvtepi16_epi32(raw);
        let val = _mm256_mul_ps(_mm256_cvtepi32_ps(wide), inv_scale);
        _mm256_storeu_ps(output.as_mut_ptr().add(i), val);
        i += 8;
    }

    while i < samples {
        output[i] = input[i] as f32 / I16_SCALE;
        i += 1;
    }
}

//! 8.24 fixed-point sample encoding
//!
//! A 32-bit signed integer with 24 fractional bits, covering [-128.0, 128.0).
//! Some hardware/OS audio paths consume this encoding instead of float;
//! both mixers can emit it directly through their `*Fixed` sinks.

/// Fractional bits of the encoding.
pub const FRACTIONAL_BITS: u32 = 24;

/// The encoding of 1.0.
pub const FIXED_ONE: i32 = 1 << FRACTIONAL_BITS;

/// Encode a float sample as 8.24.
///
/// Rounds half to even (same mode as the SIMD converters) and saturates at
/// the i32 extremes, so values at or past ±128.0 clamp instead of wrapping.
#[inline]
pub fn f32_to_fixed(value: f32) -> i32 {
    // `as` saturates on overflow and maps NaN to 0
    (value * FIXED_ONE as f32).round_ties_even() as i32
}

/// Decode an 8.24 sample back to float.
#[inline]
pub fn fixed_to_f32(value: i32) -> f32 {
    value as f32 / FIXED_ONE as f32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_encodings() {
        assert_eq!(f32_to_fixed(1.0), 0x0100_0000, "1.0 is one whole step");
        assert_eq!(
            f32_to_fixed(-1.0) as u32,
            0xFF00_0000,
            "-1.0 in two's complement"
        );
        assert_eq!(f32_to_fixed(0.0), 0);
        assert_eq!(f32_to_fixed(0.5), 0x0080_0000);
    }

    #[test]
    fn test_saturation() {
        assert_eq!(f32_to_fixed(128.0), i32::MAX, "128.0 is past the range");
        assert_eq!(f32_to_fixed(1.0e9), i32::MAX);
        assert_eq!(f32_to_fixed(-1.0e9), i32::MIN);
        assert_eq!(f32_to_fixed(-128.0), i32::MIN);
    }

    #[test]
    fn test_round_trip() {
        for &v in &[0.0f32, 0.25, -0.75, 1.0, -1.0, 100.5, -127.0] {
            let decoded = fixed_to_f32(f32_to_fixed(v));
            assert!(
                (decoded - v).abs() <= 1.0 / FIXED_ONE as f32,
                "round trip of {} drifted to {}",
                v,
                decoded
            );
        }
    }
}

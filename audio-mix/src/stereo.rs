//! Stereo mixer: up to four interleaved stereo inputs into one output
//!
//! Per-input and per-output gains are ramped linearly across each block so
//! level changes between consecutive calls never produce a click. Peak
//! levels of the gain-applied signals are reported per channel side for
//! metering. One instance holds only a few scalar fields and the hot path
//! performs no allocation, locking or branching beyond the fixed fan-in.

use crate::fixed::f32_to_fixed;
use crate::types::{StereoSink, MAX_BLOCK_FRAMES, MAX_INPUTS, MIN_BLOCK_FRAMES};

/// Mixes up to four stereo interleaved inputs into one stereo output.
///
/// The instance carries the gain values in effect at the end of the
/// previous block; each `process` call ramps from those to the newly
/// supplied targets, so the gain at frame 0 of call N equals the gain at
/// the final frame of call N-1. Calls on one instance must be sequential
/// (`&mut self` enforces this); distinct instances are independent.
pub struct StereoMixer {
    input_gain: [f32; MAX_INPUTS * 2],
    output_gain: [f32; 2],
    primed: bool,
}

impl StereoMixer {
    /// Create a stereo mixer. The first `process` call adopts its target
    /// gains directly instead of ramping from silence.
    pub fn new() -> Self {
        log::trace!("stereo mixer created");
        Self {
            input_gain: [0.0; MAX_INPUTS * 2],
            output_gain: [0.0; 2],
            primed: false,
        }
    }

    /// Mix one block.
    ///
    /// * `inputs` - four interleaved stereo buffers; `None` marks a silent
    ///   channel that contributes nothing and meters 0.0.
    /// * `sink` - output destination; the variant selects interleaved vs.
    ///   split layout and float vs. 8.24 fixed-point encoding.
    /// * `input_levels` - target gains, two per input (left, right).
    /// * `output_levels` - target output gains (left, right).
    /// * `input_meters` / `output_meters` - when `Some`, receive the peak
    ///   absolute value of the gain-applied samples for the block,
    ///   measured in the float domain before any fixed-point conversion.
    /// * `frames` - block size, 2..=2048. Out-of-range sizes are a caller
    ///   bug (validate with [`crate::types::validate_stereo_block`] off
    ///   the hot path).
    #[allow(clippy::too_many_arguments)]
    pub fn process(
        &mut self,
        inputs: [Option<&[f32]>; MAX_INPUTS],
        sink: StereoSink<'_>,
        input_levels: &[f32; MAX_INPUTS * 2],
        output_levels: &[f32; 2],
        input_meters: Option<&mut [f32; MAX_INPUTS * 2]>,
        output_meters: Option<&mut [f32; 2]>,
        frames: usize,
    ) {
        debug_assert!((MIN_BLOCK_FRAMES..=MAX_BLOCK_FRAMES).contains(&frames));
        for input in inputs.iter().flatten() {
            debug_assert!(input.len() >= frames * 2);
        }

        if !self.primed {
            self.input_gain = *input_levels;
            self.output_gain = *output_levels;
            self.primed = true;
        }

        // Ramp reaches the exact target on the final frame; frame 0 carries
        // the previous block's final gain
        let inv = 1.0 / (frames - 1) as f32;
        let mut step_in = [0.0f32; MAX_INPUTS * 2];
        for (step, (target, base)) in step_in
            .iter_mut()
            .zip(input_levels.iter().zip(self.input_gain.iter()))
        {
            *step = (target - base) * inv;
        }
        let step_out = [
            (output_levels[0] - self.output_gain[0]) * inv,
            (output_levels[1] - self.output_gain[1]) * inv,
        ];

        let base_in = self.input_gain;
        let base_out = self.output_gain;
        let want_meters = (input_meters.is_some(), output_meters.is_some());

        let (in_peaks, out_peaks) = match sink {
            StereoSink::Interleaved(out) => {
                debug_assert!(out.len() >= frames * 2);
                mix_block(
                    &inputs,
                    &base_in,
                    &step_in,
                    &base_out,
                    &step_out,
                    want_meters,
                    frames,
                    |k, l, r| {
                        out[k * 2] = l;
                        out[k * 2 + 1] = r;
                    },
                )
            }
            StereoSink::Split { left, right } => {
                debug_assert!(left.len() >= frames && right.len() >= frames);
                mix_block(
                    &inputs,
                    &base_in,
                    &step_in,
                    &base_out,
                    &step_out,
                    want_meters,
                    frames,
                    |k, l, r| {
                        left[k] = l;
                        right[k] = r;
                    },
                )
            }
            StereoSink::InterleavedFixed(out) => {
                debug_assert!(out.len() >= frames * 2);
                mix_block(
                    &inputs,
                    &base_in,
                    &step_in,
                    &base_out,
                    &step_out,
                    want_meters,
                    frames,
                    |k, l, r| {
                        out[k * 2] = f32_to_fixed(l);
                        out[k * 2 + 1] = f32_to_fixed(r);
                    },
                )
            }
            StereoSink::SplitFixed { left, right } => {
                debug_assert!(left.len() >= frames && right.len() >= frames);
                mix_block(
                    &inputs,
                    &base_in,
                    &step_in,
                    &base_out,
                    &step_out,
                    want_meters,
                    frames,
                    |k, l, r| {
                        left[k] = f32_to_fixed(l);
                        right[k] = f32_to_fixed(r);
                    },
                )
            }
        };

        if let Some(meters) = input_meters {
            *meters = in_peaks;
        }
        if let Some(meters) = output_meters {
            *meters = out_peaks;
        }

        // Targets become the starting point of the next block's ramp
        self.input_gain = *input_levels;
        self.output_gain = *output_levels;
    }
}

impl Default for StereoMixer {
    fn default() -> Self {
        Self::new()
    }
}

/// Core per-sample loop, monomorphized per sink variant.
#[allow(clippy::too_many_arguments)]
fn mix_block<F>(
    inputs: &[Option<&[f32]>; MAX_INPUTS],
    base_in: &[f32; MAX_INPUTS * 2],
    step_in: &[f32; MAX_INPUTS * 2],
    base_out: &[f32; 2],
    step_out: &[f32; 2],
    want_meters: (bool, bool),
    frames: usize,
    mut write: F,
) -> ([f32; MAX_INPUTS * 2], [f32; 2])
where
    F: FnMut(usize, f32, f32),
{
    let (meter_inputs, meter_outputs) = want_meters;
    let mut in_peaks = [0.0f32; MAX_INPUTS * 2];
    let mut out_peaks = [0.0f32; 2];

    for k in 0..frames {
        let kf = k as f32;
        let mut l = 0.0f32;
        let mut r = 0.0f32;

        for (i, input) in inputs.iter().enumerate() {
            // None is a skip, not a zero gain: the channel contributes
            // nothing and its meter stays 0.0
            let Some(buf) = input else { continue };

            let gl = base_in[i * 2] + step_in[i * 2] * kf;
            let gr = base_in[i * 2 + 1] + step_in[i * 2 + 1] * kf;
            let sl = buf[k * 2] * gl;
            let sr = buf[k * 2 + 1] * gr;

            if meter_inputs {
                in_peaks[i * 2] = in_peaks[i * 2].max(sl.abs());
                in_peaks[i * 2 + 1] = in_peaks[i * 2 + 1].max(sr.abs());
            }

            l += sl;
            r += sr;
        }

        let out_l = l * (base_out[0] + step_out[0] * kf);
        let out_r = r * (base_out[1] + step_out[1] * kf);

        if meter_outputs {
            out_peaks[0] = out_peaks[0].max(out_l.abs());
            out_peaks[1] = out_peaks[1].max(out_r.abs());
        }

        write(k, out_l, out_r);
    }

    (in_peaks, out_peaks)
}

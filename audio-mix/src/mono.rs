//! Mono mixer: up to four mono inputs into one output
//!
//! Same ramped-gain and null-skip semantics as the stereo mixer, restricted
//! to single-channel signals and without metering. Block sizes are
//! 8..=2048 frames and must be a multiple of 4.

use crate::fixed::f32_to_fixed;
use crate::types::{MonoSink, MAX_BLOCK_FRAMES, MAX_INPUTS, MONO_BLOCK_ALIGN, MONO_MIN_BLOCK_FRAMES};

/// Mixes up to four mono inputs into one mono output.
pub struct MonoMixer {
    input_gain: [f32; MAX_INPUTS],
    output_gain: f32,
    primed: bool,
}

impl MonoMixer {
    /// Create a mono mixer. The first `process` call adopts its target
    /// gains directly instead of ramping from silence.
    pub fn new() -> Self {
        log::trace!("mono mixer created");
        Self {
            input_gain: [0.0; MAX_INPUTS],
            output_gain: 0.0,
            primed: false,
        }
    }

    /// Mix one block.
    ///
    /// * `inputs` - four mono buffers; `None` marks a silent channel.
    /// * `sink` - float or 8.24 fixed-point destination, `frames` elements
    ///   minimum.
    /// * `input_levels` - one target gain per input.
    /// * `output_gain` - target output gain.
    /// * `frames` - block size, 8..=2048 and a multiple of 4. Out-of-range
    ///   sizes are a caller bug (validate with
    ///   [`crate::types::validate_mono_block`] off the hot path).
    pub fn process(
        &mut self,
        inputs: [Option<&[f32]>; MAX_INPUTS],
        sink: MonoSink<'_>,
        input_levels: &[f32; MAX_INPUTS],
        output_gain: f32,
        frames: usize,
    ) {
        debug_assert!((MONO_MIN_BLOCK_FRAMES..=MAX_BLOCK_FRAMES).contains(&frames));
        debug_assert!(frames % MONO_BLOCK_ALIGN == 0);
        for input in inputs.iter().flatten() {
            debug_assert!(input.len() >= frames);
        }

        if !self.primed {
            self.input_gain = *input_levels;
            self.output_gain = output_gain;
            self.primed = true;
        }

        let inv = 1.0 / (frames - 1) as f32;
        let mut step_in = [0.0f32; MAX_INPUTS];
        for (step, (target, base)) in step_in
            .iter_mut()
            .zip(input_levels.iter().zip(self.input_gain.iter()))
        {
            *step = (target - base) * inv;
        }
        let step_out = (output_gain - self.output_gain) * inv;

        let base_in = self.input_gain;
        let base_out = self.output_gain;

        match sink {
            MonoSink::Float(out) => {
                debug_assert!(out.len() >= frames);
                mix_block(&inputs, &base_in, &step_in, base_out, step_out, frames, |k, s| {
                    out[k] = s;
                });
            }
            MonoSink::Fixed(out) => {
                debug_assert!(out.len() >= frames);
                mix_block(&inputs, &base_in, &step_in, base_out, step_out, frames, |k, s| {
                    out[k] = f32_to_fixed(s);
                });
            }
        }

        self.input_gain = *input_levels;
        self.output_gain = output_gain;
    }
}

impl Default for MonoMixer {
    fn default() -> Self {
        Self::new()
    }
}

fn mix_block<F>(
    inputs: &[Option<&[f32]>; MAX_INPUTS],
    base_in: &[f32; MAX_INPUTS],
    step_in: &[f32; MAX_INPUTS],
    base_out: f32,
    step_out: f32,
    frames: usize,
    mut write: F,
) where
    F: FnMut(usize, f32),
{
    for k in 0..frames {
        let kf = k as f32;
        let mut acc = 0.0f32;

        for (i, input) in inputs.iter().enumerate() {
            let Some(buf) = input else { continue };
            acc += buf[k] * (base_in[i] + step_in[i] * kf);
        }

        write(k, acc * (base_out + step_out * kf));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_inputs_null_is_silence() {
        let frames = 32;
        let mut out = vec![1.0f32; frames];

        let mut mixer = MonoMixer::new();
        mixer.process(
            [None, None, None, None],
            MonoSink::Float(&mut out),
            &[1.0; 4],
            1.0,
            frames,
        );

        assert!(out.iter().all(|&s| s == 0.0), "silence in, silence out");
    }

    #[test]
    fn test_linear_mix_law() {
        let frames = 16;
        let a: Vec<f32> = (0..frames).map(|i| (i as f32 * 0.3).sin()).collect();
        let b: Vec<f32> = (0..frames).map(|i| (i as f32 * 0.11).cos()).collect();
        let levels = [0.5, 0.25, 0.0, 0.0];
        let mut out = vec![0.0f32; frames];

        let mut mixer = MonoMixer::new();
        for _ in 0..2 {
            mixer.process(
                [Some(&a), Some(&b), None, None],
                MonoSink::Float(&mut out),
                &levels,
                1.0,
                frames,
            );
        }

        for k in 0..frames {
            let expected = a[k] * 0.5 + b[k] * 0.25;
            assert!(
                (out[k] - expected).abs() < 1e-6,
                "frame {}: {} vs {}",
                k,
                out[k],
                expected
            );
        }
    }

    #[test]
    fn test_gain_continuity_across_blocks() {
        let frames = 16;
        let input = vec![1.0f32; frames];
        let mut out = vec![0.0f32; frames];
        let mut mixer = MonoMixer::new();

        mixer.process(
            [Some(&input), None, None, None],
            MonoSink::Float(&mut out),
            &[0.3, 0.0, 0.0, 0.0],
            1.0,
            frames,
        );
        let last = out[frames - 1];
        assert!((last - 0.3).abs() < 1e-6);

        mixer.process(
            [Some(&input), None, None, None],
            MonoSink::Float(&mut out),
            &[0.8, 0.0, 0.0, 0.0],
            1.0,
            frames,
        );
        assert!(
            (out[0] - last).abs() < 1e-6,
            "frame 0 continues the previous block's final gain"
        );
        assert!((out[frames - 1] - 0.8).abs() < 1e-6, "target reached");
    }

    #[test]
    fn test_fixed_point_output() {
        let frames = 8;
        let input = vec![0.5f32; frames];
        let mut out = vec![0i32; frames];

        let mut mixer = MonoMixer::new();
        mixer.process(
            [Some(&input), None, None, None],
            MonoSink::Fixed(&mut out),
            &[1.0, 0.0, 0.0, 0.0],
            1.0,
            frames,
        );

        assert_eq!(out, vec![0x0080_0000; frames], "0.5 in 8.24 throughout");
    }
}

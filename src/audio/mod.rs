//! Short synthesized cue played when a burst starts.
//!
//! Three sine tones per celebration type, each starting 100 ms after the
//! previous one and fading out over 300 ms. Playback is best effort: backend
//! errors (and backend panics) stop at [`CueSynthesizer::play`] and are only
//! logged.

#[cfg(feature = "audio")]
pub mod rodio_output;

use crate::error::AudioError;
use crate::registry::{CelebrationType, Intensity};
use std::f32::consts::TAU;
use std::panic::{self, AssertUnwindSafe};
use std::time::Duration;

pub const SAMPLE_RATE: u32 = 44_100;
pub const TONE_SPACING: Duration = Duration::from_millis(100);
pub const TONE_LENGTH: Duration = Duration::from_millis(300);

// Envelope ends at 1% of the starting gain.
const TAIL_GAIN: f32 = 0.01;

/// Cue frequencies in Hz, lowest first.
pub fn cue_frequencies(kind: CelebrationType) -> [f32; 3] {
    match kind {
        CelebrationType::Confetti => [523.25, 659.25, 783.99],
        CelebrationType::Sparkle => [1046.50, 1318.51, 1567.98],
        CelebrationType::Coins => [987.77, 1318.51, 1975.53],
        CelebrationType::Hearts => [440.00, 554.37, 659.25],
        CelebrationType::Stars => [783.99, 987.77, 1174.66],
    }
}

fn cue_gain(intensity: Intensity) -> f32 {
    match intensity {
        Intensity::Subtle => 0.06,
        Intensity::Normal => 0.1,
        Intensity::Epic => 0.12,
        Intensity::Legendary => 0.15,
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tone {
    pub frequency: f32,
    /// Offset from the moment the cue is played.
    pub delay: Duration,
    pub length: Duration,
    pub gain: f32,
}

impl Tone {
    /// Mono samples for this tone, exponentially decaying to silence.
    pub fn samples(&self, sample_rate: u32) -> Vec<f32> {
        let count = (self.length.as_secs_f32() * sample_rate as f32) as usize;
        let length = self.length.as_secs_f32().max(f32::EPSILON);
        let rate = sample_rate as f32;

        (0..count)
            .map(|i| {
                let t = i as f32 / rate;
                let envelope = self.gain * TAIL_GAIN.powf(t / length);
                (TAU * self.frequency * t).sin() * envelope
            })
            .collect()
    }
}

/// The three tones making up the cue for `kind` at `intensity`.
pub fn cue(kind: CelebrationType, intensity: Intensity) -> [Tone; 3] {
    let gain = cue_gain(intensity);
    let mut delay = Duration::ZERO;
    cue_frequencies(kind).map(|frequency| {
        let tone = Tone { frequency, delay, length: TONE_LENGTH, gain };
        delay += TONE_SPACING;
        tone
    })
}

pub trait AudioOutput {
    /// Start one tone. Must return promptly; `tone.delay` is applied by the
    /// backend, not by blocking the caller.
    fn play(&mut self, tone: &Tone) -> Result<(), AudioError>;

    /// Drop any device resources held open between cues.
    fn release(&mut self) {}
}

/// Output that discards every tone; used when sound is compiled out.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullOutput;

impl AudioOutput for NullOutput {
    fn play(&mut self, _tone: &Tone) -> Result<(), AudioError> {
        Ok(())
    }
}

pub struct CueSynthesizer<A: AudioOutput> {
    output: A,
}

impl<A: AudioOutput> CueSynthesizer<A> {
    pub fn new(output: A) -> Self {
        Self { output }
    }

    /// Fire the cue and return how many tones the backend accepted.
    /// Tones are independent: a rejected tone does not stop the ones after
    /// it. Never fails and never waits for playback.
    pub fn play(&mut self, kind: CelebrationType, intensity: Intensity) -> usize {
        let mut started = 0;
        for tone in cue(kind, intensity) {
            let output = &mut self.output;
            match panic::catch_unwind(AssertUnwindSafe(|| output.play(&tone))) {
                Ok(Ok(())) => started += 1,
                Ok(Err(err)) => log::debug!("{} Hz tone of {kind} cue skipped: {err}", tone.frequency),
                Err(_) => log::debug!("audio backend panicked on {} Hz tone of {kind} cue", tone.frequency),
            }
        }
        started
    }

    pub fn release(&mut self) {
        let output = &mut self.output;
        if panic::catch_unwind(AssertUnwindSafe(|| output.release())).is_err() {
            log::debug!("audio backend panicked during release");
        }
    }

    pub fn output(&self) -> &A {
        &self.output
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Collect {
        tones: Vec<Tone>,
        released: usize,
    }

    impl AudioOutput for Collect {
        fn play(&mut self, tone: &Tone) -> Result<(), AudioError> {
            self.tones.push(*tone);
            Ok(())
        }

        fn release(&mut self) {
            self.released += 1;
        }
    }

    struct Blocked;

    impl AudioOutput for Blocked {
        fn play(&mut self, _tone: &Tone) -> Result<(), AudioError> {
            Err(AudioError::Playback("autoplay blocked".into()))
        }
    }

    struct Broken;

    impl AudioOutput for Broken {
        fn play(&mut self, _tone: &Tone) -> Result<(), AudioError> {
            panic!("device vanished");
        }

        fn release(&mut self) {
            panic!("device vanished");
        }
    }

    #[test]
    fn cue_is_staggered() {
        let mut synth = CueSynthesizer::new(Collect::default());
        assert_eq!(synth.play(CelebrationType::Coins, Intensity::Normal), 3);

        let tones = &synth.output().tones;
        let delays: Vec<u128> = tones.iter().map(|t| t.delay.as_millis()).collect();
        assert_eq!(delays, vec![0, 100, 200]);
        assert!(tones.iter().all(|t| t.length == TONE_LENGTH));
        let freqs: Vec<f32> = tones.iter().map(|t| t.frequency).collect();
        assert_eq!(freqs, cue_frequencies(CelebrationType::Coins).to_vec());
    }

    #[test]
    fn unknown_type_uses_confetti_tones() {
        let kind = CelebrationType::resolve("glitter");
        assert_eq!(cue_frequencies(kind), cue_frequencies(CelebrationType::Confetti));
    }

    #[test]
    fn louder_for_bigger_celebrations() {
        let quiet = cue(CelebrationType::Stars, Intensity::Subtle)[0].gain;
        let loud = cue(CelebrationType::Stars, Intensity::Legendary)[0].gain;
        assert!(quiet < loud);
    }

    #[test]
    fn failures_are_swallowed() {
        let mut blocked = CueSynthesizer::new(Blocked);
        assert_eq!(blocked.play(CelebrationType::Hearts, Intensity::Epic), 0);

        let mut broken = CueSynthesizer::new(Broken);
        assert_eq!(broken.play(CelebrationType::Hearts, Intensity::Epic), 0);
        broken.release();
    }

    struct Flaky {
        calls: usize,
    }

    impl AudioOutput for Flaky {
        fn play(&mut self, _tone: &Tone) -> Result<(), AudioError> {
            self.calls += 1;
            match self.calls {
                1 => Err(AudioError::Playback("device busy".into())),
                2 => panic!("driver hiccup"),
                _ => Ok(()),
            }
        }
    }

    #[test]
    fn one_bad_tone_does_not_silence_the_rest() {
        let mut synth = CueSynthesizer::new(Flaky { calls: 0 });
        assert_eq!(synth.play(CelebrationType::Sparkle, Intensity::Normal), 1);
        assert_eq!(synth.output().calls, 3);
    }

    #[test]
    fn release_reaches_backend() {
        let mut synth = CueSynthesizer::new(Collect::default());
        synth.release();
        synth.release();
        assert_eq!(synth.output().released, 2);
    }

    #[test]
    fn samples_decay() {
        let tone = cue(CelebrationType::Confetti, Intensity::Normal)[0];
        let samples = tone.samples(SAMPLE_RATE);
        assert_eq!(samples.len(), (SAMPLE_RATE as f32 * 0.3) as usize);

        let peak = |s: &[f32]| s.iter().fold(0.0f32, |m, v| m.max(v.abs()));
        let head = peak(&samples[..1000]);
        let tail = peak(&samples[samples.len() - 1000..]);
        assert!(head <= tone.gain + 1e-6);
        assert!(tail < head * 0.05);
    }
}

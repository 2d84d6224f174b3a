//! Synthesized sound cues
//!
//! Every cue is rendered to a mono `f32` buffer up front and handed to a
//! `SoundSink`. Playback is fire-and-forget: a sink that cannot play simply
//! drops the cue.

use log::{debug, warn};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use sdl2::audio::{AudioCallback, AudioDevice, AudioSpecDesired};
use sdl2::Sdl;

use crate::error::{Error, Result};

pub const SAMPLE_RATE: i32 = 44_100;
/// Oldest voices are dropped beyond this many
pub const MAX_VOICES: usize = 16;
/// Exponential ramps end here instead of at zero
const SILENCE: f32 = 0.0001;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cue {
    Gunshot,
    Knife,
    Machete,
    Flame,
    Explosion,
}

/// How a cue is synthesized
#[derive(Debug, Clone, Copy, PartialEq)]
enum Recipe {
    /// Square wave, gain 0.2 ramping out over `dur + decay`
    Tone { freq: f32, dur: f32, decay: f32 },
    /// White noise at constant gain; the buffer holds `2 * rate * dur` samples
    Noise { dur: f32, gain: f32 },
    /// Triangle wave gliding exponentially from `start` to `end` Hz
    Sweep { start: f32, end: f32, dur: f32, tail: f32 },
}

impl Cue {
    fn recipe(&self) -> Recipe {
        match self {
            Cue::Gunshot => Recipe::Tone {
                freq: 220.0,
                dur: 0.04,
                decay: 0.0005,
            },
            Cue::Knife => Recipe::Tone {
                freq: 100.0,
                dur: 0.02,
                decay: 0.002,
            },
            Cue::Machete => Recipe::Tone {
                freq: 80.0,
                dur: 0.05,
                decay: 0.001,
            },
            Cue::Flame => Recipe::Noise {
                dur: 0.15,
                gain: 0.15,
            },
            Cue::Explosion => Recipe::Sweep {
                start: 120.0,
                end: 40.0,
                dur: 0.3,
                tail: 0.1,
            },
        }
    }
}

/// Gain for an exponential ramp from `from` to `SILENCE` over `span` seconds
#[inline]
fn ramp(from: f32, t: f32, span: f32) -> f32 {
    if span <= 0.0 {
        return SILENCE;
    }
    from * (SILENCE / from).powf((t / span).min(1.0))
}

/// Render `cue` at `sample_rate` Hz
pub fn synthesize(cue: Cue, sample_rate: u32, rng: &mut impl Rng) -> Vec<f32> {
    let rate = sample_rate.max(1) as f32;
    match cue.recipe() {
        Recipe::Tone { freq, dur, decay } => {
            let span = dur + decay;
            let len = (span * rate).round() as usize;
            (0..len)
                .map(|i| {
                    let t = i as f32 / rate;
                    let square = if (t * freq).fract() < 0.5 { 1.0 } else { -1.0 };
                    square * ramp(0.2, t, span)
                })
                .collect()
        },
        Recipe::Noise { dur, gain } => {
            let len = (2.0 * rate * dur).round() as usize;
            (0..len).map(|_| (rng.gen::<f32>() * 2.0 - 1.0) * gain).collect()
        },
        Recipe::Sweep {
            start,
            end,
            dur,
            tail,
        } => {
            let span = dur + tail;
            let len = (span * rate).round() as usize;
            let mut phase = 0.0f32;
            (0..len)
                .map(|i| {
                    let t = i as f32 / rate;
                    let glide = (t / dur).min(1.0);
                    let freq = start * (end / start).powf(glide);
                    phase = (phase + freq / rate).fract();
                    let triangle = 1.0 - 4.0 * (phase - 0.5).abs();
                    triangle * ramp(0.35, t, span)
                })
                .collect()
        },
    }
}

/// Something that can play cues
pub trait SoundSink {
    fn play(&mut self, cue: Cue);
}

/// Drops every cue
#[derive(Debug, Default)]
pub struct Silent;

impl SoundSink for Silent {
    fn play(&mut self, cue: Cue) {
        log::trace!("muted cue {:?}", cue);
    }
}

// ============================================================================
// SDL playback
// ============================================================================

struct Voice {
    samples: Vec<f32>,
    pos: usize,
}

/// Sums active voices on SDL's audio thread
pub struct Mixer {
    voices: Vec<Voice>,
    max_voices: usize,
}

impl Mixer {
    pub fn new(max_voices: usize) -> Self {
        Self {
            voices: Vec::with_capacity(max_voices),
            max_voices: max_voices.max(1),
        }
    }

    /// Start a voice, evicting the oldest when full
    pub fn queue(&mut self, samples: Vec<f32>) {
        if samples.is_empty() {
            return;
        }
        if self.voices.len() >= self.max_voices {
            self.voices.remove(0);
        }
        self.voices.push(Voice { samples, pos: 0 });
    }

    pub fn active_voices(&self) -> usize {
        self.voices.len()
    }

    /// Mix into `out`, replacing its contents
    pub fn mix(&mut self, out: &mut [f32]) {
        out.fill(0.0);
        for voice in &mut self.voices {
            let remaining = &voice.samples[voice.pos..];
            let n = remaining.len().min(out.len());
            for (o, s) in out.iter_mut().zip(&remaining[..n]) {
                *o += s;
            }
            voice.pos += n;
        }
        for o in out.iter_mut() {
            *o = o.clamp(-1.0, 1.0);
        }
        self.voices.retain(|v| v.pos < v.samples.len());
    }
}

impl AudioCallback for Mixer {
    type Channel = f32;

    fn callback(&mut self, out: &mut [f32]) {
        self.mix(out);
    }
}

/// Plays cues through the default SDL output device
pub struct SdlAudio {
    device: AudioDevice<Mixer>,
    sample_rate: u32,
    rng: StdRng,
}

impl SdlAudio {
    pub fn open(sdl: &Sdl) -> Result<Self> {
        let subsystem = sdl.audio().map_err(Error::audio)?;
        let desired = AudioSpecDesired {
            freq: Some(SAMPLE_RATE),
            channels: Some(1),
            samples: Some(512),
        };
        let device = subsystem
            .open_playback(None, &desired, |_spec| Mixer::new(MAX_VOICES))
            .map_err(Error::audio)?;
        let sample_rate = device.spec().freq.max(1) as u32;
        device.resume();
        debug!("audio open at {} Hz", sample_rate);

        Ok(Self {
            device,
            sample_rate,
            rng: StdRng::from_entropy(),
        })
    }
}

impl SoundSink for SdlAudio {
    fn play(&mut self, cue: Cue) {
        let samples = synthesize(cue, self.sample_rate, &mut self.rng);
        self.device.lock().queue(samples);
    }
}

/// Best available sink: SDL playback unless muted or unavailable
pub fn open_sink(sdl: &Sdl, mute: bool) -> Box<dyn SoundSink> {
    if mute {
        debug!("audio muted");
        return Box::new(Silent);
    }
    match SdlAudio::open(sdl) {
        Ok(audio) => Box::new(audio),
        Err(e) => {
            warn!("{}; continuing without sound", e);
            Box::new(Silent)
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rstest::rstest;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(11)
    }

    #[rstest]
    #[case(Cue::Gunshot, 0.0405)]
    #[case(Cue::Knife, 0.022)]
    #[case(Cue::Machete, 0.051)]
    #[case(Cue::Flame, 0.3)]
    #[case(Cue::Explosion, 0.4)]
    fn test_cue_lengths(#[case] cue: Cue, #[case] seconds: f32) {
        let samples = synthesize(cue, 10_000, &mut rng());
        assert_eq!(samples.len(), (seconds * 10_000.0).round() as usize);
    }

    #[test]
    fn test_tone_starts_loud_and_fades_out() {
        let samples = synthesize(Cue::Machete, 44_100, &mut rng());
        assert_relative_eq!(samples[0], 0.2);
        let tail = samples[samples.len() - 1].abs();
        assert!(tail < 0.001, "tail {}", tail);
        // Square wave: only two levels at any gain
        assert!(samples[..10].iter().all(|s| s.abs() > 0.19));
    }

    #[test]
    fn test_noise_stays_within_gain() {
        let samples = synthesize(Cue::Flame, 8_000, &mut rng());
        assert!(samples.iter().all(|s| s.abs() <= 0.15));
        let mean = samples.iter().sum::<f32>() / samples.len() as f32;
        assert!(mean.abs() < 0.01);
    }

    #[test]
    fn test_sweep_is_bounded_and_decays() {
        let samples = synthesize(Cue::Explosion, 22_050, &mut rng());
        assert!(samples.iter().all(|s| s.abs() <= 0.35 + 1e-6));
        let early: f32 = samples[..2000].iter().map(|s| s.abs()).sum();
        let late: f32 = samples[samples.len() - 2000..].iter().map(|s| s.abs()).sum();
        assert!(early > late * 10.0);
    }

    #[test]
    fn test_mixer_sums_and_retires_voices() {
        let mut mixer = Mixer::new(4);
        mixer.queue(vec![0.25; 3]);
        mixer.queue(vec![0.5; 5]);
        let mut out = [9.0f32; 4];
        mixer.mix(&mut out);
        assert_eq!(out, [0.75, 0.75, 0.75, 0.5]);
        assert_eq!(mixer.active_voices(), 1);
        mixer.mix(&mut out);
        assert_eq!(out, [0.5, 0.0, 0.0, 0.0]);
        assert_eq!(mixer.active_voices(), 0);
    }

    #[test]
    fn test_mixer_clamps_and_evicts_oldest() {
        let mut mixer = Mixer::new(2);
        mixer.queue(vec![0.9; 2]);
        mixer.queue(vec![0.9; 2]);
        let mut out = [0.0f32; 2];
        mixer.mix(&mut out);
        assert_eq!(out, [1.0, 1.0]);

        mixer.queue(vec![0.1; 8]);
        mixer.queue(vec![0.2; 8]);
        mixer.queue(vec![0.3; 8]);
        assert_eq!(mixer.active_voices(), 2);
        mixer.mix(&mut out);
        assert_relative_eq!(out[0], 0.5);
        mixer.queue(Vec::new());
        assert_eq!(mixer.active_voices(), 2);
    }

    #[test]
    fn test_silent_sink_accepts_everything() {
        let mut sink = Silent;
        sink.play(Cue::Explosion);
    }
}

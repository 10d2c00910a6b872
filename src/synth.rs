//! Procedural NES-style sound effects.
//!
//! Every generator is a pure function of its parameters and returns a stereo
//! 16-bit buffer at [`SAMPLE_RATE`]. Buffers are played live (via their WAV
//! encoding) and are also what the capture log records.

use std::f64::consts::TAU;
use std::io::Cursor;

use crate::config::SAMPLE_RATE;

/// Stereo 16-bit PCM frames.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SampleBuffer {
    frames: Vec<[i16; 2]>,
}

impl SampleBuffer {
    fn from_mono(mono: impl Iterator<Item = i16>) -> Self {
        Self {
            frames: mono.map(|s| [s, s]).collect(),
        }
    }

    pub fn frames(&self) -> &[[i16; 2]] {
        &self.frames
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Encodes the buffer as an in-memory WAV file.
    pub fn to_wav_bytes(&self) -> Result<Vec<u8>, hound::Error> {
        let mut cursor = Cursor::new(Vec::new());
        let mut writer = hound::WavWriter::new(&mut cursor, wav_spec())?;
        for frame in &self.frames {
            writer.write_sample(frame[0])?;
            writer.write_sample(frame[1])?;
        }
        writer.finalize()?;
        Ok(cursor.into_inner())
    }
}

pub fn wav_spec() -> hound::WavSpec {
    hound::WavSpec {
        channels: 2,
        sample_rate: SAMPLE_RATE,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    }
}

/// Whole frames in `duration` seconds; a trailing partial frame is dropped.
pub fn sample_count(duration: f64) -> usize {
    (SAMPLE_RATE as f64 * duration).max(0.0) as usize
}

fn time_at(i: usize) -> f64 {
    i as f64 / SAMPLE_RATE as f64
}

fn square(phase: f64) -> f64 {
    if phase.sin() > 0.0 { 1.0 } else { -1.0 }
}

fn to_i16(v: f64) -> i16 {
    v.clamp(i16::MIN as f64, i16::MAX as f64) as i16
}

pub fn square_wave(frequency: f64, duration: f64, volume: f64) -> SampleBuffer {
    let n = sample_count(duration);
    SampleBuffer::from_mono(
        (0..n).map(|i| to_i16(square(TAU * frequency * time_at(i)) * volume * i16::MAX as f64)),
    )
}

/// Square wave whose pitch falls linearly from `start_hz` to `end_hz`.
pub fn falling_sweep(start_hz: f64, end_hz: f64, duration: f64, volume: f64) -> SampleBuffer {
    let n = sample_count(duration);
    let span = n.saturating_sub(1).max(1) as f64;
    SampleBuffer::from_mono((0..n).map(|i| {
        let freq = start_hz + (end_hz - start_hz) * (i as f64 / span);
        to_i16(square(TAU * freq * time_at(i)) * volume * i16::MAX as f64)
    }))
}

/// Sum of sines, each at a quarter of full scale, decaying as e^(-3t).
pub fn chime(frequencies: &[f64], duration: f64) -> SampleBuffer {
    let n = sample_count(duration);
    SampleBuffer::from_mono((0..n).map(|i| {
        let t = time_at(i);
        let envelope = 0.25 * i16::MAX as f64 * (-3.0 * t).exp();
        to_i16(frequencies.iter().map(|f| (TAU * f * t).sin() * envelope).sum())
    }))
}

/// The fixed set of game sounds.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Cue {
    Eat,
    Move,
    GameOver,
    Title,
}

impl Cue {
    pub const ALL: [Cue; 4] = [Cue::Eat, Cue::Move, Cue::GameOver, Cue::Title];

    pub fn synthesize(self) -> SampleBuffer {
        match self {
            Cue::Eat => square_wave(880.0, 0.07, 0.3),
            Cue::Move => square_wave(220.0, 0.03, 0.2),
            Cue::GameOver => falling_sweep(440.0, 110.0, 0.4, 0.5),
            Cue::Title => chime(&[440.0, 554.0, 659.0, 880.0], 0.8),
        }
    }
}

/// Pre-synthesized buffers for every cue.
#[derive(Debug, Clone)]
pub struct SoundBank {
    eat: SampleBuffer,
    movement: SampleBuffer,
    game_over: SampleBuffer,
    title: SampleBuffer,
}

impl SoundBank {
    pub fn generate() -> Self {
        Self {
            eat: Cue::Eat.synthesize(),
            movement: Cue::Move.synthesize(),
            game_over: Cue::GameOver.synthesize(),
            title: Cue::Title.synthesize(),
        }
    }

    pub fn get(&self, cue: Cue) -> &SampleBuffer {
        match cue {
            Cue::Eat => &self.eat,
            Cue::Move => &self.movement,
            Cue::GameOver => &self.game_over,
            Cue::Title => &self.title,
        }
    }
}

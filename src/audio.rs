//! Live sound output and the optional capture log.

use std::cell::RefCell;
use std::collections::HashMap;
use std::path::Path;
use std::rc::Rc;

use macroquad::audio::{self, PlaySoundParams, Sound, load_sound_from_bytes};
use tracing::{debug, info, warn};

use crate::error::{AudioError, CaptureError};
use crate::synth::{Cue, SampleBuffer, SoundBank, wav_spec};

/// Something that can turn a cue into sound.
/// Implementations: MacroquadOutput (live), HeadlessOutput (no device, keeps a log).
pub trait AudioOutput {
    fn play(&mut self, cue: Cue, buffer: &SampleBuffer, volume: f32) -> Result<(), AudioError>;
}

/// Live output through macroquad's mixer.
pub struct MacroquadOutput {
    sounds: HashMap<Cue, Sound>,
}

impl MacroquadOutput {
    /// Loads every cue of the bank. Cues that fail to load are logged and
    /// report [`AudioError::MissingCue`] when played.
    pub async fn load(bank: &SoundBank) -> Result<Self, AudioError> {
        let mut sounds = HashMap::new();
        let mut failures = 0;
        for cue in Cue::ALL {
            match load_cue(bank, cue).await {
                Ok(sound) => {
                    sounds.insert(cue, sound);
                }
                Err(e) => {
                    warn!("{e}");
                    failures += 1;
                }
            }
        }
        if failures == Cue::ALL.len() {
            return Err(AudioError::Disabled);
        }
        Ok(Self { sounds })
    }
}

async fn load_cue(bank: &SoundBank, cue: Cue) -> Result<Sound, AudioError> {
    let bytes = bank.get(cue).to_wav_bytes()?;
    load_sound_from_bytes(&bytes).await.map_err(|e| AudioError::Load {
        cue,
        message: e.to_string(),
    })
}

impl AudioOutput for MacroquadOutput {
    fn play(&mut self, cue: Cue, _buffer: &SampleBuffer, volume: f32) -> Result<(), AudioError> {
        let sound = self.sounds.get(&cue).ok_or(AudioError::MissingCue(cue))?;
        audio::play_sound(sound, PlaySoundParams { looped: false, volume });
        Ok(())
    }
}

/// Output with no device behind it; remembers the cues it was handed.
#[derive(Debug, Clone, Default)]
pub struct HeadlessOutput {
    played: Rc<RefCell<Vec<Cue>>>,
}

impl HeadlessOutput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shared view of the dispatch log, still readable after the output is boxed.
    pub fn played(&self) -> Rc<RefCell<Vec<Cue>>> {
        Rc::clone(&self.played)
    }
}

impl AudioOutput for HeadlessOutput {
    fn play(&mut self, cue: Cue, _buffer: &SampleBuffer, _volume: f32) -> Result<(), AudioError> {
        self.played.borrow_mut().push(cue);
        Ok(())
    }
}

/// Ordered chunks of exactly what was dispatched while capturing.
#[derive(Debug, Clone, Default)]
pub struct CaptureLog {
    chunks: Vec<SampleBuffer>,
}

impl CaptureLog {
    pub fn push(&mut self, buffer: &SampleBuffer) {
        self.chunks.push(buffer.clone());
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.iter().all(SampleBuffer::is_empty)
    }

    pub fn frame_count(&self) -> usize {
        self.chunks.iter().map(SampleBuffer::len).sum()
    }

    pub fn clear(&mut self) {
        self.chunks.clear();
    }

    /// Writes all chunks, in arrival order, as one stereo 16-bit WAV.
    /// Returns the number of frames written.
    pub fn write_wav(&self, path: &Path) -> Result<usize, CaptureError> {
        let wrap = |source| CaptureError::Write {
            path: path.to_path_buf(),
            source,
        };
        let mut writer = hound::WavWriter::create(path, wav_spec()).map_err(wrap)?;
        for frame in self.chunks.iter().flat_map(|c| c.frames()) {
            writer.write_sample(frame[0]).map_err(wrap)?;
            writer.write_sample(frame[1]).map_err(wrap)?;
        }
        writer.finalize().map_err(wrap)?;
        Ok(self.frame_count())
    }
}

/// The game's single entry point for sound: live dispatch plus capture.
///
/// With no output the sink is permanently silent; nothing is dispatched and
/// therefore nothing is captured.
pub struct AudioSink {
    output: Option<Box<dyn AudioOutput>>,
    bank: SoundBank,
    volume: f32,
    capturing: bool,
    capture: CaptureLog,
}

impl AudioSink {
    pub fn new(output: Box<dyn AudioOutput>, bank: SoundBank, volume: f32) -> Self {
        Self {
            output: Some(output),
            bank,
            volume: volume.clamp(0.0, 1.0),
            capturing: false,
            capture: CaptureLog::default(),
        }
    }

    pub fn silent(bank: SoundBank) -> Self {
        Self {
            output: None,
            bank,
            volume: 0.0,
            capturing: false,
            capture: CaptureLog::default(),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.output.is_some()
    }

    pub fn volume(&self) -> f32 {
        self.volume
    }

    pub fn set_volume(&mut self, volume: f32) {
        self.volume = volume.clamp(0.0, 1.0);
    }

    /// Plays a cue. Failures are logged and returned; callers may ignore them.
    pub fn play(&mut self, cue: Cue) -> Result<(), AudioError> {
        let Some(output) = self.output.as_mut() else {
            return Err(AudioError::Disabled);
        };
        let buffer = self.bank.get(cue);
        if let Err(e) = output.play(cue, buffer, self.volume) {
            warn!("Error playing sound: {e}");
            return Err(e);
        }
        if self.capturing {
            self.capture.push(buffer);
        }
        Ok(())
    }

    pub fn is_capturing(&self) -> bool {
        self.capturing
    }

    pub fn captured_frames(&self) -> usize {
        self.capture.frame_count()
    }

    pub fn start_capture(&mut self) {
        self.capturing = true;
        info!("Recording: enabled");
    }

    /// Stops capturing, writes whatever was captured and empties the log.
    pub fn stop_capture(&mut self, path: &Path) -> Result<usize, CaptureError> {
        self.capturing = false;
        info!("Recording: disabled");
        let result = self.flush_to_file(path);
        self.capture.clear();
        result
    }

    /// Writes the capture log to `path`. An empty log writes nothing.
    pub fn flush_to_file(&self, path: &Path) -> Result<usize, CaptureError> {
        if self.capture.is_empty() {
            info!("No audio data to save.");
            return Ok(0);
        }
        info!("Saving recording to {}", path.display());
        match self.capture.write_wav(path) {
            Ok(frames) => {
                debug!(frames, "capture written");
                Ok(frames)
            }
            Err(e) => {
                warn!("Error saving WAV file: {e}");
                Err(e)
            }
        }
    }
}

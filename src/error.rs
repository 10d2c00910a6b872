use std::path::PathBuf;

use thiserror::Error;

use crate::synth::Cue;

#[derive(Debug, Error)]
pub enum AudioError {
    #[error("audio output is disabled")]
    Disabled,

    #[error("no sound loaded for {0:?}")]
    MissingCue(Cue),

    #[error("failed to load sound for {cue:?}: {message}")]
    Load { cue: Cue, message: String },

    #[error("failed to encode samples: {0}")]
    Encode(#[from] hound::Error),
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to read high scores from {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("high-score file {path} is corrupt")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to write high scores to {path}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize high scores")]
    Serialize(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("failed to write capture to {path}")]
    Write {
        path: PathBuf,
        #[source]
        source: hound::Error,
    },
}

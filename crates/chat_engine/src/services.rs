//! Host capabilities the chat can use when present: speech recognition,
//! clipboard and audio cues. Each one sits behind a trait so hosts without
//! the capability plug in a stand-in and tests plug in fakes.

use std::sync::Arc;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("{0} is not supported on this host")]
    Unsupported(&'static str),
    #[error("{0}")]
    Backend(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpeechEvent {
    /// A final (not interim) transcript.
    Transcript(String),
    Ended,
    Failed(String),
}

pub trait SpeechSink: Send + Sync {
    fn emit(&self, event: SpeechEvent);
}

impl<F> SpeechSink for F
where
    F: Fn(SpeechEvent) + Send + Sync,
{
    fn emit(&self, event: SpeechEvent) {
        self(event);
    }
}

pub trait SpeechRecognizer: Send + Sync {
    fn is_available(&self) -> bool;
    fn start(&self, sink: Arc<dyn SpeechSink>) -> Result<(), ServiceError>;
    fn stop(&self);
}

/// Recognizer for hosts without speech support.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnavailableSpeech;

impl SpeechRecognizer for UnavailableSpeech {
    fn is_available(&self) -> bool {
        false
    }

    fn start(&self, _sink: Arc<dyn SpeechSink>) -> Result<(), ServiceError> {
        Err(ServiceError::Unsupported("speech recognition"))
    }

    fn stop(&self) {}
}

pub trait ClipboardWriter {
    fn write_text(&mut self, text: &str) -> Result<(), ServiceError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cue {
    Start,
    Stop,
}

pub trait CuePlayer {
    fn play(&mut self, cue: Cue);
}

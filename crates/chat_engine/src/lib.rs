//! Chat engine: remote answer fetching, timers and host services.
mod attach;
mod engine;
mod fetch;
mod prompt;
mod services;
mod types;

pub use attach::{attach_local_file, AttachError, LocalAttachment};
pub use engine::{EngineError, EngineHandle};
pub use fetch::{AnswerFetcher, FetchSettings, GeminiFetcher, DEFAULT_BASE_URL, DEFAULT_MODEL};
pub use prompt::build_prompt;
pub use services::{
    ClipboardWriter, Cue, CuePlayer, ServiceError, SpeechEvent, SpeechRecognizer, SpeechSink,
    UnavailableSpeech,
};
pub use types::{EngineEvent, FailureKind, FetchError, NoticeId, RequestId, RevealId};

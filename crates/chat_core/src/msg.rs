use url::Url;

use crate::{NoticeId, RequestId, RevealId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// User edited the query box.
    InputChanged(String),
    /// User pressed Send.
    SendClicked,
    /// User pressed Stop while an answer was pending or being revealed.
    StopClicked,
    /// Engine finished a fetch. The error carries a human-readable detail.
    AnswerReceived {
        request: RequestId,
        result: Result<String, String>,
    },
    /// Engine aborted a fetch after a stop request.
    AnswerAborted { request: RequestId },
    /// Reveal timer fired for the given reveal.
    RevealTick { reveal: RevealId },
    /// A local file was turned into a session-scoped reference.
    FileAttached { file_name: String, file_url: Url },
    /// A local file could not be attached.
    AttachFailed { reason: String },
    /// User pressed the microphone button.
    VoiceToggled,
    /// Speech recognition produced a final transcript.
    TranscriptFinal(String),
    /// Speech recognition session ended.
    VoiceEnded,
    /// Speech recognition reported an error.
    VoiceFailed { reason: String },
    /// User asked to copy the message at `index`.
    CopyRequested { index: usize },
    /// Clipboard write finished.
    CopyFinished { result: Result<(), String> },
    /// A notice reached the end of its lifetime.
    NoticeExpired { notice: NoticeId },
}

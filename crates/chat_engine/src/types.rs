use std::fmt;

use thiserror::Error;

pub type RequestId = u64;
pub type RevealId = u64;
pub type NoticeId = u64;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    AnswerReady {
        request: RequestId,
        result: Result<String, FetchError>,
    },
    /// The fetch was cancelled before an answer arrived.
    FetchAborted { request: RequestId },
    RevealTick { reveal: RevealId },
    NoticeExpired { notice: NoticeId },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind}: {message}")]
pub struct FetchError {
    pub kind: FailureKind,
    pub message: String,
}

impl FetchError {
    pub(crate) fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    Network,
    Timeout,
    HttpStatus(u16),
    /// The body was not JSON or lacked the candidate text.
    MalformedResponse,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::Network => write!(f, "network error"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            FailureKind::MalformedResponse => write!(f, "malformed response"),
        }
    }
}

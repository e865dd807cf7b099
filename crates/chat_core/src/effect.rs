use std::time::Duration;

use crate::{NoticeId, RequestId, RevealId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    FetchAnswer { request: RequestId, query: String },
    CancelFetch { request: RequestId },
    StartRevealTimer { reveal: RevealId, period: Duration },
    StopRevealTimer { reveal: RevealId },
    StartListening,
    StopListening,
    PlayCue(Cue),
    CopyToClipboard { text: String },
    ExpireNotice { notice: NoticeId, after: Duration },
}

/// Audio cue played when dictation starts or stops.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cue {
    Start,
    Stop,
}

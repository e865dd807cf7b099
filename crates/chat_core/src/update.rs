use crate::state::Phase;
use crate::{
    AppState, AttachmentKind, Cue, Effect, Message, Msg, RequestId, RevealId, RevealState,
    Severity, SpeechCapability,
};

/// Assistant reply substituted for any failed fetch.
pub const FETCH_ERROR_TEXT: &str = "Error fetching response.";

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::InputChanged(text) => {
            state.set_input(text);
            Vec::new()
        }
        Msg::SendClicked => submit(&mut state),
        Msg::StopClicked => stop(&mut state),
        Msg::AnswerReceived { request, result } => answer_received(&mut state, request, result),
        Msg::AnswerAborted { request } => {
            match state.take_phase() {
                Phase::Cancelling { request: pending } if pending == request => {
                    state.set_phase(Phase::Idle);
                }
                other => state.restore_phase(other),
            }
            Vec::new()
        }
        Msg::RevealTick { reveal } => reveal_tick(&mut state, reveal),
        Msg::FileAttached {
            file_name,
            file_url,
        } => {
            let kind = AttachmentKind::classify(&file_name);
            state.append(Message::UserFile {
                file_name,
                file_url,
                kind,
            });
            Vec::new()
        }
        Msg::AttachFailed { reason } => notify(
            &mut state,
            Severity::Error,
            format!("Could not attach file: {reason}"),
        ),
        Msg::VoiceToggled => toggle_voice(&mut state),
        Msg::TranscriptFinal(transcript) => {
            state.append_transcript(&transcript);
            Vec::new()
        }
        Msg::VoiceEnded => {
            // Ending after a manual stop is not news to the user.
            if state.is_listening() {
                state.set_listening(false);
                notify(&mut state, Severity::Info, "Voice input stopped.".to_string())
            } else {
                Vec::new()
            }
        }
        Msg::VoiceFailed { reason } => {
            state.set_listening(false);
            notify(
                &mut state,
                Severity::Error,
                format!("Speech recognition error: {reason}"),
            )
        }
        Msg::CopyRequested { index } => {
            let text = state.conversation().get(index).map(Message::copy_text);
            match text {
                Some(text) => vec![Effect::CopyToClipboard { text }],
                None => notify(
                    &mut state,
                    Severity::Error,
                    format!("There is no message #{}.", index + 1),
                ),
            }
        }
        Msg::CopyFinished { result } => match result {
            Ok(()) => notify(&mut state, Severity::Info, "Copied to clipboard.".to_string()),
            Err(reason) => notify(&mut state, Severity::Error, format!("Copy failed: {reason}")),
        },
        Msg::NoticeExpired { notice } => {
            state.expire_notice(notice);
            Vec::new()
        }
    };

    (state, effects)
}

fn submit(state: &mut AppState) -> Vec<Effect> {
    // One fetch or reveal at a time; the control shows Stop meanwhile.
    if !state.is_idle() {
        return Vec::new();
    }
    let query = state.input().trim().to_string();
    if query.is_empty() {
        return Vec::new();
    }

    state.take_input();
    state.append(Message::UserText {
        text: query.clone(),
    });
    let request = state.next_request_id();
    state.set_phase(Phase::AwaitingAnswer { request });
    vec![Effect::FetchAnswer { request, query }]
}

fn stop(state: &mut AppState) -> Vec<Effect> {
    match state.take_phase() {
        Phase::AwaitingAnswer { request } => {
            state.set_phase(Phase::Cancelling { request });
            vec![Effect::CancelFetch { request }]
        }
        Phase::Revealing { reveal } => {
            let id = reveal.id();
            state.commit_reveal(reveal);
            vec![Effect::StopRevealTimer { reveal: id }]
        }
        other => {
            state.restore_phase(other);
            Vec::new()
        }
    }
}

fn answer_received(
    state: &mut AppState,
    request: RequestId,
    result: Result<String, String>,
) -> Vec<Effect> {
    match state.take_phase() {
        Phase::AwaitingAnswer { request: pending } if pending == request => match result {
            Ok(answer) => {
                let lines = crate::split_fragments(&answer);
                if lines.is_empty() {
                    state.set_phase(Phase::Idle);
                    return Vec::new();
                }
                let reveal = state.next_reveal_id();
                state.set_phase(Phase::Revealing {
                    reveal: RevealState::new(reveal, lines),
                });
                vec![Effect::StartRevealTimer {
                    reveal,
                    period: state.settings().reveal_period,
                }]
            }
            Err(_) => {
                state.append(Message::AssistantText {
                    lines: vec![FETCH_ERROR_TEXT.to_string()],
                });
                state.set_phase(Phase::Idle);
                Vec::new()
            }
        },
        // The user stopped this request; whatever came back is dropped.
        Phase::Cancelling { request: pending } if pending == request => {
            state.set_phase(Phase::Idle);
            Vec::new()
        }
        other => {
            state.restore_phase(other);
            Vec::new()
        }
    }
}

fn reveal_tick(state: &mut AppState, reveal: RevealId) -> Vec<Effect> {
    match state.take_phase() {
        Phase::Revealing { reveal: mut current } if current.id() == reveal => {
            current.advance();
            if current.is_finished() {
                state.commit_reveal(current);
                vec![Effect::StopRevealTimer { reveal }]
            } else {
                state.set_phase(Phase::Revealing { reveal: current });
                Vec::new()
            }
        }
        // Ticks scheduled for a finished or cancelled reveal.
        other => {
            state.restore_phase(other);
            Vec::new()
        }
    }
}

fn toggle_voice(state: &mut AppState) -> Vec<Effect> {
    match (state.settings().speech, state.is_listening()) {
        (SpeechCapability::Unavailable, _) => notify(
            state,
            Severity::Error,
            "Speech recognition is not supported.".to_string(),
        ),
        (SpeechCapability::Available, false) => {
            state.set_listening(true);
            vec![Effect::StartListening, Effect::PlayCue(Cue::Start)]
        }
        (SpeechCapability::Available, true) => {
            state.set_listening(false);
            vec![Effect::StopListening, Effect::PlayCue(Cue::Stop)]
        }
    }
}

fn notify(state: &mut AppState, severity: Severity, text: String) -> Vec<Effect> {
    let notice = state.show_notice(severity, text);
    vec![Effect::ExpireNotice {
        notice,
        after: state.settings().notice_ttl,
    }]
}

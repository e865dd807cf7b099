use std::time::Duration;

use crate::view_model::{Activity, ChatViewModel, SendControl};
use crate::{Conversation, Message};

pub type RequestId = u64;
pub type RevealId = u64;
pub type NoticeId = u64;

/// Whether the host can run speech recognition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SpeechCapability {
    Available,
    #[default]
    Unavailable,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoreSettings {
    pub reveal_period: Duration,
    pub notice_ttl: Duration,
    pub speech: SpeechCapability,
}

impl Default for CoreSettings {
    fn default() -> Self {
        Self {
            reveal_period: Duration::from_millis(200),
            notice_ttl: Duration::from_secs(3),
            speech: SpeechCapability::Unavailable,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub id: NoticeId,
    pub severity: Severity,
    pub text: String,
}

/// Progress of one answer being revealed. Lines before `cursor` are visible.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RevealState {
    id: RevealId,
    lines: Vec<String>,
    cursor: usize,
}

impl RevealState {
    pub fn new(id: RevealId, lines: Vec<String>) -> Self {
        Self {
            id,
            lines,
            cursor: 0,
        }
    }

    pub fn id(&self) -> RevealId {
        self.id
    }

    pub fn revealed(&self) -> &[String] {
        &self.lines[..self.cursor]
    }

    pub fn is_finished(&self) -> bool {
        self.cursor >= self.lines.len()
    }

    /// Shows the next whole line, if any remain.
    pub fn advance(&mut self) {
        if !self.is_finished() {
            self.cursor += 1;
        }
    }

    pub fn into_revealed(mut self) -> Vec<String> {
        self.lines.truncate(self.cursor);
        self.lines
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub(crate) enum Phase {
    #[default]
    Idle,
    AwaitingAnswer {
        request: RequestId,
    },
    Revealing {
        reveal: RevealState,
    },
    Cancelling {
        request: RequestId,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppState {
    settings: CoreSettings,
    conversation: Conversation,
    input: String,
    phase: Phase,
    listening: bool,
    notice: Option<Notice>,
    last_request: RequestId,
    last_reveal: RevealId,
    last_notice: NoticeId,
    dirty: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_settings(settings: CoreSettings) -> Self {
        Self {
            settings,
            ..Self::default()
        }
    }

    pub fn settings(&self) -> &CoreSettings {
        &self.settings
    }

    pub fn conversation(&self) -> &Conversation {
        &self.conversation
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn is_idle(&self) -> bool {
        self.phase == Phase::Idle
    }

    pub fn is_listening(&self) -> bool {
        self.listening
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    pub fn view(&self) -> ChatViewModel {
        let (activity, revealing) = match &self.phase {
            Phase::Idle => (Activity::Idle, Vec::new()),
            Phase::AwaitingAnswer { .. } => (Activity::Thinking, Vec::new()),
            Phase::Revealing { reveal } => (Activity::Revealing, reveal.revealed().to_vec()),
            Phase::Cancelling { .. } => (Activity::Cancelling, Vec::new()),
        };
        let control = match activity {
            Activity::Idle => SendControl::Send,
            Activity::Thinking | Activity::Revealing => SendControl::Stop,
            Activity::Cancelling => SendControl::Stopping,
        };
        ChatViewModel {
            messages: self.conversation.to_vec(),
            revealing,
            activity,
            control,
            input: self.input.clone(),
            listening: self.listening,
            notice: self.notice.clone(),
            dirty: self.dirty,
        }
    }

    /// Returns whether anything visible changed since the last call, and resets the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub(crate) fn set_input(&mut self, input: String) {
        if self.input != input {
            self.input = input;
            self.mark_dirty();
        }
    }

    pub(crate) fn take_input(&mut self) -> String {
        self.mark_dirty();
        std::mem::take(&mut self.input)
    }

    /// Appends a final transcript to the pending query, space-separated.
    pub(crate) fn append_transcript(&mut self, transcript: &str) {
        let transcript = transcript.trim();
        if transcript.is_empty() {
            return;
        }
        if !self.input.is_empty() {
            self.input.push(' ');
        }
        self.input.push_str(transcript);
        self.mark_dirty();
    }

    pub(crate) fn set_listening(&mut self, listening: bool) {
        if self.listening != listening {
            self.listening = listening;
            self.mark_dirty();
        }
    }

    pub(crate) fn append(&mut self, message: Message) {
        self.conversation.push(message);
        self.mark_dirty();
    }

    /// Moves the phase out, leaving `Idle` without marking the state dirty.
    /// Callers must put a phase back with `set_phase` or `restore_phase`.
    pub(crate) fn take_phase(&mut self) -> Phase {
        std::mem::take(&mut self.phase)
    }

    pub(crate) fn restore_phase(&mut self, phase: Phase) {
        self.phase = phase;
    }

    pub(crate) fn set_phase(&mut self, phase: Phase) {
        self.phase = phase;
        self.mark_dirty();
    }

    /// Commits the visible lines of a reveal as one assistant message and returns to idle.
    pub(crate) fn commit_reveal(&mut self, reveal: RevealState) {
        let lines = reveal.into_revealed();
        if !lines.is_empty() {
            self.append(Message::AssistantText { lines });
        }
        self.set_phase(Phase::Idle);
    }

    pub(crate) fn next_request_id(&mut self) -> RequestId {
        self.last_request += 1;
        self.last_request
    }

    pub(crate) fn next_reveal_id(&mut self) -> RevealId {
        self.last_reveal += 1;
        self.last_reveal
    }

    pub(crate) fn show_notice(&mut self, severity: Severity, text: String) -> NoticeId {
        self.last_notice += 1;
        let id = self.last_notice;
        self.notice = Some(Notice { id, severity, text });
        self.mark_dirty();
        id
    }

    pub(crate) fn expire_notice(&mut self, id: NoticeId) {
        if self.notice.as_ref().is_some_and(|notice| notice.id == id) {
            self.notice = None;
            self.mark_dirty();
        }
    }
}

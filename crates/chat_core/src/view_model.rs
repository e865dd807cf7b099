use crate::{Message, Notice};

/// What the conversation is busy with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Activity {
    #[default]
    Idle,
    /// Waiting for the remote answer; shown as a "thinking" placeholder.
    Thinking,
    Revealing,
    Cancelling,
}

/// The action bound to the submit control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SendControl {
    #[default]
    Send,
    Stop,
    /// Stop was pressed and the engine has not confirmed yet.
    Stopping,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ChatViewModel {
    pub messages: Vec<Message>,
    /// Lines of the answer currently being revealed.
    pub revealing: Vec<String>,
    pub activity: Activity,
    pub control: SendControl,
    pub input: String,
    pub listening: bool,
    pub notice: Option<Notice>,
    pub dirty: bool,
}

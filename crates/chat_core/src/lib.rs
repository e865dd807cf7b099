//! Chat core: pure state machine, conversation store and view-model helpers.
mod effect;
mod message;
mod msg;
mod split;
mod state;
mod update;
mod view_model;

pub use effect::{Cue, Effect};
pub use message::{AttachmentKind, Conversation, Message, IMAGE_EXTENSIONS};
pub use msg::Msg;
pub use split::split_fragments;
pub use state::{
    AppState, CoreSettings, Notice, NoticeId, RequestId, RevealId, RevealState, Severity,
    SpeechCapability,
};
pub use update::{update, FETCH_ERROR_TEXT};
pub use view_model::{Activity, ChatViewModel, SendControl};

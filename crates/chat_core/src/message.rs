use url::Url;

/// File extensions rendered inline as images. Anything else becomes a download link.
pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "webp", "bmp", "svg"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttachmentKind {
    Image,
    Download,
}

impl AttachmentKind {
    /// Classifies a file by the extension of its name (case-insensitive).
    pub fn classify(file_name: &str) -> Self {
        let extension = file_name
            .rsplit_once('.')
            .map(|(_, ext)| ext)
            .unwrap_or_default();
        if IMAGE_EXTENSIONS
            .iter()
            .any(|allowed| allowed.eq_ignore_ascii_case(extension))
        {
            AttachmentKind::Image
        } else {
            AttachmentKind::Download
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    UserText {
        text: String,
    },
    UserFile {
        file_name: String,
        file_url: Url,
        kind: AttachmentKind,
    },
    AssistantText {
        lines: Vec<String>,
    },
}

impl Message {
    pub fn is_assistant(&self) -> bool {
        matches!(self, Message::AssistantText { .. })
    }

    /// Text placed on the clipboard when this message is copied.
    pub fn copy_text(&self) -> String {
        match self {
            Message::UserText { text } => text.clone(),
            Message::UserFile { file_url, .. } => file_url.to_string(),
            Message::AssistantText { lines } => lines.join("\n"),
        }
    }
}

/// Append-only, in-memory message list. Position is the only identity.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Conversation {
    messages: Vec<Message>,
}

impl Conversation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, message: Message) {
        self.messages.push(message);
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Message> {
        self.messages.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Message> {
        self.messages.iter()
    }

    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    pub(crate) fn to_vec(&self) -> Vec<Message> {
        self.messages.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_uses_allow_list_case_insensitively() {
        assert_eq!(AttachmentKind::classify("cat.PNG"), AttachmentKind::Image);
        assert_eq!(AttachmentKind::classify("photo.jpeg"), AttachmentKind::Image);
        assert_eq!(AttachmentKind::classify("report.pdf"), AttachmentKind::Download);
        assert_eq!(AttachmentKind::classify("README"), AttachmentKind::Download);
        assert_eq!(AttachmentKind::classify("archive.png.zip"), AttachmentKind::Download);
    }

    #[test]
    fn copy_text_joins_assistant_lines() {
        let message = Message::AssistantText {
            lines: vec!["a".to_string(), "b".to_string()],
        };
        assert_eq!(message.copy_text(), "a\nb");
        assert!(message.is_assistant());
    }
}

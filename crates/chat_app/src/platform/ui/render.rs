use std::fmt::Write;

use chat_core::{Activity, AttachmentKind, ChatViewModel, Message, NoticeId, Severity};

/// Produces the `HH:MM` stamp printed in message headers.
pub type Clock = Box<dyn Fn() -> String>;

/// Prints the conversation incrementally: every call emits only what changed
/// since the previous view.
pub struct Renderer {
    clock: Clock,
    printed_messages: usize,
    streamed_lines: usize,
    // A header for the answer being revealed has been printed.
    stream_open: bool,
    // Another message was printed below the streamed lines.
    stream_interrupted: bool,
    activity: Activity,
    listening: bool,
    notice: Option<NoticeId>,
    draft: String,
}

impl Renderer {
    pub fn new(clock: Clock) -> Self {
        Self {
            clock,
            printed_messages: 0,
            streamed_lines: 0,
            stream_open: false,
            stream_interrupted: false,
            activity: Activity::Idle,
            listening: false,
            notice: None,
            draft: String::new(),
        }
    }

    pub fn render(&mut self, view: &ChatViewModel) -> String {
        let mut out = String::new();

        for (index, message) in view.messages.iter().enumerate().skip(self.printed_messages) {
            match message {
                // An answer's position is fixed only when it commits.
                Message::AssistantText { lines } if self.stream_open => {
                    self.push_stream_lines(&mut out, &lines[self.streamed_lines.min(lines.len())..]);
                    let _ = writeln!(out, "  (saved as #{})", index + 1);
                    self.close_stream();
                }
                _ => {
                    self.push_message(&mut out, index, message);
                    if self.stream_open {
                        self.stream_interrupted = true;
                    }
                }
            }
        }
        self.printed_messages = view.messages.len();

        if view.activity == Activity::Revealing {
            let fresh = &view.revealing[self.streamed_lines.min(view.revealing.len())..];
            self.push_stream_lines(&mut out, fresh);
        } else {
            self.close_stream();
        }

        if view.activity != self.activity {
            match (self.activity, view.activity) {
                (_, Activity::Thinking) => out.push_str("  (thinking...)\n"),
                (_, Activity::Cancelling) => out.push_str("  (stopping...)\n"),
                (Activity::Cancelling, Activity::Idle) => out.push_str("  (stopped)\n"),
                _ => {}
            }
            self.activity = view.activity;
        }

        if view.listening != self.listening {
            out.push_str(if view.listening {
                "  (listening...)\n"
            } else {
                "  (microphone off)\n"
            });
            self.listening = view.listening;
        }

        if view.input != self.draft {
            if !view.input.is_empty() {
                let _ = writeln!(out, "  draft: {}", view.input);
            }
            self.draft = view.input.clone();
        }

        let notice_id = view.notice.as_ref().map(|notice| notice.id);
        if notice_id != self.notice {
            if let Some(notice) = &view.notice {
                let marker = match notice.severity {
                    Severity::Info => "*",
                    Severity::Error => "!",
                };
                let _ = writeln!(out, "  {marker} {}", notice.text);
            }
            self.notice = notice_id;
        }

        out
    }

    /// Prints lines of the answer being revealed, opening (or reopening after
    /// an interleaved message) its header first.
    fn push_stream_lines(&mut self, out: &mut String, lines: &[String]) {
        if lines.is_empty() {
            return;
        }
        if !self.stream_open || self.stream_interrupted {
            let continued = if self.stream_open { " (continued)" } else { "" };
            let _ = writeln!(out, "[{}] assistant{continued}:", (self.clock)());
            self.stream_open = true;
            self.stream_interrupted = false;
        }
        for line in lines {
            push_line(out, line);
        }
        self.streamed_lines += lines.len();
    }

    fn close_stream(&mut self) {
        self.streamed_lines = 0;
        self.stream_open = false;
        self.stream_interrupted = false;
    }

    fn header(&self, who: &str, index: usize) -> String {
        format!("[{}] {} #{}:\n", (self.clock)(), who, index + 1)
    }

    fn push_message(&self, out: &mut String, index: usize, message: &Message) {
        match message {
            Message::UserText { text } => {
                out.push_str(&self.header("you", index));
                let _ = writeln!(out, "    {text}");
            }
            Message::UserFile {
                file_name,
                file_url,
                kind,
            } => {
                out.push_str(&self.header("you", index));
                match kind {
                    AttachmentKind::Image => {
                        let _ = writeln!(out, "    [image] {file_name} <{file_url}>");
                    }
                    AttachmentKind::Download => {
                        let _ = writeln!(out, "    [file] {file_name}, download: {file_url}");
                    }
                }
            }
            Message::AssistantText { lines } => {
                out.push_str(&self.header("assistant", index));
                for line in lines {
                    push_line(out, line);
                }
            }
        }
    }
}

fn push_line(out: &mut String, line: &str) {
    let _ = writeln!(out, "    • {line}");
}

#[cfg(test)]
mod tests {
    use chat_core::{update, AppState, Msg};
    use url::Url;

    use super::*;

    fn renderer() -> Renderer {
        Renderer::new(Box::new(|| "12:00".to_string()))
    }

    fn step(state: AppState, renderer: &mut Renderer, msg: Msg) -> (AppState, String) {
        let (state, _) = update(state, msg);
        let out = renderer.render(&state.view());
        (state, out)
    }

    #[test]
    fn reveal_is_streamed_without_repeats() {
        let mut r = renderer();
        let (state, out) = step(AppState::new(), &mut r, Msg::InputChanged("q".into()));
        assert_eq!(out, "  draft: q\n");

        let (state, out) = step(state, &mut r, Msg::SendClicked);
        assert_eq!(out, "[12:00] you #1:\n    q\n  (thinking...)\n");

        let (state, out) = step(
            state,
            &mut r,
            Msg::AnswerReceived {
                request: 1,
                result: Ok("a\nb".to_string()),
            },
        );
        assert_eq!(out, "");

        let (state, out) = step(state, &mut r, Msg::RevealTick { reveal: 1 });
        assert_eq!(out, "[12:00] assistant:\n    • a\n");

        let (_, out) = step(state, &mut r, Msg::RevealTick { reveal: 1 });
        assert_eq!(out, "    • b\n  (saved as #2)\n");
    }

    #[test]
    fn file_attached_mid_reveal_keeps_copy_numbers_right() {
        let mut r = renderer();
        let (state, _) = step(AppState::new(), &mut r, Msg::InputChanged("q".into()));
        let (state, _) = step(state, &mut r, Msg::SendClicked);
        let (state, _) = step(
            state,
            &mut r,
            Msg::AnswerReceived {
                request: 1,
                result: Ok("a\nb".to_string()),
            },
        );
        let (state, out) = step(state, &mut r, Msg::RevealTick { reveal: 1 });
        assert_eq!(out, "[12:00] assistant:\n    • a\n");

        let (state, out) = step(
            state,
            &mut r,
            Msg::FileAttached {
                file_name: "x.pdf".to_string(),
                file_url: Url::parse("file:///tmp/x.pdf").unwrap(),
            },
        );
        assert_eq!(out, "[12:00] you #2:\n    [file] x.pdf, download: file:///tmp/x.pdf\n");

        let (state, out) = step(state, &mut r, Msg::RevealTick { reveal: 1 });
        assert_eq!(
            out,
            "[12:00] assistant (continued):\n    • b\n  (saved as #3)\n"
        );
        assert!(matches!(
            state.conversation().get(2),
            Some(Message::AssistantText { lines }) if lines == &["a", "b"]
        ));

        // The printed numbers are the ones `/copy` resolves.
        let (_, effects) = update(state, Msg::CopyRequested { index: 2 });
        assert_eq!(
            effects,
            vec![chat_core::Effect::CopyToClipboard {
                text: "a\nb".to_string()
            }]
        );
    }

    #[test]
    fn stop_mid_reveal_numbers_the_partial_answer() {
        let mut r = renderer();
        let (state, _) = step(AppState::new(), &mut r, Msg::InputChanged("q".into()));
        let (state, _) = step(state, &mut r, Msg::SendClicked);
        let (state, _) = step(
            state,
            &mut r,
            Msg::AnswerReceived {
                request: 1,
                result: Ok("a\nb\nc".to_string()),
            },
        );
        let (state, _) = step(state, &mut r, Msg::RevealTick { reveal: 1 });
        let (state, out) = step(state, &mut r, Msg::StopClicked);
        assert_eq!(out, "  (saved as #2)\n");

        // The next answer starts a fresh block.
        let (state, _) = step(state, &mut r, Msg::InputChanged("again".into()));
        let (state, _) = step(state, &mut r, Msg::SendClicked);
        let (_, out) = step(
            state,
            &mut r,
            Msg::AnswerReceived {
                request: 2,
                result: Err("down".to_string()),
            },
        );
        assert_eq!(out, "[12:00] assistant #4:\n    • Error fetching response.\n");
    }

    #[test]
    fn cancelled_fetch_is_announced() {
        let mut r = renderer();
        let (state, _) = step(AppState::new(), &mut r, Msg::InputChanged("q".into()));
        let (state, _) = step(state, &mut r, Msg::SendClicked);
        let (state, out) = step(state, &mut r, Msg::StopClicked);
        assert_eq!(out, "  (stopping...)\n");
        let (_, out) = step(state, &mut r, Msg::AnswerAborted { request: 1 });
        assert_eq!(out, "  (stopped)\n");
    }

    #[test]
    fn attachments_and_notices_are_printed() {
        let mut r = renderer();
        let (state, out) = step(
            AppState::new(),
            &mut r,
            Msg::FileAttached {
                file_name: "cat.png".to_string(),
                file_url: Url::parse("file:///tmp/cat.png").unwrap(),
            },
        );
        assert_eq!(out, "[12:00] you #1:\n    [image] cat.png <file:///tmp/cat.png>\n");

        let (_, out) = step(state, &mut r, Msg::VoiceToggled);
        assert_eq!(out, "  ! Speech recognition is not supported.\n");
    }
}

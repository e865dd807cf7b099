use std::io::{self, Write};

use chat_engine::{ClipboardWriter, Cue, CuePlayer, ServiceError};
use chat_logging::chat_debug;

/// System clipboard through `arboard`, opened on first use so that hosts
/// without a display only fail when a copy is actually requested.
#[derive(Default)]
pub struct SystemClipboard {
    inner: Option<arboard::Clipboard>,
}

impl ClipboardWriter for SystemClipboard {
    fn write_text(&mut self, text: &str) -> Result<(), ServiceError> {
        if self.inner.is_none() {
            let clipboard =
                arboard::Clipboard::new().map_err(|err| ServiceError::Backend(err.to_string()))?;
            self.inner = Some(clipboard);
        }
        let Some(clipboard) = self.inner.as_mut() else {
            return Err(ServiceError::Unsupported("clipboard"));
        };
        clipboard
            .set_text(text.to_owned())
            .map_err(|err| ServiceError::Backend(err.to_string()))
    }
}

/// Rings the terminal bell: once to start dictation, twice to stop it.
pub struct TerminalBell<W: Write> {
    out: W,
}

impl TerminalBell<io::Stdout> {
    pub fn stdout() -> Self {
        Self { out: io::stdout() }
    }
}

impl<W: Write> CuePlayer for TerminalBell<W> {
    fn play(&mut self, cue: Cue) {
        let bells = match cue {
            Cue::Start => "\x07",
            Cue::Stop => "\x07\x07",
        };
        if let Err(err) = self.out.write_all(bells.as_bytes()).and_then(|()| self.out.flush()) {
            chat_debug!("cue {:?} not played: {}", cue, err);
        }
    }
}

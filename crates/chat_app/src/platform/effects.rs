use std::sync::{mpsc, Arc};
use std::thread;

use chat_core::{Effect, Msg};
use chat_engine::{
    ClipboardWriter, CuePlayer, EngineEvent, EngineHandle, SpeechEvent, SpeechRecognizer,
    SpeechSink,
};
use chat_logging::{chat_debug, chat_info, chat_warn};

use super::app::AppEvent;

pub struct EffectRunner {
    engine: EngineHandle,
    speech: Arc<dyn SpeechRecognizer>,
    clipboard: Box<dyn ClipboardWriter>,
    cues: Box<dyn CuePlayer>,
    event_tx: mpsc::Sender<AppEvent>,
}

impl EffectRunner {
    pub fn new(
        engine: EngineHandle,
        engine_events: mpsc::Receiver<EngineEvent>,
        speech: Arc<dyn SpeechRecognizer>,
        clipboard: Box<dyn ClipboardWriter>,
        cues: Box<dyn CuePlayer>,
        event_tx: mpsc::Sender<AppEvent>,
    ) -> Self {
        spawn_event_loop(engine_events, event_tx.clone());
        Self {
            engine,
            speech,
            clipboard,
            cues,
            event_tx,
        }
    }

    pub fn run(&mut self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::FetchAnswer { request, query } => {
                    chat_logging::with_request_context(request, || {
                        chat_info!("FetchAnswer query_len={}", query.len());
                    });
                    self.engine.fetch(request, query);
                }
                Effect::CancelFetch { request } => {
                    chat_logging::with_request_context(request, || chat_info!("CancelFetch"));
                    self.engine.cancel_fetch(request);
                }
                Effect::StartRevealTimer { reveal, period } => {
                    chat_info!("StartRevealTimer reveal={} period={:?}", reveal, period);
                    self.engine.start_reveal(reveal, period);
                }
                Effect::StopRevealTimer { reveal } => {
                    chat_info!("StopRevealTimer reveal={}", reveal);
                    self.engine.stop_reveal(reveal);
                }
                Effect::StartListening => self.start_listening(),
                Effect::StopListening => self.speech.stop(),
                Effect::PlayCue(cue) => self.cues.play(map_cue(cue)),
                Effect::CopyToClipboard { text } => {
                    let result = self
                        .clipboard
                        .write_text(&text)
                        .map_err(|err| err.to_string());
                    if let Err(reason) = &result {
                        chat_warn!("clipboard write failed: {}", reason);
                    }
                    self.dispatch(Msg::CopyFinished { result });
                }
                Effect::ExpireNotice { notice, after } => {
                    self.engine.expire_notice(notice, after);
                }
            }
        }
    }

    /// Stops an active dictation session before the app exits.
    pub fn shutdown(&self) {
        self.speech.stop();
    }

    fn start_listening(&self) {
        let event_tx = self.event_tx.clone();
        let sink: Arc<dyn SpeechSink> = Arc::new(move |event: SpeechEvent| {
            let _ = event_tx.send(AppEvent::Dispatch(vec![map_speech(event)]));
        });
        if let Err(err) = self.speech.start(sink) {
            chat_warn!("speech recognition did not start: {}", err);
            self.dispatch(Msg::VoiceFailed {
                reason: err.to_string(),
            });
        }
    }

    fn dispatch(&self, msg: Msg) {
        let _ = self.event_tx.send(AppEvent::Dispatch(vec![msg]));
    }
}

fn spawn_event_loop(engine_events: mpsc::Receiver<EngineEvent>, event_tx: mpsc::Sender<AppEvent>) {
    thread::spawn(move || {
        while let Ok(event) = engine_events.recv() {
            let msg = map_engine_event(event);
            if event_tx.send(AppEvent::Dispatch(vec![msg])).is_err() {
                break;
            }
        }
        chat_debug!("engine event loop finished");
    });
}

/// Failures were already logged by the engine; only the text travels on.
fn map_engine_event(event: EngineEvent) -> Msg {
    match event {
        EngineEvent::AnswerReady { request, result } => Msg::AnswerReceived {
            request,
            result: result.map_err(|err| err.to_string()),
        },
        EngineEvent::FetchAborted { request } => Msg::AnswerAborted { request },
        EngineEvent::RevealTick { reveal } => Msg::RevealTick { reveal },
        EngineEvent::NoticeExpired { notice } => Msg::NoticeExpired { notice },
    }
}

fn map_cue(cue: chat_core::Cue) -> chat_engine::Cue {
    match cue {
        chat_core::Cue::Start => chat_engine::Cue::Start,
        chat_core::Cue::Stop => chat_engine::Cue::Stop,
    }
}

fn map_speech(event: SpeechEvent) -> Msg {
    match event {
        SpeechEvent::Transcript(text) => Msg::TranscriptFinal(text),
        SpeechEvent::Ended => Msg::VoiceEnded,
        SpeechEvent::Failed(reason) => Msg::VoiceFailed { reason },
    }
}

#[cfg(test)]
mod tests {
    use chat_engine::{FailureKind, FetchError};

    use super::*;

    #[test]
    fn failed_answer_carries_error_text() {
        let event = EngineEvent::AnswerReady {
            request: 5,
            result: Err(FetchError {
                kind: FailureKind::HttpStatus(503),
                message: "503 Service Unavailable".to_string(),
            }),
        };
        assert_eq!(
            map_engine_event(event),
            Msg::AnswerReceived {
                request: 5,
                result: Err("http status 503: 503 Service Unavailable".to_string()),
            }
        );
    }

    #[test]
    fn engine_signals_map_to_messages() {
        assert_eq!(
            map_engine_event(EngineEvent::FetchAborted { request: 2 }),
            Msg::AnswerAborted { request: 2 }
        );
        assert_eq!(
            map_engine_event(EngineEvent::RevealTick { reveal: 3 }),
            Msg::RevealTick { reveal: 3 }
        );
        assert_eq!(
            map_speech(SpeechEvent::Failed("no mic".to_string())),
            Msg::VoiceFailed {
                reason: "no mic".to_string()
            }
        );
    }
}

use std::io::{self, BufRead, Write};
use std::sync::{mpsc, Arc};
use std::thread;

use anyhow::Context;
use chat_core::{update, AppState, Msg, SpeechCapability};
use chat_engine::{attach_local_file, EngineHandle, GeminiFetcher, SpeechRecognizer, UnavailableSpeech};
use chat_logging::{chat_info, chat_warn};

use super::config::{api_key_from_env, config_path, load_config, resolve_api_key};
use super::effects::EffectRunner;
use super::logging;
use super::services::{SystemClipboard, TerminalBell};
use super::ui::input::{parse_line, InputCommand, HELP};
use super::ui::render::Renderer;

/// Everything the main loop reacts to.
pub enum AppEvent {
    /// Messages applied in order, rendered once afterwards.
    Dispatch(Vec<Msg>),
    Print(String),
    Quit,
}

pub fn run_app() -> anyhow::Result<()> {
    let config = load_config(&config_path())?;
    logging::initialize(config.log, config.verbose);

    let api_key = resolve_api_key(api_key_from_env())?;
    let fetcher = GeminiFetcher::new(config.fetch_settings(api_key))
        .context("failed to build HTTP client")?;
    let (engine, engine_events) = EngineHandle::new(Arc::new(fetcher))?;

    let speech: Arc<dyn SpeechRecognizer> = Arc::new(UnavailableSpeech);
    let capability = if speech.is_available() {
        SpeechCapability::Available
    } else {
        SpeechCapability::Unavailable
    };

    let (event_tx, event_rx) = mpsc::channel::<AppEvent>();
    let mut runner = EffectRunner::new(
        engine,
        engine_events,
        speech,
        Box::new(SystemClipboard::default()),
        Box::new(TerminalBell::stdout()),
        event_tx.clone(),
    );
    spawn_input_reader(event_tx);

    let mut state = AppState::with_settings(config.core_settings(capability));
    let mut renderer = Renderer::new(Box::new(|| chrono::Local::now().format("%H:%M").to_string()));
    let stdout = io::stdout();
    writeln!(stdout.lock(), "{HELP}\n")?;
    chat_info!("chat widget started with model {}", config.model);

    while let Ok(event) = event_rx.recv() {
        match event {
            AppEvent::Dispatch(msgs) => {
                for msg in msgs {
                    let (next, effects) = update(std::mem::take(&mut state), msg);
                    state = next;
                    runner.run(effects);
                }
                if state.consume_dirty() {
                    let out = renderer.render(&state.view());
                    let mut lock = stdout.lock();
                    lock.write_all(out.as_bytes())?;
                    lock.flush()?;
                }
            }
            AppEvent::Print(text) => writeln!(stdout.lock(), "{text}")?,
            AppEvent::Quit => break,
        }
    }

    runner.shutdown();
    chat_info!("chat widget stopped");
    Ok(())
}

fn spawn_input_reader(event_tx: mpsc::Sender<AppEvent>) {
    thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            let line = match line {
                Ok(line) => line,
                Err(err) => {
                    chat_warn!("stdin read failed: {}", err);
                    break;
                }
            };
            let event = match parse_line(&line) {
                InputCommand::Dispatch(msgs) => AppEvent::Dispatch(msgs),
                InputCommand::Attach(path) => {
                    let msg = match attach_local_file(&path) {
                        Ok(attachment) => {
                            chat_info!(
                                "attached {} ({} bytes)",
                                attachment.file_name,
                                attachment.byte_len
                            );
                            Msg::FileAttached {
                                file_name: attachment.file_name,
                                file_url: attachment.file_url,
                            }
                        }
                        Err(err) => {
                            chat_warn!("attach failed: {}", err);
                            Msg::AttachFailed {
                                reason: err.to_string(),
                            }
                        }
                    };
                    AppEvent::Dispatch(vec![msg])
                }
                InputCommand::Help => AppEvent::Print(HELP.to_string()),
                InputCommand::Invalid(reason) => AppEvent::Print(format!("  ! {reason}")),
                InputCommand::Quit => AppEvent::Quit,
            };
            if event_tx.send(event).is_err() {
                return;
            }
        }
        // End of input behaves like /quit.
        let _ = event_tx.send(AppEvent::Quit);
    });
}

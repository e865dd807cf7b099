use std::collections::HashMap;
use std::io;
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use chat_logging::{chat_debug, chat_info, chat_trace, chat_warn};
use thiserror::Error;
use tokio::runtime::Runtime;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use crate::fetch::AnswerFetcher;
use crate::{EngineEvent, NoticeId, RequestId, RevealId};

const MIN_REVEAL_PERIOD: Duration = Duration::from_millis(1);
const MAX_REVEAL_PERIOD: Duration = Duration::from_secs(60 * 60);

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("failed to start engine: {0}")]
    Startup(#[from] io::Error),
}

enum EngineCommand {
    Fetch { request: RequestId, query: String },
    CancelFetch { request: RequestId },
    StartReveal { reveal: RevealId, period: Duration },
    StopReveal { reveal: RevealId },
    ExpireNotice { notice: NoticeId, after: Duration },
}

/// Front door to the engine thread. Events come back on the receiver
/// returned by [`EngineHandle::new`].
#[derive(Clone)]
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
}

impl EngineHandle {
    pub fn new(
        fetcher: Arc<dyn AnswerFetcher>,
    ) -> Result<(Self, mpsc::Receiver<EngineEvent>), EngineError> {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .thread_name("chat-engine-worker")
            .enable_all()
            .build()?;

        thread::Builder::new()
            .name("chat-engine".to_string())
            .spawn(move || dispatch(runtime, fetcher, cmd_rx, event_tx))?;

        Ok((Self { cmd_tx }, event_rx))
    }

    pub fn fetch(&self, request: RequestId, query: impl Into<String>) {
        self.send(EngineCommand::Fetch {
            request,
            query: query.into(),
        });
    }

    pub fn cancel_fetch(&self, request: RequestId) {
        self.send(EngineCommand::CancelFetch { request });
    }

    /// Emits `RevealTick` every `period`, starting one period from now.
    pub fn start_reveal(&self, reveal: RevealId, period: Duration) {
        self.send(EngineCommand::StartReveal { reveal, period });
    }

    pub fn stop_reveal(&self, reveal: RevealId) {
        self.send(EngineCommand::StopReveal { reveal });
    }

    pub fn expire_notice(&self, notice: NoticeId, after: Duration) {
        self.send(EngineCommand::ExpireNotice { notice, after });
    }

    fn send(&self, command: EngineCommand) {
        if self.cmd_tx.send(command).is_err() {
            chat_warn!("engine thread is gone; command dropped");
        }
    }
}

fn dispatch(
    runtime: Runtime,
    fetcher: Arc<dyn AnswerFetcher>,
    cmd_rx: mpsc::Receiver<EngineCommand>,
    event_tx: mpsc::Sender<EngineEvent>,
) {
    let mut fetches: HashMap<RequestId, CancellationToken> = HashMap::new();
    let mut reveals: HashMap<RevealId, CancellationToken> = HashMap::new();

    while let Ok(command) = cmd_rx.recv() {
        // Finished fetches cancel their own token.
        fetches.retain(|_, token| !token.is_cancelled());

        match command {
            EngineCommand::Fetch { request, query } => {
                chat_logging::with_request_context(request, || {
                    chat_info!("fetching answer ({} chars)", query.len());
                });
                let token = CancellationToken::new();
                fetches.insert(request, token.clone());
                runtime.spawn(run_fetch(
                    fetcher.clone(),
                    request,
                    query,
                    token,
                    event_tx.clone(),
                ));
            }
            EngineCommand::CancelFetch { request } => match fetches.remove(&request) {
                Some(token) => token.cancel(),
                None => chat_logging::with_request_context(request, || {
                    chat_debug!("cancel arrived after the request finished");
                }),
            },
            EngineCommand::StartReveal { reveal, period } => {
                let token = CancellationToken::new();
                if let Some(previous) = reveals.insert(reveal, token.clone()) {
                    previous.cancel();
                }
                runtime.spawn(run_ticker(reveal, period, token, event_tx.clone()));
            }
            EngineCommand::StopReveal { reveal } => {
                if let Some(token) = reveals.remove(&reveal) {
                    token.cancel();
                }
            }
            EngineCommand::ExpireNotice { notice, after } => {
                let event_tx = event_tx.clone();
                runtime.spawn(async move {
                    tokio::time::sleep(after).await;
                    let _ = event_tx.send(EngineEvent::NoticeExpired { notice });
                });
            }
        }
    }

    for token in fetches.values().chain(reveals.values()) {
        token.cancel();
    }
    runtime.shutdown_timeout(Duration::from_millis(200));
    chat_debug!("engine thread stopped");
}

async fn run_fetch(
    fetcher: Arc<dyn AnswerFetcher>,
    request: RequestId,
    query: String,
    token: CancellationToken,
    event_tx: mpsc::Sender<EngineEvent>,
) {
    let outcome = tokio::select! {
        biased;
        _ = token.cancelled() => None,
        result = fetcher.fetch_answer(&query) => Some(result),
    };
    token.cancel();

    let event = chat_logging::with_request_context(request, || match outcome {
        None => {
            chat_info!("aborted");
            EngineEvent::FetchAborted { request }
        }
        Some(result) => {
            match &result {
                Ok(answer) => chat_info!("answered ({} chars)", answer.len()),
                Err(err) => chat_warn!("failed: {}", err),
            }
            EngineEvent::AnswerReady { request, result }
        }
    });
    let _ = event_tx.send(event);
}

async fn run_ticker(
    reveal: RevealId,
    period: Duration,
    token: CancellationToken,
    event_tx: mpsc::Sender<EngineEvent>,
) {
    let period = tick_period(period);
    let mut ticks = interval_at(Instant::now() + period, period);
    ticks.set_missed_tick_behavior(MissedTickBehavior::Delay);
    loop {
        tokio::select! {
            biased;
            _ = token.cancelled() => break,
            _ = ticks.tick() => {
                chat_trace!("reveal {} tick", reveal);
                if event_tx.send(EngineEvent::RevealTick { reveal }).is_err() {
                    break;
                }
            }
        }
    }
}

/// Bounds a configured reveal period so the ticker deadline stays representable.
fn tick_period(requested: Duration) -> Duration {
    requested.clamp(MIN_REVEAL_PERIOD, MAX_REVEAL_PERIOD)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tick_period_is_clamped() {
        assert_eq!(tick_period(Duration::ZERO), MIN_REVEAL_PERIOD);
        assert_eq!(tick_period(Duration::from_millis(200)), Duration::from_millis(200));
        assert_eq!(tick_period(Duration::MAX), MAX_REVEAL_PERIOD);
    }

    #[test]
    fn huge_period_keeps_deadline_representable() {
        let period = tick_period(Duration::from_millis(u64::MAX));
        assert!(Instant::now().checked_add(period).is_some());
    }
}

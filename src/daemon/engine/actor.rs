use std::time::Duration;

use tokio::sync::{mpsc, oneshot};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

use crate::daemon::protocol::{Message, Response};

use super::{Engine, EngineError};

const INBOX_CAPACITY: usize = 32;

pub struct EngineCommand {
    message: Message,
    reply: oneshot::Sender<Response>,
}

enum Step {
    Stop,
    Command(Option<EngineCommand>),
    Tick,
}

/// Runs the [Engine] on a single task. Requests, environment events and timer ticks are handled
/// strictly one after another, so state is never mutated concurrently.
pub struct EngineActor {
    engine: Engine,
    receiver: mpsc::Receiver<EngineCommand>,
    tick_interval: Duration,
    shutdown: CancellationToken,
}

impl EngineActor {
    pub fn new(
        engine: Engine,
        tick_interval: Duration,
        shutdown: CancellationToken,
    ) -> (Self, EngineHandle) {
        let (sender, receiver) = mpsc::channel(INBOX_CAPACITY);
        let actor = Self {
            engine,
            receiver,
            tick_interval,
            shutdown,
        };
        (actor, EngineHandle { sender })
    }

    /// Executes the engine event loop until shutdown or until every handle is dropped.
    pub async fn run(mut self) {
        info!("Engine started, ticking every {:?}", self.tick_interval);
        let mut next_tick = self.engine.clock().instant() + self.tick_interval;
        loop {
            let step = tokio::select! {
                _ = self.shutdown.cancelled() => Step::Stop,
                command = self.receiver.recv() => Step::Command(command),
                _ = self.engine.clock().sleep_until(next_tick) => Step::Tick,
            };

            match step {
                Step::Stop | Step::Command(None) => break,
                Step::Command(Some(EngineCommand { message, reply })) => {
                    debug!("Handling {message:?}");
                    let response = self.engine.handle(message).await;
                    // The requester may have given up waiting, which is fine.
                    let _ = reply.send(response);
                }
                Step::Tick => {
                    match self.engine.tick().await {
                        Ok(outcome) => debug!("Tick finished {outcome:?}"),
                        Err(e) => error!("Tick failed {e:?}"),
                    }
                    next_tick += self.tick_interval;
                    // Ticks that were missed while busy or suspended collapse into one. The
                    // elapsed time is still accounted for by the next tick.
                    let now = self.engine.clock().instant();
                    if next_tick <= now {
                        next_tick = now + self.tick_interval;
                    }
                }
            }
        }
        info!("Engine stopped");
    }
}

/// Cheap to clone entry point into a running [EngineActor].
#[derive(Clone)]
pub struct EngineHandle {
    sender: mpsc::Sender<EngineCommand>,
}

impl EngineHandle {
    /// Sends a message and waits until the engine has fully processed it.
    pub async fn send(&self, message: Message) -> Result<Response, EngineError> {
        let (reply, response) = oneshot::channel();
        self.sender
            .send(EngineCommand { message, reply })
            .await
            .map_err(|_| EngineError::Closed)?;
        response.await.map_err(|_| EngineError::Closed)
    }
}

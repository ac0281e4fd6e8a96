use std::marker::PhantomData;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender, TryRecvError};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use proto::{Frame, FromDecision, ToDecision};
use thiserror::Error;
use tracing::{error, info, warn};

use crate::{DecisionError, DecisionProcess, Worker};

#[derive(Debug, Error)]
pub enum ChannelError {
    #[error("the other context has gone away")]
    Disconnected,
    #[error("failed to encode frame: {0}")]
    Encode(#[from] serde_json::Error),
}

/// One side of a duplex frame channel. FIFO in each direction.
pub struct Endpoint<Out, In> {
    tx: Sender<String>,
    rx: Receiver<String>,
    _frames: PhantomData<fn(Out) -> In>,
}

/// Held by the simulation context
pub type SimulationEnd = Endpoint<ToDecision, FromDecision>;
/// Held by the decision context
pub type DecisionEnd = Endpoint<FromDecision, ToDecision>;

/// Create a connected pair of endpoints
pub fn duplex() -> (SimulationEnd, DecisionEnd) {
    let (to_decision_tx, to_decision_rx) = mpsc::channel();
    let (from_decision_tx, from_decision_rx) = mpsc::channel();
    (
        Endpoint {
            tx: to_decision_tx,
            rx: from_decision_rx,
            _frames: PhantomData,
        },
        Endpoint {
            tx: from_decision_tx,
            rx: to_decision_rx,
            _frames: PhantomData,
        },
    )
}

impl<Out: Frame, In: Frame> Endpoint<Out, In> {
    /// Non-blocking send
    pub fn send(&self, msg: &Out) -> Result<(), ChannelError> {
        let text = msg.to_json()?;
        self.send_raw(text)
    }

    /// Push an already-encoded frame
    pub fn send_raw(&self, text: String) -> Result<(), ChannelError> {
        self.tx.send(text).map_err(|_| ChannelError::Disconnected)
    }

    /// Next well-formed frame if one is waiting
    pub fn try_recv(&self) -> Result<Option<In>, ChannelError> {
        loop {
            match self.rx.try_recv() {
                Ok(text) => {
                    if let Some(msg) = decode(&text) {
                        return Ok(Some(msg));
                    }
                }
                Err(TryRecvError::Empty) => return Ok(None),
                Err(TryRecvError::Disconnected) => return Err(ChannelError::Disconnected),
            }
        }
    }

    /// Block until a well-formed frame arrives
    pub fn recv(&self) -> Result<In, ChannelError> {
        loop {
            let text = self.rx.recv().map_err(|_| ChannelError::Disconnected)?;
            if let Some(msg) = decode(&text) {
                return Ok(msg);
            }
        }
    }

    pub fn recv_timeout(&self, timeout: Duration) -> Result<Option<In>, ChannelError> {
        loop {
            match self.rx.recv_timeout(timeout) {
                Ok(text) => {
                    if let Some(msg) = decode(&text) {
                        return Ok(Some(msg));
                    }
                }
                Err(RecvTimeoutError::Timeout) => return Ok(None),
                Err(RecvTimeoutError::Disconnected) => return Err(ChannelError::Disconnected),
            }
        }
    }
}

/// Unknown or malformed frames are logged and dropped, never fatal
fn decode<In: Frame>(text: &str) -> Option<In> {
    match In::from_json(text) {
        Ok(msg) => Some(msg),
        Err(e) => {
            let head: String = text.chars().take(80).collect();
            warn!(error = %e, frame = %head, "ignoring malformed frame");
            None
        }
    }
}

/// What the game loop needs from the decision context
pub trait DecisionLink {
    fn send(&mut self, msg: &ToDecision) -> Result<(), ChannelError>;
    fn try_recv(&mut self) -> Result<Option<FromDecision>, ChannelError>;
}

/// Simulation-side handle on a decision worker thread
pub struct DecisionChannel {
    end: SimulationEnd,
    worker: JoinHandle<()>,
}

impl DecisionChannel {
    /// Start a worker thread and build the decision process inside it
    ///
    /// If `init` fails the worker exits and the channel reports
    /// `Disconnected`; the simulation itself keeps running.
    pub fn spawn<P, F>(init: F) -> std::io::Result<Self>
    where
        P: DecisionProcess,
        F: FnOnce() -> Result<P, DecisionError> + Send + 'static,
    {
        let (sim, dec) = duplex();
        let handle = thread::Builder::new()
            .name("decision-worker".into())
            .spawn(move || match init() {
                Ok(process) => Worker::new(process, dec).run(),
                Err(e) => error!(error = %e, "decision process unavailable"),
            })?;
        info!("decision worker spawned");
        Ok(Self {
            end: sim,
            worker: handle,
        })
    }

    pub fn endpoint(&self) -> &SimulationEnd {
        &self.end
    }

    /// Close the channel and wait for the worker to drain and exit
    pub fn shutdown(self) {
        let Self { end, worker } = self;
        drop(end);
        if worker.join().is_err() {
            error!("decision worker panicked");
        }
    }
}

impl DecisionLink for DecisionChannel {
    fn send(&mut self, msg: &ToDecision) -> Result<(), ChannelError> {
        self.end.send(msg)
    }

    fn try_recv(&mut self) -> Result<Option<FromDecision>, ChannelError> {
        self.end.try_recv()
    }
}

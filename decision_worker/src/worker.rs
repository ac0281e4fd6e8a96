use std::collections::VecDeque;

use game_core::EpisodeOutcome;
use proto::{FromDecision, ToDecision};
use tracing::{debug, info, warn};

use crate::{ChannelError, DecisionEnd, DecisionProcess, KeyValue};

/// Message loop of the decision context
///
/// Handles one inbound message at a time. While a hook waits for a storage
/// reply, everything else that arrives is queued and handled afterwards in
/// arrival order.
pub struct Worker<P> {
    process: P,
    end: DecisionEnd,
    backlog: VecDeque<ToDecision>,
}

impl<P: DecisionProcess> Worker<P> {
    pub fn new(process: P, end: DecisionEnd) -> Self {
        Self {
            process,
            end,
            backlog: VecDeque::new(),
        }
    }

    /// Run until the simulation drops its end of the channel
    pub fn run(mut self) {
        info!("decision worker started");
        {
            let Self {
                process,
                end,
                backlog,
            } = &mut self;
            let mut store = StorageClient { end, backlog };
            process.on_start(&mut store);
        }

        loop {
            let msg = match self.next() {
                Ok(msg) => msg,
                Err(_) => break,
            };
            if let Err(e) = self.handle(msg) {
                debug!(error = %e, "reply failed");
                break;
            }
        }
        info!("decision worker stopped");
    }

    fn next(&mut self) -> Result<ToDecision, ChannelError> {
        match self.backlog.pop_front() {
            Some(msg) => Ok(msg),
            None => self.end.recv(),
        }
    }

    pub fn handle(&mut self, msg: ToDecision) -> Result<(), ChannelError> {
        match msg {
            ToDecision::Mode { data } => {
                debug!(mode = %data, "mode changed");
                self.process.on_mode(data);
            }
            ToDecision::State {
                data,
                player,
                ticket,
            } => {
                let directive = self.process.decide(&data, player);
                self.end
                    .send(&FromDecision::directive(player, directive, ticket))?;
            }
            ToDecision::End { data } => {
                let outcome = EpisodeOutcome::from_right_won(data);
                let Self {
                    process,
                    end,
                    backlog,
                } = self;
                let mut store = StorageClient { end, backlog };
                process.on_episode_end(outcome, &mut store);
            }
            ToDecision::Ping => {
                self.end.send(&FromDecision::Pong)?;
            }
            ToDecision::StorageValue { .. } => {
                warn!("storage reply with no read outstanding");
            }
        }
        Ok(())
    }
}

/// Storage as seen from the decision context
struct StorageClient<'a> {
    end: &'a DecisionEnd,
    backlog: &'a mut VecDeque<ToDecision>,
}

impl KeyValue for StorageClient<'_> {
    fn get(&mut self, key: &str) -> Result<Option<String>, ChannelError> {
        self.end.send(&FromDecision::GetData {
            key: key.to_string(),
        })?;
        loop {
            match self.end.recv()? {
                ToDecision::StorageValue { data } => return Ok(data),
                other => self.backlog.push_back(other),
            }
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), ChannelError> {
        self.end.send(&FromDecision::SetData {
            key: key.to_string(),
            value: value.to_string(),
        })
    }
}

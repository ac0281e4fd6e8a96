use std::collections::VecDeque;

use game_core::{BoardGrid, Directive, EpisodeOutcome, Mode, Side};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::{DecisionProcess, KeyValue};

/// Storage key of the persisted episode history
pub const HISTORY_KEY: &str = "state";

/// One directive issued during an episode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Move {
    pub player: u8,
    /// 0 = hold, 1 = up, 2 = down
    pub directive: u8,
}

impl Move {
    fn new(side: Side, directive: Directive) -> Self {
        let code = match directive {
            Directive::Hold => 0,
            Directive::MoveUp => 1,
            Directive::MoveDown => 2,
        };
        Self {
            player: side.player_number(),
            directive: code,
        }
    }
}

/// A finished episode
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Sequence {
    pub moves: Vec<Move>,
    /// true when player 2 won the point
    pub outcome: bool,
}

/// Everything persisted under [`HISTORY_KEY`]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct History {
    pub episodes: u64,
    pub right_wins: u64,
    pub sequences: VecDeque<Sequence>,
}

/// Records every directive of the running episode and persists finished
/// episodes through the storage proxy
pub struct Recorder<P> {
    inner: P,
    current: Vec<Move>,
    history: History,
    capacity: usize,
}

impl<P: DecisionProcess> Recorder<P> {
    pub const DEFAULT_CAPACITY: usize = 64;

    pub fn new(inner: P) -> Self {
        Self::with_capacity(inner, Self::DEFAULT_CAPACITY)
    }

    pub fn with_capacity(inner: P, capacity: usize) -> Self {
        Self {
            inner,
            current: Vec::new(),
            history: History::default(),
            capacity: capacity.max(1),
        }
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn current_len(&self) -> usize {
        self.current.len()
    }

    fn load(&mut self, store: &mut dyn KeyValue) {
        match store.get(HISTORY_KEY) {
            Ok(Some(text)) => match serde_json::from_str(&text) {
                Ok(history) => self.history = history,
                Err(e) => warn!(error = %e, "stored history unreadable, starting fresh"),
            },
            Ok(None) => {}
            Err(e) => warn!(error = %e, "could not load history"),
        }
    }

    fn persist(&self, store: &mut dyn KeyValue) {
        match serde_json::to_string(&self.history) {
            Ok(text) => {
                if let Err(e) = store.set(HISTORY_KEY, &text) {
                    warn!(error = %e, "could not persist history");
                }
            }
            Err(e) => warn!(error = %e, "could not encode history"),
        }
    }
}

impl<P: DecisionProcess> DecisionProcess for Recorder<P> {
    fn decide(&mut self, board: &BoardGrid, side: Side) -> Directive {
        let directive = self.inner.decide(board, side);
        self.current.push(Move::new(side, directive));
        directive
    }

    fn on_start(&mut self, store: &mut dyn KeyValue) {
        self.load(store);
        info!(episodes = self.history.episodes, "history loaded");
        self.inner.on_start(store);
    }

    fn on_mode(&mut self, mode: Mode) {
        // a partial episode spanning two modes is not worth keeping
        self.current.clear();
        self.inner.on_mode(mode);
    }

    fn on_episode_end(&mut self, outcome: EpisodeOutcome, store: &mut dyn KeyValue) {
        self.history.episodes += 1;
        if outcome.right_won() {
            self.history.right_wins += 1;
        }
        self.history.sequences.push_back(Sequence {
            moves: std::mem::take(&mut self.current),
            outcome: outcome.right_won(),
        });
        while self.history.sequences.len() > self.capacity {
            self.history.sequences.pop_front();
        }
        self.persist(store);
        info!(
            episodes = self.history.episodes,
            right_wins = self.history.right_wins,
            "episode recorded"
        );
        self.inner.on_episode_end(outcome, store);
    }
}

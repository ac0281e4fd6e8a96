use std::collections::HashMap;

use game_core::{BoardGrid, Directive, EpisodeOutcome, Mode, Side};
use thiserror::Error;

use crate::ChannelError;

#[derive(Debug, Error)]
pub enum DecisionError {
    #[error("decision process failed to initialise: {0}")]
    Init(String),
    #[error(transparent)]
    Channel(#[from] ChannelError),
}

/// Key-value access from the decision context, proxied by the simulation
pub trait KeyValue {
    fn get(&mut self, key: &str) -> Result<Option<String>, ChannelError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), ChannelError>;
}

impl KeyValue for HashMap<String, String> {
    fn get(&mut self, key: &str) -> Result<Option<String>, ChannelError> {
        Ok(HashMap::get(self, key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), ChannelError> {
        self.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// The opaque capability behind the decision context: given a board,
/// return a directive.
///
/// Boards arrive oriented for the paddle being asked about: that paddle is
/// always in the leftmost column.
pub trait DecisionProcess {
    fn decide(&mut self, board: &BoardGrid, side: Side) -> Directive;

    /// Called once on the worker thread before any message is handled
    fn on_start(&mut self, _store: &mut dyn KeyValue) {}

    fn on_mode(&mut self, _mode: Mode) {}

    fn on_episode_end(&mut self, _outcome: EpisodeOutcome, _store: &mut dyn KeyValue) {}
}

impl<P: DecisionProcess + ?Sized> DecisionProcess for Box<P> {
    fn decide(&mut self, board: &BoardGrid, side: Side) -> Directive {
        (**self).decide(board, side)
    }

    fn on_start(&mut self, store: &mut dyn KeyValue) {
        (**self).on_start(store)
    }

    fn on_mode(&mut self, mode: Mode) {
        (**self).on_mode(mode)
    }

    fn on_episode_end(&mut self, outcome: EpisodeOutcome, store: &mut dyn KeyValue) {
        (**self).on_episode_end(outcome, store)
    }
}

/// Board-reading heuristic: keep the paddle's center level with the ball
///
/// Strategy:
/// 1. Own paddle is the occupied run in column 0.
/// 2. The ball is whatever is occupied away from both paddle columns.
/// 3. Move toward the ball row unless it is within the dead zone.
#[derive(Debug, Clone)]
pub struct Tracker {
    dead_zone: f32,
}

impl Tracker {
    /// Columns at each edge that belong to paddles
    const EDGE: usize = 2;

    pub fn new() -> Self {
        Self { dead_zone: 1.0 }
    }

    pub fn with_dead_zone(dead_zone: f32) -> Self {
        Self { dead_zone }
    }
}

impl Default for Tracker {
    fn default() -> Self {
        Self::new()
    }
}

impl DecisionProcess for Tracker {
    fn decide(&mut self, board: &BoardGrid, _side: Side) -> Directive {
        let n = board.size();
        if n <= Self::EDGE * 2 {
            return Directive::Hold;
        }

        let mut paddle = (0..n).filter(|row| board.get(*row, 0));
        let Some(top) = paddle.next() else {
            return Directive::Hold;
        };
        let bottom = paddle.last().unwrap_or(top);
        let paddle_center = (top + bottom) as f32 / 2.0;

        let (sum, count) = board
            .occupied_cells()
            .filter(|(_, col)| *col >= Self::EDGE && *col < n - Self::EDGE)
            .fold((0usize, 0usize), |(sum, count), (row, _)| (sum + row, count + 1));
        if count == 0 {
            return Directive::Hold;
        }
        let ball_row = sum as f32 / count as f32;

        let diff = ball_row - paddle_center;
        if diff < -self.dead_zone {
            Directive::MoveUp
        } else if diff > self.dead_zone {
            Directive::MoveDown
        } else {
            Directive::Hold
        }
    }
}

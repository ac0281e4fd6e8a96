use crate::{Ball, Paddle, Score, Side};

/// Snapshot of everything the board encoder and the game loop read
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GameState {
    pub ball: Ball,
    pub paddle_left: Paddle,
    pub paddle_right: Paddle,
    pub score: Score,
}

impl GameState {
    pub fn paddle(&self, side: Side) -> &Paddle {
        match side {
            Side::Left => &self.paddle_left,
            Side::Right => &self.paddle_right,
        }
    }
}

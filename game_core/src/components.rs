use glam::Vec2;

use crate::{Config, GameRng};

/// Which paddle. Left is player 1, right is player 2.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    pub const BOTH: [Side; 2] = [Side::Left, Side::Right];

    /// Player number used on the wire (1 or 2)
    pub fn player_number(self) -> u8 {
        match self {
            Side::Left => 1,
            Side::Right => 2,
        }
    }

    pub fn from_player_number(n: u8) -> Option<Self> {
        match n {
            1 => Some(Side::Left),
            2 => Some(Side::Right),
            _ => None,
        }
    }

    pub fn opponent(self) -> Self {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }

    pub fn index(self) -> usize {
        match self {
            Side::Left => 0,
            Side::Right => 1,
        }
    }
}

/// Paddle component - represents a player's paddle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Paddle {
    pub side: Side,
    pub y: f32, // top edge, clamped to arena
}

impl Paddle {
    pub fn new(side: Side, y: f32) -> Self {
        Self { side, y }
    }

    pub fn center_y(&self, config: &Config) -> f32 {
        self.y + config.paddle_height / 2.0
    }

    /// Vertical extent test against a point (inclusive)
    pub fn spans(&self, y: f32, config: &Config) -> bool {
        y >= self.y && y <= self.y + config.paddle_height
    }
}

/// Ball component - the pong ball
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ball {
    pub pos: Vec2,
    pub vel: Vec2,
}

impl Ball {
    pub fn new(pos: Vec2, vel: Vec2) -> Self {
        Self { pos, vel }
    }

    /// Reset ball to center and serve toward a random side
    pub fn reset(&mut self, config: &Config, rng: &mut GameRng) {
        use rand::Rng;

        self.pos = config.arena_center();
        let sx = if rng.0.gen_bool(0.5) { 1.0 } else { -1.0 };
        let sy = if rng.0.gen_bool(0.5) { 1.0 } else { -1.0 };
        self.vel = Vec2::new(sx * config.ball_speed_x, sy * config.ball_speed_y);
    }
}

/// A single paddle-control instruction for one tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Directive {
    MoveUp,
    MoveDown,
    #[default]
    Hold,
}

impl Directive {
    /// Direction of travel along y: -1 = up, 0 = stop, 1 = down
    pub fn dir(self) -> f32 {
        match self {
            Directive::MoveUp => -1.0,
            Directive::MoveDown => 1.0,
            Directive::Hold => 0.0,
        }
    }

    pub fn is_hold(&self) -> bool {
        matches!(self, Directive::Hold)
    }
}

/// Emitted once per scoring event while autonomous control is active
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EpisodeOutcome {
    pub winner: Side,
}

impl EpisodeOutcome {
    pub fn new(winner: Side) -> Self {
        Self { winner }
    }

    /// Wire form: true when player 2 (the right paddle) won the point
    pub fn right_won(&self) -> bool {
        self.winner == Side::Right
    }

    pub fn from_right_won(right_won: bool) -> Self {
        Self::new(if right_won { Side::Right } else { Side::Left })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_side_player_numbers() {
        for side in Side::BOTH {
            assert_eq!(Side::from_player_number(side.player_number()), Some(side));
        }
        assert_eq!(Side::from_player_number(0), None);
        assert_eq!(Side::from_player_number(3), None);
        assert_eq!(Side::Left.opponent(), Side::Right);
    }

    #[test]
    fn test_ball_reset_serves_from_center() {
        let config = Config::new();
        let mut rng = GameRng::new(7);
        let mut ball = Ball::new(Vec2::new(3.0, 4.0), Vec2::ZERO);
        ball.reset(&config, &mut rng);

        assert_eq!(ball.pos, config.arena_center());
        assert_eq!(ball.vel.x.abs(), config.ball_speed_x);
        assert_eq!(ball.vel.y.abs(), config.ball_speed_y);
    }

    #[test]
    fn test_episode_outcome_wire_flag() {
        assert!(EpisodeOutcome::new(Side::Right).right_won());
        assert!(!EpisodeOutcome::new(Side::Left).right_won());
        assert_eq!(EpisodeOutcome::from_right_won(false).winner, Side::Left);
    }
}

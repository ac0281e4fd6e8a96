use glam::Vec2;

use crate::{Ball, Config, Paddle};

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb {
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    pub fn from_center_size(center: Vec2, size: Vec2) -> Self {
        let half = size * 0.5;
        Self {
            min: center - half,
            max: center + half,
        }
    }

    pub fn of_paddle(paddle: &Paddle, config: &Config) -> Self {
        let min = Vec2::new(config.paddle_x(paddle.side), paddle.y);
        Self::new(
            min,
            min + Vec2::new(config.paddle_width, config.paddle_height),
        )
    }

    /// The ball's bounding circle approximated as a square
    pub fn of_ball(ball: &Ball, config: &Config) -> Self {
        Self::from_center_size(ball.pos, Vec2::splat(config.ball_radius * 2.0))
    }

    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= self.min.x
            && point.x <= self.max.x
            && point.y >= self.min.y
            && point.y <= self.max.y
    }
}

use crate::{Mode, Params, Side};
use thiserror::Error;

/// Rejected configuration. Fatal to startup only.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("arena must have positive finite size, got {width}x{height}")]
    Arena { width: f32, height: f32 },
    #[error("paddle {width}x{height} does not fit the arena")]
    Paddle { width: f32, height: f32 },
    #[error("ball radius must be positive and finite, got {0}")]
    BallRadius(f32),
    #[error("tick dt must be positive and finite, got {0}")]
    TickDt(f32),
    #[error("grid size must be at least 1")]
    EmptyGrid,
    #[error("downsample factor must be at least 1")]
    ZeroDownsample,
    #[error("downsample factor {factor} does not divide grid size {grid_size}")]
    DownsampleMismatch { grid_size: usize, factor: usize },
}

/// Game configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub arena_width: f32,
    pub arena_height: f32,
    pub paddle_width: f32,
    pub paddle_height: f32,
    pub paddle_step: f32,
    pub ball_radius: f32,
    pub ball_speed_x: f32,
    pub ball_speed_y: f32,
    pub reflection_factor: f32,
    pub grid_size: usize,
    /// 1 disables downsampling.
    pub downsample_factor: usize,
    pub tick_dt: f32,
    pub initial_mode: Mode,
    pub rng_seed: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            arena_width: Params::ARENA_WIDTH,
            arena_height: Params::ARENA_HEIGHT,
            paddle_width: Params::PADDLE_WIDTH,
            paddle_height: Params::PADDLE_HEIGHT,
            paddle_step: Params::PADDLE_STEP,
            ball_radius: Params::BALL_RADIUS,
            ball_speed_x: Params::BALL_SPEED_X,
            ball_speed_y: Params::BALL_SPEED_Y,
            reflection_factor: Params::REFLECTION_FACTOR,
            grid_size: Params::GRID_SIZE,
            downsample_factor: Params::DOWNSAMPLE_FACTOR,
            tick_dt: Params::TICK_DT,
            initial_mode: Mode::default(),
            rng_seed: Params::RNG_SEED,
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = |v: f32| v.is_finite() && v > 0.0;

        if !positive(self.arena_width) || !positive(self.arena_height) {
            return Err(ConfigError::Arena {
                width: self.arena_width,
                height: self.arena_height,
            });
        }
        if !positive(self.paddle_width)
            || !positive(self.paddle_height)
            || self.paddle_height > self.arena_height
            || self.paddle_width * 2.0 > self.arena_width
        {
            return Err(ConfigError::Paddle {
                width: self.paddle_width,
                height: self.paddle_height,
            });
        }
        if !positive(self.ball_radius) {
            return Err(ConfigError::BallRadius(self.ball_radius));
        }
        if !positive(self.tick_dt) {
            return Err(ConfigError::TickDt(self.tick_dt));
        }
        if self.grid_size == 0 {
            return Err(ConfigError::EmptyGrid);
        }
        if self.downsample_factor == 0 {
            return Err(ConfigError::ZeroDownsample);
        }
        if self.grid_size % self.downsample_factor != 0 {
            return Err(ConfigError::DownsampleMismatch {
                grid_size: self.grid_size,
                factor: self.downsample_factor,
            });
        }
        Ok(())
    }

    /// Edge length of the board handed to the decision process
    pub fn board_size(&self) -> usize {
        self.grid_size / self.downsample_factor.max(1)
    }

    /// Get X position (left edge) for a paddle
    pub fn paddle_x(&self, side: Side) -> f32 {
        match side {
            Side::Left => 0.0,
            Side::Right => self.arena_width - self.paddle_width,
        }
    }

    /// Y position (top edge) of a centered paddle
    pub fn paddle_home_y(&self) -> f32 {
        (self.arena_height - self.paddle_height) / 2.0
    }

    /// Clamp paddle top edge to arena bounds
    pub fn clamp_paddle_y(&self, y: f32) -> f32 {
        y.clamp(0.0, self.arena_height - self.paddle_height)
    }

    pub fn arena_center(&self) -> glam::Vec2 {
        glam::Vec2::new(self.arena_width / 2.0, self.arena_height / 2.0)
    }
}

use glam::Vec2;
use hecs::World;
use tracing::debug;

use crate::systems::*;
use crate::{
    create_ball, create_paddle, step, Ball, Config, ConfigError, Directive, Events, GameRng,
    GameState, Paddle, Score, Side, Time,
};

/// Owns the single mutable game instance: ball, paddles and score
pub struct PhysicsEngine {
    world: World,
    time: Time,
    config: Config,
    score: Score,
    events: Events,
    rng: GameRng,
}

impl PhysicsEngine {
    pub fn new(config: Config) -> Result<Self, ConfigError> {
        config.validate()?;

        let mut world = World::new();
        let mut rng = GameRng::new(config.rng_seed);

        let home_y = config.paddle_home_y();
        create_paddle(&mut world, Side::Left, home_y);
        create_paddle(&mut world, Side::Right, home_y);

        let mut ball = Ball::new(Vec2::ZERO, Vec2::ZERO);
        ball.reset(&config, &mut rng);
        create_ball(&mut world, ball.pos, ball.vel);

        Ok(Self {
            world,
            time: Time::new(config.tick_dt, 0.0),
            config,
            score: Score::new(),
            events: Events::new(),
            rng,
        })
    }

    /// Integrate one step of `dt` seconds and resolve walls, paddles and scoring
    pub fn advance(&mut self, dt: f32) -> &Events {
        self.time.dt = dt;
        step(
            &mut self.world,
            &mut self.time,
            &self.config,
            &mut self.score,
            &mut self.events,
            &mut self.rng,
        );
        &self.events
    }

    pub fn apply_directive(&mut self, side: Side, directive: Directive) {
        apply_directive(&mut self.world, side, directive, &self.config);
    }

    /// Recenter ball (fresh serve) and paddles. Score is kept.
    pub fn reset(&mut self) {
        for (_entity, ball) in self.world.query_mut::<&mut Ball>() {
            ball.reset(&self.config, &mut self.rng);
        }
        center_paddles(&mut self.world, &self.config);
        self.events.clear();
        debug!("ball and paddles reset");
    }

    /// Full-game restart, the only way a score goes back to zero
    pub fn restart(&mut self) {
        self.reset();
        self.score = Score::new();
        debug!("game restarted");
    }

    /// Place the ball explicitly (scripted serves and scenarios)
    pub fn place_ball(&mut self, pos: Vec2, vel: Vec2) {
        for (_entity, ball) in self.world.query_mut::<&mut Ball>() {
            ball.pos = pos;
            ball.vel = vel;
        }
    }

    pub fn place_paddle(&mut self, side: Side, y: f32) {
        let y = self.config.clamp_paddle_y(y);
        for (_entity, paddle) in self.world.query_mut::<&mut Paddle>() {
            if paddle.side == side {
                paddle.y = y;
            }
        }
    }

    pub fn snapshot(&self) -> GameState {
        let ball = self
            .world
            .query::<&Ball>()
            .iter()
            .next()
            .map(|(_e, ball)| *ball)
            .unwrap_or_else(|| Ball::new(self.config.arena_center(), Vec2::ZERO));

        let home = self.config.paddle_home_y();
        let mut paddle_left = Paddle::new(Side::Left, home);
        let mut paddle_right = Paddle::new(Side::Right, home);
        for (_e, paddle) in self.world.query::<&Paddle>().iter() {
            match paddle.side {
                Side::Left => paddle_left = *paddle,
                Side::Right => paddle_right = *paddle,
            }
        }

        GameState {
            ball,
            paddle_left,
            paddle_right,
            score: self.score,
        }
    }

    pub fn score(&self) -> Score {
        self.score
    }

    pub fn config(&self) -> &Config {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine() -> PhysicsEngine {
        PhysicsEngine::new(Config::new()).expect("default config is valid")
    }

    #[test]
    fn test_new_engine_serves_from_center() {
        let engine = engine();
        let state = engine.snapshot();
        assert_eq!(state.ball.pos, engine.config().arena_center());
        assert_eq!(state.paddle_left.y, engine.config().paddle_home_y());
        assert_eq!(state.score, Score::new());
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = Config {
            grid_size: 30,
            downsample_factor: 4,
            ..Config::default()
        };
        assert!(PhysicsEngine::new(config).is_err());
    }

    #[test]
    fn test_advance_uses_fixed_displacement() {
        let mut engine = engine();
        engine.place_ball(Vec2::new(100.0, 100.0), Vec2::new(50.0, 25.0));
        engine.advance(0.05);
        let pos = engine.snapshot().ball.pos;
        assert!((pos.x - 102.5).abs() < 1e-4);
        assert!((pos.y - 101.25).abs() < 1e-4);
    }

    #[test]
    fn test_reset_keeps_score() {
        let mut engine = engine();
        engine.place_ball(Vec2::new(1.5, 190.0), Vec2::new(-50.0, 0.0));
        engine.place_paddle(Side::Left, 0.0);
        let events = engine.advance(0.05).clone();
        assert_eq!(events.scorer(), Some(Side::Right));

        engine.place_paddle(Side::Right, 7.0);
        engine.reset();

        let state = engine.snapshot();
        assert_eq!(state.score.right, 1);
        assert_eq!(state.paddle_right.y, engine.config().paddle_home_y());
        assert_eq!(state.ball.pos, engine.config().arena_center());
    }

    #[test]
    fn test_restart_zeroes_score() {
        let mut engine = engine();
        engine.place_ball(Vec2::new(198.5, 10.0), Vec2::new(50.0, 0.0));
        engine.place_paddle(Side::Right, 150.0);
        engine.advance(0.05);
        assert_eq!(engine.score().left, 1);

        engine.restart();
        assert_eq!(engine.score(), Score::new());
    }

    #[test]
    fn test_apply_directive_respects_bounds() {
        let mut engine = engine();
        engine.place_paddle(Side::Left, 1.0);
        engine.apply_directive(Side::Left, Directive::MoveUp);
        assert_eq!(engine.snapshot().paddle_left.y, 0.0);
    }
}

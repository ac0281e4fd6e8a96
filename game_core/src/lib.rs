pub mod aabb;
pub mod board;
pub mod components;
pub mod config;
pub mod engine;
pub mod mode;
pub mod params;
pub mod resources;
pub mod state;
pub mod systems;

pub use aabb::*;
pub use board::*;
pub use components::*;
pub use config::*;
pub use engine::*;
pub use mode::*;
pub use params::*;
pub use resources::*;
pub use state::*;

use hecs::World;
use systems::*;

/// Run one deterministic step of the Pong simulation
///
/// A single integration per call: the caller passes the same `dt` every
/// tick so the per-tick displacement is reproducible.
pub fn step(
    world: &mut World,
    time: &mut Time,
    config: &Config,
    score: &mut Score,
    events: &mut Events,
    rng: &mut GameRng,
) {
    // Clear events at start of step
    events.clear();

    // 1. Move ball
    move_ball(world, time);

    // 2. Walls, then paddles
    check_collisions(world, config, events);

    // 3. Scoring (not on a tick where a paddle returned the ball)
    if !events.ball_hit_paddle {
        check_scoring(world, config, score, events, rng);
    }

    time.now += time.dt;
}

/// Helper to create a paddle entity
pub fn create_paddle(world: &mut World, side: Side, y: f32) -> hecs::Entity {
    world.spawn((Paddle::new(side, y),))
}

/// Helper to create the ball entity
pub fn create_ball(world: &mut World, pos: glam::Vec2, vel: glam::Vec2) -> hecs::Entity {
    world.spawn((Ball::new(pos, vel),))
}

use crate::{Ball, Config, Events, GameRng, Score, Side};
use hecs::World;
use tracing::debug;

/// Check if the ball edge left the arena past a paddle
pub fn check_scoring(
    world: &mut World,
    config: &Config,
    score: &mut Score,
    events: &mut Events,
    rng: &mut GameRng,
) {
    for (_entity, ball) in world.query_mut::<&mut Ball>() {
        let r = config.ball_radius;
        let scorer = if ball.pos.x - r <= 0.0 {
            Some(Side::Right)
        } else if ball.pos.x + r >= config.arena_width {
            Some(Side::Left)
        } else {
            None
        };

        if let Some(side) = scorer {
            score.increment(side);
            match side {
                Side::Left => events.left_scored = true,
                Side::Right => events.right_scored = true,
            }
            ball.reset(config, rng);
            debug!(
                scorer = side.player_number(),
                left = score.left,
                right = score.right,
                serve_x = ball.vel.x,
                serve_y = ball.vel.y,
                "point, ball served from center"
            );
        }
    }
}

use crate::{Ball, Config, Directive, Paddle, Side, Time};
use hecs::World;

/// Move ball based on velocity
pub fn move_ball(world: &mut World, time: &Time) {
    for (_entity, ball) in world.query_mut::<&mut Ball>() {
        ball.pos += ball.vel * time.dt;
    }
}

/// Move one paddle by a single step, clamped to the arena
pub fn apply_directive(world: &mut World, side: Side, directive: Directive, config: &Config) {
    if directive.is_hold() {
        return;
    }
    for (_entity, paddle) in world.query_mut::<&mut Paddle>() {
        if paddle.side == side {
            let y = paddle.y + directive.dir() * config.paddle_step;
            paddle.y = config.clamp_paddle_y(y);
        }
    }
}

/// Put both paddles back at mid-height
pub fn center_paddles(world: &mut World, config: &Config) {
    for (_entity, paddle) in world.query_mut::<&mut Paddle>() {
        paddle.y = config.paddle_home_y();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{create_ball, create_paddle};
    use glam::Vec2;

    fn paddle_y(world: &World, side: Side) -> f32 {
        world
            .query::<&Paddle>()
            .iter()
            .find(|(_e, p)| p.side == side)
            .map(|(_e, p)| p.y)
            .expect("paddle exists")
    }

    #[test]
    fn test_move_ball_integrates_velocity() {
        let mut world = World::new();
        create_ball(&mut world, Vec2::new(10.0, 10.0), Vec2::new(50.0, -20.0));

        move_ball(&mut world, &Time::new(0.05, 0.0));

        for (_e, ball) in world.query::<&Ball>().iter() {
            assert!((ball.pos.x - 12.5).abs() < 1e-4);
            assert!((ball.pos.y - 9.0).abs() < 1e-4);
        }
    }

    #[test]
    fn test_directive_moves_one_step() {
        let config = Config::new();
        let mut world = World::new();
        create_paddle(&mut world, Side::Left, 50.0);
        create_paddle(&mut world, Side::Right, 50.0);

        apply_directive(&mut world, Side::Left, Directive::MoveUp, &config);
        apply_directive(&mut world, Side::Right, Directive::MoveDown, &config);

        assert_eq!(paddle_y(&world, Side::Left), 50.0 - config.paddle_step);
        assert_eq!(paddle_y(&world, Side::Right), 50.0 + config.paddle_step);
    }

    #[test]
    fn test_directive_clamps_to_arena() {
        let config = Config::new();
        let mut world = World::new();
        create_paddle(&mut world, Side::Left, 1.0);
        create_paddle(&mut world, Side::Right, config.arena_height - config.paddle_height - 1.0);

        apply_directive(&mut world, Side::Left, Directive::MoveUp, &config);
        apply_directive(&mut world, Side::Right, Directive::MoveDown, &config);

        assert_eq!(paddle_y(&world, Side::Left), 0.0);
        assert_eq!(
            paddle_y(&world, Side::Right),
            config.arena_height - config.paddle_height
        );
    }

    #[test]
    fn test_hold_leaves_paddle() {
        let config = Config::new();
        let mut world = World::new();
        create_paddle(&mut world, Side::Left, 77.0);

        apply_directive(&mut world, Side::Left, Directive::Hold, &config);

        assert_eq!(paddle_y(&world, Side::Left), 77.0);
    }
}

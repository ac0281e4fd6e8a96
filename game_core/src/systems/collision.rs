use crate::{Ball, Config, Events, Paddle, Side};
use hecs::World;

/// Check ball collisions with walls and paddles
///
/// Uses the ball edge (center ± radius) for every test. There is no
/// positional correction: the ball may overlap a wall for less than one
/// tick's displacement.
pub fn check_collisions(world: &mut World, config: &Config, events: &mut Events) {
    // First, collect ball data without holding borrows
    let ball_data = {
        let mut ball_query = world.query::<&Ball>();
        ball_query
            .iter()
            .next()
            .map(|(_e, ball)| (ball.pos, ball.vel))
    };

    let (ball_pos, mut ball_vel) = match ball_data {
        Some(data) => data,
        None => return, // No ball in world
    };

    let r = config.ball_radius;

    // Top/bottom walls only reflect a ball travelling into them
    let into_top = ball_pos.y - r <= 0.0 && ball_vel.y < 0.0;
    let into_bottom = ball_pos.y + r >= config.arena_height && ball_vel.y > 0.0;
    if into_top || into_bottom {
        ball_vel.y = -ball_vel.y;
        events.ball_hit_wall = true;
    }

    let paddles: Vec<Paddle> = world
        .query::<&Paddle>()
        .iter()
        .map(|(_e, p)| *p)
        .collect();

    for paddle in paddles {
        let face_reached = match paddle.side {
            Side::Left => {
                ball_vel.x < 0.0
                    && ball_pos.x - r <= config.paddle_x(Side::Left) + config.paddle_width
            }
            Side::Right => ball_vel.x > 0.0 && ball_pos.x + r >= config.paddle_x(Side::Right),
        };

        if face_reached && paddle.spans(ball_pos.y, config) {
            // Angle of reflection grows with the distance from the paddle center
            ball_vel.x = -ball_vel.x;
            ball_vel.y = (ball_pos.y - paddle.center_y(config)) * config.reflection_factor;
            events.ball_hit_paddle = true;
            break;
        }
    }

    for (_entity, ball) in world.query_mut::<&mut Ball>() {
        ball.vel = ball_vel;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{create_ball, create_paddle, Ball, Config, Events};
    use glam::Vec2;

    fn setup_world() -> (hecs::World, Config, Events) {
        (hecs::World::new(), Config::new(), Events::new())
    }

    fn ball(world: &hecs::World) -> Ball {
        world
            .query::<&Ball>()
            .iter()
            .next()
            .map(|(_e, b)| *b)
            .expect("ball exists")
    }

    #[test]
    fn test_ball_bounces_off_top_wall() {
        let (mut world, config, mut events) = setup_world();
        let ball_pos = Vec2::new(100.0, config.ball_radius - 0.1);
        let ball_vel = Vec2::new(50.0, -25.0);
        create_ball(&mut world, ball_pos, ball_vel);

        check_collisions(&mut world, &config, &mut events);

        let b = ball(&world);
        assert_eq!(b.vel.y, 25.0, "Vertical velocity should be exactly inverted");
        assert_eq!(b.vel.x, ball_vel.x, "X velocity should be unchanged");
        assert_eq!(b.pos, ball_pos, "No positional correction");
        assert!(events.ball_hit_wall, "Should trigger ball_hit_wall event");
    }

    #[test]
    fn test_ball_bounces_off_bottom_wall() {
        let (mut world, config, mut events) = setup_world();
        let ball_pos = Vec2::new(100.0, config.arena_height - config.ball_radius + 0.1);
        let ball_vel = Vec2::new(-50.0, 13.0);
        create_ball(&mut world, ball_pos, ball_vel);

        check_collisions(&mut world, &config, &mut events);

        let b = ball(&world);
        assert_eq!(b.vel.y, -13.0);
        assert_eq!(b.vel.x, ball_vel.x);
        assert!(events.ball_hit_wall);
    }

    #[test]
    fn test_wall_reflection_inverts_sign_for_many_positions() {
        let config = Config::new();
        for i in 0..20 {
            let x = 10.0 + i as f32 * 9.0;
            let vy = -(1.0 + i as f32);
            let mut world = hecs::World::new();
            let mut events = Events::new();
            create_ball(&mut world, Vec2::new(x, config.ball_radius), Vec2::new(50.0, vy));

            check_collisions(&mut world, &config, &mut events);

            let b = ball(&world);
            assert_eq!(b.vel.y, -vy, "vy must be exactly inverted at x={x}");
            assert_eq!(b.vel.x, 50.0);
        }
    }

    #[test]
    fn test_ball_leaving_wall_is_not_reflected_again() {
        let (mut world, config, mut events) = setup_world();
        create_ball(&mut world, Vec2::new(100.0, 1.0), Vec2::new(50.0, 25.0));

        check_collisions(&mut world, &config, &mut events);

        assert_eq!(ball(&world).vel.y, 25.0);
        assert!(!events.ball_hit_wall);
    }

    #[test]
    fn test_ball_collides_with_left_paddle() {
        let (mut world, config, mut events) = setup_world();
        create_paddle(&mut world, Side::Left, 90.0);
        let center = 90.0 + config.paddle_height / 2.0;
        let x = config.paddle_width + config.ball_radius - 0.5;
        create_ball(&mut world, Vec2::new(x, center + 4.0), Vec2::new(-50.0, 10.0));

        check_collisions(&mut world, &config, &mut events);

        let b = ball(&world);
        assert_eq!(b.vel.x, 50.0, "Ball should bounce right");
        assert!((b.vel.y - 4.0 * config.reflection_factor).abs() < 1e-4);
        assert!(events.ball_hit_paddle);
    }

    #[test]
    fn test_ball_collides_with_right_paddle() {
        let (mut world, config, mut events) = setup_world();
        create_paddle(&mut world, Side::Right, 90.0);
        let center = 90.0 + config.paddle_height / 2.0;
        let x = config.paddle_x(Side::Right) - config.ball_radius;
        create_ball(&mut world, Vec2::new(x, center - 6.0), Vec2::new(50.0, 0.0));

        check_collisions(&mut world, &config, &mut events);

        let b = ball(&world);
        assert_eq!(b.vel.x, -50.0, "Ball should bounce left");
        assert!((b.vel.y + 6.0 * config.reflection_factor).abs() < 1e-4);
    }

    #[test]
    fn test_center_hit_gives_flat_return() {
        let (mut world, config, mut events) = setup_world();
        create_paddle(&mut world, Side::Right, 90.0);
        let center = 90.0 + config.paddle_height / 2.0;
        let x = config.paddle_x(Side::Right) - config.ball_radius + 0.5;
        create_ball(&mut world, Vec2::new(x, center), Vec2::new(50.0, 25.0));

        check_collisions(&mut world, &config, &mut events);

        let b = ball(&world);
        assert_eq!(b.vel.x, -50.0);
        assert_eq!(b.vel.y, 0.0, "Zero contact offset yields zero vertical speed");
    }

    #[test]
    fn test_reflection_is_proportional_to_offset() {
        let config = Config::new();
        for offset in [-10.0f32, -7.5, -2.0, 1.0, 3.0, 9.5] {
            let mut world = hecs::World::new();
            let mut events = Events::new();
            create_paddle(&mut world, Side::Left, 50.0);
            let center = 50.0 + config.paddle_height / 2.0;
            create_ball(
                &mut world,
                Vec2::new(config.paddle_width + config.ball_radius, center + offset),
                Vec2::new(-50.0, 0.0),
            );

            check_collisions(&mut world, &config, &mut events);

            let b = ball(&world);
            assert!(b.vel.x > 0.0);
            assert!((b.vel.y - offset * config.reflection_factor).abs() < 1e-4);
        }
    }

    #[test]
    fn test_ball_outside_paddle_band_passes() {
        let (mut world, config, mut events) = setup_world();
        create_paddle(&mut world, Side::Left, 10.0);
        create_ball(
            &mut world,
            Vec2::new(config.paddle_width + 1.0, 150.0),
            Vec2::new(-50.0, 0.0),
        );

        check_collisions(&mut world, &config, &mut events);

        assert_eq!(ball(&world).vel.x, -50.0);
        assert!(!events.ball_hit_paddle);
    }

    #[test]
    fn test_ball_does_not_bounce_when_moving_away_from_paddle() {
        let (mut world, config, mut events) = setup_world();
        create_paddle(&mut world, Side::Left, 90.0);
        create_ball(
            &mut world,
            Vec2::new(config.paddle_width + 1.0, 100.0),
            Vec2::new(50.0, 0.0),
        );

        check_collisions(&mut world, &config, &mut events);

        assert_eq!(ball(&world).vel.x, 50.0);
        assert!(!events.ball_hit_paddle);
    }

    #[test]
    fn test_no_collision_when_no_ball() {
        let (mut world, config, mut events) = setup_world();
        create_paddle(&mut world, Side::Left, 12.0);

        check_collisions(&mut world, &config, &mut events);

        assert!(!events.ball_hit_paddle);
        assert!(!events.ball_hit_wall);
    }
}

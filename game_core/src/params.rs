/// Game tuning parameters for Pong
///
/// The arena is measured in board units: at the default grid size one
/// grid cell covers exactly one unit.
#[derive(Debug, Clone, Copy)]
pub struct Params;

impl Params {
    // Arena
    pub const ARENA_WIDTH: f32 = 200.0;
    pub const ARENA_HEIGHT: f32 = 200.0;

    // Paddle
    pub const PADDLE_WIDTH: f32 = 1.0;
    pub const PADDLE_HEIGHT: f32 = 20.0;
    pub const PADDLE_STEP: f32 = 3.0; // units per applied directive

    // Ball
    pub const BALL_RADIUS: f32 = 2.0;
    pub const BALL_SPEED_X: f32 = 50.0; // units per second (2.5 per tick)
    pub const BALL_SPEED_Y: f32 = 25.0; // units per second (1.25 per tick)
    pub const REFLECTION_FACTOR: f32 = 5.0; // per second (0.25 per tick)

    // Board encoding
    pub const GRID_SIZE: usize = 200;
    pub const DOWNSAMPLE_FACTOR: usize = 4;

    // Timing
    pub const TICK_DT: f32 = 0.05; // 50 ms fixed cadence

    pub const RNG_SEED: u64 = 12345;
}

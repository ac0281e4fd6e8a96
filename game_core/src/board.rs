//! Quantized occupancy boards handed to the decision process.
//!
//! The play-field is split into an N×N grid (rows are y, columns are x).
//! A cell is occupied when it intersects a paddle or the ball's bounding
//! square. Downsampling is an OR-reduction so that any occupied source
//! cell keeps its containing cell occupied.

use std::fmt;
use std::ops::RangeInclusive;

use thiserror::Error;

use crate::{Aabb, Config, ConfigError, GameState, Side};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BoardError {
    #[error("board has no rows")]
    Empty,
    #[error("row {row} has {len} cells, expected {size}")]
    Ragged { row: usize, len: usize, size: usize },
    #[error("downsample factor {factor} does not evenly divide board size {size}")]
    Factor { size: usize, factor: usize },
}

/// Square occupancy matrix, row-major
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct BoardGrid {
    size: usize,
    cells: Vec<bool>,
}

impl fmt::Debug for BoardGrid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BoardGrid")
            .field("size", &self.size)
            .field("occupied", &self.occupied())
            .finish()
    }
}

impl BoardGrid {
    pub fn empty(size: usize) -> Self {
        Self {
            size,
            cells: vec![false; size * size],
        }
    }

    /// Build from rows, rejecting ragged or non-square input
    pub fn from_rows(rows: Vec<Vec<bool>>) -> Result<Self, BoardError> {
        let size = rows.len();
        if size == 0 {
            return Err(BoardError::Empty);
        }
        let mut cells = Vec::with_capacity(size * size);
        for (row, cols) in rows.into_iter().enumerate() {
            if cols.len() != size {
                return Err(BoardError::Ragged {
                    row,
                    len: cols.len(),
                    size,
                });
            }
            cells.extend(cols);
        }
        Ok(Self { size, cells })
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Out-of-range reads are unoccupied
    pub fn get(&self, row: usize, col: usize) -> bool {
        row < self.size && col < self.size && self.cells[row * self.size + col]
    }

    pub fn set(&mut self, row: usize, col: usize) {
        if row < self.size && col < self.size {
            self.cells[row * self.size + col] = true;
        }
    }

    pub fn rows(&self) -> impl Iterator<Item = &[bool]> {
        self.cells.chunks(self.size.max(1))
    }

    pub fn to_rows(&self) -> Vec<Vec<bool>> {
        self.rows().map(<[bool]>::to_vec).collect()
    }

    pub fn occupied(&self) -> usize {
        self.cells.iter().filter(|c| **c).count()
    }

    /// (row, col) of every occupied cell, in row-major order
    pub fn occupied_cells(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        let size = self.size;
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, c)| **c)
            .map(move |(i, _)| (i / size, i % size))
    }

    /// Left/right mirror: every row reversed. Applying it twice is a no-op.
    pub fn mirrored(&self) -> Self {
        let mut cells = Vec::with_capacity(self.cells.len());
        for row in self.rows() {
            cells.extend(row.iter().rev());
        }
        Self {
            size: self.size,
            cells,
        }
    }

    /// OR-reduce every `factor`×`factor` block into one cell
    pub fn downsample(&self, factor: usize) -> Result<Self, BoardError> {
        if factor == 0 || self.size % factor != 0 {
            return Err(BoardError::Factor {
                size: self.size,
                factor,
            });
        }
        Ok(self.reduce(factor))
    }

    fn reduce(&self, factor: usize) -> Self {
        if factor <= 1 {
            return self.clone();
        }
        let mut out = Self::empty(self.size / factor);
        for (row, col) in self.occupied_cells() {
            out.set(row / factor, col / factor);
        }
        out
    }

    fn fill(&mut self, rows: RangeInclusive<usize>, cols: RangeInclusive<usize>) {
        for row in rows {
            for col in cols.clone() {
                self.set(row, col);
            }
        }
    }
}

/// Rasterizes game state into boards of a fixed, validated resolution
#[derive(Debug, Clone)]
pub struct BoardEncoder {
    config: Config,
    cell_w: f32,
    cell_h: f32,
}

impl BoardEncoder {
    pub fn new(config: &Config) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config: config.clone(),
            cell_w: config.arena_width / config.grid_size as f32,
            cell_h: config.arena_height / config.grid_size as f32,
        })
    }

    /// Edge length of encoded (downsampled) boards
    pub fn board_size(&self) -> usize {
        self.config.board_size()
    }

    /// Full-resolution N×N occupancy grid
    pub fn rasterize(&self, state: &GameState) -> BoardGrid {
        let n = self.config.grid_size;
        let mut grid = BoardGrid::empty(n);

        let boxes = [
            Aabb::of_paddle(&state.paddle_left, &self.config),
            Aabb::of_paddle(&state.paddle_right, &self.config),
            Aabb::of_ball(&state.ball, &self.config),
        ];
        for aabb in boxes {
            let cols = cell_span(aabb.min.x, aabb.max.x, self.cell_w, n);
            let rows = cell_span(aabb.min.y, aabb.max.y, self.cell_h, n);
            if let (Some(rows), Some(cols)) = (rows, cols) {
                grid.fill(rows, cols);
            }
        }
        grid
    }

    /// Canonical board, downsampled by the configured factor
    pub fn encode(&self, state: &GameState) -> BoardGrid {
        self.rasterize(state).reduce(self.config.downsample_factor)
    }

    /// Board as seen by `side`: the right paddle gets the mirrored view so
    /// that the controlled paddle is always on the left.
    pub fn encode_for(&self, state: &GameState, side: Side) -> BoardGrid {
        let board = self.encode(state);
        match side {
            Side::Left => board,
            Side::Right => board.mirrored(),
        }
    }
}

/// Inclusive index range of the cells touched by `[min, max]`
fn cell_span(min: f32, max: f32, step: f32, n: usize) -> Option<RangeInclusive<usize>> {
    if max < 0.0 || min > step * n as f32 {
        return None;
    }
    let lo = (min / step).floor().max(0.0) as usize;
    let hi = ((max / step).floor().max(0.0) as usize).min(n - 1);
    (lo <= hi).then_some(lo..=hi)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Ball, Paddle, Score};
    use glam::Vec2;

    fn state(ball: Vec2, left_y: f32, right_y: f32) -> GameState {
        GameState {
            ball: Ball::new(ball, Vec2::new(50.0, 25.0)),
            paddle_left: Paddle::new(Side::Left, left_y),
            paddle_right: Paddle::new(Side::Right, right_y),
            score: Score::new(),
        }
    }

    fn full_res() -> Config {
        Config {
            downsample_factor: 1,
            ..Config::default()
        }
    }

    #[test]
    fn test_rasterize_marks_paddles_and_ball() {
        let config = full_res();
        let encoder = BoardEncoder::new(&config).unwrap();
        let grid = encoder.rasterize(&state(Vec2::new(100.0, 100.0), 10.0, 150.0));

        assert_eq!(grid.size(), 200);
        // Left paddle: columns 0..=1, rows 10..=30
        assert!(grid.get(10, 0));
        assert!(grid.get(30, 1));
        assert!(!grid.get(31, 0));
        assert!(!grid.get(9, 0));
        // Right paddle: column 199, rows 150..=170
        assert!(grid.get(150, 199));
        assert!(grid.get(170, 199));
        assert!(!grid.get(149, 199));
        // Ball square: 98..=102 both ways
        assert!(grid.get(98, 98));
        assert!(grid.get(102, 102));
        assert!(!grid.get(103, 100));
        assert!(!grid.get(100, 97));
    }

    #[test]
    fn test_ball_partly_outside_is_clamped() {
        let encoder = BoardEncoder::new(&full_res()).unwrap();
        let grid = encoder.rasterize(&state(Vec2::new(1.0, 199.5), 90.0, 90.0));
        assert!(grid.get(199, 0));
        assert!(grid.get(197, 3));
    }

    #[test]
    fn test_encoding_is_deterministic() {
        let encoder = BoardEncoder::new(&Config::new()).unwrap();
        let s = state(Vec2::new(37.3, 121.9), 44.0, 3.0);
        assert_eq!(encoder.encode(&s), encoder.encode(&s));
        assert_eq!(encoder.encode(&s).size(), 50);
    }

    #[test]
    fn test_downsample_is_or_reduction() {
        let encoder = BoardEncoder::new(&full_res()).unwrap();
        for (x, y) in [(100.0, 100.0), (3.0, 7.0), (150.5, 42.25), (196.0, 180.0)] {
            let fine = encoder.rasterize(&state(Vec2::new(x, y), 33.0, 120.0));
            let coarse = fine.downsample(4).unwrap();
            assert_eq!(coarse.size(), 50);
            for (row, col) in fine.occupied_cells() {
                assert!(
                    coarse.get(row / 4, col / 4),
                    "cell ({row},{col}) lost by downsampling"
                );
            }
            // and nothing is invented
            for (row, col) in coarse.occupied_cells() {
                let any = (0..4).any(|dr| (0..4).any(|dc| fine.get(row * 4 + dr, col * 4 + dc)));
                assert!(any, "coarse cell ({row},{col}) has no occupied source");
            }
        }
    }

    #[test]
    fn test_single_cell_survives_downsample() {
        let mut grid = BoardGrid::empty(8);
        grid.set(5, 6);
        let coarse = grid.downsample(4).unwrap();
        assert_eq!(coarse.to_rows(), vec![vec![false, false], vec![false, true]]);
    }

    #[test]
    fn test_downsample_rejects_bad_factor() {
        let grid = BoardGrid::empty(10);
        assert_eq!(
            grid.downsample(3),
            Err(BoardError::Factor { size: 10, factor: 3 })
        );
        assert!(grid.downsample(0).is_err());
        assert_eq!(grid.downsample(1).unwrap(), grid);
    }

    #[test]
    fn test_mirror_is_an_involution() {
        let encoder = BoardEncoder::new(&Config::new()).unwrap();
        let board = encoder.encode(&state(Vec2::new(20.0, 60.0), 0.0, 180.0));
        assert_ne!(board.mirrored(), board);
        assert_eq!(board.mirrored().mirrored(), board);
    }

    #[test]
    fn test_right_side_sees_itself_on_the_left() {
        let encoder = BoardEncoder::new(&Config::new()).unwrap();
        let s = state(Vec2::new(100.0, 100.0), 0.0, 180.0);
        let right_view = encoder.encode_for(&s, Side::Right);
        let size = right_view.size();

        // Right paddle (rows 180..200 → board rows 45..=49) now in column 0
        assert!(right_view.get(46, 0));
        assert!(!right_view.get(2, 0));
        // Left paddle (rows 0..20) now in the last column
        assert!(right_view.get(2, size - 1));
        assert_eq!(encoder.encode_for(&s, Side::Left), encoder.encode(&s));
    }

    #[test]
    fn test_from_rows_validates_shape() {
        assert_eq!(BoardGrid::from_rows(vec![]), Err(BoardError::Empty));
        assert_eq!(
            BoardGrid::from_rows(vec![vec![true, false], vec![true]]),
            Err(BoardError::Ragged {
                row: 1,
                len: 1,
                size: 2
            })
        );
        let grid = BoardGrid::from_rows(vec![vec![true, false], vec![false, false]]).unwrap();
        assert!(grid.get(0, 0));
        assert_eq!(grid.occupied(), 1);
    }

    #[test]
    fn test_encoder_rejects_indivisible_factor() {
        let config = Config {
            grid_size: 100,
            downsample_factor: 7,
            ..Config::default()
        };
        assert!(matches!(
            BoardEncoder::new(&config),
            Err(ConfigError::DownsampleMismatch { .. })
        ));
    }
}

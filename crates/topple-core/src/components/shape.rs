use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::core::rng::Rng;

/// The seven canonical tetromino shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Tetromino {
    I,
    O,
    T,
    S,
    Z,
    J,
    L,
}

/// Fixed color tag per shape, passed through to the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColorTag {
    Cyan,
    Yellow,
    Purple,
    Green,
    Red,
    Blue,
    Orange,
}

/// A shape matrix: rows × cols of filled/empty cells, row 0 at the top.
#[derive(Debug, Clone, Copy)]
pub struct ShapeGrid {
    pub rows: u8,
    pub cols: u8,
    /// (col, row) of each filled cell.
    cells: &'static [(u8, u8)],
}

impl ShapeGrid {
    pub fn cells(&self) -> impl Iterator<Item = (u8, u8)> + '_ {
        self.cells.iter().copied()
    }

    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    pub fn is_filled(&self, col: u8, row: u8) -> bool {
        self.cells.iter().any(|&(c, r)| c == col && r == row)
    }
}

impl Tetromino {
    pub const ALL: [Tetromino; 7] = [
        Tetromino::I,
        Tetromino::O,
        Tetromino::T,
        Tetromino::S,
        Tetromino::Z,
        Tetromino::J,
        Tetromino::L,
    ];

    pub fn grid(&self) -> ShapeGrid {
        match self {
            Tetromino::I => ShapeGrid {
                rows: 1,
                cols: 4,
                cells: &[(0, 0), (1, 0), (2, 0), (3, 0)],
            },
            Tetromino::O => ShapeGrid {
                rows: 2,
                cols: 2,
                cells: &[(0, 0), (1, 0), (0, 1), (1, 1)],
            },
            Tetromino::T => ShapeGrid {
                rows: 2,
                cols: 3,
                cells: &[(0, 0), (1, 0), (2, 0), (1, 1)],
            },
            Tetromino::S => ShapeGrid {
                rows: 2,
                cols: 3,
                cells: &[(1, 0), (2, 0), (0, 1), (1, 1)],
            },
            Tetromino::Z => ShapeGrid {
                rows: 2,
                cols: 3,
                cells: &[(0, 0), (1, 0), (1, 1), (2, 1)],
            },
            Tetromino::J => ShapeGrid {
                rows: 2,
                cols: 3,
                cells: &[(0, 0), (0, 1), (1, 1), (2, 1)],
            },
            Tetromino::L => ShapeGrid {
                rows: 2,
                cols: 3,
                cells: &[(2, 0), (0, 1), (1, 1), (2, 1)],
            },
        }
    }

    pub fn color(&self) -> ColorTag {
        match self {
            Tetromino::I => ColorTag::Cyan,
            Tetromino::O => ColorTag::Yellow,
            Tetromino::T => ColorTag::Purple,
            Tetromino::S => ColorTag::Green,
            Tetromino::Z => ColorTag::Red,
            Tetromino::J => ColorTag::Blue,
            Tetromino::L => ColorTag::Orange,
        }
    }

    /// Center offset of each filled cell relative to the shape center, for a
    /// given cell edge length. These become the compound body's blocks.
    pub fn block_offsets(&self, block_size: f32) -> Vec<Vec2> {
        let grid = self.grid();
        let cx = (grid.cols as f32 - 1.0) / 2.0;
        let cy = (grid.rows as f32 - 1.0) / 2.0;
        grid.cells()
            .map(|(col, row)| {
                Vec2::new(
                    (col as f32 - cx) * block_size,
                    (row as f32 - cy) * block_size,
                )
            })
            .collect()
    }

    /// Half extents of the unrotated shape.
    pub fn half_extents(&self, block_size: f32) -> Vec2 {
        let grid = self.grid();
        Vec2::new(
            grid.cols as f32 * block_size / 2.0,
            grid.rows as f32 * block_size / 2.0,
        )
    }

    /// Pick a shape from the sequence generator.
    pub fn pick(rng: &mut Rng) -> Tetromino {
        Tetromino::ALL[rng.next_index(Tetromino::ALL.len())]
    }
}

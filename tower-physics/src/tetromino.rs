// Copyright 2025 John Brosnihan
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//! Four-block composite pieces
//!
//! A [`Tetromino`] is a blueprint of four unit blocks laid out around a spawn
//! point. Nothing here touches an engine: blocks must be passed to
//! `PhysicsEngine::create_body` to take part in the simulation.

use std::fmt;
use std::str::FromStr;

use crate::body::RigidBody;
use crate::math::Vector2;

/// Mass of each block
pub const BLOCK_MASS: f64 = 1.0;
/// Restitution of each block, low so stacks do not bounce
pub const BLOCK_RESTITUTION: f64 = 0.1;
/// Friction of each block, high so stacks grip
pub const BLOCK_FRICTION: f64 = 0.8;
/// Edge length of each square block
pub const BLOCK_SIZE: f64 = 1.0;

/// The seven standard piece shapes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TetrominoShape {
    /// Straight line of four
    I,
    /// Three in a row with the left end raised
    J,
    /// Three in a row with the right end raised
    L,
    /// Two by two square
    O,
    /// Skewed, rising to the right
    S,
    /// Three in a row with the middle raised
    T,
    /// Skewed, falling to the right
    Z,
}

impl TetrominoShape {
    /// Every shape, in letter order
    pub const ALL: [TetrominoShape; 7] = [
        TetrominoShape::I,
        TetrominoShape::J,
        TetrominoShape::L,
        TetrominoShape::O,
        TetrominoShape::S,
        TetrominoShape::T,
        TetrominoShape::Z,
    ];

    /// Block centers relative to the spawn point, before rotation
    pub fn offsets(&self) -> [Vector2; 4] {
        let p = |x, y| Vector2::new(x, y);
        match self {
            TetrominoShape::I => [p(-1.5, 0.0), p(-0.5, 0.0), p(0.5, 0.0), p(1.5, 0.0)],
            TetrominoShape::J => [p(-1.0, 0.5), p(-1.0, -0.5), p(0.0, -0.5), p(1.0, -0.5)],
            TetrominoShape::L => [p(-1.0, -0.5), p(0.0, -0.5), p(1.0, -0.5), p(1.0, 0.5)],
            TetrominoShape::O => [p(-0.5, -0.5), p(-0.5, 0.5), p(0.5, -0.5), p(0.5, 0.5)],
            TetrominoShape::S => [p(-1.0, -0.5), p(0.0, -0.5), p(0.0, 0.5), p(1.0, 0.5)],
            TetrominoShape::T => [p(-1.0, -0.5), p(0.0, -0.5), p(1.0, -0.5), p(0.0, 0.5)],
            TetrominoShape::Z => [p(-1.0, 0.5), p(0.0, 0.5), p(0.0, -0.5), p(1.0, -0.5)],
        }
    }

    /// Single-letter name
    pub fn letter(&self) -> char {
        match self {
            TetrominoShape::I => 'I',
            TetrominoShape::J => 'J',
            TetrominoShape::L => 'L',
            TetrominoShape::O => 'O',
            TetrominoShape::S => 'S',
            TetrominoShape::T => 'T',
            TetrominoShape::Z => 'Z',
        }
    }
}

impl fmt::Display for TetrominoShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.letter())
    }
}

/// Error returned when a shape name is not one of `I J L O S T Z`
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown tetromino shape '{0}'")]
pub struct ParseShapeError(String);

impl FromStr for TetrominoShape {
    type Err = ParseShapeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TetrominoShape::ALL
            .into_iter()
            .find(|shape| s.len() == 1 && s.eq_ignore_ascii_case(&shape.letter().to_string()))
            .ok_or_else(|| ParseShapeError(s.to_string()))
    }
}

/// Four unregistered blocks forming one piece
#[derive(Debug, Clone)]
pub struct Tetromino {
    shape: TetrominoShape,
    blocks: [RigidBody; 4],
}

impl Tetromino {
    /// Lay out a piece around `spawn`, rotated by `rotation` radians
    ///
    /// Each offset is rotated about the spawn point and every block carries
    /// the same rotation.
    ///
    /// # Example
    ///
    /// ```
    /// use tower_physics::math::Vector2;
    /// use tower_physics::tetromino::{Tetromino, TetrominoShape};
    ///
    /// let piece = Tetromino::new(TetrominoShape::I, Vector2::new(0.0, 10.0), 0.0);
    /// assert_eq!(piece.blocks()[0].position, Vector2::new(-1.5, 10.0));
    /// ```
    pub fn new(shape: TetrominoShape, spawn: Vector2, rotation: f64) -> Self {
        let blocks = shape.offsets().map(|offset| {
            RigidBody::new(spawn + offset.rotated(rotation), BLOCK_SIZE, BLOCK_SIZE, BLOCK_MASS)
                .with_rotation(rotation)
                .with_restitution(BLOCK_RESTITUTION)
                .with_friction(BLOCK_FRICTION)
        });
        Tetromino { shape, blocks }
    }

    /// Shape of the piece
    pub fn shape(&self) -> TetrominoShape {
        self.shape
    }

    /// The four blocks in offset-table order
    pub fn blocks(&self) -> &[RigidBody; 4] {
        &self.blocks
    }

    /// Consume the piece, yielding its blocks for registration
    pub fn into_blocks(self) -> [RigidBody; 4] {
        self.blocks
    }
}

//! Grid storage and coordinate conversion
//!
//! The board keeps two parallel layers over a `width x height` grid:
//! - terrain: what the ground is made of (trees and cacti block movement)
//! - boxes: optional destructible box material sitting on the cell
//!
//! Cells outside the grid are a programming error: lookups panic, while
//! point/cell conversions report [`BoardError::OutOfBounds`].

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::error::BoardError;

/// One discrete grid position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Cell {
    pub x: i32,
    pub y: i32,
}

impl Cell {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    #[inline]
    pub fn offset(self, dx: i32, dy: i32) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }

    /// Chebyshev ring distance
    #[inline]
    pub fn ring_distance(self, other: Cell) -> i32 {
        (self.x - other.x).abs().max((self.y - other.y).abs())
    }
}

/// Ground layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Terrain {
    #[default]
    Empty,
    Tree,
    Cactus,
}

impl Terrain {
    pub fn blocks_movement(self) -> bool {
        self != Terrain::Empty
    }
}

/// Box material tiers, roughly ordered by toughness
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BoxMaterial {
    /// Bare box, any explosion destroys it
    O,
    /// Needs a second plain hit
    N,
    Silver,
    /// Ignores plain explosions
    Dark,
    /// Double score
    Gold,
    Blue,
    Red,
    Black,
    Green,
    Purple,
    /// Battle only: releases a bot when destroyed
    Man,
}

impl BoxMaterial {
    pub const ALL: [BoxMaterial; 11] = [
        BoxMaterial::O,
        BoxMaterial::N,
        BoxMaterial::Silver,
        BoxMaterial::Dark,
        BoxMaterial::Gold,
        BoxMaterial::Blue,
        BoxMaterial::Red,
        BoxMaterial::Black,
        BoxMaterial::Green,
        BoxMaterial::Purple,
        BoxMaterial::Man,
    ];
}

/// The arena grid
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Board {
    width: i32,
    height: i32,
    cell_size: f32,
    terrain: Vec<Terrain>,
    boxes: Vec<Option<BoxMaterial>>,
}

impl Board {
    /// Create an all-empty board
    pub fn new(width: i32, height: i32, cell_size: f32) -> Self {
        assert!(width > 0 && height > 0, "board must be non-empty, got {width}x{height}");
        let len = (width * height) as usize;
        Self {
            width,
            height,
            cell_size,
            terrain: vec![Terrain::Empty; len],
            boxes: vec![None; len],
        }
    }

    #[inline]
    pub fn width(&self) -> i32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> i32 {
        self.height
    }

    #[inline]
    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    #[inline]
    pub fn in_bounds(&self, cell: Cell) -> bool {
        cell.x >= 0 && cell.y >= 0 && cell.x < self.width && cell.y < self.height
    }

    fn out_of_bounds(&self, cell: Cell) -> BoardError {
        BoardError::OutOfBounds {
            x: cell.x,
            y: cell.y,
            width: self.width,
            height: self.height,
        }
    }

    /// World-space center of a cell
    pub fn cell_center(&self, cell: Cell) -> Result<Vec2, BoardError> {
        if !self.in_bounds(cell) {
            return Err(self.out_of_bounds(cell));
        }
        Ok(Vec2::new(
            (cell.x as f32 + 0.5) * self.cell_size,
            (cell.y as f32 + 0.5) * self.cell_size,
        ))
    }

    /// Cell containing a world-space point
    pub fn point_to_cell(&self, point: Vec2) -> Result<Cell, BoardError> {
        let cell = Cell::new(
            (point.x / self.cell_size).floor() as i32,
            (point.y / self.cell_size).floor() as i32,
        );
        if self.in_bounds(cell) {
            Ok(cell)
        } else {
            Err(self.out_of_bounds(cell))
        }
    }

    /// # Panics
    /// If `cell` is outside the board.
    fn index(&self, cell: Cell) -> usize {
        assert!(
            self.in_bounds(cell),
            "cell ({}, {}) outside {}x{} board",
            cell.x,
            cell.y,
            self.width,
            self.height
        );
        (cell.y * self.width + cell.x) as usize
    }

    pub fn terrain_at(&self, cell: Cell) -> Terrain {
        self.terrain[self.index(cell)]
    }

    pub fn set_terrain(&mut self, cell: Cell, terrain: Terrain) {
        let i = self.index(cell);
        self.terrain[i] = terrain;
    }

    pub fn box_at(&self, cell: Cell) -> Option<BoxMaterial> {
        self.boxes[self.index(cell)]
    }

    #[inline]
    pub fn has_box(&self, cell: Cell) -> bool {
        self.box_at(cell).is_some()
    }

    /// Place a box, returning whatever was there before
    pub fn set_box(&mut self, cell: Cell, material: BoxMaterial) -> Option<BoxMaterial> {
        let i = self.index(cell);
        self.boxes[i].replace(material)
    }

    pub fn clear_box(&mut self, cell: Cell) -> Option<BoxMaterial> {
        let i = self.index(cell);
        self.boxes[i].take()
    }

    /// In bounds, walkable terrain and no box
    pub fn is_passable(&self, cell: Cell) -> bool {
        self.in_bounds(cell) && !self.terrain_at(cell).blocks_movement() && !self.has_box(cell)
    }

    /// Surround the board with a ring of the given terrain
    pub fn fill_border(&mut self, terrain: Terrain) {
        for x in 0..self.width {
            self.set_terrain(Cell::new(x, 0), terrain);
            self.set_terrain(Cell::new(x, self.height - 1), terrain);
        }
        for y in 0..self.height {
            self.set_terrain(Cell::new(0, y), terrain);
            self.set_terrain(Cell::new(self.width - 1, y), terrain);
        }
    }

    /// Every cell, column by column
    pub fn cells(&self) -> impl Iterator<Item = Cell> + use<> {
        let (w, h) = (self.width, self.height);
        (0..w).flat_map(move |x| (0..h).map(move |y| Cell::new(x, y)))
    }

    /// All cells of row `y`, left to right
    pub fn row(&self, y: i32) -> impl Iterator<Item = Cell> + use<> {
        (0..self.width).map(move |x| Cell::new(x, y))
    }

    /// All cells of column `x`, top to bottom
    pub fn column(&self, x: i32) -> impl Iterator<Item = Cell> + use<> {
        (0..self.height).map(move |y| Cell::new(x, y))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_center_and_back() {
        let board = Board::new(20, 20, 40.0);
        let center = board.cell_center(Cell::new(3, 7)).unwrap();
        assert_eq!(center, Vec2::new(140.0, 300.0));
        assert_eq!(board.point_to_cell(center).unwrap(), Cell::new(3, 7));
        // Anywhere inside the tile maps to the same cell
        assert_eq!(board.point_to_cell(Vec2::new(120.1, 319.9)).unwrap(), Cell::new(3, 7));
    }

    #[test]
    fn test_point_outside_is_out_of_bounds() {
        let board = Board::new(4, 3, 10.0);
        assert_eq!(
            board.point_to_cell(Vec2::new(-0.5, 5.0)),
            Err(BoardError::OutOfBounds {
                x: -1,
                y: 0,
                width: 4,
                height: 3
            })
        );
        assert!(board.point_to_cell(Vec2::new(40.0, 5.0)).is_err());
        assert!(board.cell_center(Cell::new(0, 3)).is_err());
    }

    #[test]
    #[should_panic(expected = "outside 4x3 board")]
    fn test_lookup_outside_panics() {
        let board = Board::new(4, 3, 10.0);
        board.box_at(Cell::new(4, 0));
    }

    #[test]
    fn test_box_layer() {
        let mut board = Board::new(5, 5, 40.0);
        let c = Cell::new(2, 2);
        assert_eq!(board.box_at(c), None);
        assert_eq!(board.set_box(c, BoxMaterial::Silver), None);
        assert_eq!(board.set_box(c, BoxMaterial::N), Some(BoxMaterial::Silver));
        assert!(!board.is_passable(c));
        assert_eq!(board.clear_box(c), Some(BoxMaterial::N));
        assert!(board.is_passable(c));
        assert_eq!(board.clear_box(c), None);
    }

    #[test]
    fn test_border_blocks() {
        let mut board = Board::new(6, 4, 40.0);
        board.fill_border(Terrain::Tree);
        assert_eq!(board.terrain_at(Cell::new(0, 2)), Terrain::Tree);
        assert_eq!(board.terrain_at(Cell::new(5, 3)), Terrain::Tree);
        assert_eq!(board.terrain_at(Cell::new(2, 1)), Terrain::Empty);
        assert!(!board.is_passable(Cell::new(3, 0)));
        assert!(board.is_passable(Cell::new(3, 2)));
        assert!(!board.is_passable(Cell::new(-1, 2)));
    }

    #[test]
    fn test_ring_distance() {
        let a = Cell::new(5, 5);
        assert_eq!(a.ring_distance(a), 0);
        assert_eq!(a.ring_distance(Cell::new(6, 4)), 1);
        assert_eq!(a.ring_distance(Cell::new(2, 7)), 3);
    }

    #[test]
    fn test_cells_visits_everything_once() {
        let board = Board::new(3, 4, 1.0);
        let cells: Vec<_> = board.cells().collect();
        assert_eq!(cells.len(), 12);
        assert_eq!(cells[0], Cell::new(0, 0));
        assert_eq!(cells[1], Cell::new(0, 1));
        assert_eq!(board.row(2).count(), 3);
        assert_eq!(board.column(1).count(), 4);
    }
}

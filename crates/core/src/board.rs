//! Board module - owns the grid geometry and the tile set
//!
//! The board is a square grid (4x4 for the standard game) holding a list of tiles.
//! A flat row-major index maps each cell to the live tile occupying it, so
//! occupancy queries are O(1).
//!
//! Tiles flagged `is_merging` stay in the tile list until the session settles but
//! are not indexed: they never occupy a cell, block a slide, or count towards
//! game-over detection.
//!
//! Coordinates: `(row, col)` where row 0 is the top edge and col 0 the left edge.

use tui_2048_types::{Position, Tile, TileId, MAX_GRID_SIZE};

/// Hands out fresh tile ids; ids are never reused within a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileIds {
    next: u64,
}

impl TileIds {
    pub fn new() -> Self {
        Self { next: 1 }
    }

    /// Allocator whose ids cannot collide with any tile already on `board`
    pub fn after(board: &Board) -> Self {
        let max = board.tiles().iter().map(|t| t.id.0).max().unwrap_or(0);
        Self { next: max + 1 }
    }

    pub fn next_id(&mut self) -> TileId {
        let id = TileId(self.next);
        self.next += 1;
        id
    }
}

impl Default for TileIds {
    fn default() -> Self {
        Self::new()
    }
}

/// The game board - `size` x `size` cells and the tiles placed on them
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    size: usize,
    tiles: Vec<Tile>,
    /// Flat array, row-major order (row * size + col), holding the index into
    /// `tiles` of the live tile in each cell
    cells: Vec<Option<usize>>,
}

impl Board {
    /// Create a new empty board
    ///
    /// # Panics
    ///
    /// Panics if `size` is outside `2..=MAX_GRID_SIZE`.
    pub fn new(size: usize) -> Self {
        assert!(size >= 2, "grid size must be at least 2, got {size}");
        assert!(
            size <= MAX_GRID_SIZE,
            "grid size must be at most {MAX_GRID_SIZE}, got {size}"
        );
        Self {
            size,
            tiles: Vec::with_capacity(size * size),
            cells: vec![None; size * size],
        }
    }

    /// Build a board from row-major values where 0 marks an empty cell
    ///
    /// Tiles get ids 1, 2, 3... in row-major order and carry no presentation flags.
    ///
    /// # Panics
    ///
    /// Panics if `values.len()` is not `size * size` or a non-zero value is not a
    /// power of two of at least 2.
    ///
    /// # Examples
    ///
    /// ```
    /// use tui_2048_core::Board;
    /// use tui_2048_types::Position;
    ///
    /// let board = Board::from_values(2, &[2, 0, 0, 4]);
    /// assert_eq!(board.tile_at(Position::new(1, 1)).map(|t| t.value), Some(4));
    /// assert!(!board.is_occupied(Position::new(0, 1)));
    /// ```
    pub fn from_values(size: usize, values: &[u32]) -> Self {
        assert_eq!(values.len(), size * size, "expected {} values", size * size);
        let mut board = Self::new(size);
        let mut ids = TileIds::new();
        for (i, &value) in values.iter().enumerate() {
            if value == 0 {
                continue;
            }
            assert!(Tile::is_valid_value(value), "invalid tile value {value}");
            let pos = Position::new(i / size, i % size);
            board.insert(Tile::settled(ids.next_id(), value, pos));
        }
        board
    }

    /// Row-major values of the live tiles, 0 for empty cells
    pub fn to_values(&self) -> Vec<u32> {
        self.cells
            .iter()
            .map(|cell| cell.map_or(0, |idx| self.tiles[idx].value))
            .collect()
    }

    /// Calculate flat index from a position
    #[inline(always)]
    fn index(&self, pos: Position) -> Option<usize> {
        if !pos.in_bounds(self.size) {
            return None;
        }
        Some(pos.row * self.size + pos.col)
    }

    /// Side length of the grid
    pub fn size(&self) -> usize {
        self.size
    }

    /// All tiles, including ones still fading out after a merge
    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    /// Tiles that occupy a cell (everything except `is_merging` tiles)
    pub fn live_tiles(&self) -> impl Iterator<Item = &Tile> {
        self.tiles.iter().filter(|t| !t.is_merging)
    }

    /// Check if position is out of bounds
    pub fn is_out_of_bounds(&self, pos: Position) -> bool {
        !pos.in_bounds(self.size)
    }

    /// Check if position is occupied by a live tile
    pub fn is_occupied(&self, pos: Position) -> bool {
        self.tile_index_at(pos).is_some()
    }

    /// Live tile at position, if any
    pub fn tile_at(&self, pos: Position) -> Option<&Tile> {
        self.tile_index_at(pos).map(|idx| &self.tiles[idx])
    }

    pub(crate) fn tile_index_at(&self, pos: Position) -> Option<usize> {
        self.index(pos).and_then(|i| self.cells[i])
    }

    pub(crate) fn tile(&self, idx: usize) -> &Tile {
        &self.tiles[idx]
    }

    /// All positions without a live tile, in row-major order
    pub fn empty_positions(&self) -> Vec<Position> {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, cell)| cell.is_none())
            .map(|(i, _)| Position::new(i / self.size, i % self.size))
            .collect()
    }

    pub fn is_full(&self) -> bool {
        self.cells.iter().all(|cell| cell.is_some())
    }

    /// Place a tile on the board
    ///
    /// Returns false (and leaves the board unchanged) if the position is out of
    /// bounds or already occupied. A tile flagged `is_merging` is stored without
    /// claiming its cell.
    pub fn insert(&mut self, tile: Tile) -> bool {
        let Some(i) = self.index(tile.position) else {
            return false;
        };
        debug_assert!(Tile::is_valid_value(tile.value), "invalid tile {tile:?}");
        if tile.is_merging {
            self.tiles.push(tile);
            return true;
        }
        if self.cells[i].is_some() {
            return false;
        }
        self.cells[i] = Some(self.tiles.len());
        self.tiles.push(tile);
        true
    }

    /// Move a live tile to an empty cell
    pub(crate) fn relocate(&mut self, idx: usize, to: Position) {
        let from = self.tiles[idx].position;
        let (Some(src), Some(dst)) = (self.index(from), self.index(to)) else {
            debug_assert!(false, "relocate out of bounds: {from} -> {to}");
            return;
        };
        debug_assert_eq!(self.cells[src], Some(idx));
        debug_assert!(self.cells[dst].is_none(), "relocate onto occupied cell {to}");
        self.cells[src] = None;
        self.cells[dst] = Some(idx);
        self.tiles[idx].position = to;
    }

    /// Flag a live tile as a fading merge source parked at `at`
    ///
    /// The tile gives up its cell.
    pub(crate) fn retire(&mut self, idx: usize, at: Position) {
        if let Some(i) = self.index(self.tiles[idx].position) {
            if self.cells[i] == Some(idx) {
                self.cells[i] = None;
            }
        }
        let tile = &mut self.tiles[idx];
        tile.position = at;
        tile.is_merging = true;
    }

    /// Remove all `is_merging` tiles; returns how many were removed
    pub fn remove_merging(&mut self) -> usize {
        let before = self.tiles.len();
        self.tiles.retain(|t| !t.is_merging);
        let removed = before - self.tiles.len();
        if removed > 0 {
            self.reindex();
        }
        removed
    }

    /// Copy of this board with merging tiles removed and all flags cleared
    pub fn settled(&self) -> Board {
        let mut board = self.clone();
        board.remove_merging();
        board.clear_flags();
        board
    }

    /// Clear the presentation flags of every tile
    pub fn clear_flags(&mut self) {
        for tile in &mut self.tiles {
            tile.clear_flags();
        }
    }

    /// Largest live tile value (0 on an empty board)
    pub fn max_value(&self) -> u32 {
        self.live_tiles().map(|t| t.value).max().unwrap_or(0)
    }

    /// Sum of live tile values
    pub fn live_sum(&self) -> u64 {
        self.live_tiles().map(|t| u64::from(t.value)).sum()
    }

    /// Clear the entire board
    pub fn clear(&mut self) {
        self.tiles.clear();
        self.cells.fill(None);
    }

    fn reindex(&mut self) {
        self.cells.fill(None);
        for (idx, tile) in self.tiles.iter().enumerate() {
            if tile.is_merging {
                continue;
            }
            let i = tile.position.row * self.size + tile.position.col;
            debug_assert!(self.cells[i].is_none(), "two live tiles at {}", tile.position);
            self.cells[i] = Some(idx);
        }
    }

    /// Check the settled-state invariants: live tiles in bounds, one per cell,
    /// valid values, and an index that agrees with the tile list
    pub fn check_invariants(&self) -> bool {
        let mut seen = vec![false; self.size * self.size];
        for (idx, tile) in self.tiles.iter().enumerate() {
            if !Tile::is_valid_value(tile.value) {
                return false;
            }
            let Some(i) = self.index(tile.position) else {
                return false;
            };
            if tile.is_merging {
                continue;
            }
            if seen[i] || self.cells[i] != Some(idx) {
                return false;
            }
            seen[i] = true;
        }
        self.cells
            .iter()
            .zip(&seen)
            .all(|(cell, &live)| cell.is_some() == live)
    }
}

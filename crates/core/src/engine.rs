//! Move engine - the directional slide-and-merge transform
//!
//! [`apply_move`] is a pure function of a board and a direction. It never mutates
//! its input; the caller decides whether to commit the returned board.
//!
//! # Algorithm
//!
//! 1. Start from a settled copy: drop fading merge sources, clear all flags.
//! 2. Visit live tiles nearest the destination edge first, so followers stack
//!    against tiles that have already moved.
//! 3. Each tile slides while the next cell is empty. If the cell that stopped it
//!    holds an equal value that has not merged this move, the two merge into a
//!    fresh tile of double value on the blocker's cell. Both sources are flagged
//!    `is_merging` and parked on that cell.
//! 4. Otherwise the tile lands on the furthest free cell it reached.
//!
//! A tile merges at most once per move: merge results carry `is_merged` and never
//! merge again, and consumed sources are skipped when their turn comes.

use tui_2048_types::{Direction, MergeEvent, Position, Tile};

use crate::board::{Board, TileIds};

/// Result of sliding a board in one direction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveResult {
    /// Board after the slide, still holding `is_merging` tiles
    pub board: Board,
    /// Sum of the values produced by merges
    pub score_delta: u32,
    /// False when the direction was a no-op for this board
    pub moved: bool,
    pub merges: Vec<MergeEvent>,
}

impl MoveResult {
    pub fn tiles(&self) -> &[Tile] {
        self.board.tiles()
    }
}

/// Processing rank of a position: 0 for the row or column on the destination edge
fn edge_distance(pos: Position, direction: Direction, size: usize) -> (usize, usize) {
    match direction {
        Direction::Up => (pos.row, pos.col),
        Direction::Down => (size - 1 - pos.row, pos.col),
        Direction::Left => (pos.col, pos.row),
        Direction::Right => (size - 1 - pos.col, pos.row),
    }
}

/// Slide every tile on `board` towards `direction`, merging equal pairs
///
/// Merge results get fresh ids from `ids`.
///
/// # Examples
///
/// ```
/// use tui_2048_core::{apply_move, Board, TileIds};
/// use tui_2048_types::Direction;
///
/// let board = Board::from_values(4, &[2, 2, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0]);
/// let mut ids = TileIds::after(&board);
/// let result = apply_move(&board, Direction::Left, &mut ids);
///
/// assert!(result.moved);
/// assert_eq!(result.score_delta, 4);
/// assert_eq!(result.board.settled().to_values()[0], 4);
/// ```
pub fn apply_move(board: &Board, direction: Direction, ids: &mut TileIds) -> MoveResult {
    let mut next = board.settled();
    let size = next.size();

    let mut order: Vec<usize> = (0..next.tiles().len()).collect();
    order.sort_by_key(|&idx| edge_distance(next.tile(idx).position, direction, size));

    let mut score_delta: u32 = 0;
    let mut moved = false;
    let mut merges = Vec::new();

    for idx in order {
        let tile = *next.tile(idx);
        if tile.is_merging {
            continue;
        }

        let origin = tile.position;
        let mut furthest = origin;
        let mut blocker = None;
        while let Some(step) = furthest.step(direction, size) {
            if let Some(other) = next.tile_index_at(step) {
                blocker = Some(other);
                break;
            }
            furthest = step;
        }

        let partner = blocker.filter(|&other| {
            let target = next.tile(other);
            target.value == tile.value && !target.is_merged && !target.is_merging
        });

        if let Some(other) = partner {
            let at = next.tile(other).position;
            // Boards up to MAX_GRID_SIZE top out at 2^26.
            let value = tile.value * 2;
            next.retire(idx, at);
            next.retire(other, at);
            let merged = Tile {
                is_merged: true,
                ..Tile::settled(ids.next_id(), value, at)
            };
            let placed = next.insert(merged);
            debug_assert!(placed, "merge target {at} still occupied");

            score_delta += value;
            merges.push(MergeEvent {
                value,
                position: at,
            });
            moved = true;
        } else if furthest != origin {
            next.relocate(idx, furthest);
            moved = true;
        }
    }

    debug_assert!(next.check_invariants(), "board invariants broken after {direction}");

    MoveResult {
        board: next,
        score_delta,
        moved,
        merges,
    }
}

/// Whether sliding in `direction` would change the board
pub fn can_move(board: &Board, direction: Direction) -> bool {
    let mut ids = TileIds::after(board);
    apply_move(board, direction, &mut ids).moved
}

//! Game-over detection
//!
//! A board is terminal when every cell is filled and no two orthogonally adjacent
//! tiles share a value. Only right and down neighbors are compared: each adjacent
//! pair is then seen exactly once, from its top or left member.

use tui_2048_types::{Direction, Position};

use crate::board::Board;

/// Whether no further move is possible
///
/// Merge sources still fading out are ignored; their merge result holds the cell.
pub fn is_terminal(board: &Board) -> bool {
    if !board.is_full() {
        return false;
    }
    !has_adjacent_pair(board)
}

/// Whether some live tile has an equal right or down neighbor
pub fn has_adjacent_pair(board: &Board) -> bool {
    let size = board.size();
    for row in 0..size {
        for col in 0..size {
            let pos = Position::new(row, col);
            let Some(tile) = board.tile_at(pos) else {
                continue;
            };
            for dir in [Direction::Right, Direction::Down] {
                let neighbor = pos
                    .step(dir, size)
                    .and_then(|next| board.tile_at(next));
                if neighbor.is_some_and(|n| n.value == tile.value) {
                    return true;
                }
            }
        }
    }
    false
}

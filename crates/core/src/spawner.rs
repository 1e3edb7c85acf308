//! Random tile spawner
//!
//! After a board-changing move exactly one tile appears on a uniformly chosen
//! empty cell: a 2 with probability 0.9, otherwise a 4. All randomness comes from
//! the caller's RNG so a seeded generator reproduces a game exactly.

use rand::seq::SliceRandom;
use rand::Rng;

use tui_2048_types::{Tile, FOUR_PROBABILITY};

use crate::board::{Board, TileIds};

/// Draw the value of a new tile
pub fn spawn_value<R: Rng + ?Sized>(rng: &mut R) -> u32 {
    if rng.gen_bool(FOUR_PROBABILITY) {
        4
    } else {
        2
    }
}

/// Pick a new tile for `board`, flagged `is_new`
///
/// Returns `None` when the board has no empty cell; a full board is not by itself
/// game over. The tile is not inserted; the caller commits it.
pub fn spawn<R: Rng + ?Sized>(board: &Board, ids: &mut TileIds, rng: &mut R) -> Option<Tile> {
    let empty = board.empty_positions();
    let position = *empty.choose(rng)?;
    let value = spawn_value(rng);
    Some(Tile::spawned(ids.next_id(), value, position))
}

/// Spawn a tile and place it on `board`
pub fn spawn_into<R: Rng + ?Sized>(
    board: &mut Board,
    ids: &mut TileIds,
    rng: &mut R,
) -> Option<Tile> {
    let tile = spawn(board, ids, rng)?;
    let placed = board.insert(tile);
    debug_assert!(placed, "spawned onto occupied cell {}", tile.position);
    Some(tile)
}

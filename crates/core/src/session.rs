//! Game session - orchestrates one game at a time
//!
//! The session owns the board and ties together the move engine, the spawner and
//! game-over detection. It tracks score and the pausable game timer and hands out
//! the data the front end and the history store need.
//!
//! # Lifecycle
//!
//! ```text
//! NotStarted --start_game--> Playing <--toggle_pause--> Paused
//!                               |
//!                               +--(no move left)--> GameOver
//! ```
//!
//! `start_game` may be called from any state and always begins a fresh game.
//!
//! # Settling
//!
//! A merge leaves both source tiles on the board flagged `is_merging` so a renderer
//! can fade them out. They are removed by [`GameSession::settle`], which `tick`
//! runs once `MERGE_SETTLE_MS` have passed. Score, occupancy and game-over status
//! are final when `apply_move` returns; settling only drops the ghosts.
//!
//! Every game gets a new generation number. A [`SettleTicket`] from an earlier
//! game is rejected by [`GameSession::settle_ticket`].

use log::{debug, info};
use rand::SeedableRng;
use rand_pcg::Pcg32;

use tui_2048_types::{
    Direction, GameAction, GameSummary, MergeEvent, SoundCue, Tile, GRID_SIZE, INITIAL_TILES,
    MERGE_SETTLE_MS, SCORE_POPUP_MS,
};

use crate::board::{Board, TileIds};
use crate::clock::{Clock, SystemClock};
use crate::engine;
use crate::snapshot::{ScorePopup, SessionSnapshot};
use crate::spawner;
use crate::terminal;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::IsVariant)]
pub enum SessionState {
    NotStarted,
    Playing,
    Paused,
    GameOver,
}

/// Handle for a deferred settle, tied to the game that scheduled it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SettleTicket {
    pub generation: u64,
    pub due_at_ms: u64,
}

/// What a call to [`GameSession::apply_move`] did
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MoveOutcome {
    /// False when the move was ignored (paused, over) or changed nothing
    pub moved: bool,
    pub score_delta: u32,
    pub merges: Vec<MergeEvent>,
    pub spawned: Option<Tile>,
    pub cue: Option<SoundCue>,
    pub settle: Option<SettleTicket>,
    /// True when this move ended the game
    pub game_over: bool,
}

/// A single-player game session
#[derive(Debug, Clone)]
pub struct GameSession<C: Clock = SystemClock> {
    board: Board,
    ids: TileIds,
    rng: Pcg32,
    clock: C,
    seed: u64,
    state: SessionState,
    score: u32,
    /// Monotonic game counter (increments on every `start_game`).
    generation: u64,
    /// Clock time of the first board-changing move, shifted forward by pauses.
    timer_started_at: Option<u64>,
    paused_at: Option<u64>,
    /// Elapsed time captured at game over.
    frozen_elapsed: Option<u64>,
    pending_settle: Option<SettleTicket>,
    popups: Vec<ScorePopup>,
    /// Summary of the last finished game (consumed by the history collaborator).
    summary: Option<GameSummary>,
}

impl GameSession<SystemClock> {
    /// Create a standard 4x4 session on the system clock
    pub fn new(seed: u64) -> Self {
        Self::with_clock(GRID_SIZE, seed, SystemClock::new())
    }
}

impl<C: Clock> GameSession<C> {
    /// Create a session in the `NotStarted` state
    ///
    /// # Panics
    ///
    /// Panics if `grid_size` is outside `2..=MAX_GRID_SIZE`.
    pub fn with_clock(grid_size: usize, seed: u64, clock: C) -> Self {
        Self {
            board: Board::new(grid_size),
            ids: TileIds::new(),
            rng: Pcg32::seed_from_u64(seed),
            clock,
            seed,
            state: SessionState::NotStarted,
            score: 0,
            generation: 0,
            timer_started_at: None,
            paused_at: None,
            frozen_elapsed: None,
            pending_settle: None,
            popups: Vec::new(),
            summary: None,
        }
    }

    /// Resume play from a prepared board, skipping the initial spawns
    ///
    /// A board with no legal move starts out in `GameOver`.
    pub fn from_board(board: Board, seed: u64, clock: C) -> Self {
        let mut session = Self::with_clock(board.size(), seed, clock);
        session.ids = TileIds::after(&board);
        session.board = board;
        session.generation = 1;
        session.state = SessionState::Playing;
        if terminal::is_terminal(&session.board) {
            session.finish();
        }
        session
    }

    /// Discard the current game and start a fresh one with two random tiles
    pub fn start_game(&mut self) {
        self.generation = self.generation.wrapping_add(1);
        self.board.clear();
        self.score = 0;
        self.state = SessionState::Playing;
        self.timer_started_at = None;
        self.paused_at = None;
        self.frozen_elapsed = None;
        self.pending_settle = None;
        self.popups.clear();
        self.summary = None;

        for _ in 0..INITIAL_TILES {
            spawner::spawn_into(&mut self.board, &mut self.ids, &mut self.rng);
        }

        info!(
            "game {} started on a {}x{} grid",
            self.generation,
            self.board.size(),
            self.board.size()
        );
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_game_over(&self) -> bool {
        self.state.is_game_over()
    }

    pub fn is_paused(&self) -> bool {
        self.state.is_paused()
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn grid_size(&self) -> usize {
        self.board.size()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn tiles(&self) -> &[Tile] {
        self.board.tiles()
    }

    pub fn popups(&self) -> &[ScorePopup] {
        &self.popups
    }

    pub fn pending_settle(&self) -> Option<SettleTicket> {
        self.pending_settle
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Milliseconds of unpaused play since the first board-changing move
    pub fn elapsed_time_ms(&self) -> u64 {
        if let Some(frozen) = self.frozen_elapsed {
            return frozen;
        }
        let Some(started) = self.timer_started_at else {
            return 0;
        };
        let end = self.paused_at.unwrap_or_else(|| self.clock.now_ms());
        end.saturating_sub(started)
    }

    /// Slide the board in `direction`
    ///
    /// Ignored unless the game is being played. A move that changes the board adds
    /// its merge score, spawns one tile, schedules a settle and checks for game
    /// over; a move that changes nothing has no effect at all.
    pub fn apply_move(&mut self, direction: Direction) -> MoveOutcome {
        if !self.state.is_playing() {
            debug!("move {direction} ignored in state {:?}", self.state);
            return MoveOutcome::default();
        }

        // Ghosts from the previous move must not outlive it.
        if self.pending_settle.is_some() {
            self.settle();
            if !self.state.is_playing() {
                return MoveOutcome::default();
            }
        }

        let result = engine::apply_move(&self.board, direction, &mut self.ids);
        if !result.moved {
            debug!("move {direction} changed nothing");
            return MoveOutcome::default();
        }

        let now = self.clock.now_ms();
        if self.timer_started_at.is_none() {
            self.timer_started_at = Some(now);
        }

        self.board = result.board;
        self.score = self.score.saturating_add(result.score_delta);
        let spawned = spawner::spawn_into(&mut self.board, &mut self.ids, &mut self.rng);

        self.popups
            .extend(result.merges.iter().map(|merge| ScorePopup {
                value: merge.value,
                position: merge.position,
                expires_at_ms: now + SCORE_POPUP_MS,
            }));

        let ticket = SettleTicket {
            generation: self.generation,
            due_at_ms: now + MERGE_SETTLE_MS,
        };
        self.pending_settle = Some(ticket);

        let cue = if result.score_delta > 0 {
            SoundCue::Merge
        } else {
            SoundCue::Move
        };

        debug!(
            "move {direction}: +{} ({} merges), score {}",
            result.score_delta,
            result.merges.len(),
            self.score
        );

        let game_over = terminal::is_terminal(&self.board);
        if game_over {
            self.finish();
        }

        MoveOutcome {
            moved: true,
            score_delta: result.score_delta,
            merges: result.merges,
            spawned,
            cue: Some(cue),
            settle: Some(ticket),
            game_over,
        }
    }

    /// Pause a running game; returns false if there was nothing to pause
    pub fn pause_game(&mut self) -> bool {
        if !self.state.is_playing() {
            return false;
        }
        self.state = SessionState::Paused;
        if self.timer_started_at.is_some() {
            self.paused_at = Some(self.clock.now_ms());
        }
        debug!("game {} paused", self.generation);
        true
    }

    /// Switch between `Playing` and `Paused`; other states are left alone
    pub fn toggle_pause(&mut self) -> bool {
        match self.state {
            SessionState::Playing => self.pause_game(),
            SessionState::Paused => {
                self.resume();
                true
            }
            SessionState::NotStarted | SessionState::GameOver => false,
        }
    }

    fn resume(&mut self) {
        self.state = SessionState::Playing;
        if let (Some(started), Some(paused_at)) = (self.timer_started_at, self.paused_at.take()) {
            let paused_for = self.clock.now_ms().saturating_sub(paused_at);
            self.timer_started_at = Some(started + paused_for);
        }
        debug!("game {} resumed", self.generation);
    }

    /// Remove merge ghosts and re-check for game over
    ///
    /// Returns the number of tiles removed.
    pub fn settle(&mut self) -> usize {
        self.pending_settle = None;
        let removed = self.board.remove_merging();
        let live = self.state.is_playing() || self.state.is_paused();
        if live && terminal::is_terminal(&self.board) {
            self.finish();
        }
        removed
    }

    /// Settle on behalf of a deferred callback
    ///
    /// Returns false, without touching the board, if the ticket belongs to an
    /// earlier game or has already been handled.
    pub fn settle_ticket(&mut self, ticket: SettleTicket) -> bool {
        if ticket.generation != self.generation || self.pending_settle != Some(ticket) {
            debug!(
                "stale settle ticket for game {} (current {})",
                ticket.generation, self.generation
            );
            return false;
        }
        self.settle();
        true
    }

    /// Advance time-driven work: a due settle and expired score popups
    ///
    /// Returns true if anything visible changed.
    pub fn tick(&mut self) -> bool {
        let now = self.clock.now_ms();
        let mut changed = false;

        if let Some(ticket) = self.pending_settle {
            if now >= ticket.due_at_ms {
                self.settle();
                changed = true;
            }
        }

        let before = self.popups.len();
        self.popups.retain(|popup| popup.expires_at_ms > now);
        changed |= self.popups.len() != before;

        changed
    }

    /// Apply a game action
    pub fn apply_action(&mut self, action: GameAction) -> bool {
        match action {
            GameAction::Move(direction) => self.apply_move(direction).moved,
            GameAction::Pause => self.toggle_pause(),
            GameAction::Restart => {
                self.start_game();
                true
            }
        }
    }

    /// Take the summary of a finished game, once
    pub fn take_summary(&mut self) -> Option<GameSummary> {
        self.summary.take()
    }

    fn finish(&mut self) {
        let elapsed = self.elapsed_time_ms();
        self.frozen_elapsed = Some(elapsed);
        self.paused_at = None;
        self.state = SessionState::GameOver;

        let summary = GameSummary {
            score: self.score,
            elapsed_time_ms: elapsed,
            max_tile_value: self.board.max_value(),
            timestamp_ms: self.clock.unix_ms(),
        };
        info!(
            "game {} over: score {}, max tile {}, {} ms",
            self.generation, summary.score, summary.max_tile_value, summary.elapsed_time_ms
        );
        self.summary = Some(summary);
    }

    pub fn snapshot_into(&self, out: &mut SessionSnapshot) {
        out.tiles.clear();
        out.tiles.extend_from_slice(self.board.tiles());
        out.grid_size = self.board.size();
        out.score = self.score;
        out.state = self.state;
        out.is_game_over = self.state.is_game_over();
        out.is_paused = self.state.is_paused();
        out.elapsed_time_ms = self.elapsed_time_ms();
        out.generation = self.generation;
        out.popups.clear();
        out.popups.extend_from_slice(&self.popups);
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        let mut s = SessionSnapshot::default();
        self.snapshot_into(&mut s);
        s
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use tui_2048_types::Position;

    fn row_board(first_row: [u32; 4]) -> Board {
        let mut values = [0u32; 16];
        values[..4].copy_from_slice(&first_row);
        Board::from_values(4, &values)
    }

    fn session_with(board: Board) -> (GameSession<ManualClock>, ManualClock) {
        let clock = ManualClock::with_unix_base(1_700_000_000_000);
        let session = GameSession::from_board(board, 12345, clock.clone());
        (session, clock)
    }

    #[test]
    fn test_new_session() {
        let session = GameSession::new(1);
        assert!(session.state().is_not_started());
        assert_eq!(session.score(), 0);
        assert_eq!(session.grid_size(), 4);
        assert!(session.tiles().is_empty());
        assert_eq!(session.elapsed_time_ms(), 0);
    }

    #[test]
    fn test_start_game_spawns_two_tiles() {
        let mut session = GameSession::with_clock(4, 7, ManualClock::new());
        session.start_game();
        assert!(session.state().is_playing());
        assert_eq!(session.tiles().len(), 2);
        assert!(session.tiles().iter().all(|t| t.is_new));
        assert!(session.board().check_invariants());
        assert_eq!(session.generation(), 1);
    }

    #[test]
    fn test_move_ignored_before_start() {
        let mut session = GameSession::with_clock(4, 7, ManualClock::new());
        let outcome = session.apply_move(Direction::Left);
        assert!(!outcome.moved);
        assert!(session.tiles().is_empty());
    }

    #[test]
    fn test_merge_move_scores_and_spawns() {
        let (mut session, _clock) = session_with(row_board([2, 2, 0, 0]));
        let outcome = session.apply_move(Direction::Left);

        assert!(outcome.moved);
        assert_eq!(outcome.score_delta, 4);
        assert_eq!(session.score(), 4);
        assert_eq!(outcome.cue, Some(SoundCue::Merge));
        assert!(outcome.spawned.is_some());
        assert!(outcome.settle.is_some());
        assert_eq!(session.popups().len(), 1);
        assert_eq!(
            session.board().tile_at(Position::new(0, 0)).map(|t| t.value),
            Some(4)
        );
        // Two ghosts, the merge result and the spawned tile.
        assert_eq!(session.tiles().len(), 4);
    }

    #[test]
    fn test_slide_without_merge_cues_move() {
        let (mut session, _clock) = session_with(row_board([0, 0, 0, 2]));
        let outcome = session.apply_move(Direction::Left);
        assert!(outcome.moved);
        assert_eq!(outcome.cue, Some(SoundCue::Move));
        assert_eq!(outcome.score_delta, 0);
    }

    #[test]
    fn test_noop_move_leaves_session_untouched() {
        let (mut session, _clock) = session_with(row_board([2, 4, 0, 0]));
        let before = session.board().clone();
        let outcome = session.apply_move(Direction::Left);
        assert!(!outcome.moved);
        assert_eq!(outcome.spawned, None);
        assert_eq!(session.board(), &before);
        assert_eq!(session.pending_settle(), None);
        assert_eq!(session.elapsed_time_ms(), 0);
    }

    #[test]
    fn test_tick_settles_after_delay() {
        let (mut session, clock) = session_with(row_board([2, 2, 0, 0]));
        session.apply_move(Direction::Left);
        assert!(session.tiles().iter().any(|t| t.is_merging));

        clock.advance(MERGE_SETTLE_MS - 1);
        session.tick();
        assert!(session.tiles().iter().any(|t| t.is_merging));

        clock.advance(1);
        assert!(session.tick());
        assert!(session.tiles().iter().all(|t| !t.is_merging));
        assert_eq!(session.tiles().len(), 2);
        assert_eq!(session.pending_settle(), None);
    }

    #[test]
    fn test_next_move_settles_pending_ghosts() {
        let (mut session, _clock) = session_with(row_board([2, 2, 0, 0]));
        session.apply_move(Direction::Left);
        for dir in Direction::ALL.iter().copied().cycle().take(12) {
            let outcome = session.apply_move(dir);
            if !outcome.moved {
                continue;
            }
            assert!(session.board().check_invariants());
            // Only the latest move's ghosts remain.
            let merging = session.tiles().iter().filter(|t| t.is_merging).count();
            assert_eq!(merging, 2 * outcome.merges.len());
        }
    }

    #[test]
    fn test_popups_expire() {
        let (mut session, clock) = session_with(row_board([2, 2, 0, 0]));
        session.apply_move(Direction::Left);
        assert_eq!(session.popups().len(), 1);
        clock.advance(SCORE_POPUP_MS);
        assert!(session.tick());
        assert!(session.popups().is_empty());
    }

    #[test]
    fn test_timer_starts_on_first_move_and_pauses() {
        let (mut session, clock) = session_with(row_board([0, 0, 0, 2]));
        clock.set(100);
        assert_eq!(session.elapsed_time_ms(), 0);

        session.apply_move(Direction::Left);
        clock.advance(400);
        assert_eq!(session.elapsed_time_ms(), 400);

        assert!(session.pause_game());
        assert!(session.is_paused());
        clock.advance(1_000);
        assert_eq!(session.elapsed_time_ms(), 400);

        assert!(!session.apply_move(Direction::Right).moved);

        assert!(session.toggle_pause());
        assert!(session.state().is_playing());
        clock.advance(100);
        assert_eq!(session.elapsed_time_ms(), 500);
    }

    #[test]
    fn test_pause_twice_is_noop() {
        let (mut session, _clock) = session_with(row_board([0, 0, 0, 2]));
        assert!(session.pause_game());
        assert!(!session.pause_game());
        assert!(session.is_paused());
    }

    #[test]
    fn test_game_over_emits_summary_once() {
        // Whatever spawns into (1, 1), no equal neighbors remain.
        let board = Board::from_values(2, &[8, 16, 0, 32]);
        let clock = ManualClock::with_unix_base(1_000_000);
        let mut session = GameSession::from_board(board, 5, clock.clone());
        clock.set(250);

        let outcome = session.apply_move(Direction::Left);
        assert!(outcome.moved);
        assert!(outcome.game_over);
        assert!(session.is_game_over());

        clock.advance(5_000);
        let summary = session.take_summary().unwrap();
        assert_eq!(summary.score, 0);
        assert_eq!(summary.max_tile_value, 32);
        assert_eq!(summary.elapsed_time_ms, 0);
        assert_eq!(summary.timestamp_ms, 1_000_250);
        assert_eq!(session.take_summary(), None);

        // Frozen state: moves and pause are ignored, settle does not re-emit.
        assert!(!session.apply_move(Direction::Right).moved);
        assert!(!session.toggle_pause());
        session.settle();
        assert_eq!(session.take_summary(), None);
    }

    #[test]
    fn test_stuck_board_starts_game_over() {
        let (mut session, _clock) = session_with(Board::from_values(2, &[2, 4, 4, 2]));
        assert!(session.is_game_over());
        assert!(!session.apply_move(Direction::Left).moved);

        let summary = session.take_summary().unwrap();
        assert_eq!(summary.max_tile_value, 4);
        assert_eq!(summary.elapsed_time_ms, 0);

        session.start_game();
        assert!(session.state().is_playing());
    }

    #[test]
    fn test_stale_settle_ticket_is_rejected() {
        let mut session = GameSession::with_clock(4, 99, ManualClock::new());
        session.start_game();
        let ticket = Direction::ALL
            .iter()
            .find_map(|&dir| session.apply_move(dir).settle)
            .unwrap();

        session.start_game();
        let tiles = session.tiles().to_vec();
        assert!(!session.settle_ticket(ticket));
        assert_eq!(session.tiles(), tiles.as_slice());
    }

    #[test]
    fn test_current_settle_ticket_is_accepted_once() {
        let (mut session, _clock) = session_with(row_board([2, 2, 0, 0]));
        let ticket = session.apply_move(Direction::Left).settle.unwrap();
        assert!(session.settle_ticket(ticket));
        assert!(!session.settle_ticket(ticket));
        assert!(session.tiles().iter().all(|t| !t.is_merging));
    }

    #[test]
    fn test_restart_resets_everything() {
        let (mut session, clock) = session_with(row_board([2, 2, 0, 0]));
        session.apply_move(Direction::Left);
        clock.advance(50);
        assert!(session.apply_action(GameAction::Restart));

        assert_eq!(session.score(), 0);
        assert_eq!(session.elapsed_time_ms(), 0);
        assert_eq!(session.tiles().len(), 2);
        assert!(session.popups().is_empty());
        assert_eq!(session.pending_settle(), None);
        assert_eq!(session.generation(), 2);
    }

    #[test]
    fn test_same_seed_same_game() {
        let mut a = GameSession::with_clock(4, 2024, ManualClock::new());
        let mut b = GameSession::with_clock(4, 2024, ManualClock::new());
        a.start_game();
        b.start_game();
        for dir in [Direction::Left, Direction::Up, Direction::Right, Direction::Down].repeat(5) {
            assert_eq!(a.apply_move(dir), b.apply_move(dir));
        }
        assert_eq!(a.board().to_values(), b.board().to_values());
    }

    #[test]
    fn test_snapshot_reflects_session() {
        let (mut session, _clock) = session_with(row_board([2, 2, 0, 0]));
        session.apply_move(Direction::Left);
        session.pause_game();

        let snap = session.snapshot();
        assert_eq!(snap.score, 4);
        assert!(snap.is_paused);
        assert!(!snap.is_game_over);
        assert!(!snap.playable());
        assert_eq!(snap.grid_size, 4);
        assert_eq!(snap.tiles.len(), session.tiles().len());
        assert_eq!(snap.max_tile_value(), 4);
    }
}

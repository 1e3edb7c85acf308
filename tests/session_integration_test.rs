//! Integration tests for the game session and the application controller

use crossterm::event::{
    Event, KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use proptest::prelude::*;
use tempfile::tempdir;

use tui_2048::app::{App, Flow, Screen};
use tui_2048::core::{Board, GameSession, ManualClock, SessionState};
use tui_2048::store::{HistoryStore, Settings};
use tui_2048::term::{FrameBuffer, GameView, Viewport};
use tui_2048::types::{Direction, GameAction, MERGE_SETTLE_MS};

fn key(code: KeyCode) -> Event {
    Event::Key(KeyEvent::from(code))
}

/// A 2x2 game that ends on the first move to the left
fn doomed_session(clock: ManualClock) -> GameSession<ManualClock> {
    GameSession::from_board(Board::from_values(2, &[8, 16, 0, 32]), 11, clock)
}

#[test]
fn test_game_lifecycle() {
    let clock = ManualClock::new();
    let mut game = GameSession::with_clock(4, 12345, clock.clone());
    assert_eq!(game.state(), SessionState::NotStarted);

    game.start_game();
    assert_eq!(game.state(), SessionState::Playing);
    assert_eq!(game.tiles().len(), 2);
    assert_eq!(game.score(), 0);

    assert!(game.apply_action(GameAction::Pause));
    assert_eq!(game.state(), SessionState::Paused);
    assert!(!game.apply_action(GameAction::Move(Direction::Left)));
    assert!(game.apply_action(GameAction::Pause));
    assert_eq!(game.state(), SessionState::Playing);
}

#[test]
fn test_score_accumulates_across_moves() {
    let clock = ManualClock::new();
    let board = Board::from_values(4, &[2, 2, 4, 4, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0]);
    let mut game = GameSession::from_board(board, 5, clock.clone());

    let outcome = game.apply_move(Direction::Left);
    assert_eq!(outcome.score_delta, 12);
    assert_eq!(outcome.merges.len(), 2);
    assert_eq!(game.score(), 12);

    clock.advance(MERGE_SETTLE_MS);
    game.tick();
    assert!(game.tiles().iter().all(|t| !t.is_merging));
}

#[test]
fn test_restart_invalidates_pending_settle() {
    let clock = ManualClock::new();
    let board = Board::from_values(4, &[2, 2, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0]);
    let mut game = GameSession::from_board(board, 5, clock.clone());
    let ticket = game.apply_move(Direction::Left).settle.unwrap();

    game.start_game();
    assert_eq!(game.pending_settle(), None);
    assert!(!game.settle_ticket(ticket));
    clock.advance(MERGE_SETTLE_MS * 2);
    assert!(!game.tick());
    assert_eq!(game.tiles().len(), 2);
}

#[test]
fn test_played_out_game_emits_one_summary() {
    let clock = ManualClock::with_unix_base(1_000);
    let mut game = GameSession::with_clock(3, 77, clock.clone());
    game.start_game();

    let mut summaries = Vec::new();
    for step in 0..20_000 {
        let dir = Direction::ALL[step % 4];
        game.apply_move(dir);
        clock.advance(40);
        game.tick();
        summaries.extend(game.take_summary());
        if game.is_game_over() {
            break;
        }
    }

    assert!(game.is_game_over(), "3x3 game should end");
    assert_eq!(summaries.len(), 1);
    let summary = summaries[0];
    assert_eq!(summary.score, game.score());
    assert_eq!(summary.max_tile_value, game.board().max_value());
    assert_eq!(summary.elapsed_time_ms, game.elapsed_time_ms());
    assert!(summary.timestamp_ms >= 1_000);
}

proptest! {
    #[test]
    fn prop_random_play_keeps_invariants(
        seed in any::<u64>(),
        moves in prop::collection::vec(prop::sample::select(Direction::ALL.to_vec()), 1..120),
    ) {
        let clock = ManualClock::new();
        let mut game = GameSession::with_clock(4, seed, clock.clone());
        game.start_game();

        let mut total = 0u32;
        for dir in moves {
            let before = game.board().settled();
            let outcome = game.apply_move(dir);
            total += outcome.score_delta;

            prop_assert!(game.board().check_invariants());
            prop_assert_eq!(game.score(), total);
            if outcome.moved {
                let spawned = outcome.spawned.map_or(0, |t| u64::from(t.value));
                prop_assert_eq!(game.board().live_sum(), before.live_sum() + spawned);
            } else {
                prop_assert_eq!(game.board().settled().to_values(), before.to_values());
            }
            clock.advance(20);
        }
    }
}

#[test]
fn test_app_moves_on_arrow_keys_and_quits() {
    let session = GameSession::from_board(
        Board::from_values(4, &[0, 0, 0, 2, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0]),
        1,
        ManualClock::new(),
    );
    let mut app = App::new(session, Settings::default(), None);

    assert_eq!(app.handle_event(&key(KeyCode::Left)), Flow::Continue);
    assert_eq!(app.session().board().live_tiles().count(), 2);
    assert!(app.take_bell());
    assert!(!app.take_bell());

    assert_eq!(app.handle_event(&key(KeyCode::Char('q'))), Flow::Quit);
}

#[test]
fn test_app_muted_sound_does_not_ring() {
    let session = GameSession::from_board(
        Board::from_values(2, &[0, 2, 0, 0]),
        1,
        ManualClock::new(),
    );
    let settings = Settings {
        sound_enabled: false,
        ..Settings::default()
    };
    let mut app = App::new(session, settings, None);
    app.apply(GameAction::Move(Direction::Left));
    assert!(!app.take_bell());
}

#[test]
fn test_app_mouse_swipe_moves() {
    let session = GameSession::from_board(
        Board::from_values(4, &[2, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0]),
        1,
        ManualClock::new(),
    );
    let mut app = App::new(session, Settings::default(), None);
    let mouse = |kind, column| {
        Event::Mouse(MouseEvent {
            kind,
            column,
            row: 5,
            modifiers: KeyModifiers::NONE,
        })
    };
    app.handle_event(&mouse(MouseEventKind::Down(MouseButton::Left), 10));
    app.handle_event(&mouse(MouseEventKind::Up(MouseButton::Left), 30));
    assert!(app.session().board().is_occupied(tui_2048::types::Position::new(0, 3)));
}

#[test]
fn test_app_records_finished_game() {
    let dir = tempdir().unwrap();
    let store = HistoryStore::in_dir(dir.path());
    let mut app = App::new(
        doomed_session(ManualClock::new()),
        Settings::default(),
        Some(store.clone()),
    );

    app.handle_event(&key(KeyCode::Left));
    assert!(app.session().is_game_over());
    assert_eq!(app.history().len(), 1);
    assert_eq!(app.stats().games_played, 1);
    assert_eq!(app.stats().best_tile, 32);

    // Persisted, and not recorded twice.
    app.tick();
    assert_eq!(store.load().unwrap().len(), 1);

    // A new app sees the recorded game.
    let again = App::new(
        doomed_session(ManualClock::new()),
        Settings::default(),
        Some(store),
    );
    assert_eq!(again.hud().games_played, 1);
}

#[test]
fn test_app_history_screen_pauses_and_clears() {
    let dir = tempdir().unwrap();
    let store = HistoryStore::in_dir(dir.path());
    let mut app = App::new(
        doomed_session(ManualClock::new()),
        Settings::default(),
        Some(store.clone()),
    );
    app.handle_event(&key(KeyCode::Left));
    app.handle_event(&key(KeyCode::Char('r')));
    assert!(app.session().state().is_playing());

    app.handle_event(&key(KeyCode::Char('?')));
    assert_eq!(app.screen(), Screen::History);
    assert!(app.session().is_paused());

    // Moves are not applied on the history screen.
    let tiles = app.session().tiles().to_vec();
    app.handle_event(&key(KeyCode::Left));
    assert_eq!(app.session().tiles(), tiles.as_slice());

    let mut fb = FrameBuffer::new(0, 0);
    app.render_into(&GameView::default(), Viewport::new(60, 16), &mut fb);
    assert!((0..fb.height()).any(|y| fb.row_text(y).contains("HISTORY")));

    app.handle_event(&key(KeyCode::Char('c')));
    assert!(app.history().is_empty());
    assert!(store.load().unwrap().is_empty());

    app.handle_event(&key(KeyCode::Char('?')));
    assert_eq!(app.screen(), Screen::Game);
    assert!(app.session().is_paused());
}

#[test]
fn test_app_sound_keys_are_saved_and_reloaded() {
    let dir = tempdir().unwrap();
    let session = GameSession::from_board(
        Board::from_values(4, &[0, 0, 0, 2, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0]),
        1,
        ManualClock::new(),
    );
    let mut app = App::new(session, Settings::default(), None).with_settings_dir(dir.path());

    app.handle_event(&key(KeyCode::Char('-')));
    app.handle_event(&key(KeyCode::Char('-')));
    assert_eq!(app.hud().volume_pct, 80);
    assert!(app.hud().sound_on);

    app.handle_event(&key(KeyCode::Char('m')));
    assert!(!app.settings().sound_enabled);
    assert!(!app.hud().sound_on);

    // Muted: a move rings nothing.
    app.handle_event(&key(KeyCode::Left));
    assert!(!app.take_bell());

    let reloaded = Settings::load(dir.path()).unwrap();
    assert!(!reloaded.sound_enabled);
    assert_eq!(reloaded.volume_pct(), 80);
    assert_eq!(
        Settings::resolve(Some(dir.path()), |_| None).unwrap(),
        reloaded
    );

    // Unmuting from a fresh app picks up the saved volume.
    let session = GameSession::with_clock(4, 2, ManualClock::new());
    let mut again = App::new(session, reloaded, None).with_settings_dir(dir.path());
    again.handle_event(&key(KeyCode::Char('m')));
    again.handle_event(&key(KeyCode::Char('+')));
    let reloaded = Settings::load(dir.path()).unwrap();
    assert!(reloaded.sound_enabled);
    assert_eq!(reloaded.volume_pct(), 90);
}

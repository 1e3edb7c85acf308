use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand::SeedableRng;
use rand_pcg::Pcg32;

use tui_2048::core::{apply_move, is_terminal, spawn, Board, GameSession, ManualClock, TileIds};
use tui_2048::term::{FrameBuffer, GameView, HudInfo, Viewport};
use tui_2048::types::Direction;

fn busy_board() -> Board {
    Board::from_values(4, &[2, 2, 4, 8, 0, 4, 4, 0, 16, 0, 16, 2, 2, 2, 0, 2])
}

fn bench_apply_move(c: &mut Criterion) {
    let board = busy_board();
    c.bench_function("apply_move_left", |b| {
        b.iter(|| {
            let mut ids = TileIds::after(&board);
            apply_move(black_box(&board), Direction::Left, &mut ids)
        })
    });
}

fn bench_spawn(c: &mut Criterion) {
    let board = busy_board();
    let mut rng = Pcg32::seed_from_u64(12345);
    c.bench_function("spawn_tile", |b| {
        b.iter(|| {
            let mut ids = TileIds::after(&board);
            spawn(black_box(&board), &mut ids, &mut rng)
        })
    });
}

fn bench_game_over_check(c: &mut Criterion) {
    let values: Vec<u32> = (0..16)
        .map(|i| if (i / 4 + i % 4) % 2 == 0 { 2 } else { 4 })
        .collect();
    let board = Board::from_values(4, &values);
    c.bench_function("is_terminal_full_board", |b| {
        b.iter(|| is_terminal(black_box(&board)))
    });
}

fn bench_session_moves(c: &mut Criterion) {
    c.bench_function("session_100_moves", |b| {
        b.iter(|| {
            let clock = ManualClock::new();
            let mut game = GameSession::with_clock(4, 12345, clock.clone());
            game.start_game();
            for i in 0..100 {
                game.apply_move(Direction::ALL[i % 4]);
                clock.advance(200);
                game.tick();
            }
            game.score()
        })
    });
}

fn bench_render(c: &mut Criterion) {
    let mut game = GameSession::with_clock(4, 7, ManualClock::new());
    game.start_game();
    let view = GameView::default();
    let mut fb = FrameBuffer::new(80, 24);
    let snap = game.snapshot();
    c.bench_function("render_80x24", |b| {
        b.iter(|| {
            view.render_into(
                black_box(&snap),
                &HudInfo::default(),
                Viewport::new(80, 24),
                &mut fb,
            )
        })
    });
}

criterion_group!(
    benches,
    bench_apply_move,
    bench_spawn,
    bench_game_over_check,
    bench_session_moves,
    bench_render
);
criterion_main!(benches);

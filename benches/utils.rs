use chess_rules::perft::perft;
use chess_rules::{Board, Color, Game, LegalMoveChecker};
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn stupid_game(mut game: Game, max_steps: usize, seed: u64) -> Game {
    let mut rng = StdRng::seed_from_u64(seed);
    for _ in 0..max_steps {
        if !matches!(game.make_random_move(&mut rng), Ok(None)) {
            break;
        }
    }
    game
}

fn probe_all(board: &mut Board) -> usize {
    let candidates = board.pseudo_legal_moves(Color::White);
    LegalMoveChecker::new(board, Color::White)
        .and_then(|mut checker| checker.filter(candidates))
        .map(|moves| moves.len())
        .unwrap_or(0)
}

fn criterion_benchmark(c: &mut Criterion) {
    let board = Board::standard().unwrap();
    c.bench_function("pseudo legal moves", |b| {
        b.iter(|| black_box(&board).pseudo_legal_moves(Color::White))
    });
    c.bench_function("legal moves", |b| {
        b.iter(|| black_box(&board).legal_moves(Color::White))
    });
    c.bench_function("in place probing", |b| {
        let mut board = board.clone();
        b.iter(|| probe_all(black_box(&mut board)))
    });
    c.bench_function("perft 2", |b| {
        b.iter(|| perft(black_box(&board), Color::White, 2))
    });
    c.bench_function("stupid game 100", |b| {
        b.iter(|| stupid_game(Game::new().unwrap(), 100, 7))
    });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);

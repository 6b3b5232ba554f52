#![no_main]
use connect_four_mcts::game::{Dimensions, Game};
use libfuzzer_sys::fuzz_target;
use pretty_assertions::assert_eq;

// The first two bytes pick the board size, every following byte is a column.
fuzz_target!(|data: &[u8]| {
    let [rows, columns, moves @ ..] = data else {
        return;
    };
    let Ok(dimensions) = Dimensions::new(*rows % 17, *columns % 17) else {
        return;
    };
    let mut game = Game::new(dimensions);
    for &column in moves {
        let before = game.board().clone();
        match game.play(column % (dimensions.columns() + 1)) {
            Ok(outcome) => {
                assert_eq!(game.board().plies(), before.plies() + 1);
                assert_eq!(outcome, game.board().game_over());
                if outcome.is_some() {
                    assert!(game.play(0).is_err());
                    return;
                }
            },
            Err(_) => assert_eq!(game.board(), &before),
        }
    }
});

#![no_main]
use connect_four_mcts::game::Board;
use libfuzzer_sys::fuzz_target;
use pretty_assertions::assert_eq;

fuzz_target!(|data: &[u8]| {
    let Ok(input) = std::str::from_utf8(data) else {
        return;
    };
    if let Ok(board) = Board::from_notation(input) {
        let printed = board.to_string();
        assert_eq!(Board::from_notation(&printed).ok(), Some(board));
    }
});

/// Asserts that a board's live cells are exactly the given coordinates.
#[macro_export]
macro_rules! assert_live_cells {
    ($board:expr, $expected:expr) => {
        let board = &$board;
        let mut expected: Vec<(usize, usize)> = $expected.to_vec();
        expected.sort_unstable();
        assert_eq!(
            board.live_cells(),
            expected,
            "Live cells mismatch on a {0}x{0} board",
            board.size()
        );
    };
}

/// Asserts that two boards are identical cell for cell.
#[macro_export]
macro_rules! assert_same_board {
    ($left:expr, $right:expr) => {
        assert_eq!(
            $left.digest(),
            $right.digest(),
            "Boards differ: {} vs {} alive",
            $left.alive_count(),
            $right.alive_count()
        );
        assert_eq!($left, $right);
    };
}

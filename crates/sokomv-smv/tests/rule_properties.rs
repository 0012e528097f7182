//! Property tests over the compiled rule table: no guard ever references
//! an off-grid coordinate, walls are constant, and box count is conserved
//! by any single synchronous application.

use proptest::prelude::*;
use sokomv_board::{Board, Move, Tile};
use sokomv_smv::{CellRule, TransitionModel};

const NON_PLAYER: [Tile; 5] = [
    Tile::Wall,
    Tile::Floor,
    Tile::Goal,
    Tile::Box,
    Tile::BoxOnGoal,
];

/// Random rectangular boards with exactly one player cell.
fn arb_board() -> impl Strategy<Value = Board> {
    (2usize..=5, 2usize..=5)
        .prop_flat_map(|(rows, cols)| {
            (
                Just((rows, cols)),
                proptest::collection::vec(
                    proptest::sample::select(NON_PLAYER.to_vec()),
                    rows * cols,
                ),
                0..rows * cols,
                any::<bool>(),
            )
        })
        .prop_map(|((_, cols), mut cells, player, on_goal)| {
            cells[player] = if on_goal {
                Tile::PlayerOnGoal
            } else {
                Tile::Player
            };
            let grid: Vec<Vec<Tile>> = cells.chunks(cols).map(|chunk| chunk.to_vec()).collect();
            Board::from_cells(grid).expect("generated boards are valid")
        })
}

proptest! {
    #[test]
    fn guards_stay_inside_the_grid(board in arb_board()) {
        let model = TransitionModel::compile(&board);
        for (_, rule) in model.cells() {
            let CellRule::Cases(cases) = rule else { continue };
            for case in cases {
                for cond in &case.guard.cells {
                    prop_assert!(cond.coord.0 < board.rows());
                    prop_assert!(cond.coord.1 < board.cols());
                }
            }
        }
    }

    #[test]
    fn wall_cells_are_constant(board in arb_board(), mv in proptest::sample::select(Move::ALL.to_vec())) {
        let model = TransitionModel::compile(&board);
        for ((row, col), rule) in model.cells() {
            if board.get(row, col) == Some(Tile::Wall) {
                prop_assert_eq!(rule, &CellRule::Constant(Tile::Wall));
            }
        }
        let next = model.apply(&board, mv);
        for row in 0..board.rows() {
            for col in 0..board.cols() {
                if board.get(row, col) == Some(Tile::Wall) {
                    prop_assert_eq!(next.get(row, col), Some(Tile::Wall));
                }
            }
        }
    }

    #[test]
    fn box_count_is_conserved(board in arb_board(), mv in proptest::sample::select(Move::ALL.to_vec())) {
        let model = TransitionModel::compile(&board);
        let next = model.apply(&board, mv);
        prop_assert_eq!(next.box_count(), board.box_count());
    }

    #[test]
    fn player_is_conserved(board in arb_board(), mv in proptest::sample::select(Move::ALL.to_vec())) {
        let model = TransitionModel::compile(&board);
        let next = model.apply(&board, mv);
        let players = |b: &Board| {
            (0..b.rows())
                .flat_map(|r| (0..b.cols()).map(move |c| (r, c)))
                .filter(|&(r, c)| b.get(r, c).is_some_and(Tile::is_player))
                .count()
        };
        prop_assert_eq!(players(&next), 1);
        prop_assert_eq!(players(&board), 1);
    }
}

//! Cross-crate round trip: build the predicate for a board, feed back a
//! synthetic trace that boxes every goal, and check the predicate holds
//! on the decoded board.

use sokomv_board::Board;
use sokomv_nuxmv::decode_final_board;
use sokomv_smv::SolvabilityPredicate;

#[test]
fn boxing_every_goal_satisfies_the_predicate() {
    let board = Board::parse("#####\n#@$.#\n#*-.#\n#####").unwrap();
    let predicate = SolvabilityPredicate::for_board(&board);
    assert!(!predicate.holds(&board));

    let mut trace = String::from("  -> State: 1.1 <-\n");
    for &(row, col) in predicate.goals() {
        trace.push_str(&format!("    game_board[{row}][{col}] = BonGoal\n"));
    }

    let decoded = decode_final_board(&trace, &board).unwrap().unwrap();
    assert!(predicate.holds(&decoded));
}

#[test]
fn goal_free_board_is_vacuously_satisfied() {
    let board = Board::parse("####\n#@-#\n####").unwrap();
    let predicate = SolvabilityPredicate::for_board(&board);
    assert!(predicate.goals().is_empty());
    assert!(predicate.holds(&board));
}

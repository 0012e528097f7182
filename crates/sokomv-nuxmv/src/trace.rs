//! Counterexample trace decoding.
//!
//! nuXmv prints a counterexample as `State` blocks of `variable = value`
//! lines, optionally followed by a loop marker. Blocks after the first
//! list only the variables that changed, so an absent `movement` line
//! means "same as before" and a duplicate one is routine. Two read-outs
//! are supported over the same text: the movement sequence (the solution)
//! and the final board snapshot (incremental solving). Both are small
//! line-driven state machines over a shared typed line classifier;
//! recognized-but-malformed lines are errors, unrecognized prose is
//! skipped.

use crate::TraceError;
use sokomv_board::{Board, Move, Tile};

/// A typed cell assignment extracted from one trace line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellAssign {
    pub row: usize,
    pub col: usize,
    pub tile: Tile,
}

/// Classification of one raw trace line.
#[derive(Debug, Clone, PartialEq, Eq)]
enum LineKind {
    /// `-> State: 1.2 <-` step delimiter.
    StateHeader,
    /// `movement = l`
    Movement(Move),
    /// `game_board[0][1] = Box`
    Cell(CellAssign),
    /// `-- Loop starts here`
    LoopMarker,
    /// Prose, specification echoes, blank lines.
    Other,
}

fn classify(line: &str) -> Result<LineKind, TraceError> {
    let trimmed = line.trim();
    if trimmed.contains("Loop starts here") {
        return Ok(LineKind::LoopMarker);
    }
    if trimmed.contains("State") {
        return Ok(LineKind::StateHeader);
    }
    if let Some(rest) = trimmed.strip_prefix("movement") {
        if let Some(value) = rest.trim_start().strip_prefix('=') {
            let token = value.trim();
            return Move::from_smv_token(token)
                .map(LineKind::Movement)
                .ok_or_else(|| TraceError::UnknownMovement {
                    token: token.to_string(),
                });
        }
    }
    if trimmed.starts_with("game_board") {
        return parse_cell(trimmed).map(LineKind::Cell);
    }
    Ok(LineKind::Other)
}

/// `[N]` prefix of `s`: the index and the remainder.
fn parse_index(s: &str) -> Option<(usize, &str)> {
    let s = s.strip_prefix('[')?;
    let end = s.find(']')?;
    let index = s[..end].parse().ok()?;
    Some((index, &s[end + 1..]))
}

/// Shape: `game_board[R][C] = TileName`.
fn parse_cell(line: &str) -> Result<CellAssign, TraceError> {
    let malformed = || TraceError::MalformedCell {
        line: line.to_string(),
    };
    let rest = line.strip_prefix("game_board").ok_or_else(malformed)?;
    let (row, rest) = parse_index(rest).ok_or_else(malformed)?;
    let (col, rest) = parse_index(rest).ok_or_else(malformed)?;
    let value = rest
        .trim_start()
        .strip_prefix('=')
        .ok_or_else(malformed)?
        .trim();
    let tile = Tile::from_smv_name(value).ok_or_else(|| TraceError::UnknownTile {
        name: value.to_string(),
    })?;
    Ok(CellAssign { row, col, tile })
}

/// Extract the solution move sequence from raw checker output.
///
/// Each block's `movement` line overwrites a pending register that is
/// committed at the next state delimiter; a block without a movement
/// line inherits the previous value. Scanning stops at the loop marker.
/// The trailing pending movement is committed last and the final element
/// then dropped: the last recorded movement leads into the looping or
/// terminal state and is not part of the solution path. No state blocks
/// at all decodes to an empty sequence; the caller decides what "no
/// counterexample" means for the engine that produced the text.
pub fn decode_moves(raw: &str) -> Result<Vec<Move>, TraceError> {
    let mut pending = None;
    let mut moves = Vec::new();

    for line in raw.lines() {
        match classify(line)? {
            LineKind::StateHeader => {
                if let Some(mv) = pending {
                    moves.push(mv);
                }
            }
            LineKind::Movement(mv) => pending = Some(mv),
            LineKind::LoopMarker => break,
            LineKind::Cell(_) | LineKind::Other => {}
        }
    }

    if let Some(mv) = pending {
        moves.push(mv);
    }
    moves.pop();
    Ok(moves)
}

/// Decode the final state block into the successor of `prior`.
///
/// Returns `None` when the text contains no state block at all: the
/// checker found no counterexample, so the objective is unreachable.
/// Wall assignments are skipped (walls are constant in every generated
/// rule); everything else overwrites the prior board, bounds-checked.
pub fn decode_final_board(raw: &str, prior: &Board) -> Result<Option<Board>, TraceError> {
    let mut in_step = false;
    let mut final_block: Vec<CellAssign> = Vec::new();

    for line in raw.lines() {
        match classify(line)? {
            LineKind::StateHeader => {
                in_step = true;
                final_block.clear();
            }
            LineKind::Cell(assign) if in_step => final_block.push(assign),
            _ => {}
        }
    }

    if !in_step {
        return Ok(None);
    }

    let mut board = prior.clone();
    for assign in final_block {
        if assign.tile == Tile::Wall {
            continue;
        }
        if !board.set(assign.row, assign.col, assign.tile) {
            return Err(TraceError::CellOutOfRange {
                row: assign.row,
                col: assign.col,
                rows: board.rows(),
                cols: board.cols(),
            });
        }
    }
    Ok(Some(board))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_moves_and_drops_the_loop_entry() {
        let raw = "\
-- specification !( F is_solvable)  is false
-- as demonstrated by the following execution sequence
Trace Description: BMC Counterexample
Trace Type: Counterexample
  -> State: 1.1 <-
    game_board[1][1] = Player
    movement = u
  -> State: 1.2 <-
    movement = d
  -> State: 1.3 <-
    movement = l
  -- Loop starts here
  -> State: 1.4 <-
    movement = r
";
        assert_eq!(decode_moves(raw).unwrap(), vec![Move::Up, Move::Down]);
    }

    #[test]
    fn absent_movement_lines_inherit_the_previous_value() {
        // Blocks only list changed variables; a silent block repeats the
        // last movement.
        let raw = "\
  -> State: 1.1 <-
    movement = u
  -> State: 1.2 <-
  -> State: 1.3 <-
    movement = l
";
        assert_eq!(decode_moves(raw).unwrap(), vec![Move::Up, Move::Up]);
    }

    #[test]
    fn no_state_blocks_decode_to_nothing() {
        let raw = "-- specification !( F is_solvable)  is true\n";
        assert_eq!(decode_moves(raw).unwrap(), Vec::<Move>::new());
    }

    #[test]
    fn single_state_without_movement_is_also_empty() {
        // Semantically "trivially solved", not "no counterexample"; both
        // decode to an empty sequence and the caller tells them apart.
        let raw = "  -> State: 1.1 <-\n    game_board[0][0] = Wall\n";
        assert_eq!(decode_moves(raw).unwrap(), Vec::<Move>::new());
    }

    #[test]
    fn unknown_movement_token_is_rejected() {
        let raw = "  -> State: 1.1 <-\n    movement = q\n";
        assert_eq!(
            decode_moves(raw).unwrap_err(),
            TraceError::UnknownMovement {
                token: "q".to_string()
            }
        );
    }

    #[test]
    fn malformed_cell_lines_are_rejected() {
        let raw = "  -> State: 1.1 <-\n    game_board[0 = Box\n";
        assert!(matches!(
            decode_moves(raw).unwrap_err(),
            TraceError::MalformedCell { .. }
        ));

        let raw = "  -> State: 1.1 <-\n    game_board[0][0] = Crate\n";
        assert_eq!(
            decode_moves(raw).unwrap_err(),
            TraceError::UnknownTile {
                name: "Crate".to_string()
            }
        );
    }

    fn floor_board() -> Board {
        // 3x3 all-floor board with a player in the corner.
        Board::parse("@--\n---\n---").unwrap()
    }

    #[test]
    fn final_block_is_applied_and_walls_are_skipped() {
        let raw = "\
  -> State: 1.1 <-
    game_board[1][1] = Box
  -> State: 1.2 <-
    game_board[0][1] = Box
    game_board[2][2] = Wall
";
        let prior = floor_board();
        let next = decode_final_board(raw, &prior).unwrap().unwrap();
        assert_eq!(next.get(0, 1), Some(Tile::Box));
        // The Wall line is ignored, and earlier blocks do not apply.
        assert_eq!(next.get(2, 2), Some(Tile::Floor));
        assert_eq!(next.get(1, 1), Some(Tile::Floor));
        assert_eq!(next.get(0, 0), Some(Tile::Player));
    }

    #[test]
    fn no_state_blocks_mean_unsolvable() {
        let raw = "-- specification !( F is_solvable)  is true\n";
        assert_eq!(decode_final_board(raw, &floor_board()).unwrap(), None);
    }

    #[test]
    fn out_of_range_assignments_are_rejected() {
        let raw = "  -> State: 1.1 <-\n    game_board[5][0] = Box\n";
        assert_eq!(
            decode_final_board(raw, &floor_board()).unwrap_err(),
            TraceError::CellOutOfRange {
                row: 5,
                col: 0,
                rows: 3,
                cols: 3
            }
        );
    }

    #[test]
    fn movement_lines_do_not_disturb_the_delta() {
        let raw = "\
  -> State: 1.1 <-
    movement = r
    game_board[0][0] = Floor
    game_board[0][1] = Player
";
        let next = decode_final_board(raw, &floor_board()).unwrap().unwrap();
        assert_eq!(next.get(0, 0), Some(Tile::Floor));
        assert_eq!(next.get(0, 1), Some(Tile::Player));
    }
}

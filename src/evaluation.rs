use crate::board::{PawnBoard, Side};

/// Per-square bonus for occupying central squares, peaking at the four
/// center squares
const CENTER_VALUE: [[f32; 8]; 8] = [
    [0.0, 1.0, 1.0, 2.0, 2.0, 1.0, 1.0, 0.0],
    [1.0, 2.0, 3.0, 3.0, 3.0, 3.0, 2.0, 1.0],
    [1.0, 3.0, 4.0, 5.0, 5.0, 4.0, 3.0, 1.0],
    [2.0, 3.0, 5.0, 7.0, 7.0, 5.0, 3.0, 2.0],
    [2.0, 3.0, 5.0, 7.0, 7.0, 5.0, 3.0, 2.0],
    [1.0, 3.0, 4.0, 5.0, 5.0, 4.0, 3.0, 1.0],
    [1.0, 2.0, 3.0, 3.0, 3.0, 3.0, 2.0, 1.0],
    [0.0, 1.0, 1.0, 2.0, 2.0, 1.0, 1.0, 0.0],
];

/// Rank value by row for a White pawn (row 0 is the goal rank)
const WHITE_RANK_VALUES: [f32; 8] = [50.0, 25.0, 12.0, 8.0, 5.0, 3.0, 1.0, 0.0];
/// Rank value by row for a Black pawn (row 7 is the goal rank)
const BLACK_RANK_VALUES: [f32; 8] = [0.0, 1.0, 3.0, 5.0, 8.0, 12.0, 25.0, 50.0];

/// Weights applied to the eight static sub-scores.
///
/// These are calibrated heuristic priorities; changing them changes move
/// choice, so the defaults must stay as they are for behavioral parity.
#[derive(Debug, Clone, Copy)]
pub struct EvalWeights {
    pub material: f32,
    pub advancement: f32,
    pub center_control: f32,
    pub pawn_structure: f32,
    pub mobility: f32,
    pub safety: f32,
    pub attacking: f32,
    pub breakthrough: f32,
    /// Score assigned to an already-won (or lost, negated) position
    pub winning_position: f32,
}

impl Default for EvalWeights {
    fn default() -> Self {
        Self {
            material: 200.0,
            advancement: 30.0,
            center_control: 20.0,
            pawn_structure: 25.0,
            mobility: 20.0,
            safety: 15.0,
            attacking: 15.0,
            breakthrough: 20.0,
            winning_position: 60_000.0,
        }
    }
}

/// Static position evaluator.
///
/// `evaluate` is a pure function of (board, side): no internal caches, no
/// mutation, safe to call from both leaf scoring and move ordering.
#[derive(Debug, Clone)]
pub struct Evaluator {
    weights: EvalWeights,
}

impl Evaluator {
    pub fn new() -> Self {
        Self {
            weights: EvalWeights::default(),
        }
    }

    pub fn with_weights(weights: EvalWeights) -> Self {
        Self { weights }
    }

    /// Score the position from `side`'s perspective; higher is better.
    ///
    /// Won positions short-circuit to `±winning_position`; otherwise the
    /// result is the weighted sum of the eight sub-scores, each computed as
    /// side's value minus the opponent's.
    pub fn evaluate(&self, board: &PawnBoard, side: Side) -> f32 {
        let opponent = side.opponent();

        if board.check_win(side) {
            return self.weights.winning_position;
        }
        if board.check_win(opponent) {
            return -self.weights.winning_position;
        }

        let w = &self.weights;
        self.material_score(board, side) * w.material
            + self.advancement_score(board, side) * w.advancement
            + self.center_control_score(board, side) * w.center_control
            + self.pawn_structure_score(board, side) * w.pawn_structure
            + self.mobility_score(board, side) * w.mobility
            + self.safety_score(board, side) * w.safety
            + self.attacking_score(board, side) * w.attacking
            + self.breakthrough_score(board, side) * w.breakthrough
    }

    /// Piece-count difference, amplified late in the game
    fn material_score(&self, board: &PawnBoard, side: Side) -> f32 {
        let own = board.count_pawns(side) as f32;
        let opp = board.count_pawns(side.opponent()) as f32;
        let total = own + opp;

        if total < 10.0 {
            (own - opp) * (16.0 - total) / 6.0
        } else {
            own - opp
        }
    }

    /// Rank-table advancement plus passed-pawn bonuses, both sides netted
    fn advancement_score(&self, board: &PawnBoard, side: Side) -> f32 {
        let opponent = side.opponent();
        let mut score = 0.0;

        for row in 0..8 {
            for col in 0..8 {
                match board.piece_at(row, col) {
                    Some(s) if s == side => score += self.advancement_value(board, row, col, s),
                    Some(s) if s == opponent => {
                        score -= self.advancement_value(board, row, col, s)
                    }
                    _ => {}
                }
            }
        }
        score
    }

    fn advancement_value(&self, board: &PawnBoard, row: usize, col: usize, side: Side) -> f32 {
        match side {
            Side::White => {
                let mut val = WHITE_RANK_VALUES[row];
                if row < 4 && self.is_passed_pawn(board, row, col, side) {
                    val += (4 - row) as f32 * 6.0;
                }
                val
            }
            Side::Black => {
                let mut val = BLACK_RANK_VALUES[row];
                if row > 3 && self.is_passed_pawn(board, row, col, side) {
                    val += (row - 3) as f32 * 6.0;
                }
                val
            }
        }
    }

    /// No enemy pawns ahead on the same or adjacent files
    fn is_passed_pawn(&self, board: &PawnBoard, row: usize, col: usize, side: Side) -> bool {
        let opponent = side.opponent();
        let dir = side.forward();

        let lo = col.saturating_sub(1);
        let hi = (col + 1).min(7);
        for c in lo..=hi {
            let mut r = row as i32 + dir;
            while (0..8).contains(&r) {
                if board.piece_at(r as usize, c) == Some(opponent) {
                    return false;
                }
                r += dir;
            }
        }
        true
    }

    fn center_control_score(&self, board: &PawnBoard, side: Side) -> f32 {
        let opponent = side.opponent();
        let mut score = 0.0;
        for row in 0..8 {
            for col in 0..8 {
                match board.piece_at(row, col) {
                    Some(s) if s == side => score += CENTER_VALUE[row][col],
                    Some(s) if s == opponent => score -= CENTER_VALUE[row][col],
                    _ => {}
                }
            }
        }
        score
    }

    /// Protection, isolation, doubling, and diagonal control of key squares
    fn pawn_structure_score(&self, board: &PawnBoard, side: Side) -> f32 {
        let opponent = side.opponent();
        let mut score = 0.0;

        for row in 0..8 {
            for col in 0..8 {
                let piece = match board.piece_at(row, col) {
                    Some(piece) => piece,
                    None => continue,
                };
                let mut val = 0.0;
                if self.is_protected(board, row, col, piece) {
                    val += 1.5;
                }
                if self.is_isolated(board, col, piece) {
                    val -= 1.2;
                }
                if self.is_doubled(board, row, col, piece) {
                    val -= 1.2;
                }
                val += self.controls_key_squares(row, col, piece);

                if piece == side {
                    score += val;
                } else if piece == opponent {
                    score -= val;
                }
            }
        }
        score
    }

    /// Small bonus for diagonally controlling center squares or the goal rank
    fn controls_key_squares(&self, row: usize, col: usize, side: Side) -> f32 {
        let mut bonus = 0.0;
        let rr = row as i32 + side.forward();
        for dc in [-1, 1] {
            let cc = col as i32 + dc;
            if (0..8).contains(&rr) && (0..8).contains(&cc) {
                if (2..=5).contains(&rr) && (2..=5).contains(&cc) {
                    bonus += 0.5;
                }
                if rr as usize == side.goal_row() {
                    bonus += 1.0;
                }
            }
        }
        bonus
    }

    /// Move-count ratio; a stuck opponent is a flat large bonus
    fn mobility_score(&self, board: &PawnBoard, side: Side) -> f32 {
        let own_moves = self.count_legal_moves(board, side);
        let opp_moves = self.count_legal_moves(board, side.opponent());

        if opp_moves == 0 {
            return 10.0;
        }
        let ratio = own_moves as f32 / opp_moves.max(1) as f32;
        (ratio - 1.0) * 6.0
    }

    /// Threatened pawns count against us, unobstructed runners count for us
    fn safety_score(&self, board: &PawnBoard, side: Side) -> f32 {
        let opponent = side.opponent();
        let mut score = 0.0;

        for row in 0..8 {
            for col in 0..8 {
                match board.piece_at(row, col) {
                    Some(s) if s == side => {
                        if self.is_threatened(board, row, col, s) {
                            score -= 1.0;
                        }
                        if self.has_clear_path(board, row, col, s) {
                            score += 0.75;
                        }
                    }
                    Some(s) if s == opponent => {
                        if self.is_threatened(board, row, col, s) {
                            score += 1.0;
                        }
                        if self.has_clear_path(board, row, col, s) {
                            score -= 0.75;
                        }
                    }
                    _ => {}
                }
            }
        }
        score
    }

    /// Capturable by an opponent pawn on its next move
    fn is_threatened(&self, board: &PawnBoard, row: usize, col: usize, side: Side) -> bool {
        let opponent = side.opponent();
        // An attacker sits one rank behind its own line of advance
        let attacker_row = row as i32 - opponent.forward();
        if !(0..8).contains(&attacker_row) {
            return false;
        }
        for dc in [-1, 1] {
            let attacker_col = col as i32 + dc;
            if (0..8).contains(&attacker_col)
                && board.piece_at(attacker_row as usize, attacker_col as usize) == Some(opponent)
            {
                return true;
            }
        }
        false
    }

    /// Up to four squares directly ahead are all empty
    fn has_clear_path(&self, board: &PawnBoard, row: usize, col: usize, side: Side) -> bool {
        let dir = side.forward();
        let mut r = row as i32 + dir;
        let mut steps = 0;
        while (0..8).contains(&r) && steps < 4 {
            if board.piece_at(r as usize, col).is_some() {
                return false;
            }
            r += dir;
            steps += 1;
        }
        true
    }

    /// Immediate diagonal capture threats, weighted up near the goal rank
    fn attacking_score(&self, board: &PawnBoard, side: Side) -> f32 {
        let opponent = side.opponent();
        let mut score = 0.0;

        for row in 0..8 {
            for col in 0..8 {
                if board.piece_at(row, col) != Some(side) {
                    continue;
                }
                let rr = row as i32 + side.forward();
                for dc in [-1, 1] {
                    let cc = col as i32 + dc;
                    if !(0..8).contains(&rr) || !(0..8).contains(&cc) {
                        continue;
                    }
                    if board.piece_at(rr as usize, cc as usize) == Some(opponent) {
                        score += 1.2;
                    }
                    let near_goal = match side {
                        Side::White => rr <= 2,
                        Side::Black => rr >= 5,
                    };
                    if near_goal {
                        score += 0.5;
                    }
                }
            }
        }
        score
    }

    /// Per-file runner potential: the most advanced pawn within four ranks of
    /// the goal scores with its proximity, discounted when an opponent pawn
    /// stands same-or-closer on the file
    fn breakthrough_score(&self, board: &PawnBoard, side: Side) -> f32 {
        let opponent = side.opponent();
        let mut score = 0.0;

        for col in 0..8 {
            let own_front = self.most_advanced_in_file(board, col, side);
            let opp_front = self.most_advanced_in_file(board, col, opponent);

            let own_row = match own_front {
                Some(row) => row as i32,
                None => continue,
            };

            match side {
                Side::White if own_row <= 3 => {
                    let distance = own_row as f32;
                    let blocked = matches!(opp_front, Some(opp) if (opp as i32) <= own_row);
                    if blocked {
                        score += (5.0 - distance) * 0.7;
                    } else {
                        score += (5.0 - distance) * 2.0;
                    }
                }
                Side::Black if own_row >= 4 => {
                    let distance = 7.0 - own_row as f32;
                    let blocked = matches!(opp_front, Some(opp) if (opp as i32) >= own_row);
                    if blocked {
                        score += (5.0 - distance) * 0.7;
                    } else {
                        score += (5.0 - distance) * 2.0;
                    }
                }
                _ => {}
            }
        }
        score
    }

    /// Row of the pawn closest to `side`'s goal rank in the given file
    fn most_advanced_in_file(&self, board: &PawnBoard, col: usize, side: Side) -> Option<usize> {
        let mut best: Option<usize> = None;
        for row in 0..8 {
            if board.piece_at(row, col) == Some(side) {
                best = Some(match (best, side) {
                    (None, _) => row,
                    (Some(b), Side::White) => b.min(row),
                    (Some(b), Side::Black) => b.max(row),
                });
            }
        }
        best
    }

    /// A friendly pawn sits diagonally behind
    fn is_protected(&self, board: &PawnBoard, row: usize, col: usize, side: Side) -> bool {
        let protect_row = row as i32 - side.forward();
        if !(0..8).contains(&protect_row) {
            return false;
        }
        for dc in [-1, 1] {
            let pc = col as i32 + dc;
            if (0..8).contains(&pc)
                && board.piece_at(protect_row as usize, pc as usize) == Some(side)
            {
                return true;
            }
        }
        false
    }

    /// No friendly pawns anywhere on adjacent files
    fn is_isolated(&self, board: &PawnBoard, col: usize, side: Side) -> bool {
        for file in [col as i32 - 1, col as i32 + 1] {
            if !(0..8).contains(&file) {
                continue;
            }
            for row in 0..8 {
                if board.piece_at(row, file as usize) == Some(side) {
                    return false;
                }
            }
        }
        true
    }

    /// Another friendly pawn on the same file
    fn is_doubled(&self, board: &PawnBoard, row: usize, col: usize, side: Side) -> bool {
        (0..8).any(|r| r != row && board.piece_at(r, col) == Some(side))
    }

    fn count_legal_moves(&self, board: &PawnBoard, side: Side) -> usize {
        let mut count = 0;
        for row in 0..8 {
            for col in 0..8 {
                if board.piece_at(row, col) == Some(side) {
                    count += board.get_valid_moves(row, col).len();
                }
            }
        }
        count
    }
}

impl Default for Evaluator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Move;

    /// Reflect across the horizontal midline and swap side labels
    fn mirrored(board: &PawnBoard) -> PawnBoard {
        let mut out = PawnBoard::empty();
        for row in 0..8 {
            for col in 0..8 {
                if let Some(side) = board.piece_at(row, col) {
                    out.set_piece(7 - row, col, Some(side.opponent()));
                }
            }
        }
        out
    }

    #[test]
    fn test_starting_position_is_balanced() {
        let evaluator = Evaluator::new();
        let board = PawnBoard::new();
        let score = evaluator.evaluate(&board, Side::White);
        assert!(score.abs() < 1e-3, "expected ~0, got {}", score);
    }

    #[test]
    fn test_win_shortcut() {
        let evaluator = Evaluator::new();
        let mut board = PawnBoard::empty();
        board.set_piece(0, 3, Some(Side::White));
        // A mobile White pawn so the win belongs to White alone; a lone pawn
        // on the goal rank has no moves and would hand Black a
        // no-moves-loses win too
        board.set_piece(5, 5, Some(Side::White));
        board.set_piece(4, 6, Some(Side::Black));
        assert_eq!(evaluator.evaluate(&board, Side::White), 60_000.0);
        assert_eq!(evaluator.evaluate(&board, Side::Black), -60_000.0);
    }

    #[test]
    fn test_both_sides_won_prefers_asked_side() {
        let evaluator = Evaluator::new();
        // White on the goal rank but frozen: White has won by promotion and
        // Black has won by no-moves-loses; whichever side is asked about
        // gets the positive shortcut, as the win check runs for it first
        let mut board = PawnBoard::empty();
        board.set_piece(0, 3, Some(Side::White));
        board.set_piece(4, 6, Some(Side::Black));
        assert_eq!(evaluator.evaluate(&board, Side::White), 60_000.0);
        assert_eq!(evaluator.evaluate(&board, Side::Black), 60_000.0);
    }

    #[test]
    fn test_material_advantage_is_positive() {
        let evaluator = Evaluator::new();
        let mut board = PawnBoard::new();
        // Remove two Black pawns without creating a terminal position
        board.set_piece(1, 2, None);
        board.set_piece(1, 5, None);
        assert!(evaluator.evaluate(&board, Side::White) > 0.0);
        assert!(evaluator.evaluate(&board, Side::Black) < 0.0);
    }

    #[test]
    fn test_late_game_material_amplification() {
        let evaluator = Evaluator::new();

        // 5v4: amplified by (16 - 9) / 6
        let mut small = PawnBoard::empty();
        for col in 0..5 {
            small.set_piece(6, col, Some(Side::White));
        }
        for col in 0..4 {
            small.set_piece(1, col, Some(Side::Black));
        }
        let amplified = evaluator.material_score(&small, Side::White);
        assert!((amplified - (16.0 - 9.0) / 6.0).abs() < 1e-6);

        // 8v7: plain difference
        let mut big = PawnBoard::new();
        big.set_piece(1, 3, None);
        assert_eq!(evaluator.material_score(&big, Side::White), 1.0);
    }

    #[test]
    fn test_passed_pawn_detection() {
        let evaluator = Evaluator::new();
        let mut board = PawnBoard::empty();
        board.set_piece(3, 4, Some(Side::White));
        assert!(evaluator.is_passed_pawn(&board, 3, 4, Side::White));

        // Blocker on an adjacent file ahead
        board.set_piece(1, 5, Some(Side::Black));
        assert!(!evaluator.is_passed_pawn(&board, 3, 4, Side::White));

        // Enemy pawn behind does not matter
        board.set_piece(1, 5, None);
        board.set_piece(5, 4, Some(Side::Black));
        assert!(evaluator.is_passed_pawn(&board, 3, 4, Side::White));
    }

    #[test]
    fn test_structure_flags() {
        let evaluator = Evaluator::new();
        let mut board = PawnBoard::empty();
        board.set_piece(4, 3, Some(Side::White));
        board.set_piece(5, 2, Some(Side::White));

        // (4,3) is protected by (5,2); neither is isolated
        assert!(evaluator.is_protected(&board, 4, 3, Side::White));
        assert!(!evaluator.is_protected(&board, 5, 2, Side::White));
        assert!(!evaluator.is_isolated(&board, 3, Side::White));

        // Doubling on file 3
        board.set_piece(6, 3, Some(Side::White));
        assert!(evaluator.is_doubled(&board, 4, 3, Side::White));
        assert!(evaluator.is_doubled(&board, 6, 3, Side::White));
        assert!(!evaluator.is_doubled(&board, 5, 2, Side::White));
    }

    #[test]
    fn test_mobility_stuck_opponent_bonus() {
        let evaluator = Evaluator::new();
        let mut board = PawnBoard::empty();
        board.set_piece(4, 0, Some(Side::Black));
        board.set_piece(5, 0, Some(Side::White));
        board.set_piece(6, 7, Some(Side::White));
        assert_eq!(evaluator.mobility_score(&board, Side::White), 10.0);
    }

    #[test]
    fn test_breakthrough_prefers_unblocked_runner() {
        let evaluator = Evaluator::new();

        let mut unblocked = PawnBoard::empty();
        unblocked.set_piece(2, 3, Some(Side::White));
        let open = evaluator.breakthrough_score(&unblocked, Side::White);

        let mut blocked = unblocked.clone();
        blocked.set_piece(1, 3, Some(Side::Black));
        let shut = evaluator.breakthrough_score(&blocked, Side::White);

        assert!(open > shut);
        assert!(shut > 0.0);
    }

    #[test]
    fn test_mirror_symmetry() {
        let evaluator = Evaluator::new();

        // An asymmetric middlegame position reached by a few moves
        let mut board = PawnBoard::new();
        board.compute_move(Move::new(6, 4, 4, 4), Side::White);
        board.compute_move(Move::new(1, 3, 3, 3), Side::Black);
        board.compute_move(Move::new(6, 0, 5, 0), Side::White);
        board.compute_move(Move::new(1, 6, 2, 6), Side::Black);

        // Strip en-passant state: mirroring is defined on the piece layout
        let mut plain = PawnBoard::empty();
        for row in 0..8 {
            for col in 0..8 {
                plain.set_piece(row, col, board.piece_at(row, col));
            }
        }

        let flipped = mirrored(&plain);
        let white_view = evaluator.evaluate(&plain, Side::White);
        let black_view = evaluator.evaluate(&flipped, Side::Black);
        assert!(
            (white_view - black_view).abs() < 1e-3,
            "mirror symmetry broken: {} vs {}",
            white_view,
            black_view
        );
    }

    #[test]
    fn test_zeroed_weights_isolate_terms() {
        let weights = EvalWeights {
            material: 1.0,
            advancement: 0.0,
            center_control: 0.0,
            pawn_structure: 0.0,
            mobility: 0.0,
            safety: 0.0,
            attacking: 0.0,
            breakthrough: 0.0,
            ..EvalWeights::default()
        };
        let evaluator = Evaluator::with_weights(weights);
        let mut board = PawnBoard::new();
        board.set_piece(1, 4, None);
        assert_eq!(evaluator.evaluate(&board, Side::White), 1.0);
    }
}

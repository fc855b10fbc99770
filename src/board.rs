use crate::errors::{EngineError, Result};
use std::fmt;

/// One of the two players. White advances toward row 0, Black toward row 7.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    White,
    Black,
}

impl Side {
    /// The opposing side
    pub fn opponent(self) -> Side {
        match self {
            Side::White => Side::Black,
            Side::Black => Side::White,
        }
    }

    /// Row delta for a forward step
    pub fn forward(self) -> i32 {
        match self {
            Side::White => -1,
            Side::Black => 1,
        }
    }

    /// Starting rank for this side's pawns
    pub fn home_row(self) -> usize {
        match self {
            Side::White => 6,
            Side::Black => 1,
        }
    }

    /// Rank this side is racing toward (the opponent's home edge)
    pub fn goal_row(self) -> usize {
        match self {
            Side::White => 0,
            Side::Black => 7,
        }
    }

    /// Single-character tag used in layout keys and diagnostics
    pub fn as_char(self) -> char {
        match self {
            Side::White => 'W',
            Side::Black => 'B',
        }
    }
}

/// A move as grid coordinates, rows and columns in `[0, 8)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Move {
    pub from_row: usize,
    pub from_col: usize,
    pub to_row: usize,
    pub to_col: usize,
}

impl Move {
    pub fn new(from_row: usize, from_col: usize, to_row: usize, to_col: usize) -> Self {
        Self {
            from_row,
            from_col,
            to_row,
            to_col,
        }
    }

    /// Parse a 4-character algebraic move string such as `"e2e4"`.
    ///
    /// Files map `a..h` to columns `0..7`; ranks map `1..8` to rows `7..0`.
    pub fn from_algebraic(s: &str) -> Result<Move> {
        let bytes = s.as_bytes();
        if bytes.len() != 4 {
            return Err(EngineError::InvalidNotation(format!(
                "expected 4 characters, got {:?}",
                s
            )));
        }

        let parse_square = |file: u8, rank: u8| -> Result<(usize, usize)> {
            if !(b'a'..=b'h').contains(&file) || !(b'1'..=b'8').contains(&rank) {
                return Err(EngineError::InvalidNotation(format!(
                    "bad square in {:?}",
                    s
                )));
            }
            let col = (file - b'a') as usize;
            let row = 8 - (rank - b'0') as usize;
            Ok((row, col))
        };

        let (from_row, from_col) = parse_square(bytes[0], bytes[1])?;
        let (to_row, to_col) = parse_square(bytes[2], bytes[3])?;
        Ok(Move::new(from_row, from_col, to_row, to_col))
    }

    /// Render as 4-character algebraic notation
    pub fn to_algebraic(&self) -> String {
        let square = |row: usize, col: usize| {
            format!("{}{}", (b'a' + col as u8) as char, 8 - row)
        };
        format!(
            "{}{}",
            square(self.from_row, self.from_col),
            square(self.to_row, self.to_col)
        )
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_algebraic())
    }
}

/// Result of applying a move to the board
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    /// The source square did not hold the mover's pawn; board unchanged
    Illegal,
    /// Move applied, game continues
    Applied,
    /// Move applied and the mover has won
    AppliedWin,
}

/// 8x8 pawn board with the minimal extra state needed for legality.
///
/// Side-to-move is intentionally not stored; callers supply it with every
/// operation so the same board value can be probed from both perspectives.
#[derive(Debug, Clone, PartialEq)]
pub struct PawnBoard {
    cells: [[Option<Side>; 8]; 8],
    last_move: Option<Move>,
    /// Square a pawn just double-stepped over; capturable en passant for
    /// exactly one subsequent move
    en_passant_target: Option<(usize, usize)>,
}

impl PawnBoard {
    /// Standard starting layout: 8 White pawns on row 6, 8 Black pawns on row 1
    pub fn new() -> Self {
        let mut board = Self::empty();
        for col in 0..8 {
            board.cells[6][col] = Some(Side::White);
            board.cells[1][col] = Some(Side::Black);
        }
        board
    }

    /// A cleared board, useful for setting up test positions
    pub fn empty() -> Self {
        Self {
            cells: [[None; 8]; 8],
            last_move: None,
            en_passant_target: None,
        }
    }

    pub fn piece_at(&self, row: usize, col: usize) -> Option<Side> {
        self.cells[row][col]
    }

    /// Place (or clear) a pawn; position setup only, no legality checks
    pub fn set_piece(&mut self, row: usize, col: usize, side: Option<Side>) {
        self.cells[row][col] = side;
    }

    pub fn last_move(&self) -> Option<Move> {
        self.last_move
    }

    pub fn en_passant_target(&self) -> Option<(usize, usize)> {
        self.en_passant_target
    }

    fn on_board(row: i32, col: i32) -> bool {
        (0..8).contains(&row) && (0..8).contains(&col)
    }

    /// All legal destination squares for the pawn at `(row, col)`.
    ///
    /// Union of: single forward step, double step from the home row when both
    /// squares are clear, diagonal captures, and the en-passant square when
    /// it lies one forward-diagonal away. Empty when the square holds no pawn.
    pub fn get_valid_moves(&self, row: usize, col: usize) -> Vec<(usize, usize)> {
        let mut moves = Vec::new();
        let side = match self.cells[row][col] {
            Some(side) => side,
            None => return moves,
        };
        let dir = side.forward();
        let (row_i, col_i) = (row as i32, col as i32);

        // Single forward step
        let one_step = row_i + dir;
        if Self::on_board(one_step, col_i) && self.cells[one_step as usize][col].is_none() {
            moves.push((one_step as usize, col));

            // Double step from the home row, both squares clear
            if row == side.home_row() {
                let two_step = row_i + 2 * dir;
                if Self::on_board(two_step, col_i) && self.cells[two_step as usize][col].is_none() {
                    moves.push((two_step as usize, col));
                }
            }
        }

        // Diagonal captures
        for dc in [-1, 1] {
            let (diag_row, diag_col) = (row_i + dir, col_i + dc);
            if Self::on_board(diag_row, diag_col)
                && self.cells[diag_row as usize][diag_col as usize] == Some(side.opponent())
            {
                moves.push((diag_row as usize, diag_col as usize));
            }
        }

        // En passant: the stored target square is one forward-diagonal away
        if let Some((en_r, en_c)) = self.en_passant_target {
            if en_r as i32 == row_i + dir && (en_c as i32 - col_i).abs() == 1 {
                moves.push((en_r, en_c));
            }
        }

        moves
    }

    /// Whether `mv` is legal for `side` on the current position
    pub fn is_valid_move(&self, mv: &Move, side: Side) -> bool {
        if self.cells[mv.from_row][mv.from_col] != Some(side) {
            return false;
        }
        self.get_valid_moves(mv.from_row, mv.from_col)
            .contains(&(mv.to_row, mv.to_col))
    }

    /// Enumerate every legal move available to `side`
    pub fn moves_for(&self, side: Side) -> Vec<Move> {
        let mut out = Vec::new();
        for row in 0..8 {
            for col in 0..8 {
                if self.cells[row][col] == Some(side) {
                    for (to_row, to_col) in self.get_valid_moves(row, col) {
                        out.push(Move::new(row, col, to_row, to_col));
                    }
                }
            }
        }
        out
    }

    /// Apply `mv` for `side`, handling double-step and en-passant bookkeeping.
    ///
    /// Only source ownership is validated here; destination legality is the
    /// caller's contract (search generates moves via [`get_valid_moves`] and
    /// re-checks before committing).
    ///
    /// [`get_valid_moves`]: PawnBoard::get_valid_moves
    pub fn compute_move(&mut self, mv: Move, side: Side) -> MoveOutcome {
        if mv.from_row > 7 || mv.from_col > 7 || mv.to_row > 7 || mv.to_col > 7 {
            return MoveOutcome::Illegal;
        }
        if self.cells[mv.from_row][mv.from_col] != Some(side) {
            return MoveOutcome::Illegal;
        }

        self.last_move = Some(mv);
        let piece = self.cells[mv.from_row][mv.from_col];
        let is_double_step = mv.from_row.abs_diff(mv.to_row) == 2;

        if is_double_step {
            // Mark the stepped-over square as capturable next move
            let mid_row = (mv.from_row + mv.to_row) / 2;
            self.en_passant_target = Some((mid_row, mv.from_col));
        } else {
            let is_en_passant = self.en_passant_target == Some((mv.to_row, mv.to_col))
                && mv.from_col.abs_diff(mv.to_col) == 1
                && mv.to_row as i32 == mv.from_row as i32 + side.forward();

            if is_en_passant {
                // The victim sits beside the mover, behind the target square
                self.cells[mv.from_row][mv.to_col] = None;
            }

            // Any non-double-step move expires the target
            self.en_passant_target = None;
        }

        self.cells[mv.to_row][mv.to_col] = piece;
        self.cells[mv.from_row][mv.from_col] = None;

        if self.check_win(side) {
            MoveOutcome::AppliedWin
        } else {
            MoveOutcome::Applied
        }
    }

    /// Parse and apply an algebraic move string for `side`.
    ///
    /// Convenience for collaborators that receive moves as text; rejected
    /// moves come back as errors instead of a bare [`MoveOutcome::Illegal`].
    pub fn apply_algebraic(&mut self, notation: &str, side: Side) -> Result<MoveOutcome> {
        let mv = Move::from_algebraic(notation)?;
        match self.compute_move(mv, side) {
            MoveOutcome::Illegal => Err(EngineError::IllegalMove(format!(
                "{} does not move a {:?} pawn",
                notation, side
            ))),
            outcome => Ok(outcome),
        }
    }

    /// Whether `side` has won, evaluated after `side` has just moved.
    ///
    /// Win conditions: a pawn on the opponent's home rank, the opponent has
    /// no pawns left, or the opponent has no legal move (no-moves-loses).
    pub fn check_win(&self, side: Side) -> bool {
        let opponent = side.opponent();

        let goal = side.goal_row();
        for col in 0..8 {
            if self.cells[goal][col] == Some(side) {
                return true;
            }
        }

        if self.count_pawns(opponent) == 0 {
            return true;
        }

        !self.side_has_moves(opponent)
    }

    fn side_has_moves(&self, side: Side) -> bool {
        for row in 0..8 {
            for col in 0..8 {
                if self.cells[row][col] == Some(side)
                    && !self.get_valid_moves(row, col).is_empty()
                {
                    return true;
                }
            }
        }
        false
    }

    pub fn count_pawns(&self, side: Side) -> usize {
        self.cells
            .iter()
            .flatten()
            .filter(|&&cell| cell == Some(side))
            .count()
    }

    pub fn total_pawns(&self) -> usize {
        self.cells.iter().flatten().filter(|c| c.is_some()).count()
    }

    /// Positions of every pawn belonging to `side`
    pub fn pawn_positions(&self, side: Side) -> Vec<(usize, usize)> {
        let mut positions = Vec::new();
        for row in 0..8 {
            for col in 0..8 {
                if self.cells[row][col] == Some(side) {
                    positions.push((row, col));
                }
            }
        }
        positions
    }

    /// 64-character layout string (`W`/`B`/`-` per square, row-major);
    /// combined with side-to-move it keys the transposition table
    pub fn layout_key(&self) -> String {
        let mut key = String::with_capacity(64);
        for row in &self.cells {
            for cell in row {
                key.push(match cell {
                    Some(side) => side.as_char(),
                    None => '-',
                });
            }
        }
        key
    }
}

impl Default for PawnBoard {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for PawnBoard {
    /// Rank/file labeled grid, `.` for empty squares
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "  a b c d e f g h")?;
        for (i, row) in self.cells.iter().enumerate() {
            let rank = 8 - i;
            let squares: Vec<String> = row
                .iter()
                .map(|cell| match cell {
                    Some(side) => side.as_char().to_string(),
                    None => ".".to_string(),
                })
                .collect();
            writeln!(f, "{} {} {}", rank, squares.join(" "), rank)?;
        }
        write!(f, "  a b c d e f g h")
    }
}

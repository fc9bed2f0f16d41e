use crate::error::FenError;
use crate::types::*;
use crate::zobrist::ZOBRIST;

pub const START_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CastlingRights {
    pub wk: bool,
    pub wq: bool,
    pub bk: bool,
    pub bq: bool,
}

impl CastlingRights {
    pub fn none() -> Self {
        Self {
            wk: false,
            wq: false,
            bk: false,
            bq: false,
        }
    }

    fn as_array(&self) -> [bool; 4] {
        [self.wk, self.wq, self.bk, self.bq]
    }

    /// Drop any right that depends on a piece standing on `sq`.
    fn touch(&mut self, sq: u8) {
        match sq {
            0 => self.wq = false,
            7 => self.wk = false,
            4 => {
                self.wk = false;
                self.wq = false;
            }
            56 => self.bq = false,
            63 => self.bk = false,
            60 => {
                self.bk = false;
                self.bq = false;
            }
            _ => {}
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Position {
    pub board: [Option<Piece>; 64],
    pub side_to_move: Color,
    pub castling: CastlingRights,
    pub en_passant: Option<u8>, // square behind a pawn that just advanced 2
    pub halfmove_clock: u32,
    pub fullmove_number: u32,
}

#[derive(Clone, Debug)]
pub struct Undo {
    pub captured: Option<Piece>,
    pub castling: CastlingRights,
    pub en_passant: Option<u8>,
    pub halfmove_clock: u32,
    pub fullmove_number: u32,
    pub moved_piece: Piece,
    pub rook_move: Option<(u8, u8)>, // (rook_from, rook_to) for castling
    pub ep_captured_sq: Option<u8>,  // square actually captured in en-passant
}

/// Rook relocation for a castling king move, if `from -> to` is one.
fn castle_rook_squares(color: Color, from: u8, to: u8) -> Option<(u8, u8)> {
    match (color, from, to) {
        (Color::White, 4, 6) => Some((7, 5)),
        (Color::White, 4, 2) => Some((0, 3)),
        (Color::Black, 60, 62) => Some((63, 61)),
        (Color::Black, 60, 58) => Some((56, 59)),
        _ => None,
    }
}

impl Position {
    pub fn startpos() -> Self {
        let mut p = Position {
            board: [None; 64],
            side_to_move: Color::White,
            castling: CastlingRights {
                wk: true,
                wq: true,
                bk: true,
                bq: true,
            },
            en_passant: None,
            halfmove_clock: 0,
            fullmove_number: 1,
        };

        let back = [
            PieceKind::Rook,
            PieceKind::Knight,
            PieceKind::Bishop,
            PieceKind::Queen,
            PieceKind::King,
            PieceKind::Bishop,
            PieceKind::Knight,
            PieceKind::Rook,
        ];
        for (f, &kind) in back.iter().enumerate() {
            p.board[f] = Some(Piece::new(Color::White, kind));
            p.board[8 + f] = Some(Piece::new(Color::White, PieceKind::Pawn));
            p.board[48 + f] = Some(Piece::new(Color::Black, PieceKind::Pawn));
            p.board[56 + f] = Some(Piece::new(Color::Black, kind));
        }
        p
    }

    /// Parse a Forsyth-Edwards Notation string. The two move counters are
    /// optional and default to `0 1`.
    pub fn from_fen(fen: &str) -> Result<Self, FenError> {
        let parts: Vec<&str> = fen.split_whitespace().collect();
        if parts.len() < 4 {
            return Err(FenError::FieldCount(parts.len()));
        }

        let ranks: Vec<&str> = parts[0].split('/').collect();
        if ranks.len() != 8 {
            return Err(FenError::RankCount(ranks.len()));
        }

        let mut board = [None; 64];
        for (rank_idx, rank_str) in ranks.iter().enumerate() {
            let rank: i8 = 7 - rank_idx as i8; // FEN lists rank 8 .. 1
            let mut file: i8 = 0;
            for ch in rank_str.chars() {
                if let Some(d) = ch.to_digit(10) {
                    file += d as i8;
                } else {
                    let kind = PieceKind::from_letter(ch).ok_or(FenError::Piece(ch))?;
                    let color = if ch.is_ascii_uppercase() {
                        Color::White
                    } else {
                        Color::Black
                    };
                    let s = sq(file, rank).ok_or(FenError::RankWidth { rank: rank_idx })?;
                    board[s as usize] = Some(Piece { color, kind });
                    file += 1;
                }
                if file > 8 {
                    return Err(FenError::RankWidth { rank: rank_idx });
                }
            }
            if file != 8 {
                return Err(FenError::RankWidth { rank: rank_idx });
            }
        }

        let side_to_move = match parts[1] {
            "w" => Color::White,
            "b" => Color::Black,
            other => return Err(FenError::SideToMove(other.to_string())),
        };

        let mut castling = CastlingRights::none();
        if parts[2] != "-" {
            for c in parts[2].chars() {
                match c {
                    'K' => castling.wk = true,
                    'Q' => castling.wq = true,
                    'k' => castling.bk = true,
                    'q' => castling.bq = true,
                    _ => return Err(FenError::Castling(c)),
                }
            }
        }

        let en_passant = match parts[3] {
            "-" => None,
            s => Some(coord_to_sq(s).ok_or_else(|| FenError::EnPassant(s.to_string()))?),
        };

        let counter = |idx: usize, default: u32| -> Result<u32, FenError> {
            match parts.get(idx) {
                Some(s) => s.parse().map_err(|_| FenError::Counter(s.to_string())),
                None => Ok(default),
            }
        };

        let pos = Position {
            board,
            side_to_move,
            castling,
            en_passant,
            halfmove_clock: counter(4, 0)?,
            fullmove_number: counter(5, 1)?,
        };

        if pos.king_sq(Color::White).is_none() {
            return Err(FenError::MissingKing("white"));
        }
        if pos.king_sq(Color::Black).is_none() {
            return Err(FenError::MissingKing("black"));
        }
        Ok(pos)
    }

    /// Serialize to a full six-field FEN string.
    pub fn to_fen(&self) -> String {
        let mut out = String::with_capacity(90);
        for rank in (0..8).rev() {
            let mut empty = 0;
            for file in 0..8 {
                match self.board[(rank * 8 + file) as usize] {
                    Some(pc) => {
                        if empty > 0 {
                            out.push(char::from(b'0' + empty));
                            empty = 0;
                        }
                        out.push(pc.fen_char());
                    }
                    None => empty += 1,
                }
            }
            if empty > 0 {
                out.push(char::from(b'0' + empty));
            }
            if rank > 0 {
                out.push('/');
            }
        }

        out.push(' ');
        out.push(match self.side_to_move {
            Color::White => 'w',
            Color::Black => 'b',
        });

        out.push(' ');
        let rights: String = ['K', 'Q', 'k', 'q']
            .iter()
            .zip(self.castling.as_array())
            .filter_map(|(&c, on)| on.then_some(c))
            .collect();
        if rights.is_empty() {
            out.push('-');
        } else {
            out.push_str(&rights);
        }

        out.push(' ');
        match self.capturable_en_passant() {
            Some(ep) => out.push_str(&sq_to_coord(ep)),
            None => out.push('-'),
        }

        out.push_str(&format!(" {} {}", self.halfmove_clock, self.fullmove_number));
        out
    }

    /// Zobrist hash of the position, used for repetition detection.
    pub fn position_hash(&self) -> u64 {
        let mut h = 0u64;
        for (i, pc) in self.board.iter().enumerate() {
            if let Some(pc) = pc {
                h ^= ZOBRIST.piece_key(*pc, i as u8);
            }
        }
        if self.side_to_move == Color::Black {
            h ^= ZOBRIST.side_to_move;
        }
        for (i, on) in self.castling.as_array().into_iter().enumerate() {
            if on {
                h ^= ZOBRIST.castling_key(i);
            }
        }
        if let Some(ep) = self.capturable_en_passant() {
            h ^= ZOBRIST.ep_key(file_of(ep) as u8);
        }
        h
    }

    /// The en passant square, but only when a pawn of the side to move stands
    /// ready to capture onto it. Otherwise it does not distinguish positions.
    pub fn capturable_en_passant(&self) -> Option<u8> {
        let ep = self.en_passant?;
        let us = self.side_to_move;
        let pawn_rank = rank_of(ep) - match us {
            Color::White => 1,
            Color::Black => -1,
        };
        [-1, 1]
            .into_iter()
            .filter_map(|df| sq(file_of(ep) + df, pawn_rank))
            .any(|s| self.piece_at(s) == Some(Piece::new(us, PieceKind::Pawn)))
            .then_some(ep)
    }

    pub fn king_sq(&self, c: Color) -> Option<u8> {
        (0..64u8).find(|&i| {
            self.board[i as usize] == Some(Piece::new(c, PieceKind::King))
        })
    }

    pub fn piece_at(&self, sq: u8) -> Option<Piece> {
        self.board[sq as usize]
    }
    pub fn set_piece(&mut self, sq: u8, pc: Option<Piece>) {
        self.board[sq as usize] = pc;
    }

    pub fn in_check(&self, c: Color) -> bool {
        match self.king_sq(c) {
            Some(ksq) => self.is_square_attacked(ksq, c.other()),
            None => false,
        }
    }

    /// Fifty full moves without a capture or pawn move.
    pub fn is_fifty_move_draw(&self) -> bool {
        self.halfmove_clock >= 100
    }

    /// Neither side can possibly mate: K v K, K+minor v K, or only
    /// same-coloured bishops besides the kings.
    pub fn is_insufficient_material(&self) -> bool {
        let mut minors = 0;
        let mut bishop_square_colors = Vec::new();
        for (i, pc) in self.board.iter().enumerate() {
            let Some(pc) = pc else { continue };
            match pc.kind {
                PieceKind::King => {}
                PieceKind::Knight => minors += 1,
                PieceKind::Bishop => {
                    minors += 1;
                    bishop_square_colors.push((file_of(i as u8) + rank_of(i as u8)) % 2);
                }
                _ => return false,
            }
        }
        if minors <= 1 {
            return true;
        }
        minors == bishop_square_colors.len()
            && bishop_square_colors.windows(2).all(|w| w[0] == w[1])
    }

    pub fn is_square_attacked(&self, target: u8, by: Color) -> bool {
        let tf = file_of(target);
        let tr = rank_of(target);

        // A white pawn attacks upward, so it sits one rank below its target.
        let pawn_rank = match by {
            Color::White => -1,
            Color::Black => 1,
        };
        for df in [-1, 1] {
            if let Some(s) = sq(tf + df, tr + pawn_rank)
                && self.holds(s, by, &[PieceKind::Pawn])
            {
                return true;
            }
        }

        const KNIGHT: [(i8, i8); 8] = [
            (1, 2),
            (2, 1),
            (-1, 2),
            (-2, 1),
            (1, -2),
            (2, -1),
            (-1, -2),
            (-2, -1),
        ];
        const KING: [(i8, i8); 8] = [
            (1, 1),
            (1, 0),
            (1, -1),
            (0, 1),
            (0, -1),
            (-1, 1),
            (-1, 0),
            (-1, -1),
        ];
        for (df, dr) in KNIGHT {
            if let Some(s) = sq(tf + df, tr + dr)
                && self.holds(s, by, &[PieceKind::Knight])
            {
                return true;
            }
        }
        for (df, dr) in KING {
            if let Some(s) = sq(tf + df, tr + dr)
                && self.holds(s, by, &[PieceKind::King])
            {
                return true;
            }
        }

        let rays: [(&[(i8, i8)], [PieceKind; 2]); 2] = [
            (
                &[(1, 1), (1, -1), (-1, 1), (-1, -1)],
                [PieceKind::Bishop, PieceKind::Queen],
            ),
            (
                &[(1, 0), (-1, 0), (0, 1), (0, -1)],
                [PieceKind::Rook, PieceKind::Queen],
            ),
        ];
        for (dirs, sliders) in rays {
            for &(df, dr) in dirs {
                let mut f = tf + df;
                let mut r = tr + dr;
                while let Some(s) = sq(f, r) {
                    if self.piece_at(s).is_some() {
                        if self.holds(s, by, &sliders) {
                            return true;
                        }
                        break;
                    }
                    f += df;
                    r += dr;
                }
            }
        }

        false
    }

    fn holds(&self, s: u8, by: Color, kinds: &[PieceKind]) -> bool {
        self.piece_at(s)
            .is_some_and(|pc| pc.color == by && kinds.contains(&pc.kind))
    }

    /// Play a pseudo-legal move. The caller guarantees a piece stands on
    /// `mv.from`; legality is the move generator's job.
    pub fn make_move(&mut self, mv: Move) -> Undo {
        let (from, to) = (mv.from, mv.to);
        let moved = self.piece_at(from).expect("no piece on from-square");
        let mut captured = self.piece_at(to);
        let undo_base = (
            self.castling.clone(),
            self.en_passant,
            self.halfmove_clock,
            self.fullmove_number,
        );

        self.en_passant = None;
        let mut reset_hmc = moved.kind == PieceKind::Pawn || captured.is_some();

        let mut ep_captured_sq = None;
        if mv.is_en_passant {
            let behind = match moved.color {
                Color::White => -1,
                Color::Black => 1,
            };
            if let Some(cs) = sq(file_of(to), rank_of(to) + behind) {
                captured = self.piece_at(cs);
                self.set_piece(cs, None);
                ep_captured_sq = Some(cs);
                reset_hmc = true;
            }
        }

        let promotes =
            moved.kind == PieceKind::Pawn && rank_of(to) == moved.color.promotion_rank();
        let landed = if promotes {
            Piece::new(moved.color, mv.promo.unwrap_or(PieceKind::Queen))
        } else {
            moved
        };
        self.set_piece(from, None);
        self.set_piece(to, Some(landed));

        let mut rook_move = None;
        if mv.is_castle
            && moved.kind == PieceKind::King
            && let Some((rf, rt)) = castle_rook_squares(moved.color, from, to)
        {
            let rook = self.piece_at(rf);
            self.set_piece(rf, None);
            self.set_piece(rt, rook);
            rook_move = Some((rf, rt));
        }

        // Leaving a home square or capturing onto one both void the right.
        self.castling.touch(from);
        self.castling.touch(to);

        if moved.kind == PieceKind::Pawn && (rank_of(to) - rank_of(from)).abs() == 2 {
            self.en_passant = sq(file_of(from), (rank_of(from) + rank_of(to)) / 2);
        }

        self.halfmove_clock = if reset_hmc {
            0
        } else {
            self.halfmove_clock + 1
        };
        if self.side_to_move == Color::Black {
            self.fullmove_number += 1;
        }
        self.side_to_move = self.side_to_move.other();

        let (castling, en_passant, halfmove_clock, fullmove_number) = undo_base;
        Undo {
            captured,
            castling,
            en_passant,
            halfmove_clock,
            fullmove_number,
            moved_piece: moved,
            rook_move,
            ep_captured_sq,
        }
    }

    pub fn unmake_move(&mut self, mv: Move, undo: Undo) {
        self.side_to_move = self.side_to_move.other();
        self.castling = undo.castling;
        self.en_passant = undo.en_passant;
        self.halfmove_clock = undo.halfmove_clock;
        self.fullmove_number = undo.fullmove_number;

        if let Some((rf, rt)) = undo.rook_move {
            let rook = self.piece_at(rt);
            self.set_piece(rt, None);
            self.set_piece(rf, rook);
        }

        // The moved piece is restored as it was, which also reverts promotions.
        self.set_piece(mv.to, None);
        self.set_piece(mv.from, Some(undo.moved_piece));

        match undo.ep_captured_sq {
            Some(cs) => self.set_piece(cs, undo.captured),
            None => self.set_piece(mv.to, undo.captured),
        }
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::startpos()
    }
}

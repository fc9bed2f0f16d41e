//! Text board for the terminal. White pieces are uppercase FEN letters,
//! black pieces lowercase.

use std::fmt::Write;

use chess_core::{Color, Piece, Position, Square};
use match_controller::{BoardRenderer, HighlightVariant, PositionToken};
use tracing::warn;

#[derive(Debug, Clone)]
pub struct TerminalRenderer {
    board: [Option<Piece>; 64],
    highlighted: Vec<(Square, HighlightVariant)>,
    destinations: Vec<Square>,
    orientation: Color,
}

impl Default for TerminalRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl TerminalRenderer {
    pub fn new() -> Self {
        Self {
            board: [None; 64],
            highlighted: Vec::new(),
            destinations: Vec::new(),
            orientation: Color::White,
        }
    }

    pub fn orientation(&self) -> Color {
        self.orientation
    }

    /// Selected squares are bracketed (`[P]` on light, `<P>` on dark),
    /// empty destinations show `*` and capture targets are parenthesised.
    pub fn draw(&self) -> String {
        let flipped = self.orientation == Color::Black;
        let mut out = String::new();
        let files: String = (0..8)
            .map(|f| {
                let file = if flipped { 7 - f } else { f };
                format!(" {} ", (b'a' + file as u8) as char)
            })
            .collect();

        out.push_str("   +------------------------+\n");
        for row in 0..8 {
            let rank = if flipped { row } else { 7 - row };
            let _ = write!(out, " {} |", rank + 1);
            for col in 0..8 {
                let file = if flipped { 7 - col } else { col };
                let Some(square) = Square::from_file_rank(file, rank) else {
                    continue;
                };
                out.push_str(&self.cell(square));
            }
            out.push_str("|\n");
        }
        out.push_str("   +------------------------+\n");
        let _ = writeln!(out, "    {files}");
        out
    }

    fn cell(&self, square: Square) -> String {
        let piece = self.board[square.index() as usize];
        let glyph = piece.map_or('.', Piece::fen_char);
        let highlight = self
            .highlighted
            .iter()
            .find(|(s, _)| *s == square)
            .map(|(_, variant)| *variant);

        match highlight {
            Some(HighlightVariant::Light) => format!("[{glyph}]"),
            Some(HighlightVariant::Dark) => format!("<{glyph}>"),
            None if self.destinations.contains(&square) => match piece {
                Some(_) => format!("({glyph})"),
                None => " * ".to_string(),
            },
            None => format!(" {glyph} "),
        }
    }
}

impl BoardRenderer for TerminalRenderer {
    fn set_position(&mut self, position: &PositionToken) {
        match Position::from_fen(position.as_str()) {
            Ok(pos) => self.board = pos.board,
            Err(err) => warn!(%position, error = %err, "cannot draw position"),
        }
    }

    fn highlight_square(&mut self, square: Square, variant: HighlightVariant) {
        self.highlighted.push((square, variant));
    }

    fn mark_possible_destination(&mut self, square: Square) {
        self.destinations.push(square);
    }

    fn clear_highlights(&mut self) {
        self.highlighted.clear();
        self.destinations.clear();
    }

    fn set_orientation(&mut self, color: Color) {
        self.orientation = color;
    }
}

#[cfg(test)]
#[path = "terminal_tests.rs"]
mod terminal_tests;

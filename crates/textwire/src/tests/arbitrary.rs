use alloc::{boxed::Box, string::String, vec::Vec};

use quickcheck::{Arbitrary, Gen};

/// One piece of a generated text: plain characters or a terminator.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Piece {
    Text(String),
    Cr,
    Lf,
    CrLf,
}

impl Arbitrary for Piece {
    fn arbitrary(g: &mut Gen) -> Self {
        match usize::arbitrary(g) % 6 {
            0 => Piece::Cr,
            1 => Piece::Lf,
            2 => Piece::CrLf,
            _ => Piece::Text(
                String::arbitrary(g)
                    .chars()
                    .filter(|c| *c != '\r' && *c != '\n')
                    .collect(),
            ),
        }
    }

    fn shrink(&self) -> Box<dyn Iterator<Item = Self>> {
        match self {
            Piece::Text(s) => Box::new(s.shrink().map(Piece::Text)),
            _ => quickcheck::empty_shrinker(),
        }
    }
}

/// A generated input for the line reader plus the knobs that decide where
/// buffer and read boundaries fall.
#[derive(Debug, Clone)]
pub(crate) struct LineCase {
    pub pieces: Vec<Piece>,
    pub max_line_length: usize,
    pub read_size: usize,
}

impl LineCase {
    pub(crate) fn text(&self) -> String {
        let mut text = String::new();
        for piece in &self.pieces {
            match piece {
                Piece::Text(s) => text.push_str(s),
                Piece::Cr => text.push('\r'),
                Piece::Lf => text.push('\n'),
                Piece::CrLf => text.push_str("\r\n"),
            }
        }
        text
    }
}

impl Arbitrary for LineCase {
    fn arbitrary(g: &mut Gen) -> Self {
        Self {
            pieces: Vec::arbitrary(g),
            max_line_length: 1 + usize::arbitrary(g) % 8,
            read_size: 1 + usize::arbitrary(g) % 10,
        }
    }

    fn shrink(&self) -> Box<dyn Iterator<Item = Self>> {
        let max_line_length = self.max_line_length;
        let read_size = self.read_size;
        Box::new(self.pieces.shrink().map(move |pieces| LineCase {
            pieces,
            max_line_length,
            read_size,
        }))
    }
}

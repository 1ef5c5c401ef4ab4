//! Typed parse errors (spec.md 6, "ambient" per SPEC_FULL.md 6). Per
//! spec.md 7's error-handling design, callers in the UCI loop discard the
//! `Err` and keep the previous state; the typed variants exist so library
//! consumers and unit tests can assert on *which* field was malformed,
//! mirroring `pleco::board::fen::FenBuildError`.

use std::fmt;

#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum FenParseError {
    WrongNumberOfFields,
    WrongNumberOfRanks,
    RankDoesNotSumToEight,
    UnrecognisedPieceChar(char),
    UnrecognisedSideToMoveChar(char),
    UnrecognisedCastlingChar(char),
    MalformedEpSquare,
    MalformedHalfmoveClock,
    MalformedFullmoveNumber,
}

impl fmt::Display for FenParseError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            FenParseError::WrongNumberOfFields => write!(f, "FEN must have 4-6 space-separated fields"),
            FenParseError::WrongNumberOfRanks => write!(f, "FEN piece placement must list exactly 8 ranks"),
            FenParseError::RankDoesNotSumToEight => write!(f, "a FEN rank's pieces and digits must sum to 8 files"),
            FenParseError::UnrecognisedPieceChar(c) => write!(f, "unrecognised piece character '{}'", c),
            FenParseError::UnrecognisedSideToMoveChar(c) => write!(f, "unrecognised side-to-move character '{}'", c),
            FenParseError::UnrecognisedCastlingChar(c) => write!(f, "unrecognised castling character '{}'", c),
            FenParseError::MalformedEpSquare => write!(f, "malformed en-passant square field"),
            FenParseError::MalformedHalfmoveClock => write!(f, "malformed halfmove clock field"),
            FenParseError::MalformedFullmoveNumber => write!(f, "malformed fullmove number field"),
        }
    }
}

impl std::error::Error for FenParseError {}

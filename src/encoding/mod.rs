//! Integer pitch encodings
//!
//! Pitches are mapped into a bounded integer space so that transposition is
//! plain addition. The base-40 scheme keeps enharmonic spellings apart
//! (C# and Db get different values) while leaving room for double
//! accidentals on every letter.

pub mod base40;

pub use base40::{decode, encode, encode_at_octave, letter_of, EncodedPitch, BASE};

use thiserror::Error;

use crate::models::Letter;

/// Errors from encoding or decoding pitches
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PitchError {
    /// Alteration outside double-flat..double-sharp
    #[error("cannot encode {letter} with alteration {alteration:+} (supported range is -2..=2)")]
    InvalidPitch { letter: Letter, alteration: i8 },

    /// Residue that no letter/alteration pair maps to; indicates an encoding bug
    #[error("encoded value {value} has residue {residue}, which is not a valid pitch")]
    InvalidEncoding { value: i32, residue: i32 },

    /// Pitch name string that could not be parsed
    #[error("unknown pitch name: {0}")]
    UnknownPitchName(String),
}

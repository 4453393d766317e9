//! Base-40 pitch encoding
//!
//! Each octave spans 40 slots. Letters sit at fixed base values with gaps
//! of 6 between whole steps and 5 across the E-F semitone, so every letter
//! has room for `bb b natural # ##`. The five leftover slots between letter
//! neighbourhoods are invalid.
//!
//! ```text
//! value = base(letter) + alteration + octave * 40
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

use super::PitchError;
use crate::models::{Letter, Pitch};

/// Slots per octave
pub const BASE: i32 = 40;

/// Base value of each letter within an octave
pub fn base_value(letter: Letter) -> i32 {
    match letter {
        Letter::C => 2,
        Letter::D => 8,
        Letter::E => 14,
        Letter::F => 19,
        Letter::G => 25,
        Letter::A => 31,
        Letter::B => 37,
    }
}

/// Residue → (letter, alteration); `None` marks an invalid slot.
static RESIDUE_TABLE: [Option<(Letter, i8)>; BASE as usize] = [
    Some((Letter::C, -2)), // 0
    Some((Letter::C, -1)), // 1
    Some((Letter::C, 0)),  // 2
    Some((Letter::C, 1)),  // 3
    Some((Letter::C, 2)),  // 4
    None,                  // 5
    Some((Letter::D, -2)), // 6
    Some((Letter::D, -1)), // 7
    Some((Letter::D, 0)),  // 8
    Some((Letter::D, 1)),  // 9
    Some((Letter::D, 2)),  // 10
    None,                  // 11
    Some((Letter::E, -2)), // 12
    Some((Letter::E, -1)), // 13
    Some((Letter::E, 0)),  // 14
    Some((Letter::E, 1)),  // 15
    Some((Letter::E, 2)),  // 16
    Some((Letter::F, -2)), // 17
    Some((Letter::F, -1)), // 18
    Some((Letter::F, 0)),  // 19
    Some((Letter::F, 1)),  // 20
    Some((Letter::F, 2)),  // 21
    None,                  // 22
    Some((Letter::G, -2)), // 23
    Some((Letter::G, -1)), // 24
    Some((Letter::G, 0)),  // 25
    Some((Letter::G, 1)),  // 26
    Some((Letter::G, 2)),  // 27
    None,                  // 28
    Some((Letter::A, -2)), // 29
    Some((Letter::A, -1)), // 30
    Some((Letter::A, 0)),  // 31
    Some((Letter::A, 1)),  // 32
    Some((Letter::A, 2)),  // 33
    None,                  // 34
    Some((Letter::B, -2)), // 35
    Some((Letter::B, -1)), // 36
    Some((Letter::B, 0)),  // 37
    Some((Letter::B, 1)),  // 38
    Some((Letter::B, 2)),  // 39
];

/// A pitch in base-40 encoding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EncodedPitch(i32);

impl EncodedPitch {
    /// Wrap a raw value. Nothing is checked until the value is decoded.
    pub fn from_raw(value: i32) -> Self {
        EncodedPitch(value)
    }

    pub fn value(self) -> i32 {
        self.0
    }

    /// Slot within the octave, always in `0..40`
    pub fn residue(self) -> i32 {
        self.0.rem_euclid(BASE)
    }

    /// Octave, rounding toward negative infinity
    pub fn octave(self) -> i32 {
        self.0.div_euclid(BASE)
    }

    pub fn is_valid(self) -> bool {
        RESIDUE_TABLE[self.residue() as usize].is_some()
    }

    pub fn decode(self) -> Result<Pitch, PitchError> {
        decode(self)
    }
}

impl fmt::Display for EncodedPitch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Encode a pitch including its octave
pub fn encode(pitch: &Pitch) -> Result<EncodedPitch, PitchError> {
    encode_at_octave(pitch, pitch.octave)
}

/// Encode a pitch as if it were in `octave`
///
/// Used to fold every pitch into one octave so phrase comparison ignores
/// register.
pub fn encode_at_octave(pitch: &Pitch, octave: i32) -> Result<EncodedPitch, PitchError> {
    if !(-2..=2).contains(&pitch.alteration) {
        return Err(PitchError::InvalidPitch {
            letter: pitch.letter,
            alteration: pitch.alteration,
        });
    }
    Ok(EncodedPitch(
        base_value(pitch.letter) + pitch.alteration as i32 + octave * BASE,
    ))
}

/// Decode a value back into a spelled pitch
pub fn decode(encoded: EncodedPitch) -> Result<Pitch, PitchError> {
    let residue = encoded.residue();
    match RESIDUE_TABLE[residue as usize] {
        Some((letter, alteration)) => Ok(Pitch::new(letter, alteration, encoded.octave())),
        None => Err(PitchError::InvalidEncoding {
            value: encoded.value(),
            residue,
        }),
    }
}

/// Letter of an encoded pitch, without building the full pitch
pub fn letter_of(encoded: EncodedPitch) -> Result<Letter, PitchError> {
    let residue = encoded.residue();
    RESIDUE_TABLE[residue as usize]
        .map(|(letter, _)| letter)
        .ok_or(PitchError::InvalidEncoding {
            value: encoded.value(),
            residue,
        })
}

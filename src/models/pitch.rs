//! Pitch representation
//!
//! A pitch is a diatonic letter, a chromatic alteration and an octave.
//! Spellings are kept distinct (C# and Db are different pitches), which is
//! what the base-40 encoding relies on.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::encoding::PitchError;

/// Diatonic letter name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Letter {
    C,
    D,
    E,
    F,
    G,
    A,
    B,
}

impl Letter {
    /// All seven letters in scale order starting from C
    pub const ALL: [Letter; 7] = [
        Letter::C,
        Letter::D,
        Letter::E,
        Letter::F,
        Letter::G,
        Letter::A,
        Letter::B,
    ];

    /// Parse a letter from a single character (case-insensitive)
    pub fn from_char(c: char) -> Option<Letter> {
        match c.to_ascii_uppercase() {
            'C' => Some(Letter::C),
            'D' => Some(Letter::D),
            'E' => Some(Letter::E),
            'F' => Some(Letter::F),
            'G' => Some(Letter::G),
            'A' => Some(Letter::A),
            'B' => Some(Letter::B),
            _ => None,
        }
    }

    pub fn as_char(&self) -> char {
        match self {
            Letter::C => 'C',
            Letter::D => 'D',
            Letter::E => 'E',
            Letter::F => 'F',
            Letter::G => 'G',
            Letter::A => 'A',
            Letter::B => 'B',
        }
    }
}

impl fmt::Display for Letter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// Accidental symbol for an alteration, or `None` outside double-flat..double-sharp
pub fn accidental_symbol(alteration: i8) -> Option<&'static str> {
    match alteration {
        -2 => Some("bb"),
        -1 => Some("b"),
        0 => Some(""),
        1 => Some("#"),
        2 => Some("##"),
        _ => None,
    }
}

// Accepts both "b"/"bb" and the "-"/"--" flat spelling used by music21 exports.
static PITCH_NAME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([A-Ga-g])(##|#|bb|b|--|-)?(-?\d+)$").expect("pitch name pattern is valid")
});

/// Spelled pitch with octave
///
/// Octave numbering follows scientific pitch notation (C4 = middle C).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Pitch {
    pub letter: Letter,
    /// Semitone alteration (-2 = double flat .. +2 = double sharp)
    pub alteration: i8,
    pub octave: i32,
}

impl Pitch {
    /// Create a pitch without validating the alteration range
    pub fn new(letter: Letter, alteration: i8, octave: i32) -> Self {
        Self {
            letter,
            alteration,
            octave,
        }
    }

    /// Parse a pitch such as `"C4"`, `"F#5"`, `"Bb3"` or `"E--2"`
    pub fn parse(s: &str) -> Result<Pitch, PitchError> {
        let caps = PITCH_NAME
            .captures(s.trim())
            .ok_or_else(|| PitchError::UnknownPitchName(s.to_string()))?;

        let letter = caps[1]
            .chars()
            .next()
            .and_then(Letter::from_char)
            .ok_or_else(|| PitchError::UnknownPitchName(s.to_string()))?;

        let alteration = match caps.get(2).map(|m| m.as_str()) {
            None => 0,
            Some("#") => 1,
            Some("##") => 2,
            Some("b") | Some("-") => -1,
            Some("bb") | Some("--") => -2,
            Some(_) => return Err(PitchError::UnknownPitchName(s.to_string())),
        };

        let octave = caps[3]
            .parse()
            .map_err(|_| PitchError::UnknownPitchName(s.to_string()))?;

        Ok(Pitch::new(letter, alteration, octave))
    }

    /// Letter plus accidental, without octave (e.g. `"F#"`)
    pub fn name(&self) -> String {
        match accidental_symbol(self.alteration) {
            Some(symbol) => format!("{}{}", self.letter, symbol),
            None => format!("{}({:+})", self.letter, self.alteration),
        }
    }
}

impl fmt::Display for Pitch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.name(), self.octave)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_naturals() {
        assert_eq!(Pitch::parse("C4").unwrap(), Pitch::new(Letter::C, 0, 4));
        assert_eq!(Pitch::parse("a3").unwrap(), Pitch::new(Letter::A, 0, 3));
    }

    #[test]
    fn test_parse_accidentals() {
        assert_eq!(Pitch::parse("F#5").unwrap(), Pitch::new(Letter::F, 1, 5));
        assert_eq!(Pitch::parse("G##2").unwrap(), Pitch::new(Letter::G, 2, 2));
        assert_eq!(Pitch::parse("Bb3").unwrap(), Pitch::new(Letter::B, -1, 3));
        assert_eq!(Pitch::parse("Ebb4").unwrap(), Pitch::new(Letter::E, -2, 4));
    }

    #[test]
    fn test_parse_music21_flats() {
        assert_eq!(Pitch::parse("E-4").unwrap(), Pitch::new(Letter::E, -1, 4));
        assert_eq!(Pitch::parse("C--1").unwrap(), Pitch::new(Letter::C, -2, 1));
    }

    #[test]
    fn test_parse_negative_octave() {
        assert_eq!(Pitch::parse("C-1").unwrap(), Pitch::new(Letter::C, -1, 1));
        assert_eq!(Pitch::parse("C#-1").unwrap(), Pitch::new(Letter::C, 1, -1));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(Pitch::parse("H4").is_err());
        assert!(Pitch::parse("C").is_err());
        assert!(Pitch::parse("C###4").is_err());
    }

    #[test]
    fn test_display() {
        assert_eq!(Pitch::new(Letter::F, 1, 4).to_string(), "F#4");
        assert_eq!(Pitch::new(Letter::B, -2, 3).to_string(), "Bbb3");
        assert_eq!(Pitch::new(Letter::D, 0, 5).name(), "D");
    }
}

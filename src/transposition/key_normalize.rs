//! Key normalization on the base-40 line
//!
//! Moving one step around the circle of fifths is a transposition by a fifth,
//! which is 23 slots in base-40. A key with `n` sharps is brought to the key
//! with no sharps or flats by shifting down `n` fifths; every second fifth
//! the result is lifted an octave so it stays in roughly the same register.
//!
//! Example: in G major (1 sharp), G4 (185) → C4 (162).
//!          in E-flat major (-3), E-flat4 (173) → C4 (162).

use crate::encoding::{EncodedPitch, BASE};

/// Base-40 size of a perfect fifth
pub const FIFTH: i32 = 23;

/// Transpose `pitch` from a key with `sharps` sharps to the key with none
///
/// `sharps / 2` is floor division, so flat keys round toward negative
/// infinity. No range check is made on `sharps`; values far outside -7..=7
/// may land on slots that do not decode.
pub fn normalize_to_no_alterations(pitch: EncodedPitch, sharps: i32) -> EncodedPitch {
    EncodedPitch::from_raw(pitch.value() - FIFTH * sharps + BASE * sharps.div_euclid(2))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoding::{decode, encode};
    use crate::models::Pitch;

    fn enc(s: &str) -> EncodedPitch {
        encode(&Pitch::parse(s).unwrap()).unwrap()
    }

    #[test]
    fn test_c_major_is_identity() {
        for value in [0, 17, 162, 199, 498] {
            let pitch = EncodedPitch::from_raw(value);
            let once = normalize_to_no_alterations(pitch, 0);
            assert_eq!(once, pitch);
            assert_eq!(normalize_to_no_alterations(once, 0), pitch);
        }
    }

    #[test]
    fn test_sharp_keys_map_tonic_to_c() {
        assert_eq!(normalize_to_no_alterations(enc("G4"), 1), enc("C4"));
        assert_eq!(normalize_to_no_alterations(enc("D4"), 2), enc("C4"));
        assert_eq!(normalize_to_no_alterations(enc("A4"), 3), enc("C4"));
    }

    #[test]
    fn test_flat_keys_use_floor_division() {
        // floor(-1 / 2) = -1; truncation would give C5
        assert_eq!(normalize_to_no_alterations(enc("F4"), -1), enc("C4"));
        assert_eq!(normalize_to_no_alterations(enc("Eb4"), -3), enc("C4"));
        assert_eq!(normalize_to_no_alterations(enc("Bb4"), -2), enc("C5"));
    }

    #[test]
    fn test_scale_degrees_keep_their_spelling_role() {
        // F# is the leading tone of G major, which becomes B in C major
        let normalized = normalize_to_no_alterations(enc("F#5"), 1);
        assert_eq!(decode(normalized).unwrap(), Pitch::parse("B4").unwrap());
    }
}

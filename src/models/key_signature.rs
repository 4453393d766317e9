//! Key signature as a count of sharps

use serde::{Deserialize, Serialize};

/// Key signature expressed as sharps on the circle of fifths
///
/// Negative values are flats, so `-3` is E-flat major / C minor.
/// Maps directly onto MusicXML `<key><fifths>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct KeySignature {
    pub sharps: i32,
}

impl KeySignature {
    pub fn new(sharps: i32) -> Self {
        Self { sharps }
    }

    /// Major-mode tonic name, for log output
    pub fn major_tonic(&self) -> String {
        match self.sharps {
            0 => "C".to_string(),
            1 => "G".to_string(),
            2 => "D".to_string(),
            3 => "A".to_string(),
            4 => "E".to_string(),
            5 => "B".to_string(),
            6 => "F#".to_string(),
            7 => "C#".to_string(),
            -1 => "F".to_string(),
            -2 => "Bb".to_string(),
            -3 => "Eb".to_string(),
            -4 => "Ab".to_string(),
            -5 => "Db".to_string(),
            -6 => "Gb".to_string(),
            -7 => "Cb".to_string(),
            other => format!("{} sharps/flats", other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_c_major() {
        assert_eq!(KeySignature::default().sharps, 0);
        assert_eq!(KeySignature::default().major_tonic(), "C");
    }

    #[test]
    fn test_major_tonic() {
        assert_eq!(KeySignature::new(2).major_tonic(), "D");
        assert_eq!(KeySignature::new(-3).major_tonic(), "Eb");
        assert_eq!(KeySignature::new(9).major_tonic(), "9 sharps/flats");
    }
}

//! Models module
//!
//! Value types shared by the parser and the analysis core.

pub mod key_signature;
pub mod note;
pub mod pitch;

// Re-export commonly used types
pub use key_signature::KeySignature;
pub use note::{ql, MelodyNote, QuarterLength};
pub use pitch::{accidental_symbol, Letter, Pitch};

//! Transposition

pub mod key_normalize;

pub use key_normalize::normalize_to_no_alterations;

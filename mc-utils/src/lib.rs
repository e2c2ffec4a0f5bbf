//! Shared building blocks for the TriCore machine-code emission backend:
//! fixup-kind metadata, the pure value adjuster, and the bit-manipulation
//! helpers both sit on.

pub mod bit_misc;
pub mod fixup;
pub mod tricore;
pub mod utils;

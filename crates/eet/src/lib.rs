//! Merge named pipes, regular files and standard input into one output.
//!
//! eet reads from every input as soon as it has data, so a slow or idle
//! source never holds up the others. Bytes of one input stay in order;
//! inputs interleave as their data arrives.
//!
//! # Crate Structure
//!
//! - [`source`] — Designators and readable input handles
//! - [`mux`] — The readiness-driven merge loop

/// Re-export source types.
pub mod source {
    pub use eet_source::*;
}

/// Re-export multiplexer types.
pub mod mux {
    pub use eet_mux::*;
}

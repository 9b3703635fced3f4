//! Integration test crate for Cueline.
//!
//! This crate exists solely to hold cross-crate integration tests.
//! It depends on multiple cueline crates to verify they work together.

#[cfg(test)]
mod timeline;

#[cfg(test)]
mod playback;

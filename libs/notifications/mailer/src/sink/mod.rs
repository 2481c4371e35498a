//! Output sinks
//!
//! Any `std::io::Write` is a sink. Beyond the standard ones (`std::io::stdout()`
//! for the console, `std::io::sink()` to discard, `Vec<u8>` as a buffer) this
//! module provides a capturing sink for tests and demos.

pub mod capture;

pub use capture::CapturingSink;

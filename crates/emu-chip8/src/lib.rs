//! CHIP-8 frontend pieces: host keyboard mapping and headless capture.
//!
//! The windowed binary lives in `main.rs`; everything that is useful
//! headless or under test is exposed here.

pub mod capture;
pub mod keyboard_map;

//! CHIP-8 virtual machine core.
//!
//! Machine state plus the fetch-decode-execute engine for the 35-opcode
//! CHIP-8 instruction set: 4 KB of memory, sixteen 8-bit registers, a
//! 16-level call stack, two countdown timers, a 64x32 monochrome
//! framebuffer and a 16-key keypad.
//!
//! Presentation, host input and pacing live in the frontend crate. The
//! driver loop is: apply input, call [`Chip8::run_batch`] if no key wait
//! is pending, and render the display when [`Chip8::take_redraw`] reports
//! a change.

mod exec;
mod font;
mod machine;
mod opcode;

pub use font::{FONT, GLYPH_HEIGHT};
pub use machine::{
    Chip8, Chip8Error, DISPLAY_HEIGHT, DISPLAY_WIDTH, MAX_PROGRAM_SIZE, MEMORY_SIZE,
    PROGRAM_ORIGIN, STACK_DEPTH,
};
pub use opcode::Opcode;

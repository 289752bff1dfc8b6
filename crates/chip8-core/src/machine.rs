//! CHIP-8 machine state.
//!
//! The authoritative, mutable representation of the virtual CPU. A `Chip8`
//! has a single owner (the driver); everything mutates in place through
//! `load_program`, the key methods, and the execution engine in `exec`.
//! There is no global state and no internal locking.

use std::fmt;

use rand::SeedableRng;
use rand::rngs::SmallRng;

use crate::font::FONT;

/// Framebuffer width in pixels.
pub const DISPLAY_WIDTH: usize = 64;

/// Framebuffer height in pixels.
pub const DISPLAY_HEIGHT: usize = 32;

/// Total addressable memory in bytes.
pub const MEMORY_SIZE: usize = 4096;

/// Load address for program images; also the reset program counter.
pub const PROGRAM_ORIGIN: u16 = 0x200;

/// Maximum program image size (all memory above the program origin).
pub const MAX_PROGRAM_SIZE: usize = MEMORY_SIZE - PROGRAM_ORIGIN as usize;

/// Call stack depth.
pub const STACK_DEPTH: usize = 16;

/// Startup errors.
///
/// Run-time architectural violations (stack overflow, unknown opcodes) are
/// deliberately silent no-ops, not errors — see the `exec` module.
#[derive(Debug)]
pub enum Chip8Error {
    /// Program image exceeds the memory above the program origin.
    ProgramTooLarge(usize),
}

impl fmt::Display for Chip8Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ProgramTooLarge(size) => write!(
                f,
                "program image too large: {size} bytes (maximum {MAX_PROGRAM_SIZE})",
            ),
        }
    }
}

impl std::error::Error for Chip8Error {}

/// CHIP-8 machine.
pub struct Chip8 {
    /// 4 KB of memory. Bytes [0, 80) hold the font table; a program that
    /// writes there corrupts its own glyphs (architecture-faithful, not
    /// enforced).
    pub(crate) memory: [u8; MEMORY_SIZE],
    /// General registers V0-VF. VF doubles as the carry/borrow/collision
    /// flag and is clobbered by the instructions that compute one.
    pub(crate) v: [u8; 16],
    /// Program counter. Wider than the address space; masked to 12 bits at
    /// every memory access, never on assignment.
    pub(crate) pc: u16,
    /// Address register I.
    pub(crate) i: u16,
    pub(crate) stack: [u16; STACK_DEPTH],
    pub(crate) sp: usize,
    pub(crate) delay_timer: u8,
    pub(crate) sound_timer: u8,
    /// Keypad state, one flag per logical key 0-F.
    pub(crate) keys: [bool; 16],
    /// Framebuffer, row-major, one byte per pixel holding 0 or 1.
    pub(crate) display: [u8; DISPLAY_WIDTH * DISPLAY_HEIGHT],
    /// Register awaiting a key press (opcode FX0A), if any. While set, the
    /// engine executes nothing.
    pub(crate) pending_key: Option<usize>,
    pub(crate) needs_redraw: bool,
    pub(crate) running: bool,
    /// Instruction counter for the every-ninth-step timer decrement.
    /// Persists across batches.
    pub(crate) tick_time: u32,
    pub(crate) rng: SmallRng,
}

impl Chip8 {
    /// Create a machine in the reset state: memory zeroed, font loaded at
    /// offset 0, `pc` at the program origin, keypad clear, no key wait.
    #[must_use]
    pub fn new() -> Self {
        Self::with_rng(SmallRng::from_os_rng())
    }

    /// Create a machine with a seeded RNG for deterministic CXNN results.
    #[must_use]
    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(SmallRng::seed_from_u64(seed))
    }

    fn with_rng(rng: SmallRng) -> Self {
        let mut chip = Self {
            memory: [0; MEMORY_SIZE],
            v: [0; 16],
            pc: 0,
            i: 0,
            stack: [0; STACK_DEPTH],
            sp: 0,
            delay_timer: 0,
            sound_timer: 0,
            keys: [false; 16],
            display: [0; DISPLAY_WIDTH * DISPLAY_HEIGHT],
            pending_key: None,
            needs_redraw: false,
            running: true,
            tick_time: 0,
            rng,
        };
        chip.reset();
        chip
    }

    /// Reset to the power-on state. Keeps the RNG.
    pub fn reset(&mut self) {
        self.memory = [0; MEMORY_SIZE];
        self.memory[..FONT.len()].copy_from_slice(&FONT);
        self.v = [0; 16];
        self.pc = PROGRAM_ORIGIN;
        self.i = 0;
        self.stack = [0; STACK_DEPTH];
        self.sp = 0;
        self.delay_timer = 0;
        self.sound_timer = 0;
        self.keys = [false; 16];
        self.display = [0; DISPLAY_WIDTH * DISPLAY_HEIGHT];
        self.pending_key = None;
        self.needs_redraw = false;
        self.running = true;
        self.tick_time = 0;
    }

    /// Copy a program image into memory at the program origin.
    ///
    /// # Errors
    ///
    /// Returns [`Chip8Error::ProgramTooLarge`] if the image exceeds
    /// [`MAX_PROGRAM_SIZE`] bytes. Nothing is copied on failure.
    pub fn load_program(&mut self, image: &[u8]) -> Result<(), Chip8Error> {
        if image.len() > MAX_PROGRAM_SIZE {
            return Err(Chip8Error::ProgramTooLarge(image.len()));
        }
        let origin = PROGRAM_ORIGIN as usize;
        self.memory[origin..origin + image.len()].copy_from_slice(image);
        Ok(())
    }

    /// Press a logical key (0-F).
    ///
    /// If the machine is waiting on FX0A, the key value is written into the
    /// waiting register and the wait is cleared, unblocking the engine.
    pub fn press_key(&mut self, key: usize) {
        self.keys[key & 0xF] = true;
        if let Some(x) = self.pending_key.take() {
            self.v[x] = (key & 0xF) as u8;
        }
    }

    /// Release a logical key (0-F).
    pub fn release_key(&mut self, key: usize) {
        self.keys[key & 0xF] = false;
    }

    /// Whether the machine is waiting for a key press (opcode FX0A).
    #[must_use]
    pub fn awaiting_key(&self) -> bool {
        self.pending_key.is_some()
    }

    /// Request a redraw without a display change (e.g. after a window
    /// resize or expose event).
    pub fn request_redraw(&mut self) {
        self.needs_redraw = true;
    }

    /// Whether the display has changed since the last `take_redraw`.
    #[must_use]
    pub fn needs_redraw(&self) -> bool {
        self.needs_redraw
    }

    /// Consume the redraw flag: returns it and clears it.
    pub fn take_redraw(&mut self) -> bool {
        std::mem::take(&mut self.needs_redraw)
    }

    /// Signal termination. The driver stops stepping once this is called.
    pub fn stop(&mut self) {
        self.running = false;
    }

    /// Whether the machine is still running.
    #[must_use]
    pub fn running(&self) -> bool {
        self.running
    }

    /// The framebuffer: `DISPLAY_WIDTH * DISPLAY_HEIGHT` bytes, row-major,
    /// each 0 or 1.
    #[must_use]
    pub fn display(&self) -> &[u8] {
        &self.display
    }

    /// One display pixel. Returns true if set.
    #[must_use]
    pub fn pixel(&self, x: usize, y: usize) -> bool {
        self.display[y * DISPLAY_WIDTH + x] != 0
    }

    /// All of memory, font table included.
    #[must_use]
    pub fn memory(&self) -> &[u8] {
        &self.memory
    }

    /// A general register V0-VF.
    #[must_use]
    pub fn register(&self, index: usize) -> u8 {
        self.v[index]
    }

    /// The program counter.
    #[must_use]
    pub fn pc(&self) -> u16 {
        self.pc
    }

    /// The address register I.
    #[must_use]
    pub fn index(&self) -> u16 {
        self.i
    }

    /// The delay timer.
    #[must_use]
    pub fn delay_timer(&self) -> u8 {
        self.delay_timer
    }

    /// The sound timer. The reference hardware beeps while this is nonzero;
    /// this core only models the countdown.
    #[must_use]
    pub fn sound_timer(&self) -> u8 {
        self.sound_timer
    }

    /// Whether a logical key is currently pressed.
    #[must_use]
    pub fn key_pressed(&self, key: usize) -> bool {
        self.keys[key & 0xF]
    }
}

impl Default for Chip8 {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_machine_is_reset() {
        let chip = Chip8::with_seed(1);
        assert_eq!(chip.pc(), PROGRAM_ORIGIN);
        assert!(chip.running());
        assert!(!chip.awaiting_key());
        assert!(chip.display().iter().all(|&px| px == 0));
    }

    #[test]
    fn font_loaded_at_offset_zero() {
        let chip = Chip8::with_seed(1);
        assert_eq!(&chip.memory()[..FONT.len()], &FONT);
        // Glyph "1" row 0 is 0x20
        assert_eq!(chip.memory()[5], 0x20);
    }

    #[test]
    fn load_program_copies_to_origin() {
        let mut chip = Chip8::with_seed(1);
        chip.load_program(&[0xAA, 0xBB]).expect("fits");
        assert_eq!(chip.memory()[0x200], 0xAA);
        assert_eq!(chip.memory()[0x201], 0xBB);
    }

    #[test]
    fn load_program_accepts_maximum_size() {
        let mut chip = Chip8::with_seed(1);
        assert!(chip.load_program(&vec![0; MAX_PROGRAM_SIZE]).is_ok());
    }

    #[test]
    fn load_program_rejects_oversized_image() {
        let mut chip = Chip8::with_seed(1);
        let err = chip
            .load_program(&vec![0; MAX_PROGRAM_SIZE + 1])
            .expect_err("too large");
        assert!(matches!(err, Chip8Error::ProgramTooLarge(3585)));
    }

    #[test]
    fn press_key_sets_and_release_clears() {
        let mut chip = Chip8::with_seed(1);
        chip.press_key(0xA);
        assert!(chip.key_pressed(0xA));
        chip.release_key(0xA);
        assert!(!chip.key_pressed(0xA));
    }

    #[test]
    fn press_key_resolves_pending_wait() {
        let mut chip = Chip8::with_seed(1);
        chip.pending_key = Some(3);
        chip.press_key(7);
        assert!(!chip.awaiting_key());
        assert_eq!(chip.register(3), 7);
    }

    #[test]
    fn take_redraw_clears_flag() {
        let mut chip = Chip8::with_seed(1);
        chip.request_redraw();
        assert!(chip.needs_redraw());
        assert!(chip.take_redraw());
        assert!(!chip.needs_redraw());
        assert!(!chip.take_redraw());
    }

    #[test]
    fn reset_restores_power_on_state() {
        let mut chip = Chip8::with_seed(1);
        chip.load_program(&[0x12, 0x00]).expect("fits");
        chip.run_batch(3);
        chip.press_key(2);
        chip.stop();
        chip.reset();
        assert_eq!(chip.pc(), PROGRAM_ORIGIN);
        assert!(chip.running());
        assert!(!chip.key_pressed(2));
        assert_eq!(chip.memory()[0x200], 0);
        assert_eq!(&chip.memory()[..FONT.len()], &FONT);
    }
}

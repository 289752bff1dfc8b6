//! Fetch-decode-execute engine.
//!
//! Single-threaded and cooperative: the engine never blocks and never
//! yields mid-instruction. The one architectural suspension point is the
//! FX0A key wait, which parks the machine until the frontend delivers a
//! key press.
//!
//! # Timer coupling
//!
//! The delay and sound timers decrement once every ninth executed
//! instruction, not per unit of wall-clock time. With the reference pacing
//! of a five-instruction batch every 10 ms this lands near the traditional
//! 60 Hz decay, and programs calibrate their delays against that ratio, so
//! the coupling to instruction throughput is load-bearing.

use rand::Rng;

use crate::font::GLYPH_HEIGHT;
use crate::machine::{Chip8, DISPLAY_HEIGHT, DISPLAY_WIDTH, STACK_DEPTH};
use crate::opcode::Opcode;

/// Instructions per timer decrement.
const TIMER_PERIOD: u32 = 9;

impl Chip8 {
    /// Execute up to `n` instructions.
    ///
    /// Stops early as soon as a key wait is pending, including one left
    /// over from a previous batch: while the machine is awaiting a key,
    /// repeated calls execute nothing at all.
    pub fn run_batch(&mut self, n: u32) {
        for _ in 0..n {
            if self.pending_key.is_some() {
                break;
            }
            self.step();
        }
    }

    /// Fetch, decode and execute a single instruction, then advance the
    /// timer divider.
    ///
    /// The fetch masks the program counter to 12 bits; the counter itself
    /// is never masked and wraps at 16 bits like the real register.
    pub fn step(&mut self) {
        let hi = self.memory[usize::from(self.pc & 0x0FFF)];
        let lo = self.memory[usize::from(self.pc.wrapping_add(1) & 0x0FFF)];
        self.pc = self.pc.wrapping_add(2);

        let word = u16::from(hi) << 8 | u16::from(lo);
        if let Some(op) = Opcode::decode(word) {
            self.execute(op);
        }

        self.tick_time += 1;
        if self.tick_time >= TIMER_PERIOD {
            self.tick_time = 0;
            if self.delay_timer > 0 {
                self.delay_timer -= 1;
            }
            if self.sound_timer > 0 {
                self.sound_timer -= 1;
            }
        }
    }

    /// Skip the next instruction.
    fn skip(&mut self) {
        self.pc = self.pc.wrapping_add(2);
    }

    fn execute(&mut self, op: Opcode) {
        match op {
            Opcode::Clear => {
                self.display.fill(0);
                self.needs_redraw = true;
            }
            // Return on an empty stack is a silent no-op: the architecture
            // has no stack-fault signal.
            Opcode::Return => {
                if self.sp > 0 {
                    self.sp -= 1;
                    self.pc = self.stack[self.sp];
                }
            }
            Opcode::Jump(nnn) => self.pc = nnn,
            // A call on a full stack is dropped whole: no push, no jump.
            Opcode::Call(nnn) => {
                if self.sp < STACK_DEPTH {
                    self.stack[self.sp] = self.pc;
                    self.sp += 1;
                    self.pc = nnn;
                }
            }
            Opcode::SkipEqImm { x, nn } => {
                if self.v[x] == nn {
                    self.skip();
                }
            }
            Opcode::SkipNeImm { x, nn } => {
                if self.v[x] != nn {
                    self.skip();
                }
            }
            Opcode::SkipEqReg { x, y } => {
                if self.v[x] == self.v[y] {
                    self.skip();
                }
            }
            Opcode::LoadImm { x, nn } => self.v[x] = nn,
            Opcode::AddImm { x, nn } => self.v[x] = self.v[x].wrapping_add(nn),
            Opcode::Move { x, y } => self.v[x] = self.v[y],
            Opcode::Or { x, y } => self.v[x] |= self.v[y],
            Opcode::And { x, y } => self.v[x] &= self.v[y],
            Opcode::Xor { x, y } => self.v[x] ^= self.v[y],
            // For the flag-writing ALU ops the flag is written first, then
            // the result is computed from the registers as they then stand.
            // When X or Y is VF itself this aliasing is observable, and the
            // reference interpreter behaves exactly this way.
            Opcode::Add { x, y } => {
                self.v[0xF] = u8::from(self.v[x] > u8::MAX - self.v[y]);
                self.v[x] = self.v[x].wrapping_add(self.v[y]);
            }
            Opcode::Sub { x, y } => {
                self.v[0xF] = u8::from(self.v[x] >= self.v[y]);
                self.v[x] = self.v[x].wrapping_sub(self.v[y]);
            }
            Opcode::ShiftRight { x, y } => {
                self.v[0xF] = self.v[y] & 0x1;
                self.v[x] = self.v[y] >> 1;
            }
            Opcode::SubFrom { x, y } => {
                self.v[0xF] = u8::from(self.v[y] >= self.v[x]);
                self.v[x] = self.v[y].wrapping_sub(self.v[x]);
            }
            Opcode::ShiftLeft { x, y } => {
                self.v[0xF] = (self.v[y] >> 7) & 0x1;
                self.v[x] = self.v[y] << 1;
            }
            Opcode::SkipNeReg { x, y } => {
                if self.v[x] != self.v[y] {
                    self.skip();
                }
            }
            Opcode::LoadIndex(nnn) => self.i = nnn,
            Opcode::JumpOffset(nnn) => self.pc = u16::from(self.v[0]).wrapping_add(nnn),
            Opcode::Random { x, nn } => self.v[x] = self.rng.random::<u8>() & nn,
            Opcode::Draw { x, y, n } => self.draw_sprite(x, y, n),
            Opcode::SkipKeyPressed { x } => {
                if self.keys[usize::from(self.v[x] & 0xF)] {
                    self.skip();
                }
            }
            Opcode::SkipKeyNotPressed { x } => {
                if !self.keys[usize::from(self.v[x] & 0xF)] {
                    self.skip();
                }
            }
            Opcode::ReadDelay { x } => self.v[x] = self.delay_timer,
            Opcode::WaitKey { x } => self.pending_key = Some(x),
            Opcode::SetDelay { x } => self.delay_timer = self.v[x],
            Opcode::SetSound { x } => self.sound_timer = self.v[x],
            Opcode::AddIndex { x } => self.i = self.i.wrapping_add(u16::from(self.v[x])),
            Opcode::FontGlyph { x } => self.i = u16::from(self.v[x]) * GLYPH_HEIGHT as u16,
            Opcode::StoreBcd { x } => {
                let val = self.v[x];
                let base = usize::from(self.i);
                self.memory[base & 0xFFF] = val / 100;
                self.memory[(base + 1) & 0xFFF] = (val % 100) / 10;
                self.memory[(base + 2) & 0xFFF] = val % 10;
            }
            Opcode::StoreRegisters { x } => {
                for r in 0..=x {
                    self.memory[usize::from(self.i) & 0xFFF] = self.v[r];
                    self.i = self.i.wrapping_add(1);
                }
            }
            Opcode::LoadRegisters { x } => {
                for r in 0..=x {
                    self.v[r] = self.memory[usize::from(self.i) & 0xFFF];
                    self.i = self.i.wrapping_add(1);
                }
            }
        }
    }

    /// Draw an 8-wide, `n`-tall sprite read from memory at I, XORed onto
    /// the display at (VX, VY) with row and column wraparound. VF reports
    /// whether any drawn pixel hit an already-set pixel.
    ///
    /// Known deviation: only sprite bits 0-6 of each row are drawn, so
    /// sprites render seven pixels wide instead of the canonical eight.
    /// This reproduces the reference interpreter; programs that depend on
    /// the rightmost sprite column will show a one-pixel gap.
    fn draw_sprite(&mut self, x: usize, y: usize, n: usize) {
        self.needs_redraw = true;
        self.v[0xF] = 0;
        for row in 0..n {
            let src = self.memory[usize::from(self.i.wrapping_add(row as u16)) & 0xFFF];
            for bit in 0..7 {
                // VX/VY are re-read per pixel, after the VF reset above, as
                // the reference does; with X or Y = 15 the flag feeds back
                // into the coordinates mid-draw.
                let col = (usize::from(self.v[x]) + bit) % DISPLAY_WIDTH;
                let line = (usize::from(self.v[y]) + row) % DISPLAY_HEIGHT;
                let src_bit = (src >> (7 - bit)) & 1;
                let dest = &mut self.display[line * DISPLAY_WIDTH + col];
                if self.v[0xF] == 0 && *dest & src_bit != 0 {
                    self.v[0xF] = 1;
                }
                *dest ^= src_bit;
            }
        }
    }
}

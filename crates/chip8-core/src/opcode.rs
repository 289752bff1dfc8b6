//! Instruction decode.
//!
//! One enum variant per recognized opcode so the execute match is
//! exhaustive by construction. Field conventions follow the architecture:
//! X = bits 8-11 (register index), Y = bits 4-7 (register index),
//! N = low nibble, NN = low byte, NNN = low 12 bits.

/// A decoded CHIP-8 instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Opcode {
    /// 00E0 — clear the display.
    Clear,
    /// 00EE — return from subroutine.
    Return,
    /// 1NNN — jump.
    Jump(u16),
    /// 2NNN — call subroutine.
    Call(u16),
    /// 3XNN — skip next instruction if VX == NN.
    SkipEqImm { x: usize, nn: u8 },
    /// 4XNN — skip if VX != NN.
    SkipNeImm { x: usize, nn: u8 },
    /// 5XY0 — skip if VX == VY.
    SkipEqReg { x: usize, y: usize },
    /// 6XNN — VX := NN.
    LoadImm { x: usize, nn: u8 },
    /// 7XNN — VX += NN, no flag.
    AddImm { x: usize, nn: u8 },
    /// 8XY0 — VX := VY.
    Move { x: usize, y: usize },
    /// 8XY1 — VX |= VY.
    Or { x: usize, y: usize },
    /// 8XY2 — VX &= VY.
    And { x: usize, y: usize },
    /// 8XY3 — VX ^= VY.
    Xor { x: usize, y: usize },
    /// 8XY4 — VX += VY, VF = carry.
    Add { x: usize, y: usize },
    /// 8XY5 — VX -= VY, VF = no-borrow.
    Sub { x: usize, y: usize },
    /// 8XY6 — VX := VY >> 1, VF = shifted-out bit.
    ShiftRight { x: usize, y: usize },
    /// 8XY7 — VX := VY - VX, VF = no-borrow.
    SubFrom { x: usize, y: usize },
    /// 8XYE — VX := VY << 1, VF = shifted-out bit.
    ShiftLeft { x: usize, y: usize },
    /// 9XY0 — skip if VX != VY.
    SkipNeReg { x: usize, y: usize },
    /// ANNN — I := NNN.
    LoadIndex(u16),
    /// BNNN — jump to V0 + NNN.
    JumpOffset(u16),
    /// CXNN — VX := random byte & NN.
    Random { x: usize, nn: u8 },
    /// DXYN — draw an N-row sprite from I at (VX, VY).
    Draw { x: usize, y: usize, n: usize },
    /// EX9E — skip if key VX is pressed.
    SkipKeyPressed { x: usize },
    /// EXA1 — skip if key VX is not pressed.
    SkipKeyNotPressed { x: usize },
    /// FX07 — VX := delay timer.
    ReadDelay { x: usize },
    /// FX0A — block until a key press lands in VX.
    WaitKey { x: usize },
    /// FX15 — delay timer := VX.
    SetDelay { x: usize },
    /// FX18 — sound timer := VX.
    SetSound { x: usize },
    /// FX1E — I += VX.
    AddIndex { x: usize },
    /// FX29 — I := font glyph address for digit VX.
    FontGlyph { x: usize },
    /// FX33 — store VX as three decimal digits at I.
    StoreBcd { x: usize },
    /// FX55 — store V0..=VX at I; I advances past them.
    StoreRegisters { x: usize },
    /// FX65 — load V0..=VX from I; I advances past them.
    LoadRegisters { x: usize },
}

impl Opcode {
    /// Decode a raw instruction word.
    ///
    /// Returns `None` for any word that is not one of the 35 recognized
    /// opcodes. The engine executes `None` as a no-op: historical
    /// interpreters silently ignore unknown sub-opcodes, and programs rely
    /// on that, so this is never an error.
    #[must_use]
    pub fn decode(word: u16) -> Option<Self> {
        let x = usize::from((word >> 8) & 0xF);
        let y = usize::from((word >> 4) & 0xF);
        let n = usize::from(word & 0xF);
        let nn = (word & 0xFF) as u8;
        let nnn = word & 0x0FFF;

        match word >> 12 {
            0x0 => match nnn {
                0x0E0 => Some(Self::Clear),
                0x0EE => Some(Self::Return),
                _ => None,
            },
            0x1 => Some(Self::Jump(nnn)),
            0x2 => Some(Self::Call(nnn)),
            0x3 => Some(Self::SkipEqImm { x, nn }),
            0x4 => Some(Self::SkipNeImm { x, nn }),
            0x5 if n == 0 => Some(Self::SkipEqReg { x, y }),
            0x6 => Some(Self::LoadImm { x, nn }),
            0x7 => Some(Self::AddImm { x, nn }),
            0x8 => match n {
                0x0 => Some(Self::Move { x, y }),
                0x1 => Some(Self::Or { x, y }),
                0x2 => Some(Self::And { x, y }),
                0x3 => Some(Self::Xor { x, y }),
                0x4 => Some(Self::Add { x, y }),
                0x5 => Some(Self::Sub { x, y }),
                0x6 => Some(Self::ShiftRight { x, y }),
                0x7 => Some(Self::SubFrom { x, y }),
                0xE => Some(Self::ShiftLeft { x, y }),
                _ => None,
            },
            0x9 if n == 0 => Some(Self::SkipNeReg { x, y }),
            0xA => Some(Self::LoadIndex(nnn)),
            0xB => Some(Self::JumpOffset(nnn)),
            0xC => Some(Self::Random { x, nn }),
            0xD => Some(Self::Draw { x, y, n }),
            0xE => match nn {
                0x9E => Some(Self::SkipKeyPressed { x }),
                0xA1 => Some(Self::SkipKeyNotPressed { x }),
                _ => None,
            },
            0xF => match nn {
                0x07 => Some(Self::ReadDelay { x }),
                0x0A => Some(Self::WaitKey { x }),
                0x15 => Some(Self::SetDelay { x }),
                0x18 => Some(Self::SetSound { x }),
                0x1E => Some(Self::AddIndex { x }),
                0x29 => Some(Self::FontGlyph { x }),
                0x33 => Some(Self::StoreBcd { x }),
                0x55 => Some(Self::StoreRegisters { x }),
                0x65 => Some(Self::LoadRegisters { x }),
                _ => None,
            },
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_system_opcodes() {
        assert_eq!(Opcode::decode(0x00E0), Some(Opcode::Clear));
        assert_eq!(Opcode::decode(0x00EE), Some(Opcode::Return));
        // Machine-code call (0NNN) is not implemented: no-op
        assert_eq!(Opcode::decode(0x0123), None);
        // The second nibble participates in the NNN match
        assert_eq!(Opcode::decode(0x01E0), None);
    }

    #[test]
    fn decode_flow_control() {
        assert_eq!(Opcode::decode(0x1ABC), Some(Opcode::Jump(0xABC)));
        assert_eq!(Opcode::decode(0x2ABC), Some(Opcode::Call(0xABC)));
        assert_eq!(Opcode::decode(0xB123), Some(Opcode::JumpOffset(0x123)));
    }

    #[test]
    fn decode_skips() {
        assert_eq!(
            Opcode::decode(0x3A42),
            Some(Opcode::SkipEqImm { x: 0xA, nn: 0x42 })
        );
        assert_eq!(
            Opcode::decode(0x4A42),
            Some(Opcode::SkipNeImm { x: 0xA, nn: 0x42 })
        );
        assert_eq!(
            Opcode::decode(0x5AB0),
            Some(Opcode::SkipEqReg { x: 0xA, y: 0xB })
        );
        assert_eq!(
            Opcode::decode(0x9AB0),
            Some(Opcode::SkipNeReg { x: 0xA, y: 0xB })
        );
        // Register-compare skips require a zero low nibble
        assert_eq!(Opcode::decode(0x5AB1), None);
        assert_eq!(Opcode::decode(0x9ABF), None);
    }

    #[test]
    fn decode_alu_family() {
        assert_eq!(Opcode::decode(0x8120), Some(Opcode::Move { x: 1, y: 2 }));
        assert_eq!(Opcode::decode(0x8124), Some(Opcode::Add { x: 1, y: 2 }));
        assert_eq!(
            Opcode::decode(0x8126),
            Some(Opcode::ShiftRight { x: 1, y: 2 })
        );
        assert_eq!(
            Opcode::decode(0x812E),
            Some(Opcode::ShiftLeft { x: 1, y: 2 })
        );
        // 8XY8-8XYD are unassigned
        assert_eq!(Opcode::decode(0x8128), None);
        assert_eq!(Opcode::decode(0x812D), None);
    }

    #[test]
    fn decode_key_and_timer_families() {
        assert_eq!(
            Opcode::decode(0xE39E),
            Some(Opcode::SkipKeyPressed { x: 3 })
        );
        assert_eq!(
            Opcode::decode(0xE3A1),
            Some(Opcode::SkipKeyNotPressed { x: 3 })
        );
        assert_eq!(Opcode::decode(0xE39F), None);
        assert_eq!(Opcode::decode(0xF30A), Some(Opcode::WaitKey { x: 3 }));
        assert_eq!(Opcode::decode(0xF365), Some(Opcode::LoadRegisters { x: 3 }));
        // The F family dispatches on the whole low byte
        assert_eq!(Opcode::decode(0xF300), None);
        assert_eq!(Opcode::decode(0xF3FF), None);
    }

    #[test]
    fn decode_draw_extracts_all_fields() {
        assert_eq!(
            Opcode::decode(0xDAB5),
            Some(Opcode::Draw { x: 0xA, y: 0xB, n: 5 })
        );
    }
}

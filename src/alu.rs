//! Arithmetic-logic unit.
//!
//! Registers are bytes and arithmetic wraps modulo 256, so `2 - 3` leaves
//! `255` and `16 * 16` leaves `0`. Division truncates toward zero.

use num_enum::{IntoPrimitive, TryFromPrimitive};

use crate::fault::Fault;
use crate::memory::Byte;
use crate::registers::RegisterFile;

/// Operations the ALU knows, keyed by their opcode
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[derive(TryFromPrimitive, IntoPrimitive)]
pub enum AluOp {
    Add = 0b1010_0000,
    Sub = 0b1010_0001,
    Mul = 0b1010_0010,
    Div = 0b1010_0011,
}

impl AluOp {
    /// Computes `a OP b`
    pub fn compute(self, a: Byte, b: Byte) -> Result<Byte, Fault> {
        match self {
            AluOp::Add => Ok(a.wrapping_add(b)),
            AluOp::Sub => Ok(a.wrapping_sub(b)),
            AluOp::Mul => Ok(a.wrapping_mul(b)),
            AluOp::Div => a.checked_div(b).ok_or(Fault::DivisionByZero),
        }
    }
}

/// Runs the operation selected by `opcode` on two registers and stores the
/// result in the first: `reg[a] = reg[a] OP reg[b]`.
pub fn apply(
    registers: &mut RegisterFile,
    opcode: Byte,
    reg_a: Byte,
    reg_b: Byte,
) -> Result<(), Fault> {
    let op = AluOp::try_from(opcode).map_err(|_| Fault::UnsupportedOperation { opcode })?;
    let a = registers.get(reg_a)?;
    let b = registers.get(reg_b)?;
    let result = op.compute(a, b)?;

    log::debug!("{:?} R{} R{}: {} {} -> {}", op, reg_a, reg_b, a, b, result);

    registers.set_general(reg_a, result)
}

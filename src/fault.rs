use std::io;

use thiserror::Error;

use crate::memory::{Address, Byte};

/// Errors that stop the machine while it is running a program.
#[derive(Debug, Error)]
pub enum Fault {
    /// The ALU was handed an opcode it has no operation for.
    #[error("unsupported ALU operation `0b{opcode:08b}`")]
    UnsupportedOperation { opcode: Byte },
    /// A memory access outside of RAM.
    #[error("memory has no address `0x{address:x}`")]
    AddressOutOfRange { address: Address },
    /// An operand named a register that does not exist.
    #[error("there is no register R{index}")]
    RegisterOutOfRange { index: Byte },
    /// An instruction tried to write a register reserved for the machine.
    #[error("register R{index} is reserved and cannot be written by this instruction")]
    ReservedRegister { index: Byte },
    #[error("division by zero")]
    DivisionByZero,
    /// PUSH with the stack pointer already at address 0.
    #[error("stack overflow")]
    StackOverflow,
    /// POP with the stack pointer at the last address of RAM.
    #[error("stack underflow")]
    StackUnderflow,
    /// Writing PRN output failed.
    #[error("failed to write program output")]
    Output(#[from] io::Error),
}

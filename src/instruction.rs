//! Opcode table and the bit pattern decoder.
//!
//! An opcode byte is laid out as `AABCDDDD`: `AA` is the number of operands
//! following the opcode and `B` marks the ALU instructions. Which operation
//! runs is decided by the exact byte alone.

use std::fmt;

use num_enum::{IntoPrimitive, TryFromPrimitive};

use crate::memory::Byte;

/// Total width of the instruction starting with `opcode`, in bytes. The
/// program counter moves by exactly this much after every instruction.
pub const fn operand_width(opcode: Byte) -> u8 {
    (opcode >> 6) + 1
}

/// Whether `opcode` is dispatched to the ALU
pub const fn is_alu(opcode: Byte) -> bool {
    (opcode >> 5) & 1 == 1
}

macro_rules! instructions {
    ( $( $( #[doc = $doc:expr] )+ $name:ident ( $operands:literal ) = $repr:literal , )+ ) => {
        /// The LS-8 instruction set
        #[repr(u8)]
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        #[derive(TryFromPrimitive, IntoPrimitive)]
        pub enum Opcode {
            $(
                $( #[doc = $doc] )+
                $name = $repr,
            )+
        }

        impl Opcode {
            pub const ALL: &'static [Self] = &[
                $( Self::$name , )+
            ];

            pub fn name(&self) -> &'static str {
                match self {
                    $( Self::$name => stringify!($name) , )+
                }
            }

            /// Number of operand bytes the handler reads
            pub fn operands(&self) -> u8 {
                match self {
                    $( Self::$name => $operands , )+
                }
            }
        }

        impl fmt::Display for Opcode {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                match self {
                    $( Self::$name => f.write_str(stringify!($name)) , )+
                }
            }
        }
    }
}

instructions! {
    /// Load an immediate into a register
    /// @param register
    /// @param value
    LDI(2) = 0b1000_0010,
    /// Print the decimal value of a register
    /// @param register
    PRN(1) = 0b0100_0111,
    /// Stop the machine
    HLT(0) = 0b0000_0001,
    /// Pop the top of the stack into a register
    /// @param register
    POP(1) = 0b0100_0110,
    /// Push a register onto the stack
    /// @param register
    PUSH(1) = 0b0100_0101,
    /// `register_a += register_b`
    ADD(2) = 0b1010_0000,
    /// `register_a -= register_b`
    SUB(2) = 0b1010_0001,
    /// `register_a *= register_b`
    MUL(2) = 0b1010_0010,
    /// `register_a /= register_b`
    DIV(2) = 0b1010_0011,
}

impl Opcode {
    pub fn width(&self) -> u8 {
        operand_width((*self).into())
    }

    pub fn is_alu(&self) -> bool {
        is_alu((*self).into())
    }
}

/// One fetched instruction, shaped by its ALU flag
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Instruction {
    /// Handled directly, gets the raw operand bytes
    DataOp {
        opcode: Opcode,
        operand_a: Byte,
        operand_b: Byte,
    },
    /// Routed through the ALU, which selects the operation from the opcode
    AluOp {
        opcode: Byte,
        operand_a: Byte,
        operand_b: Byte,
    },
    /// Not in the opcode table
    Unknown { opcode: Byte },
}

/// An instruction plus how many bytes it occupies
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Decoded {
    pub width: u8,
    pub instruction: Instruction,
}

impl Decoded {
    /// Decodes the three bytes at the program counter
    pub fn new(opcode: Byte, operand_a: Byte, operand_b: Byte) -> Self {
        let instruction = match Opcode::try_from(opcode) {
            Err(_) => Instruction::Unknown { opcode },
            Ok(_) if is_alu(opcode) => Instruction::AluOp {
                opcode,
                operand_a,
                operand_b,
            },
            Ok(known) => Instruction::DataOp {
                opcode: known,
                operand_a,
                operand_b,
            },
        };

        Self {
            width: operand_width(opcode),
            instruction,
        }
    }
}

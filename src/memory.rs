use std::fs;
use std::path::Path;
use std::str::FromStr;

use crate::fault::Fault;

pub mod parse;

pub use parse::{LoadError, ParseError, ParseErrorKind, ParseErrors};

pub type Byte = u8;
/// Addresses are wider than a byte so the program counter can run past the end of RAM
pub type Address = u16;

/// Number of addressable cells on the LS-8
pub const RAM_SIZE: usize = 256;

/// The LS-8 main memory
pub type Ram = Memory<RAM_SIZE>;

/// Emulates memory for use with the CPU
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Memory<const S: usize> {
    /// The actual data of the memory
    pub data: [Byte; S],
}

impl<const S: usize> Default for Memory<S> {
    /// Initializes the memory with zeroes
    fn default() -> Self {
        Memory { data: [0; S] }
    }
}

impl<const S: usize> Memory<S> {
    /// Reads a byte from the memory
    pub fn read_byte(&self, position: Address) -> Result<Byte, Fault> {
        self.peek(position)
            .ok_or(Fault::AddressOutOfRange { address: position })
    }

    /// Reads a byte without treating a missing address as an error
    pub fn peek(&self, position: Address) -> Option<Byte> {
        self.data.get(position as usize).copied()
    }

    /// Writes a byte to the memory
    pub fn write_byte(&mut self, position: Address, value: Byte) -> Result<(), Fault> {
        let cell = self
            .data
            .get_mut(position as usize)
            .ok_or(Fault::AddressOutOfRange { address: position })?;
        *cell = value;
        Ok(())
    }

    /// Writes an array of bytes to the memory
    pub fn write_array(&mut self, position: Address, data: &[Byte]) -> Result<(), Fault> {
        let start = position as usize;
        let end = start + data.len();
        if end > S {
            // report the first cell that does not exist
            return Err(Fault::AddressOutOfRange {
                address: S.max(start) as Address,
            });
        }
        self.data[start..end].copy_from_slice(data);
        Ok(())
    }

    /// Loads a program file in the LS-8 text format
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, LoadError> {
        let source = fs::read_to_string(path)?;
        Ok(source.parse::<Self>()?)
    }

    /// Renders the memory as rows of 16 hex bytes prefixed with their address
    pub fn dump(&self) -> String {
        self.data
            .chunks(16)
            .enumerate()
            .map(|(row, chunk)| {
                let bytes: String = chunk.iter().map(|byte| format!(" {:02X}", byte)).collect();
                format!("{:04X}:{}\n", row * 16, bytes)
            })
            .collect()
    }
}

impl<const S: usize> FromStr for Memory<S> {
    type Err = ParseErrors;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse::Parser::new(s, Self::default()).parse()
    }
}

/// Writes a block of instructions directly into the memory
#[macro_export]
macro_rules! write_program {
    ( $mem:ident : $pos:expr => $( $byte:expr ),+ $(,)? ) => {
        $mem.write_array($pos, &[
            $(
                $byte as $crate::memory::Byte,
            )+
        ])
    };
}

#[cfg(test)]
mod tests {
    use crate::instruction::Opcode;

    use super::*;
    use color_eyre::eyre::Result;

    #[test]
    fn test_starts_zeroed() {
        let mem = Ram::default();
        assert!(mem.data.iter().all(|byte| *byte == 0));
        assert_eq!(mem.data.len(), 256);
    }

    #[test]
    fn test_read_byte() -> Result<()> {
        let mut mem = Ram::default();
        mem.data[0x2] = 0x12;
        assert_eq!(mem.read_byte(0x2)?, 0x12);

        Ok(())
    }

    #[test]
    fn test_write_byte() -> Result<()> {
        let mut mem = Ram::default();
        mem.write_byte(0x44, 12)?;
        assert_eq!(mem.data[0x44], 12);

        Ok(())
    }

    #[test]
    fn test_out_of_range() {
        let mut mem = Ram::default();
        assert!(matches!(
            mem.read_byte(0x100),
            Err(Fault::AddressOutOfRange { address: 0x100 })
        ));
        assert!(matches!(
            mem.write_byte(0x1FF, 1),
            Err(Fault::AddressOutOfRange { address: 0x1FF })
        ));
        assert_eq!(mem.peek(0xFF), Some(0));
        assert_eq!(mem.peek(0x100), None);
    }

    #[test]
    fn test_write_array() -> Result<()> {
        let mut mem = Ram::default();
        mem.write_array(0x44, &[0x12, 0x34, 0x56, 0x78])?;
        assert_eq!(mem.data[0x44..0x48], [0x12, 0x34, 0x56, 0x78]);

        Ok(())
    }

    #[test]
    fn test_write_array_past_end() {
        let mut mem = Ram::default();
        assert!(matches!(
            mem.write_array(0xFE, &[1, 2, 3]),
            Err(Fault::AddressOutOfRange { address: 0x100 })
        ));
        assert_eq!(mem, Ram::default());
    }

    #[test]
    fn test_write_program() -> Result<()> {
        let mut mem = Ram::default();
        mem.write_array(
            0,
            &[
                Opcode::LDI as Byte,
                0,
                8,
                Opcode::PRN as Byte,
                0,
                Opcode::HLT as Byte,
            ],
        )?;

        let mut mem2 = Ram::default();
        use crate::instruction::Opcode::*;
        write_program!(mem2 : 0 => LDI, 0, 8, PRN, 0, HLT)?;

        assert_eq!(mem, mem2);

        Ok(())
    }

    #[test]
    fn test_dump() -> Result<()> {
        let mut mem = Memory::<32>::default();
        mem.write_array(0x10, &[0xAB, 0x01])?;
        let dump = mem.dump();
        let lines: Vec<_> = dump.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("0000: 00 00"));
        assert!(lines[1].starts_with("0010: AB 01 00"));

        Ok(())
    }
}

use std::io::Write;

use crate::fault::Fault;
use crate::instruction::{operand_width, Decoded, Instruction, Opcode};
use crate::memory::{Address, Byte, Ram};
use crate::registers::RegisterFile;
use log::*;

mod handlers;

/// Where the machine is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum State {
    #[default]
    Running,
    /// Reached HLT. Nothing is fetched anymore.
    Halted,
}

/// Outcome of a single fetch-decode-execute cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Executed(Opcode),
    /// The opcode is not in the table and nothing ran
    Skipped { opcode: Byte },
    Halted,
}

/// Emulates the LS-8 CPU together with the memory and registers it owns
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Processor {
    /// Program counter
    pub pc: Address,
    pub registers: RegisterFile,
    pub memory: Ram,
    /// Log a trace line before every instruction
    pub trace: bool,
    state: State,
}

impl Default for Processor {
    fn default() -> Self {
        Self::new(Ram::default())
    }
}

impl Processor {
    /// Initializes a new CPU running `memory` from address 0
    pub fn new(memory: Ram) -> Self {
        Self {
            pc: 0,
            registers: RegisterFile::default(),
            memory,
            trace: false,
            state: State::Running,
        }
    }

    pub fn state(&self) -> State {
        self.state
    }

    /// Runs one fetch-decode-execute cycle. PRN output goes to `out`.
    pub fn execute<W: Write>(&mut self, out: &mut W) -> Result<Step, Fault> {
        if self.state == State::Halted {
            return Ok(Step::Halted);
        }
        if self.trace {
            trace!("{}", self.trace_line());
        }

        let opcode = self.memory.read_byte(self.pc)?;
        // unknown opcodes consume no operands, whatever their width says
        let used = match Opcode::try_from(opcode) {
            Ok(_) => operand_width(opcode),
            Err(_) => 1,
        };
        let operand_a = self.fetch_operand(1, used)?;
        let operand_b = self.fetch_operand(2, used)?;
        let decoded = Decoded::new(opcode, operand_a, operand_b);

        let step = match decoded.instruction {
            Instruction::DataOp {
                opcode,
                operand_a,
                operand_b,
            } => self.dispatch(opcode, operand_a, operand_b, out)?,
            Instruction::AluOp {
                opcode,
                operand_a,
                operand_b,
            } => self.alu(opcode, operand_a, operand_b)?,
            Instruction::Unknown { opcode } => {
                warn!(
                    "Unsupported operation 0b{:08b} at 0x{:02X}, skipping {} byte(s)",
                    opcode, self.pc, decoded.width
                );
                Step::Skipped { opcode }
            }
        };

        self.pc += Address::from(decoded.width);

        Ok(step)
    }

    /// Runs the program until it halts
    pub fn execute_until_halt<W: Write>(&mut self, out: &mut W) -> Result<State, Fault> {
        while self.state == State::Running {
            self.execute(out)?;
        }

        info!("Program halted. PC: 0x{:02X}", self.pc);

        Ok(self.state)
    }

    /// Formats the machine state as `TRACE: PC | op a b | R0 .. R7`
    pub fn trace_line(&self) -> String {
        let peek = |offset: Address| {
            self.pc
                .checked_add(offset)
                .and_then(|position| self.memory.peek(position))
                .unwrap_or_default()
        };

        let registers: String = self
            .registers
            .as_slice()
            .iter()
            .map(|value| format!(" {:02X}", value))
            .collect();

        format!(
            "TRACE: {:02X} | {:02X} {:02X} {:02X} |{}",
            self.pc,
            peek(0),
            peek(1),
            peek(2),
            registers
        )
    }

    /// Reads the operand `offset` bytes after the opcode. The first `used - 1`
    /// operands must exist, other slots past the end of memory read as zero.
    fn fetch_operand(&self, offset: Address, used: u8) -> Result<Byte, Fault> {
        let position = self.pc + offset;
        if offset < Address::from(used) {
            self.memory.read_byte(position)
        } else {
            Ok(self.memory.peek(position).unwrap_or_default())
        }
    }
}

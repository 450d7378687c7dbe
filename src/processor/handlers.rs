//! One handler per instruction. Handlers never touch the program counter.

use std::io::Write;

use log::*;

use super::{Processor, State, Step};
use crate::alu;
use crate::fault::Fault;
use crate::instruction::Opcode;
use crate::memory::{Address, Byte};
use crate::registers::SP;

impl Processor {
    /// Runs a non-ALU instruction with its raw operands
    pub(super) fn dispatch<W: Write>(
        &mut self,
        opcode: Opcode,
        operand_a: Byte,
        operand_b: Byte,
        out: &mut W,
    ) -> Result<Step, Fault> {
        match opcode {
            Opcode::LDI => self.ldi(operand_a, operand_b)?,
            Opcode::PRN => self.prn(operand_a, out)?,
            Opcode::HLT => return Ok(self.hlt()),
            Opcode::POP => self.pop(operand_a)?,
            Opcode::PUSH => self.push(operand_a)?,
            // the decoder sends these through the ALU shape
            Opcode::ADD | Opcode::SUB | Opcode::MUL | Opcode::DIV => {
                return Err(Fault::UnsupportedOperation {
                    opcode: opcode.into(),
                })
            }
        }

        Ok(Step::Executed(opcode))
    }

    /// Routes an arithmetic instruction to the ALU
    pub(super) fn alu(
        &mut self,
        opcode: Byte,
        operand_a: Byte,
        operand_b: Byte,
    ) -> Result<Step, Fault> {
        let instruction =
            Opcode::try_from(opcode).map_err(|_| Fault::UnsupportedOperation { opcode })?;
        alu::apply(&mut self.registers, opcode, operand_a, operand_b)?;

        Ok(Step::Executed(instruction))
    }

    fn ldi(&mut self, register: Byte, value: Byte) -> Result<(), Fault> {
        self.registers.set_general(register, value)?;

        debug!("LDI R{} {}", register, value);
        Ok(())
    }

    fn prn<W: Write>(&mut self, register: Byte, out: &mut W) -> Result<(), Fault> {
        let value = self.registers.get(register)?;
        writeln!(out, "{}", value)?;

        debug!("PRN R{}: {}", register, value);
        Ok(())
    }

    fn hlt(&mut self) -> Step {
        self.state = State::Halted;

        debug!("HLT");
        Step::Halted
    }

    fn pop(&mut self, register: Byte) -> Result<(), Fault> {
        let sp = self.registers.sp();
        let next = sp.checked_add(1).ok_or(Fault::StackUnderflow)?;
        let value = self.memory.read_byte(Address::from(sp))?;
        self.registers.set_general(register, value)?;
        self.registers.set_sp(next);

        debug!("POP R{}: {}", register, value);
        Ok(())
    }

    fn push(&mut self, register: Byte) -> Result<(), Fault> {
        let sp = self
            .registers
            .sp()
            .checked_sub(1)
            .ok_or(Fault::StackOverflow)?;
        // PUSH R7 stores the decremented stack pointer
        let value = if register == SP {
            sp
        } else {
            self.registers.get(register)?
        };
        self.memory.write_byte(Address::from(sp), value)?;
        self.registers.set_sp(sp);

        debug!("PUSH R{}: {}", register, value);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::processor::Processor;
    use crate::registers::{SP, SP_INIT};

    use super::*;
    use color_eyre::eyre::Result;

    #[test]
    fn ldi_rejects_stack_pointer() {
        let mut cpu = Processor::default();
        let err = cpu.ldi(SP, 0).unwrap_err();
        assert!(matches!(err, Fault::ReservedRegister { index: 7 }));
        assert_eq!(cpu.registers.sp(), SP_INIT);
    }

    #[test]
    fn ldi_rejects_missing_register() {
        let mut cpu = Processor::default();
        let err = cpu.ldi(8, 0).unwrap_err();
        assert!(matches!(err, Fault::RegisterOutOfRange { index: 8 }));
    }

    #[test]
    fn pushes_move_stack_pointer_down() -> Result<()> {
        let mut cpu = Processor::default();
        for n in 0..5 {
            cpu.ldi(0, n)?;
            cpu.push(0)?;
        }
        assert_eq!(cpu.registers.sp(), SP_INIT - 5);

        for n in (0..5).rev() {
            cpu.pop(1)?;
            assert_eq!(cpu.registers.get(1)?, n);
        }
        assert_eq!(cpu.registers.sp(), SP_INIT);

        Ok(())
    }

    #[test]
    fn push_stack_pointer_stores_decremented_value() -> Result<()> {
        let mut cpu = Processor::default();
        cpu.push(SP)?;
        assert_eq!(
            cpu.memory.read_byte(Address::from(SP_INIT - 1))?,
            SP_INIT - 1
        );

        Ok(())
    }

    #[test]
    fn stack_overflow() {
        let mut cpu = Processor::default();
        cpu.registers.set_sp(0);
        let err = cpu.push(0).unwrap_err();
        assert!(matches!(err, Fault::StackOverflow));
        assert_eq!(cpu.registers.sp(), 0);
    }

    #[test]
    fn push_missing_register_leaves_stack_alone() {
        let mut cpu = Processor::default();
        let err = cpu.push(9).unwrap_err();
        assert!(matches!(err, Fault::RegisterOutOfRange { index: 9 }));
        assert_eq!(cpu.registers.sp(), SP_INIT);
        assert_eq!(cpu.memory, Processor::default().memory);
    }

    #[test]
    fn stack_underflow() {
        let mut cpu = Processor::default();
        cpu.registers.set_sp(0xFF);
        let err = cpu.pop(0).unwrap_err();
        assert!(matches!(err, Fault::StackUnderflow));
        assert_eq!(cpu.registers.get(0).ok(), Some(0));
    }

    #[test]
    fn prn_writes_decimal_lines() -> Result<()> {
        let mut cpu = Processor::default();
        cpu.ldi(4, 255)?;
        let mut out = Vec::new();
        cpu.prn(4, &mut out)?;
        cpu.prn(0, &mut out)?;
        assert_eq!(String::from_utf8(out)?, "255\n0\n");

        Ok(())
    }

    #[test]
    fn data_shape_refuses_alu_opcodes() {
        let mut cpu = Processor::default();
        let err = cpu
            .dispatch(Opcode::ADD, 0, 1, &mut Vec::new())
            .unwrap_err();
        assert!(matches!(
            err,
            Fault::UnsupportedOperation {
                opcode: 0b1010_0000
            }
        ));
    }

    #[test]
    fn alu_shape_reports_opcode() -> Result<()> {
        let mut cpu = Processor::default();
        cpu.ldi(0, 7)?;
        cpu.ldi(1, 2)?;
        assert_eq!(
            cpu.alu(Opcode::SUB.into(), 0, 1)?,
            Step::Executed(Opcode::SUB)
        );
        assert_eq!(cpu.registers.get(0)?, 5);

        Ok(())
    }
}

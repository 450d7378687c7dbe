use crate::fault::Fault;
use crate::memory::Byte;

/// Number of registers, R0 to R7
pub const REGISTER_COUNT: usize = 8;
/// R7 holds the stack pointer
pub const SP: Byte = 7;
/// Address the stack pointer starts at. The stack grows down from here.
pub const SP_INIT: Byte = 0xF4;

/// The LS-8 register file.
///
/// Values are plain bytes. Arithmetic on them wraps, see [`crate::alu`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RegisterFile {
    cells: [Byte; REGISTER_COUNT],
}

impl Default for RegisterFile {
    fn default() -> Self {
        let mut cells = [0; REGISTER_COUNT];
        cells[SP as usize] = SP_INIT;
        Self { cells }
    }
}

impl RegisterFile {
    /// Reads register `index`
    pub fn get(&self, index: Byte) -> Result<Byte, Fault> {
        self.cells
            .get(index as usize)
            .copied()
            .ok_or(Fault::RegisterOutOfRange { index })
    }

    /// Writes register `index`. Any register may be written, including the
    /// stack pointer; instructions go through [`RegisterFile::set_general`].
    pub fn set(&mut self, index: Byte, value: Byte) -> Result<(), Fault> {
        let cell = self
            .cells
            .get_mut(index as usize)
            .ok_or(Fault::RegisterOutOfRange { index })?;
        *cell = value;
        Ok(())
    }

    /// Writes a general purpose register. R7 is refused.
    pub fn set_general(&mut self, index: Byte, value: Byte) -> Result<(), Fault> {
        if index == SP {
            return Err(Fault::ReservedRegister { index });
        }
        self.set(index, value)
    }

    pub fn sp(&self) -> Byte {
        self.cells[SP as usize]
    }

    pub fn set_sp(&mut self, value: Byte) {
        self.cells[SP as usize] = value;
    }

    /// All registers, R0 first
    pub fn as_slice(&self) -> &[Byte] {
        &self.cells
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use color_eyre::eyre::Result;

    #[test]
    fn starts_zeroed_except_stack_pointer() {
        let registers = RegisterFile::default();
        assert_eq!(registers.as_slice(), &[0, 0, 0, 0, 0, 0, 0, 0xF4]);
        assert_eq!(registers.sp(), SP_INIT);
    }

    #[test]
    fn set_and_get() -> Result<()> {
        let mut registers = RegisterFile::default();
        registers.set_general(3, 42)?;
        assert_eq!(registers.get(3)?, 42);

        Ok(())
    }

    #[test]
    fn out_of_range_index() {
        let mut registers = RegisterFile::default();
        assert!(matches!(
            registers.get(8),
            Err(Fault::RegisterOutOfRange { index: 8 })
        ));
        assert!(matches!(
            registers.set(200, 1),
            Err(Fault::RegisterOutOfRange { index: 200 })
        ));
    }

    #[test]
    fn stack_pointer_is_reserved() -> Result<()> {
        let mut registers = RegisterFile::default();
        assert!(matches!(
            registers.set_general(SP, 1),
            Err(Fault::ReservedRegister { index: 7 })
        ));
        assert_eq!(registers.sp(), SP_INIT);

        registers.set_sp(0x10);
        assert_eq!(registers.get(SP)?, 0x10);

        Ok(())
    }
}

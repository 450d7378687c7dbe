//! An emulator for the LS-8, a tiny 8-bit computer with 256 bytes of RAM,
//! eight registers and a downward growing stack.
//!
//! Programs are loaded from a text file holding one binary byte per line and
//! run by [`processor::Processor`] until they halt.

pub mod alu;
pub mod fault;
pub mod instruction;
pub mod memory;
pub mod processor;
pub mod registers;

pub use fault::Fault;
pub use memory::Ram;
pub use processor::{Processor, State, Step};

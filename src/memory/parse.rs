//! Loader for LS-8 program files.
//!
//! A program file holds one byte per line written as binary digits. Anything
//! after a `#` is a comment, and lines that are empty once the comment is
//! stripped do not take up an address:
//!
//! ```text
//! # print 8
//! 10000010 # LDI R0,8
//! 00000000
//! 00001000
//! 01000111 # PRN R0
//! 00000000
//! 00000001 # HLT
//! ```

use std::borrow::Cow;
use std::{error, fmt, io, str::Lines};

use thiserror::Error;

use super::{Byte, Memory};

/// Longest accepted binary literal, one byte
const MAX_DIGITS: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ParseErrorKind {
    #[error("not an 8-bit binary number")]
    InvalidBinary,
    #[error("program does not fit into memory at address `0x{address:x}`")]
    ProgramTooLarge { address: usize },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    kind: ParseErrorKind,
    context: Option<Cow<'static, str>>,
    line_nr: usize,
}

impl ParseError {
    fn new<C, S>(kind: ParseErrorKind, context: C, line_nr: usize) -> Self
    where
        C: Into<Option<S>>,
        S: Into<Cow<'static, str>>,
    {
        Self {
            kind,
            context: context.into().map(|inner| inner.into()),
            line_nr,
        }
    }

    pub fn kind(&self) -> ParseErrorKind {
        self.kind
    }

    /// One based line number in the program file
    pub fn line_nr(&self) -> usize {
        self.line_nr
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(context) = &self.context {
            write!(
                f,
                "error [ln: {}]: {} - {}",
                self.line_nr, self.kind, context
            )
        } else {
            write!(f, "error [ln: {}]: {}", self.line_nr, self.kind)
        }
    }
}

impl error::Error for ParseError {}

/// Every error found while parsing a program
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("program has {} malformed line(s)", .0.len())]
pub struct ParseErrors(pub Vec<ParseError>);

/// Failure to load a program from disk
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read program")]
    Io(#[from] io::Error),
    #[error(transparent)]
    Malformed(#[from] ParseErrors),
}

#[derive(Debug, Clone)]
pub struct Parser<'a, const S: usize> {
    lines: Lines<'a>,
    line_nr: usize,
    address: usize,
    overflowed: bool,
    memory: Memory<S>,
}

impl<'a, const S: usize> Parser<'a, S> {
    /// Creates a new parser for `data` which will try to populate `memory`
    /// starting at address 0.
    pub fn new(data: &'a str, memory: Memory<S>) -> Self {
        Self {
            lines: data.lines(),
            line_nr: 0,
            address: 0,
            overflowed: false,
            memory,
        }
    }

    /// Consumes `self` and tries to parse all lines into memory.
    ///
    /// # Errors
    ///
    /// All errors which may occur are collected and returned at the end.
    pub fn parse(mut self) -> Result<Memory<S>, ParseErrors> {
        let mut errors = Vec::new();

        while let Some(res) = self.parse_next_line() {
            if let Err(err) = res {
                log::error!("{}", err);
                errors.push(err);
            }
        }

        if errors.is_empty() {
            log::debug!("Loaded {} bytes", self.address);
            Ok(self.memory)
        } else {
            Err(ParseErrors(errors))
        }
    }

    /// Tries to parse the next line. Returns `None` once all lines are consumed.
    fn parse_next_line(&mut self) -> Option<Result<(), ParseError>> {
        let raw = self.lines.next()?;
        self.line_nr += 1;

        let line = raw.split('#').next().unwrap_or_default().trim();
        if line.is_empty() {
            // Comment or empty line; skip
            return Some(Ok(()));
        }

        Some(self.parse_byte(line).and_then(|byte| self.write_byte(byte)))
    }

    /// Parses `line` as a binary byte, e.g. `10000010`.
    fn parse_byte(&self, line: &str) -> Result<Byte, ParseError> {
        let digits_only = line.bytes().all(|digit| digit == b'0' || digit == b'1');
        if !digits_only || line.len() > MAX_DIGITS {
            return Err(ParseError::new(
                ParseErrorKind::InvalidBinary,
                format!("`{}`", line),
                self.line_nr,
            ));
        }

        Byte::from_str_radix(line, 2).map_err(|err| {
            ParseError::new(
                ParseErrorKind::InvalidBinary,
                err.to_string(),
                self.line_nr,
            )
        })
    }

    /// Writes `byte` at the next free address. Only the first line that does
    /// not fit is reported.
    fn write_byte(&mut self, byte: Byte) -> Result<(), ParseError> {
        let address = self.address;
        self.address += 1;

        match self.memory.data.get_mut(address) {
            Some(cell) => {
                *cell = byte;
                Ok(())
            }
            None if self.overflowed => Ok(()),
            None => {
                self.overflowed = true;
                Err(ParseError::new(
                    ParseErrorKind::ProgramTooLarge { address },
                    format!("memory holds {} bytes", S),
                    self.line_nr,
                ))
            }
        }
    }
}

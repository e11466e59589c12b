//! Streaming content line printer (RFC 5545 §3.1).
//!
//! Writes fields as `name *(";" attr "=" value) ":" value CRLF`, folding
//! physical lines at the 75-octet limit without splitting a multi-byte
//! character or an escape sequence.

use std::io::{self, Write};

use thiserror::Error;

use crate::escape::escape_char;
use crate::structs::{Attribute, Field, Section};

/// Maximum physical line length in octets, not counting the CRLF.
pub const MAX_LINE_OCTETS: usize = 75;

const CRLF: &str = "\r\n";
const FOLD: &str = "\r\n ";

/// A failed write to the output sink.
///
/// Captures kind and message of the underlying `io::Error` so the same
/// error value can be re-surfaced by every call after the first failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("write to output failed: {message}")]
pub struct PrintError {
    pub kind: io::ErrorKind,
    pub message: String,
}

impl From<io::Error> for PrintError {
    fn from(err: io::Error) -> Self {
        Self {
            kind: err.kind(),
            message: err.to_string(),
        }
    }
}

/// Sequential encoder owning one output sink for the duration of one
/// document.
///
/// The first sink error is sticky: it is recorded, returned, and every later
/// call returns the same error without touching the sink again.
pub struct ContentPrinter<W: Write> {
    writer: W,
    line_octets: usize,
    error: Option<PrintError>,
    strict: bool,
}

impl<W: Write> ContentPrinter<W> {
    /// Checked printer: sink failures are returned to the caller.
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            line_octets: 0,
            error: None,
            strict: false,
        }
    }

    /// Fail-fast printer: a sink failure is treated as an unrecoverable
    /// fault and panics with the failed write's diagnostics.
    pub fn strict(writer: W) -> Self {
        Self {
            strict: true,
            ..Self::new(writer)
        }
    }

    /// The first error encountered, if any.
    pub fn error(&self) -> Option<&PrintError> {
        self.error.as_ref()
    }

    /// Prints `text`, escaping `\`, `;` and `,` when `escape` is set and
    /// newlines always, folding whenever the next output unit would push the
    /// current line past [`MAX_LINE_OCTETS`].
    pub fn print(&mut self, text: &str, escape: bool) -> Result<(), PrintError> {
        self.check()?;
        let mut buf = [0u8; 4];
        for c in text.chars() {
            // The fold decision is made on the whole output unit, so an
            // escape sequence or multi-byte character is never split.
            let unit: &str = if c == '\n' {
                "\\n"
            } else if escape {
                match escape_char(c) {
                    Some(seq) => seq,
                    None => c.encode_utf8(&mut buf),
                }
            } else {
                c.encode_utf8(&mut buf)
            };
            if self.line_octets + unit.len() > MAX_LINE_OCTETS {
                self.write_raw(FOLD)?;
                self.line_octets = 1;
            }
            self.write_raw(unit)?;
            self.line_octets += unit.len();
            debug_assert!(self.line_octets <= MAX_LINE_OCTETS);
        }
        Ok(())
    }

    /// Terminates the current content line. The only way a true line break
    /// enters the output.
    pub fn print_line(&mut self) -> Result<(), PrintError> {
        self.check()?;
        self.write_raw(CRLF)?;
        self.line_octets = 0;
        Ok(())
    }

    pub fn print_attribute(&mut self, attribute: &Attribute) -> Result<(), PrintError> {
        self.print(&attribute.name, true)?;
        self.print("=", false)?;
        self.print(&attribute.value, true)
    }

    pub fn print_field(&mut self, field: &Field) -> Result<(), PrintError> {
        self.print(&field.name, true)?;
        for attribute in &field.attributes {
            self.print(";", false)?;
            self.print_attribute(attribute)?;
        }
        self.print(":", false)?;
        self.print(&field.value, true)?;
        self.print_line()
    }

    /// Prints fields in order, stopping at the first failure.
    pub fn print_document(&mut self, fields: &[Field]) -> Result<(), PrintError> {
        for field in fields {
            self.print_field(field)?;
        }
        Ok(())
    }

    pub fn print_section(&mut self, section: &Section) -> Result<(), PrintError> {
        self.print_document(&section.fields())
    }

    /// Flushes the sink and hands it back, or surfaces the sticky error.
    pub fn finish(mut self) -> Result<W, PrintError> {
        self.check()?;
        if let Err(err) = self.writer.flush() {
            return Err(self.fail(err.into()));
        }
        Ok(self.writer)
    }

    fn check(&self) -> Result<(), PrintError> {
        match &self.error {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }

    fn write_raw(&mut self, s: &str) -> Result<(), PrintError> {
        if let Err(err) = self.writer.write_all(s.as_bytes()) {
            return Err(self.fail(err.into()));
        }
        Ok(())
    }

    fn fail(&mut self, err: PrintError) -> PrintError {
        if self.strict {
            panic!("ical output failed: {err}");
        }
        self.error = Some(err.clone());
        err
    }
}

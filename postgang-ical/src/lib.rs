mod escape;
mod printer;
mod structs;

pub use escape::{escape_char, escape_text};
pub use printer::{ContentPrinter, PrintError, MAX_LINE_OCTETS};
pub use structs::{Attribute, Content, Field, Section};

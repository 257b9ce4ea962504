//! CSV tokenizer
//!
//! Turns a byte stream into a lazy sequence of rows. The first record is the
//! header; every later record becomes either a [`RawRow`] aligned with the
//! header or a [`TokenizedRow::Malformed`] marker carrying the structural
//! defect. Malformed rows never abort the stream.
//!
//! # Quoting
//!
//! - Fields containing the delimiter, the quote or a line break are quoted
//! - A doubled quote inside a quoted field is a literal quote
//! - `\n`, `\r\n` and a lone `\r` all end a record outside quotes
//! - Blank lines are skipped and do not consume a row index

mod dialect;
mod reader;
mod record;

pub use dialect::Dialect;
pub use reader::{Header, RawRow, TokenizedRow, Tokenizer};
pub use record::{RawRecord, RecordReader};

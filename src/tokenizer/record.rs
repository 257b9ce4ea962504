//! Byte-level record splitting
//!
//! A small state machine over a `BufRead` that splits the input into records
//! of raw byte fields. Quoted fields may contain delimiters, doubled quotes and
//! line breaks. Lines are terminated by `\n`, `\r\n` or a lone `\r`.

use std::io::{self, BufRead};
use std::mem;

use super::dialect::Dialect;

/// One record as raw bytes, before UTF-8 decoding
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawRecord {
    /// Field contents with quoting removed
    pub fields: Vec<Vec<u8>>,
    /// The input ended inside a quoted field
    pub unterminated: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    /// At the start of a field
    FieldStart,
    /// Inside an unquoted field
    Unquoted,
    /// Inside a quoted field
    Quoted,
    /// Just read a quote while inside a quoted field
    QuoteInQuoted,
}

enum Line {
    Blank,
    Record(RawRecord),
}

/// Pull-based record reader
pub struct RecordReader<R> {
    reader: R,
    dialect: Dialect,
    /// A `\r` ended the previous record; swallow a following `\n`
    pending_lf: bool,
    eof: bool,
    bytes_read: u64,
}

impl<R: BufRead> RecordReader<R> {
    /// Create a reader over a buffered byte stream
    pub fn new(reader: R, dialect: Dialect) -> Self {
        Self {
            reader,
            dialect,
            pending_lf: false,
            eof: false,
            bytes_read: 0,
        }
    }

    /// Total bytes consumed from the underlying stream
    pub fn bytes_read(&self) -> u64 {
        self.bytes_read
    }

    /// Read the next non-blank record, or `None` at end of input
    pub fn read_record(&mut self) -> io::Result<Option<RawRecord>> {
        loop {
            match self.read_line()? {
                None => return Ok(None),
                // Skipped even when the header has a single column, so an empty
                // value there is lost; a quoted `""` line is kept as a record
                Some(Line::Blank) => continue,
                Some(Line::Record(record)) => return Ok(Some(record)),
            }
        }
    }

    fn read_line(&mut self) -> io::Result<Option<Line>> {
        if self.eof {
            return Ok(None);
        }

        let Dialect { delimiter, quote } = self.dialect;
        let mut fields = Vec::new();
        let mut field = Vec::new();
        let mut state = State::FieldStart;
        let mut touched = false;

        loop {
            let buf = match self.reader.fill_buf() {
                Ok(buf) => buf,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            };

            if buf.is_empty() {
                self.eof = true;
                if !touched {
                    return Ok(None);
                }
                fields.push(field);
                return Ok(Some(Line::Record(RawRecord {
                    fields,
                    unterminated: state == State::Quoted,
                })));
            }

            let mut consumed = 0;
            let mut line_ended = false;

            for &byte in buf {
                consumed += 1;

                if self.pending_lf {
                    self.pending_lf = false;
                    if byte == b'\n' {
                        continue;
                    }
                }

                let is_break = byte == b'\n' || byte == b'\r';
                if state == State::Quoted || !is_break {
                    touched = true;
                }

                match state {
                    State::Quoted if byte == quote => state = State::QuoteInQuoted,
                    State::Quoted => field.push(byte),
                    _ if is_break => {
                        self.pending_lf = byte == b'\r';
                        line_ended = true;
                        break;
                    }
                    State::QuoteInQuoted if byte == quote => {
                        field.push(quote);
                        state = State::Quoted;
                    }
                    _ if byte == delimiter => {
                        fields.push(mem::take(&mut field));
                        state = State::FieldStart;
                    }
                    State::FieldStart if byte == quote => state = State::Quoted,
                    // Stray quotes and text after a closing quote are kept literally
                    _ => {
                        field.push(byte);
                        state = State::Unquoted;
                    }
                }
            }

            self.reader.consume(consumed);
            self.bytes_read += consumed as u64;

            if line_ended {
                if !touched {
                    return Ok(Some(Line::Blank));
                }
                fields.push(field);
                return Ok(Some(Line::Record(RawRecord {
                    fields,
                    unterminated: false,
                })));
            }
        }
    }
}

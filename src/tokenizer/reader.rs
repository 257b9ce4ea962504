//! Row-level tokenizer built on the record reader

use std::collections::HashMap;
use std::io::{self, BufReader, Read};

use tracing::{debug, warn};

use super::dialect::Dialect;
use super::record::{RawRecord, RecordReader};
use crate::report::{FileIssue, RowIssue};

const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];

/// The header row of a CSV file.
///
/// Names are trimmed. When a name repeats, lookups resolve to its first
/// occurrence and the repeat is reported once through [`Header::issues`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    names: Vec<String>,
    positions: HashMap<String, usize>,
    issues: Vec<FileIssue>,
}

impl Header {
    /// Build a header from its field names
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let names: Vec<String> = names
            .into_iter()
            .map(|n| n.into().trim().to_string())
            .collect();

        let mut positions = HashMap::with_capacity(names.len());
        let mut repeated: Vec<String> = Vec::new();
        for (idx, name) in names.iter().enumerate() {
            if positions.contains_key(name) {
                if !repeated.contains(name) {
                    repeated.push(name.clone());
                }
            } else {
                positions.insert(name.clone(), idx);
            }
        }

        let issues = if repeated.is_empty() {
            Vec::new()
        } else {
            vec![FileIssue::DuplicateHeaderColumn { names: repeated }]
        };

        Self {
            names,
            positions,
            issues,
        }
    }

    /// Header names in file order
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Field position of the first column with this name
    pub fn position(&self, name: &str) -> Option<usize> {
        self.positions.get(name).copied()
    }

    /// Number of header fields, the expected field count of every row
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Whether the header has no fields
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// File-level findings about the header itself
    pub fn issues(&self) -> &[FileIssue] {
        &self.issues
    }
}

/// A data row with its 0-based index
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRow {
    pub row_index: usize,
    pub fields: Vec<String>,
}

impl RawRow {
    /// Field at the given position, if the row has one
    pub fn field(&self, position: usize) -> Option<&str> {
        self.fields.get(position).map(String::as_str)
    }
}

/// One item produced by the tokenizer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenizedRow {
    /// A row whose fields line up with the header
    Fields(RawRow),
    /// A row that could not be aligned with the header
    Malformed { row_index: usize, issue: RowIssue },
}

impl TokenizedRow {
    /// 0-based data row index
    pub fn row_index(&self) -> usize {
        match self {
            TokenizedRow::Fields(row) => row.row_index,
            TokenizedRow::Malformed { row_index, .. } => *row_index,
        }
    }
}

/// Lazy, single-pass CSV tokenizer.
///
/// Owns its reader; dropping the tokenizer releases the underlying stream.
/// The first record is the header and is read on demand by
/// [`Tokenizer::read_header`] or the first call to [`Tokenizer::next_row`].
pub struct Tokenizer<R: Read> {
    records: RecordReader<BufReader<R>>,
    header: Option<Header>,
    header_read: bool,
    next_index: usize,
}

impl<R: Read> Tokenizer<R> {
    /// Create a tokenizer with the given dialect
    pub fn new(reader: R, dialect: Dialect) -> Self {
        Self {
            records: RecordReader::new(BufReader::new(reader), dialect),
            header: None,
            header_read: false,
            next_index: 0,
        }
    }

    /// Read the header row if not yet read; `None` means the input is empty
    pub fn read_header(&mut self) -> io::Result<Option<&Header>> {
        if !self.header_read {
            self.header_read = true;
            if let Some(record) = self.records.read_record()? {
                let header = header_from_record(record);
                debug!(columns = header.len(), "Read header row");
                if !header.issues().is_empty() {
                    warn!(columns = ?header.names(), "Header contains duplicate column names");
                }
                self.header = Some(header);
            }
        }
        Ok(self.header.as_ref())
    }

    /// The header, if it has been read and the input was not empty
    pub fn header(&self) -> Option<&Header> {
        self.header.as_ref()
    }

    /// Number of data rows produced so far
    pub fn rows_read(&self) -> usize {
        self.next_index
    }

    /// Bytes consumed from the input so far
    pub fn bytes_read(&self) -> u64 {
        self.records.bytes_read()
    }

    /// Pull the next data row
    pub fn next_row(&mut self) -> io::Result<Option<TokenizedRow>> {
        let expected = match self.read_header()? {
            Some(header) => header.len(),
            None => return Ok(None),
        };

        let Some(record) = self.records.read_record()? else {
            return Ok(None);
        };

        let row_index = self.next_index;
        self.next_index += 1;
        Ok(Some(classify(row_index, expected, record)))
    }
}

impl<R: Read> Iterator for Tokenizer<R> {
    type Item = io::Result<TokenizedRow>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_row().transpose()
    }
}

fn header_from_record(record: RawRecord) -> Header {
    let names = record.fields.into_iter().enumerate().map(|(idx, bytes)| {
        let bytes = if idx == 0 {
            bytes.strip_prefix(UTF8_BOM).unwrap_or(&bytes).to_vec()
        } else {
            bytes
        };
        String::from_utf8_lossy(&bytes).into_owned()
    });
    Header::new(names)
}

/// Structural checks in precedence order: quoting, encoding, field count
fn classify(row_index: usize, expected: usize, record: RawRecord) -> TokenizedRow {
    if record.unterminated {
        return TokenizedRow::Malformed {
            row_index,
            issue: RowIssue::UnterminatedQuote,
        };
    }

    let found = record.fields.len();
    let mut fields = Vec::with_capacity(found);
    for bytes in record.fields {
        match String::from_utf8(bytes) {
            Ok(field) => fields.push(field),
            Err(_) => {
                return TokenizedRow::Malformed {
                    row_index,
                    issue: RowIssue::InvalidEncoding,
                };
            }
        }
    }

    if found < expected {
        return TokenizedRow::Malformed {
            row_index,
            issue: RowIssue::TooFewFields { expected, found },
        };
    }
    if found > expected {
        return TokenizedRow::Malformed {
            row_index,
            issue: RowIssue::TooManyFields { expected, found },
        };
    }

    TokenizedRow::Fields(RawRow { row_index, fields })
}

//! CSV dialect settings

/// Delimiter and quote bytes used by the tokenizer.
///
/// Both must be single ASCII bytes and must differ; the engine checks this
/// when options are validated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dialect {
    /// Field delimiter. Default: `,`
    pub delimiter: u8,
    /// Quote character. Default: `"`
    pub quote: u8,
}

impl Dialect {
    /// Create a dialect from explicit bytes
    pub fn new(delimiter: u8, quote: u8) -> Self {
        Self { delimiter, quote }
    }

    /// Tab-separated values with double quotes
    pub fn tsv() -> Self {
        Self::new(b'\t', b'"')
    }
}

impl Default for Dialect {
    fn default() -> Self {
        Self::new(b',', b'"')
    }
}

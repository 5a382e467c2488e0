use std::fmt;
use std::io::{self, BufRead};

use crate::format::SourceFormat;
use crate::mac::{create_mac_address, MAX_CANONICAL_LEN};
use crate::record::OuiRecord;

/// Length of a `XX:XX:XX:XX:XX:XX/NN` MAC-with-mask field
const MASKED_PREFIX_LEN: usize = 20;

/// Errors produced while reading a vendor list
#[derive(Debug)]
pub enum ParseError {
    /// A line that does not form a valid record; callers skip it
    Malformed { line: usize, reason: &'static str },
    /// The underlying reader failed
    Io(io::Error),
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Malformed { line, reason } => write!(f, "line {}: {}", line, reason),
            Self::Io(e) => write!(f, "read error: {}", e),
        }
    }
}

impl std::error::Error for ParseError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Malformed { .. } => None,
        }
    }
}

/// Lazy, single-pass reader of (prefix, vendor) records.
///
/// Comment and blank lines are consumed silently. Every other line yields
/// either a record or [`ParseError::Malformed`]; a malformed line never stops
/// the iteration. An I/O failure is yielded once and ends it.
pub struct VendorListParser<R> {
    reader: R,
    format: SourceFormat,
    line_no: usize,
    buf: Vec<u8>,
    done: bool,
}

impl<R: BufRead> VendorListParser<R> {
    pub fn new(reader: R, format: SourceFormat) -> Self {
        Self {
            reader,
            format,
            line_no: 0,
            buf: Vec::new(),
            done: false,
        }
    }

    pub fn format(&self) -> SourceFormat {
        self.format
    }

    /// Number of lines read so far
    pub fn line_number(&self) -> usize {
        self.line_no
    }
}

/// Parse an in-memory vendor list
pub fn parse_str(text: &str, format: SourceFormat) -> VendorListParser<&[u8]> {
    VendorListParser::new(text.as_bytes(), format)
}

impl<R: BufRead> Iterator for VendorListParser<R> {
    type Item = Result<OuiRecord, ParseError>;

    fn next(&mut self) -> Option<Self::Item> {
        while !self.done {
            self.buf.clear();
            match self.reader.read_until(b'\n', &mut self.buf) {
                Ok(0) => {
                    self.done = true;
                    return None;
                }
                Ok(_) => {}
                Err(e) => {
                    self.done = true;
                    return Some(Err(ParseError::Io(e)));
                }
            }
            self.line_no += 1;

            let text = String::from_utf8_lossy(&self.buf);
            let line = text.trim_end_matches(|c: char| c == '\n' || c == '\r');
            if line.starts_with('#') || line.trim().is_empty() {
                continue;
            }

            let parsed = match self.format {
                SourceFormat::LongForm => parse_long_form(line),
                SourceFormat::ShortForm => parse_short_form(line),
            };

            let line_no = self.line_no;
            return Some(parsed.map_err(|reason| ParseError::Malformed {
                line: line_no,
                reason,
            }));
        }
        None
    }
}

fn parse_long_form(line: &str) -> Result<OuiRecord, &'static str> {
    let fields: Vec<&str> = line.split('\t').collect();
    if fields.len() < 2 {
        return Err("expected at least 2 tab-separated fields");
    }

    let mut prefix = fields[0];
    if prefix.chars().count() == MASKED_PREFIX_LEN {
        prefix = truncate_chars(prefix, MAX_CANONICAL_LEN);
    }
    let prefix = prefix.trim();

    // Prefer the full name over the short code when both are present
    let vendor_name = clean_vendor_name(if fields.len() > 2 { fields[2] } else { fields[1] });

    build_record(prefix.to_string(), vendor_name)
}

fn parse_short_form(line: &str) -> Result<OuiRecord, &'static str> {
    let mut tokens = line.split_whitespace();
    let hex = tokens.next().ok_or("missing prefix")?;
    let vendor_name = tokens.collect::<Vec<_>>().join(" ");
    if vendor_name.is_empty() {
        return Err("expected a prefix followed by a vendor name");
    }

    build_record(create_mac_address(hex), vendor_name)
}

fn build_record(prefix: String, vendor_name: String) -> Result<OuiRecord, &'static str> {
    if prefix.is_empty() {
        return Err("empty prefix");
    }
    if vendor_name.is_empty() {
        return Err("empty vendor name");
    }
    Ok(OuiRecord {
        prefix,
        vendor_name,
    })
}

fn clean_vendor_name(raw: &str) -> String {
    let name = raw.trim();
    let name = name
        .strip_prefix('"')
        .and_then(|n| n.strip_suffix('"'))
        .unwrap_or(name);
    name.trim().to_string()
}

fn truncate_chars(s: &str, n: usize) -> &str {
    match s.char_indices().nth(n) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

use ethers_core::types::Address;
use std::str::FromStr;
use thiserror::Error;

const FIELD_SEPARATOR: char = ';';

/// One `address;name` line of the listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContractRecord {
    /// 1-based line number inside the listing.
    pub line: usize,
    pub address: Address,
    /// The address token exactly as it was written in the listing.
    pub raw_address: String,
    pub name: String,
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum RecordError {
    #[error("missing contract name after ';'")]
    MissingName,
    #[error("contract name is empty")]
    EmptyName,
    #[error("contract name '{0}' cannot be used as a file name")]
    InvalidName(String),
    #[error("invalid address '{0}': expected 40 hex digits with optional 0x prefix")]
    InvalidAddress(String),
}

impl ContractRecord {
    /// Parses a listing line. Only the first two fields are used.
    pub fn parse(line: usize, s: &str) -> Result<Self, RecordError> {
        let (raw_address, name) = raw_fields(s);
        let name = name.ok_or(RecordError::MissingName)?;

        let address = parse_address(raw_address)?;
        validate_name(name)?;

        Ok(Self {
            line,
            address,
            raw_address: raw_address.to_string(),
            name: name.to_string(),
        })
    }
}

/// Address and name tokens of a line, before any validation.
pub fn raw_fields(s: &str) -> (&str, Option<&str>) {
    let mut fields = s.split(FIELD_SEPARATOR);
    let raw_address = fields.next().unwrap_or_default();
    (raw_address, fields.next())
}

pub fn parse_address(s: &str) -> Result<Address, RecordError> {
    let invalid = || RecordError::InvalidAddress(s.to_string());
    let hex = s
        .strip_prefix("0x")
        .or_else(|| s.strip_prefix("0X"))
        .unwrap_or(s);
    if hex.len() != 40 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(invalid());
    }
    Address::from_str(hex).map_err(|_| invalid())
}

fn validate_name(name: &str) -> Result<(), RecordError> {
    if name.is_empty() {
        return Err(RecordError::EmptyName);
    }
    if name == "." || name == ".." || name.contains(['/', '\\', '\0']) {
        return Err(RecordError::InvalidName(name.to_string()));
    }
    Ok(())
}

/// Classification of a single listing line.
#[derive(Debug, PartialEq, Eq)]
pub enum Line<'a> {
    Record(ContractRecord),
    TooShort,
    Invalid { line: usize, text: &'a str, error: RecordError },
}

/// Splits the listing into lines and classifies each one.
/// Lines shorter than `min_line_length` bytes are reported as `TooShort`.
pub fn parse_listing(listing: &str, min_line_length: usize) -> impl Iterator<Item = Line<'_>> {
    listing.lines().enumerate().map(move |(index, text)| {
        let line = index + 1;
        if text.len() < min_line_length {
            return Line::TooShort;
        }
        match ContractRecord::parse(line, text) {
            Ok(record) => Line::Record(record),
            Err(error) => Line::Invalid { line, text, error },
        }
    })
}

//! Classification records: one row of the staff bin-assignment sheet.

use serde::Serialize;

/// One catalog location/item-type combination with its item count and the
/// bin staff assigned to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClassificationRecord {
    /// 1-based source row (the header is row 1).
    pub row: usize,
    pub count: u64,
    pub location: String,
    pub item_type: String,
    /// Bin column exactly as staff entered it.
    pub bin: String,
    pub call_number: Option<String>,
}

impl ClassificationRecord {
    pub fn new(
        count: u64,
        location: impl Into<String>,
        item_type: impl Into<String>,
        bin: impl Into<String>,
    ) -> Self {
        Self {
            row: 0,
            count,
            location: location.into(),
            item_type: item_type.into(),
            bin: bin.into(),
            call_number: None,
        }
    }

    pub fn with_row(mut self, row: usize) -> Self {
        self.row = row;
        self
    }

    pub fn with_call_number(mut self, call_number: impl Into<String>) -> Self {
        self.call_number = Some(call_number.into());
        self
    }

    pub fn assignment(&self) -> BinAssignment {
        BinAssignment::parse(&self.bin)
    }
}

/// Interpretation of the bin column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BinAssignment {
    /// Left blank: the combination falls to the exception bin.
    Unassigned,
    Bin(u32),
    /// Text, zero or negative numbers.
    Malformed(String),
}

impl BinAssignment {
    /// Spreadsheet floats such as `3.0` are accepted as whole bins.
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        if raw.is_empty() {
            return BinAssignment::Unassigned;
        }
        if let Ok(bin) = raw.parse::<u32>() {
            return if bin == 0 {
                BinAssignment::Malformed(raw.to_string())
            } else {
                BinAssignment::Bin(bin)
            };
        }
        match raw.parse::<f64>() {
            Ok(v) if v.is_finite() && v.fract() == 0.0 && v >= 1.0 && v <= u32::MAX as f64 => {
                BinAssignment::Bin(v as u32)
            }
            _ => BinAssignment::Malformed(raw.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bin_parsing() {
        assert_eq!(BinAssignment::parse(""), BinAssignment::Unassigned);
        assert_eq!(BinAssignment::parse("  "), BinAssignment::Unassigned);
        assert_eq!(BinAssignment::parse("4"), BinAssignment::Bin(4));
        assert_eq!(BinAssignment::parse(" 3.0 "), BinAssignment::Bin(3));
        assert_eq!(
            BinAssignment::parse("reject"),
            BinAssignment::Malformed("reject".into())
        );
        assert_eq!(BinAssignment::parse("0"), BinAssignment::Malformed("0".into()));
        assert_eq!(BinAssignment::parse("-2"), BinAssignment::Malformed("-2".into()));
        assert_eq!(BinAssignment::parse("2.5"), BinAssignment::Malformed("2.5".into()));
    }
}

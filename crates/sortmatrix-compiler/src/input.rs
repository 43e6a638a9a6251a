//! Classification input readers (CSV and spreadsheets).
//!
//! Columns are found by header name, falling back to the positional order
//! count, location, type, bin, call number. Columns with a blank header hold
//! staff notes and are ignored.

use std::io::Read;
use std::path::Path;

use calamine::{Data, Reader, open_workbook_auto};
use tracing::{debug, info, warn};

use crate::error::CompileError;
use crate::record::ClassificationRecord;
use crate::report::RejectedRow;

const COUNT_ALIASES: &[&str] = &["count", "counts", "items"];
const LOCATION_ALIASES: &[&str] = &["location", "locations", "loc", "home location"];
const TYPE_ALIASES: &[&str] = &["type", "types", "itype", "itypes", "ityp", "item type", "item types"];
const BIN_ALIASES: &[&str] = &["bin", "bin #", "bin#", "bin number"];
const CALLNUM_ALIASES: &[&str] = &["callnum", "call number", "call numbers", "callnumber"];

/// Records read from a classification file, plus the rows that were skipped.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClassificationInput {
    pub records: Vec<ClassificationRecord>,
    pub rejected: Vec<RejectedRow>,
}

impl ClassificationInput {
    /// Fold one row's outcome in. A bad row is logged and kept as rejected.
    fn push(&mut self, row: usize, outcome: Result<Option<ClassificationRecord>, CompileError>) {
        match outcome {
            Ok(Some(record)) => self.records.push(record),
            Ok(None) => {}
            Err(e) => {
                let reason = match e {
                    CompileError::Input { message, .. } => message,
                    other => other.to_string(),
                };
                warn!(row, reason = %reason, "skipping unreadable row");
                self.rejected.push(RejectedRow { row, reason });
            }
        }
    }
}

/// Resolved column positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnMap {
    pub count: usize,
    pub location: usize,
    pub item_type: usize,
    pub bin: usize,
    pub call_number: Option<usize>,
}

impl ColumnMap {
    pub fn resolve(headers: &[String]) -> Self {
        let find = |aliases: &[&str]| {
            headers
                .iter()
                .position(|h| aliases.iter().any(|a| h.trim().eq_ignore_ascii_case(a)))
        };
        let count = find(COUNT_ALIASES);
        let location = find(LOCATION_ALIASES);
        let item_type = find(TYPE_ALIASES);
        let bin = find(BIN_ALIASES);
        let call_number = find(CALLNUM_ALIASES);
        let named = [count, location, item_type, bin, call_number];

        let positional_callnum = headers
            .get(4)
            .filter(|h| !h.trim().is_empty())
            .and_then(|_| (!named.contains(&Some(4))).then_some(4));

        Self {
            count: count.unwrap_or(0),
            location: location.unwrap_or(1),
            item_type: item_type.unwrap_or(2),
            bin: bin.unwrap_or(3),
            call_number: call_number.or(positional_callnum),
        }
    }

    /// Build a record from one row's cells. Rows with neither a count nor a
    /// location are notes and yield `None`.
    pub fn record(&self, row: usize, cells: &[String]) -> Result<Option<ClassificationRecord>, CompileError> {
        let cell = |idx: usize| cells.get(idx).map(|c| c.trim()).unwrap_or("");
        let count = cell(self.count);
        let location = cell(self.location);
        if count.is_empty() && location.is_empty() {
            return Ok(None);
        }

        let mut record = ClassificationRecord::new(
            parse_count(row, count)?,
            location,
            cell(self.item_type),
            cell(self.bin),
        )
        .with_row(row);
        if let Some(idx) = self.call_number {
            let call_number = cell(idx);
            if !call_number.is_empty() {
                record = record.with_call_number(call_number);
            }
        }
        Ok(Some(record))
    }
}

fn parse_count(row: usize, raw: &str) -> Result<u64, CompileError> {
    if raw.is_empty() {
        return Ok(0);
    }
    let cleaned = raw.replace(',', "");
    if let Ok(n) = cleaned.parse::<u64>() {
        return Ok(n);
    }
    match cleaned.parse::<f64>() {
        Ok(v) if v.is_finite() && v >= 0.0 && v.fract() == 0.0 => Ok(v as u64),
        _ => Err(CompileError::Input {
            row,
            message: format!("invalid item count '{raw}'"),
        }),
    }
}

/// Read records from any reader producing CSV with a header row. Rows with
/// an unreadable count are skipped and listed in `rejected`.
pub fn read_csv_from<R: Read>(reader: R) -> Result<ClassificationInput, CompileError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers: Vec<String> = reader.headers()?.iter().map(|h| h.to_string()).collect();
    let map = ColumnMap::resolve(&headers);
    debug!(?map, "resolved csv columns");

    let mut input = ClassificationInput::default();
    for (idx, row) in reader.records().enumerate() {
        let row = row?;
        let cells: Vec<String> = row.iter().map(|c| c.to_string()).collect();
        // header is row 1
        let row = idx + 2;
        input.push(row, map.record(row, &cells));
    }
    Ok(input)
}

pub fn read_csv(path: &Path) -> Result<ClassificationInput, CompileError> {
    let file = std::fs::File::open(path)?;
    read_csv_from(file)
}

fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Float(n) if n.fract() == 0.0 && n.abs() < 1e15 => format!("{}", *n as i64),
        Data::Float(n) => n.to_string(),
        Data::Int(n) => n.to_string(),
        Data::Bool(true) => "TRUE".to_string(),
        Data::Bool(false) => "FALSE".to_string(),
        other => other.to_string(),
    }
}

/// Read records from sheet `sheet` (zero-based) of an xlsx/xls/xlsb/ods file.
pub fn read_spreadsheet(path: &Path, sheet: usize) -> Result<ClassificationInput, CompileError> {
    let mut workbook = open_workbook_auto(path)
        .map_err(|e| CompileError::Spreadsheet(format!("failed to open {}: {e}", path.display())))?;
    let range = workbook
        .worksheet_range_at(sheet)
        .ok_or_else(|| CompileError::Spreadsheet(format!("no sheet at index {sheet}")))?
        .map_err(|e| CompileError::Spreadsheet(format!("failed to read sheet {sheet}: {e}")))?;

    let mut rows = range.rows();
    let Some(header) = rows.next() else {
        return Ok(ClassificationInput::default());
    };
    let headers: Vec<String> = header.iter().map(cell_text).collect();
    let map = ColumnMap::resolve(&headers);
    debug!(?map, sheet, "resolved sheet columns");

    let mut input = ClassificationInput::default();
    for (idx, row) in rows.enumerate() {
        let cells: Vec<String> = row.iter().map(cell_text).collect();
        let row = idx + 2;
        input.push(row, map.record(row, &cells));
    }
    Ok(input)
}

/// Read records, choosing the reader by file extension.
pub fn read_records(path: &Path, sheet: usize) -> Result<ClassificationInput, CompileError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();
    let input = match ext.as_str() {
        "csv" | "txt" => read_csv(path)?,
        "xlsx" | "xlsm" | "xls" | "xlsb" | "ods" => read_spreadsheet(path, sheet)?,
        other => return Err(CompileError::UnsupportedFormat(other.to_string())),
    };
    info!(
        path = %path.display(),
        records = input.records.len(),
        rejected = input.rejected.len(),
        "read classification records"
    );
    Ok(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn resolve_by_name_any_order() {
        let map = ColumnMap::resolve(&headers(&["Bin #", "iTypes", "Locations", "Count"]));
        assert_eq!(map.bin, 0);
        assert_eq!(map.item_type, 1);
        assert_eq!(map.location, 2);
        assert_eq!(map.count, 3);
        assert_eq!(map.call_number, None);
    }

    #[test]
    fn resolve_positionally() {
        let map = ColumnMap::resolve(&headers(&["n", "where", "what", "to", "shelf"]));
        assert_eq!(
            map,
            ColumnMap {
                count: 0,
                location: 1,
                item_type: 2,
                bin: 3,
                call_number: Some(4)
            }
        );
    }

    #[test]
    fn csv_rows_become_records() {
        let data = "Count,Loc,iTyp,Bin #,\n1250,TEENFIC,COMICBOOK,2,\n\"1,300\",FICGENERAL,BOOK,3.0,\n,,,,staff note\n5,DISCARD,BOOK,,\n";
        let input = read_csv_from(data.as_bytes()).unwrap();
        assert!(input.rejected.is_empty());
        let records = input.records;
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].row, 2);
        assert_eq!(records[0].count, 1250);
        assert_eq!(records[1].count, 1300);
        assert_eq!(records[1].bin, "3.0");
        assert_eq!(records[2].row, 5);
        assert_eq!(records[2].bin, "");
    }

    #[test]
    fn bad_count_skips_only_its_row() {
        let data = "Count,Location,Type,Bin\nmany,FIC,BOOK,1\n40,AV,DVD,2\n-3,AV,CD,2\n";
        let input = read_csv_from(data.as_bytes()).unwrap();
        assert_eq!(input.records.len(), 1);
        assert_eq!(input.records[0].row, 3);
        let rows: Vec<usize> = input.rejected.iter().map(|r| r.row).collect();
        assert_eq!(rows, [2, 4]);
        assert!(input.rejected[0].reason.contains("'many'"));
    }

    #[test]
    fn unknown_extension() {
        assert!(matches!(
            read_records(Path::new("staff.pdf"), 0),
            Err(CompileError::UnsupportedFormat(ext)) if ext == "pdf"
        ));
    }
}

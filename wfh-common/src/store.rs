//! Selection record storage
//!
//! The durable table is a CSV file with a header row. Loading is tolerant of
//! schema drift: canonical columns missing from the file are backfilled with
//! empty values, and unknown columns are carried through to the next save
//! without being exposed to the ledger or exports. Saving replaces the file
//! in one rename so readers never observe a half-written table.

use crate::record::{SelectionRecord, WeekId, WfhDay};
use crate::{Error, Result};
use chrono::{NaiveDate, NaiveDateTime};
use std::fs::{self, File};
use std::io::{self, BufReader, Read, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::debug;

/// Header names of the canonical columns, in file order
pub const CANONICAL_COLUMNS: [&str; 5] = ["Name", "Week", "Week Starting", "Day", "WFH Date"];

const COL_NAME: usize = 0;
const COL_WEEK: usize = 1;
const COL_WEEK_STARTING: usize = 2;
const COL_DAY: usize = 3;
const COL_WFH_DATE: usize = 4;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Persistence seam for the selection table
pub trait RecordStore: Send + Sync {
    /// Read the full table; an absent store yields an empty table
    fn load(&self) -> Result<Table>;

    /// Replace the stored table with `table`
    fn save(&self, table: &Table) -> Result<()>;
}

/// One stored row: the record plus any values from unknown columns
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredRow {
    pub record: SelectionRecord,
    pub extra: Vec<String>,
}

/// In-memory snapshot of the durable table
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Table {
    extra_columns: Vec<String>,
    rows: Vec<StoredRow>,
}

impl Table {
    /// Empty table with only the canonical columns
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> &[StoredRow] {
        &self.rows
    }

    pub fn records(&self) -> impl Iterator<Item = &SelectionRecord> {
        self.rows.iter().map(|row| &row.record)
    }

    /// Columns found in the source file that are not canonical
    pub fn extra_columns(&self) -> &[String] {
        &self.extra_columns
    }

    /// Canonical columns followed by preserved extras
    pub fn columns(&self) -> Vec<String> {
        CANONICAL_COLUMNS
            .iter()
            .map(|c| c.to_string())
            .chain(self.extra_columns.iter().cloned())
            .collect()
    }

    /// Append a record; preserved extra columns get empty values
    pub fn push(&mut self, record: SelectionRecord) {
        let extra = vec![String::new(); self.extra_columns.len()];
        self.rows.push(StoredRow { record, extra });
    }

    /// Parse a CSV table, returning the reason on failure
    pub fn read_csv<R: Read>(reader: R) -> std::result::Result<Self, String> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(false)
            .from_reader(reader);

        let headers = csv_reader
            .headers()
            .map_err(|e| format!("unreadable header row: {}", e))?
            .clone();

        if headers.is_empty() {
            return Err("missing header row".to_string());
        }

        // Map canonical columns by header name; everything else is extra
        let mut canonical_index: [Option<usize>; 5] = [None; 5];
        let mut extra_index = Vec::new();
        let mut extra_columns = Vec::new();

        for (i, header) in headers.iter().enumerate() {
            let slot = CANONICAL_COLUMNS
                .iter()
                .position(|c| *c == header.trim())
                .filter(|&pos| canonical_index[pos].is_none());
            match slot {
                Some(pos) => canonical_index[pos] = Some(i),
                None => {
                    extra_index.push(i);
                    extra_columns.push(header.to_string());
                }
            }
        }

        let mut rows = Vec::new();
        for (line, result) in csv_reader.records().enumerate() {
            let row = result.map_err(|e| format!("row {}: {}", line + 1, e))?;
            let cell = |col: usize| field(&row, canonical_index[col]);

            let record = SelectionRecord {
                name: cell(COL_NAME).trim().to_string(),
                week_id: WeekId::new(cell(COL_WEEK).trim()),
                week_starting: parse_date(cell(COL_WEEK_STARTING))
                    .map_err(|e| format!("row {}, {}: {}", line + 1, CANONICAL_COLUMNS[COL_WEEK_STARTING], e))?,
                day: parse_day(cell(COL_DAY))
                    .map_err(|e| format!("row {}, {}: {}", line + 1, CANONICAL_COLUMNS[COL_DAY], e))?,
                wfh_date: parse_date(cell(COL_WFH_DATE))
                    .map_err(|e| format!("row {}, {}: {}", line + 1, CANONICAL_COLUMNS[COL_WFH_DATE], e))?,
            };
            let extra = extra_index
                .iter()
                .map(|&i| row.get(i).unwrap_or("").to_string())
                .collect();

            rows.push(StoredRow { record, extra });
        }

        Ok(Self { extra_columns, rows })
    }

    /// Write the table as CSV: canonical columns first, then extras
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<()> {
        let mut csv_writer = csv::Writer::from_writer(writer);
        csv_writer.write_record(self.columns())?;

        for row in &self.rows {
            let r = &row.record;
            let mut fields = vec![
                r.name.clone(),
                r.week_id.to_string(),
                format_date(r.week_starting),
                r.day.map(|d| d.to_string()).unwrap_or_default(),
                format_date(r.wfh_date),
            ];
            fields.extend(row.extra.iter().cloned());
            csv_writer.write_record(&fields)?;
        }

        csv_writer.flush()?;
        Ok(())
    }
}

fn field(row: &csv::StringRecord, index: Option<usize>) -> &str {
    index.and_then(|i| row.get(i)).unwrap_or("")
}

/// Empty cells are null; a bare date or a pandas-style timestamp is accepted
fn parse_date(cell: &str) -> std::result::Result<Option<NaiveDate>, String> {
    let cell = cell.trim();
    if cell.is_empty() {
        return Ok(None);
    }
    NaiveDate::parse_from_str(cell, DATE_FORMAT)
        .or_else(|_| NaiveDateTime::parse_from_str(cell, "%Y-%m-%d %H:%M:%S").map(|dt| dt.date()))
        .map(Some)
        .map_err(|_| format!("invalid date {:?}", cell))
}

fn parse_day(cell: &str) -> std::result::Result<Option<WfhDay>, String> {
    if cell.trim().is_empty() {
        return Ok(None);
    }
    cell.parse::<WfhDay>().map(Some).map_err(|e| e.to_string())
}

fn format_date(date: Option<NaiveDate>) -> String {
    date.map(|d| d.format(DATE_FORMAT).to_string())
        .unwrap_or_default()
}

/// CSV file backed store
#[derive(Debug, Clone)]
pub struct CsvRecordStore {
    path: PathBuf,
}

impl CsvRecordStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl RecordStore for CsvRecordStore {
    fn load(&self) -> Result<Table> {
        let file = match File::open(&self.path) {
            Ok(file) => file,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!("No selection file at {}, starting empty", self.path.display());
                return Ok(Table::empty());
            }
            Err(e) => return Err(e.into()),
        };

        let table = Table::read_csv(BufReader::new(file)).map_err(|reason| Error::StoreCorrupt {
            path: self.path.clone(),
            reason,
        })?;

        debug!("Loaded {} selections from {}", table.len(), self.path.display());
        Ok(table)
    }

    fn save(&self, table: &Table) -> Result<()> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        fs::create_dir_all(&dir)?;

        // Write beside the target, then rename over it
        let mut temp = tempfile::NamedTempFile::new_in(&dir)?;
        table.write_csv(&mut temp)?;
        temp.as_file().sync_all()?;

        // The rename must not narrow an existing file's permissions
        match fs::metadata(&self.path) {
            Ok(existing) => temp.as_file().set_permissions(existing.permissions())?,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }
        temp.persist(&self.path).map_err(|e| Error::Io(e.error))?;

        debug!("Saved {} selections to {}", table.len(), self.path.display());
        Ok(())
    }
}

/// Volatile store for tests and embedding
#[derive(Debug, Default)]
pub struct MemoryRecordStore {
    table: Mutex<Table>,
}

impl MemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_table(table: Table) -> Self {
        Self {
            table: Mutex::new(table),
        }
    }
}

impl RecordStore for MemoryRecordStore {
    fn load(&self) -> Result<Table> {
        let guard = self
            .table
            .lock()
            .map_err(|_| Error::Internal("memory store lock poisoned".to_string()))?;
        Ok(guard.clone())
    }

    fn save(&self, table: &Table) -> Result<()> {
        let mut guard = self
            .table
            .lock()
            .map_err(|_| Error::Internal("memory store lock poisoned".to_string()))?;
        *guard = table.clone();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn sample_record() -> SelectionRecord {
        SelectionRecord {
            name: "Edward Chisoro".to_string(),
            week_id: WeekId::new("2025-11"),
            week_starting: Some(date(2025, 3, 10)),
            day: Some(WfhDay::Friday),
            wfh_date: Some(date(2025, 3, 14)),
        }
    }

    #[test]
    fn test_empty_table_has_canonical_columns() {
        let table = Table::empty();
        assert!(table.is_empty());
        assert_eq!(table.columns(), CANONICAL_COLUMNS.map(String::from).to_vec());
    }

    #[test]
    fn test_read_full_row() {
        let csv = "Name,Week,Week Starting,Day,WFH Date\n\
                   Edward Chisoro,2025-11,2025-03-10,Friday,2025-03-14\n";
        let table = Table::read_csv(csv.as_bytes()).unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(table.rows()[0].record, sample_record());
    }

    #[test]
    fn test_read_tolerates_column_order_and_missing_columns() {
        let csv = "Day,Name,Week\nThursday,Marie Ayaba,2025-11\n";
        let table = Table::read_csv(csv.as_bytes()).unwrap();
        let record = &table.rows()[0].record;
        assert_eq!(record.name, "Marie Ayaba");
        assert_eq!(record.day, Some(WfhDay::Thursday));
        assert_eq!(record.week_starting, None);
        assert_eq!(record.wfh_date, None);
    }

    #[test]
    fn test_read_trims_name_and_week() {
        let csv = "Name,Week,Day\n Karabo Kotu , 2025-11 ,Thursday\n";
        let table = Table::read_csv(csv.as_bytes()).unwrap();
        let record = &table.rows()[0].record;
        assert_eq!(record.name, "Karabo Kotu");
        assert!(record.matches("Karabo Kotu", &WeekId::new("2025-11")));
    }

    #[test]
    fn test_read_keeps_extra_columns() {
        let csv = "Name,Week,Day,Date\nMarie Ayaba,2025-11,Thursday,2025-03-11\n";
        let table = Table::read_csv(csv.as_bytes()).unwrap();
        assert_eq!(table.extra_columns(), &["Date".to_string()]);
        assert_eq!(table.rows()[0].extra, vec!["2025-03-11".to_string()]);
    }

    #[test]
    fn test_read_accepts_timestamp_dates() {
        let csv = "Name,Week,Week Starting,Day,WFH Date\n\
                   Edward Chisoro,2025-11,2025-03-10 00:00:00,Friday,2025-03-14\n";
        let table = Table::read_csv(csv.as_bytes()).unwrap();
        assert_eq!(table.rows()[0].record.week_starting, Some(date(2025, 3, 10)));
    }

    #[test]
    fn test_read_rejects_ragged_rows() {
        let csv = "Name,Week,Week Starting,Day,WFH Date\nonly,two\n";
        assert!(Table::read_csv(csv.as_bytes()).is_err());
    }

    #[test]
    fn test_read_rejects_bad_date_and_day() {
        let bad_date = "Name,Week,WFH Date\nA,2025-11,not-a-date\n";
        let err = Table::read_csv(bad_date.as_bytes()).unwrap_err();
        assert!(err.contains("WFH Date"), "{}", err);

        let bad_day = "Name,Week,Day\nA,2025-11,Monday\n";
        let err = Table::read_csv(bad_day.as_bytes()).unwrap_err();
        assert!(err.contains("Day"), "{}", err);
    }

    #[test]
    fn test_read_rejects_empty_input() {
        assert!(Table::read_csv("".as_bytes()).is_err());
    }

    #[test]
    fn test_push_pads_extra_columns() {
        let csv = "Name,Week,Day,Date\nMarie Ayaba,2025-11,Thursday,2025-03-11\n";
        let mut table = Table::read_csv(csv.as_bytes()).unwrap();
        table.push(sample_record());
        assert_eq!(table.rows()[1].extra, vec![String::new()]);
    }

    #[test]
    fn test_write_emits_canonical_columns_then_extras() {
        let csv = "Date,Name,Week,Day\n2025-03-11,Marie Ayaba,2025-11,Thursday\n";
        let table = Table::read_csv(csv.as_bytes()).unwrap();
        let mut out = Vec::new();
        table.write_csv(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some("Name,Week,Week Starting,Day,WFH Date,Date"));
        assert_eq!(lines.next(), Some("Marie Ayaba,2025-11,,Thursday,,2025-03-11"));
    }

    #[test]
    fn test_memory_store_round_trip() {
        let store = MemoryRecordStore::new();
        assert!(store.load().unwrap().is_empty());

        let mut table = Table::empty();
        table.push(sample_record());
        store.save(&table).unwrap();
        assert_eq!(store.load().unwrap(), table);
    }
}

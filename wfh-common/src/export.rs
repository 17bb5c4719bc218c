//! Export of stored selections
//!
//! Every format is a pure view over the whole table, projected onto
//! [`EXPORT_COLUMNS`] in that order. Missing values render as empty cells.

use crate::record::SelectionRecord;
use crate::store::Table;
use crate::{Error, Result};
use chrono::NaiveDate;
use std::fmt;
use std::io::{Cursor, Write};
use std::str::FromStr;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

/// Column headers of every export, in order
pub const EXPORT_COLUMNS: [&str; 5] = ["Week", "Week Starting", "Name", "Day", "WFH Date"];

const FILE_STEM: &str = "wfh_selections";
const SHEET_NAME: &str = "Selections";

/// Downloadable representation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Spreadsheet,
    Text,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Spreadsheet => "xlsx",
            ExportFormat::Text => "txt",
        }
    }

    pub fn content_type(self) -> &'static str {
        match self {
            ExportFormat::Csv => "text/csv; charset=utf-8",
            ExportFormat::Spreadsheet => {
                "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
            }
            ExportFormat::Text => "text/plain; charset=utf-8",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Spreadsheet => "spreadsheet",
            ExportFormat::Text => "text",
        })
    }
}

impl FromStr for ExportFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "csv" => Ok(ExportFormat::Csv),
            "xlsx" | "excel" | "spreadsheet" => Ok(ExportFormat::Spreadsheet),
            "text" | "txt" => Ok(ExportFormat::Text),
            other => Err(Error::InvalidInput(format!(
                "Unknown export format {:?} (expected csv, xlsx or text)",
                other
            ))),
        }
    }
}

/// Generated file payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportFile {
    pub bytes: Vec<u8>,
    pub filename: String,
    pub content_type: &'static str,
}

/// Render `table` in `format`; `today` dates the filename
pub fn export(table: &Table, format: ExportFormat, today: NaiveDate) -> Result<ExportFile> {
    let rows: Vec<[String; 5]> = table.records().map(project).collect();

    let bytes = match format {
        ExportFormat::Csv => render_csv(&rows)?,
        ExportFormat::Text => render_text(&rows).into_bytes(),
        ExportFormat::Spreadsheet => render_xlsx(&rows)?,
    };

    Ok(ExportFile {
        bytes,
        filename: format!("{}_{}.{}", FILE_STEM, today.format("%Y-%m-%d"), format.extension()),
        content_type: format.content_type(),
    })
}

fn project(record: &SelectionRecord) -> [String; 5] {
    let date = |d: Option<NaiveDate>| d.map(|d| d.format("%Y-%m-%d").to_string()).unwrap_or_default();
    [
        record.week_id.to_string(),
        date(record.week_starting),
        record.name.clone(),
        record.day.map(|d| d.to_string()).unwrap_or_default(),
        date(record.wfh_date),
    ]
}

fn render_csv(rows: &[[String; 5]]) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(EXPORT_COLUMNS)?;
    for row in rows {
        writer.write_record(row)?;
    }
    writer
        .into_inner()
        .map_err(|e| Error::Export(format!("CSV buffer: {}", e)))
}

fn render_text(rows: &[[String; 5]]) -> String {
    let mut widths = EXPORT_COLUMNS.map(|h| h.chars().count());
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let line = |cells: [&str; 5]| -> String {
        let padded: Vec<String> = cells
            .iter()
            .zip(widths)
            .map(|(cell, width)| format!("{:<width$}", cell, width = width))
            .collect();
        padded.join("  ").trim_end().to_string()
    };

    let mut out = line(EXPORT_COLUMNS);
    out.push('\n');
    for row in rows {
        out.push_str(&line(row.each_ref().map(String::as_str)));
        out.push('\n');
    }
    out
}

fn render_xlsx(rows: &[[String; 5]]) -> Result<Vec<u8>> {
    let mut sheet = String::from(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><sheetData>"#,
    );
    push_sheet_row(&mut sheet, 1, EXPORT_COLUMNS);
    for (i, row) in rows.iter().enumerate() {
        push_sheet_row(&mut sheet, i + 2, row.each_ref().map(String::as_str));
    }
    sheet.push_str("</sheetData></worksheet>");

    let workbook = format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships"><sheets><sheet name="{}" sheetId="1" r:id="rId1"/></sheets></workbook>"#,
        SHEET_NAME
    );

    let parts: [(&str, &str); 5] = [
        ("[Content_Types].xml", CONTENT_TYPES_XML),
        ("_rels/.rels", ROOT_RELS_XML),
        ("xl/workbook.xml", &workbook),
        ("xl/_rels/workbook.xml.rels", WORKBOOK_RELS_XML),
        ("xl/worksheets/sheet1.xml", &sheet),
    ];

    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    for (name, body) in parts {
        let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
        zip.start_file(name, options)?;
        zip.write_all(body.as_bytes())?;
    }
    Ok(zip.finish()?.into_inner())
}

fn push_sheet_row(sheet: &mut String, row_number: usize, cells: [&str; 5]) {
    sheet.push_str(&format!(r#"<row r="{}">"#, row_number));
    for (col, value) in cells.iter().enumerate() {
        if value.is_empty() {
            continue;
        }
        let column = char::from(b'A' + col as u8);
        sheet.push_str(&format!(
            r#"<c r="{}{}" t="inlineStr"><is><t xml:space="preserve">{}</t></is></c>"#,
            column,
            row_number,
            escape_xml(value)
        ));
    }
    sheet.push_str("</row>");
}

/// Escape cell text for SpreadsheetML
///
/// Control characters that XML 1.0 forbids become `_xHHHH_`, and a literal
/// `_xHHHH_` in the input has its underscore escaped so it survives as text.
fn escape_xml(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for (i, ch) in value.char_indices() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            '_' if looks_like_ooxml_escape(&value[i..]) => out.push_str("_x005F_"),
            c if is_forbidden_xml_char(c) => out.push_str(&format!("_x{:04X}_", c as u32)),
            c => out.push(c),
        }
    }
    out
}

fn is_forbidden_xml_char(c: char) -> bool {
    matches!(c, '\u{0}'..='\u{8}' | '\u{B}' | '\u{C}' | '\u{E}'..='\u{1F}' | '\u{FFFE}' | '\u{FFFF}')
}

/// True if `s` starts with `_x` + four hex digits + `_`
fn looks_like_ooxml_escape(s: &str) -> bool {
    let bytes = s.as_bytes();
    bytes.len() >= 7
        && bytes[1] == b'x'
        && bytes[2..6].iter().all(u8::is_ascii_hexdigit)
        && bytes[6] == b'_'
}

const CONTENT_TYPES_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/><Override PartName="/xl/worksheets/sheet1.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/></Types>"#;

const ROOT_RELS_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="xl/workbook.xml"/></Relationships>"#;

const WORKBOOK_RELS_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet1.xml"/></Relationships>"#;

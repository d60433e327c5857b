// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result};
use rust_xlsxwriter::{Format, Workbook};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use sublist_app::{ExportFormat, ExportTable};
use time::OffsetDateTime;
use time::macros::format_description;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";
const FILE_STEM: &str = "subgroup_listing";
const XLSX_COLUMN_WIDTH: f64 = 24.0;

/// `subgroup_listing_<YYYYMMDD_HHMMSS>.<ext>`.
pub fn default_export_file_name(format: ExportFormat, at: OffsetDateTime) -> Result<String> {
    let stamp = at
        .format(format_description!(
            "[year][month][day]_[hour][minute][second]"
        ))
        .context("format export timestamp")?;
    Ok(format!("{FILE_STEM}_{stamp}.{}", format.extension()))
}

/// Writes `table` into `dir` under a timestamped name and returns the path.
pub fn export_to_dir(
    table: &ExportTable,
    format: ExportFormat,
    dir: &Path,
    at: OffsetDateTime,
) -> Result<PathBuf> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("create export directory {}", dir.display()))?;
    let path = dir.join(default_export_file_name(format, at)?);
    write_table(table, format, &path)?;
    Ok(path)
}

pub fn write_table(table: &ExportTable, format: ExportFormat, path: &Path) -> Result<()> {
    let written = match format {
        ExportFormat::Csv => write_csv(table, path),
        ExportFormat::Xlsx => write_xlsx(table, path),
    };
    written?;
    tracing::info!(
        path = %path.display(),
        format = format.label(),
        rows = table.rows.len(),
        "exported listing"
    );
    Ok(())
}

/// UTF-8 with a byte-order mark so spreadsheet apps detect the encoding.
pub fn write_csv(table: &ExportTable, path: &Path) -> Result<()> {
    let file = File::create(path).with_context(|| format!("create {}", path.display()))?;
    let mut out = BufWriter::new(file);
    out.write_all(UTF8_BOM)
        .with_context(|| format!("write {}", path.display()))?;

    let mut writer = csv::Writer::from_writer(out);
    writer
        .write_record(&table.headers)
        .context("write csv header")?;
    for row in &table.rows {
        writer.write_record(row).context("write csv row")?;
    }
    writer
        .flush()
        .with_context(|| format!("flush {}", path.display()))?;
    Ok(())
}

/// Bold header row. Only columns that hold integers in the source become
/// numbers; every other cell keeps its exact text.
pub fn write_xlsx(table: &ExportTable, path: &Path) -> Result<()> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    let header_format = Format::new().set_bold();
    let wrap_format = Format::new().set_text_wrap();

    for (col, header) in table.headers.iter().enumerate() {
        let col = column_number(col)?;
        worksheet
            .write_with_format(0, col, header.as_str(), &header_format)
            .context("write xlsx header")?;
        worksheet
            .set_column_width(col, XLSX_COLUMN_WIDTH)
            .context("set xlsx column width")?;
    }

    for (row_index, row) in table.rows.iter().enumerate() {
        let row_number = u32::try_from(row_index + 1).context("too many rows for xlsx")?;
        for (position, cell) in row.iter().enumerate() {
            let col = column_number(position)?;
            match xlsx_cell(table, position, cell) {
                XlsxCell::Empty => {}
                XlsxCell::Number(number) => {
                    worksheet
                        .write_number(row_number, col, number)
                        .context("write xlsx number")?;
                }
                XlsxCell::Wrapped(text) => {
                    worksheet
                        .write_string_with_format(row_number, col, text, &wrap_format)
                        .context("write xlsx cell")?;
                }
                XlsxCell::Text(text) => {
                    worksheet
                        .write_string(row_number, col, text)
                        .context("write xlsx cell")?;
                }
            }
        }
    }

    workbook
        .save(path)
        .with_context(|| format!("save {}", path.display()))?;
    Ok(())
}

/// Largest integer an xlsx (f64) cell stores exactly.
const XLSX_MAX_EXACT: i64 = 1 << 53;

#[derive(Debug, Clone, Copy, PartialEq)]
enum XlsxCell<'a> {
    Empty,
    Number(f64),
    Wrapped(&'a str),
    Text(&'a str),
}

fn xlsx_cell<'a>(table: &ExportTable, position: usize, cell: &'a str) -> XlsxCell<'a> {
    if cell.is_empty() {
        return XlsxCell::Empty;
    }
    if table.integer_columns.contains(&position)
        && let Ok(number) = cell.parse::<i64>()
        && number.unsigned_abs() <= XLSX_MAX_EXACT.unsigned_abs()
        && number.to_string() == cell
    {
        return XlsxCell::Number(number as f64);
    }
    if cell.contains('\n') {
        XlsxCell::Wrapped(cell)
    } else {
        XlsxCell::Text(cell)
    }
}

fn column_number(col: usize) -> Result<u16> {
    u16::try_from(col).context("too many columns for xlsx")
}

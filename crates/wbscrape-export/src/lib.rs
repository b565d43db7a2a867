//! Spreadsheet export of collected product records.
//!
//! Records are written to an `.xlsx` workbook with a single `products`
//! sheet: a header row in the fixed order of [`HEADERS`], then one row per
//! record. Absent values stay empty cells. Column widths follow
//! [`COLUMN_WIDTHS`].

use std::io;
use std::path::{Path, PathBuf};

use rust_xlsxwriter::{Workbook, Worksheet, XlsxError};
use thiserror::Error;
use wbscrape_core::{PriceFilter, ProductRecord};

#[derive(Debug, Error)]
pub enum ExportError {
    /// The target file is held open by another program (typically a
    /// spreadsheet application) or otherwise not writable.
    #[error("cannot write {}: file is open elsewhere or not writable", path.display())]
    FileBusy { path: PathBuf },

    #[error("I/O error writing {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("spreadsheet error: {0}")]
    Xlsx(#[from] XlsxError),
}

pub const SHEET_NAME: &str = "products";

/// Column headers, in row order.
pub const HEADERS: [&str; 15] = [
    "product_id",
    "product_name",
    "original_price",
    "discounted_price",
    "cashback_points",
    "discount_percentage",
    "brand_name",
    "rating_score",
    "supplier_info",
    "supplier_rating",
    "feedback_count",
    "review_rating",
    "promo_text_card",
    "promo_text_category",
    "product_link",
];

/// Column widths in character units, aligned with [`HEADERS`].
pub const COLUMN_WIDTHS: [f64; 15] = [
    10.0, 34.0, 8.0, 9.0, 8.0, 4.0, 20.0, 6.0, 23.0, 13.0, 11.0, 12.0, 15.0, 15.0, 67.0,
];

/// File stem for a scrape: `{category}_from_{min}_to_{max}`.
///
/// Path separators and characters Windows rejects in file names are
/// replaced with `_`.
#[must_use]
pub fn export_file_stem(category_name: &str, filter: &PriceFilter) -> String {
    let safe_name: String = category_name
        .trim()
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();
    format!(
        "{safe_name}_from_{}_to_{}",
        filter.min_price(),
        filter.max_price()
    )
}

/// Writes `records` to `{dir}/{file_stem}.xlsx`, replacing any existing
/// file, and returns the written path.
///
/// # Errors
///
/// - [`ExportError::FileBusy`] if the file cannot be opened for writing
///   because of a permission, lock or sharing conflict.
/// - [`ExportError::Io`] for any other I/O failure.
/// - [`ExportError::Xlsx`] if the workbook cannot be assembled.
pub fn write_products(
    dir: &Path,
    file_stem: &str,
    records: &[ProductRecord],
) -> Result<PathBuf, ExportError> {
    let path = dir.join(format!("{file_stem}.xlsx"));

    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.set_name(SHEET_NAME)?;
    for (col, (header, width)) in (0u16..).zip(HEADERS.iter().zip(COLUMN_WIDTHS)) {
        sheet.write_string(0, col, *header)?;
        sheet.set_column_width(col, width)?;
    }
    for (row, record) in (1u32..).zip(records) {
        write_row(sheet, row, record)?;
    }

    workbook.save(&path).map_err(|e| match e {
        XlsxError::IoError(source) => io_error(&path, source),
        other => ExportError::Xlsx(other),
    })?;

    tracing::info!(path = %path.display(), rows = records.len(), "products exported");
    Ok(path)
}

enum Cell<'a> {
    Number(f64),
    Text(&'a str),
    Empty,
}

fn write_row(sheet: &mut Worksheet, row: u32, record: &ProductRecord) -> Result<(), XlsxError> {
    for (col, cell) in (0u16..).zip(cells(record)) {
        match cell {
            Cell::Number(n) => {
                sheet.write_number(row, col, n)?;
            }
            Cell::Text(s) => {
                sheet.write_string(row, col, s)?;
            }
            Cell::Empty => {}
        }
    }
    Ok(())
}

fn cells(record: &ProductRecord) -> [Cell<'_>; 15] {
    [
        int(record.id.and_then(|id| i64::try_from(id).ok())),
        text(record.name.as_deref()),
        int(record.original_price),
        int(record.discounted_price),
        int(record.cashback_points),
        int(record.discount_percentage),
        text(record.brand.as_deref()),
        float(record.rating),
        text(record.supplier_info.as_deref()),
        float(record.supplier_rating),
        int(record.feedback_count),
        float(record.review_rating),
        text(record.promo_text_card.as_deref()),
        text(record.promo_text_category.as_deref()),
        text(record.product_url.as_deref()),
    ]
}

#[allow(clippy::cast_precision_loss)]
fn int(value: Option<i64>) -> Cell<'static> {
    value.map_or(Cell::Empty, |n| Cell::Number(n as f64))
}

fn float(value: Option<f64>) -> Cell<'static> {
    value.map_or(Cell::Empty, Cell::Number)
}

fn text(value: Option<&str>) -> Cell<'_> {
    value.map_or(Cell::Empty, Cell::Text)
}

fn io_error(path: &Path, source: io::Error) -> ExportError {
    if is_file_busy(&source) {
        ExportError::FileBusy {
            path: path.to_path_buf(),
        }
    } else {
        ExportError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Whether an open-for-write failure means another program holds the file.
fn is_file_busy(err: &io::Error) -> bool {
    if matches!(
        err.kind(),
        io::ErrorKind::PermissionDenied | io::ErrorKind::ResourceBusy
    ) {
        return true;
    }
    // ERROR_SHARING_VIOLATION, ERROR_LOCK_VIOLATION
    cfg!(windows) && matches!(err.raw_os_error(), Some(32 | 33))
}

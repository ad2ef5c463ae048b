//! Text report sections
//!
//! Renders tables the way a dataframe prints them: right-aligned columns,
//! two-space gutters, and floats shown with the fewest decimals (up to six)
//! that keep every value in the column exact.

use crate::aggregate::GroupMeanTable;
use crate::findings::Finding;
use crate::stats::{Describe, TableInfo, STATISTIC_LABELS};
use crate::storage::RecordTable;
use crate::{Error, Result};
use arrow::datatypes::DataType;
use std::io::Write;

/// Writes report sections to an output stream
pub struct Reporter<W: Write> {
    out: W,
    rule_width: usize,
}

impl<W: Write> Reporter<W> {
    /// Create a reporter with the given separator rule width
    pub const fn new(out: W, rule_width: usize) -> Self {
        Self { out, rule_width }
    }

    /// Recover the output stream
    pub fn into_inner(self) -> W {
        self.out
    }

    /// Write one line of text
    ///
    /// # Errors
    ///
    /// Returns error if the stream rejects the write
    pub fn line(&mut self, text: &str) -> Result<()> {
        writeln!(self.out, "{text}")?;
        Ok(())
    }

    /// Blank line, a rule of `=`, blank line
    ///
    /// # Errors
    ///
    /// Returns error if the stream rejects the write
    pub fn rule(&mut self) -> Result<()> {
        writeln!(self.out, "\n{}\n", "=".repeat(self.rule_width))?;
        Ok(())
    }

    /// Flush buffered output
    ///
    /// # Errors
    ///
    /// Returns error if the stream cannot be flushed
    pub fn flush(&mut self) -> Result<()> {
        self.out.flush()?;
        Ok(())
    }

    /// First `n` rows with a positional index column
    ///
    /// # Errors
    ///
    /// Returns error on write failure or an unsupported column type
    pub fn head(&mut self, table: &RecordTable, n: usize) -> Result<()> {
        let head = table.head(n);
        let headers = head.column_names();
        let columns = headers
            .iter()
            .map(|name| format_column(&head, name))
            .collect::<Result<Vec<_>>>()?;

        let index: Vec<String> = (0..head.num_rows()).map(|i| i.to_string()).collect();
        let rows: Vec<Vec<String>> = (0..head.num_rows())
            .map(|row| columns.iter().map(|col| col[row].clone()).collect())
            .collect();

        self.table("", &headers, &index, &rows)
    }

    /// Structural listing: row range, per-column non-null count and dtype
    ///
    /// # Errors
    ///
    /// Returns error if the stream rejects the write
    pub fn info(&mut self, info: &TableInfo) -> Result<()> {
        let rows = info.rows;
        let last = rows.saturating_sub(1);
        writeln!(self.out, "<RecordTable>")?;
        writeln!(self.out, "RangeIndex: {rows} entries, 0 to {last}")?;
        writeln!(self.out, "Data columns (total {} columns):", info.columns.len())?;

        let name_width = info
            .columns
            .iter()
            .map(|c| c.name.len())
            .chain(std::iter::once("Column".len()))
            .max()
            .unwrap_or(0);
        let count_width = "Non-Null Count".len();

        writeln!(
            self.out,
            " #   {:<name_width$}  {:<count_width$}  Dtype",
            "Column", "Non-Null Count"
        )?;
        writeln!(
            self.out,
            "---  {:<name_width$}  {:<count_width$}  -----",
            "------", "--------------"
        )?;
        for (i, column) in info.columns.iter().enumerate() {
            let count = format!("{} non-null", column.non_null);
            writeln!(
                self.out,
                " {i:<3} {:<name_width$}  {count:<count_width$}  {}",
                column.name, column.dtype
            )?;
        }

        let dtypes: Vec<String> = info
            .dtype_counts
            .iter()
            .map(|(dtype, count)| format!("{dtype}({count})"))
            .collect();
        writeln!(self.out, "dtypes: {}", dtypes.join(", "))?;
        writeln!(self.out, "memory usage: {}", format_bytes(info.memory_bytes))?;
        Ok(())
    }

    /// Missing-value count per column
    ///
    /// # Errors
    ///
    /// Returns error if the stream rejects the write
    pub fn missing_values(&mut self, table: &RecordTable) -> Result<()> {
        let counts = table.null_counts();
        let name_width = counts.iter().map(|(name, _)| name.len()).max().unwrap_or(0);
        let value_width = counts
            .iter()
            .map(|(_, n)| n.to_string().len())
            .max()
            .unwrap_or(1);

        for (name, count) in &counts {
            writeln!(self.out, "{name:<name_width$}    {count:>value_width$}")?;
        }
        writeln!(self.out, "dtype: int64")?;
        Ok(())
    }

    /// Summary statistics, one column per numeric column
    ///
    /// # Errors
    ///
    /// Returns error if the stream rejects the write
    pub fn describe(&mut self, describe: &Describe) -> Result<()> {
        let headers: Vec<String> = describe.columns.iter().map(|(name, _)| name.clone()).collect();
        let index: Vec<String> = STATISTIC_LABELS.iter().map(ToString::to_string).collect();
        let values: Vec<[f64; 8]> = describe.columns.iter().map(|(_, s)| s.values()).collect();

        let rows: Vec<Vec<String>> = (0..STATISTIC_LABELS.len())
            .map(|stat| {
                values
                    .iter()
                    .map(|column| format_float(column[stat], 6))
                    .collect()
            })
            .collect();

        self.table("", &headers, &index, &rows)
    }

    /// Group-mean table indexed by group key
    ///
    /// # Errors
    ///
    /// Returns error if the means cannot be assembled into a batch or the
    /// stream rejects the write
    pub fn group_means(&mut self, means: &GroupMeanTable) -> Result<()> {
        let table = RecordTable::try_new(means.to_record_batch()?)?;
        let headers = means.columns().to_vec();
        let columns = headers
            .iter()
            .map(|name| format_column(&table, name))
            .collect::<Result<Vec<_>>>()?;

        let index: Vec<String> = means.keys().iter().map(ToString::to_string).collect();
        let rows: Vec<Vec<String>> = (0..means.num_rows())
            .map(|row| columns.iter().map(|col| col[row].clone()).collect())
            .collect();

        self.table(means.key_column(), &headers, &index, &rows)
    }

    /// Bulleted findings
    ///
    /// # Errors
    ///
    /// Returns error if the stream rejects the write
    pub fn findings(&mut self, findings: &[Finding]) -> Result<()> {
        for finding in findings {
            writeln!(self.out, "{finding}")?;
        }
        Ok(())
    }

    fn table(
        &mut self,
        index_name: &str,
        headers: &[String],
        index: &[String],
        rows: &[Vec<String>],
    ) -> Result<()> {
        let index_width = index
            .iter()
            .map(String::len)
            .chain(std::iter::once(index_name.len()))
            .max()
            .unwrap_or(0);
        let widths: Vec<usize> = headers
            .iter()
            .enumerate()
            .map(|(col, header)| {
                rows.iter()
                    .map(|row| row[col].len())
                    .chain(std::iter::once(header.len()))
                    .max()
                    .unwrap_or(0)
            })
            .collect();

        let mut line = format!("{index_name:<index_width$}");
        for (header, width) in headers.iter().zip(&widths) {
            line.push_str(&format!("  {header:>width$}"));
        }
        writeln!(self.out, "{}", line.trim_end())?;

        for (label, row) in index.iter().zip(rows) {
            let mut line = format!("{label:<index_width$}");
            for (cell, width) in row.iter().zip(&widths) {
                line.push_str(&format!("  {cell:>width$}"));
            }
            writeln!(self.out, "{line}")?;
        }
        Ok(())
    }
}

/// Format every value of a column as display text
fn format_column(table: &RecordTable, name: &str) -> Result<Vec<String>> {
    let column = table.column(name)?;
    match column.data_type() {
        DataType::Float64 => {
            let array = table.f64_column(name)?;
            let values: Vec<f64> = array.iter().flatten().collect();
            let decimals = column_decimals(&values);
            Ok(array
                .iter()
                .map(|v| v.map_or_else(|| "NaN".to_string(), |v| format_float(v, decimals)))
                .collect())
        }
        DataType::Int32 => {
            let array = table.i32_column(name)?;
            Ok(array
                .iter()
                .map(|v| v.map_or_else(|| "<NA>".to_string(), |v| v.to_string()))
                .collect())
        }
        other => Err(Error::InvalidInput(format!(
            "Cannot format column '{name}' of type {other:?}"
        ))),
    }
}

/// Fewest decimals (1..=6) that display every value without visible rounding
#[must_use]
pub fn column_decimals(values: &[f64]) -> usize {
    values
        .iter()
        .filter(|v| v.is_finite())
        .map(|v| {
            let text = format!("{v:.6}");
            let trimmed = text.trim_end_matches('0');
            trimmed
                .find('.')
                .map_or(0, |dot| trimmed.len() - dot - 1)
        })
        .max()
        .unwrap_or(1)
        .max(1)
}

/// Fixed-decimal float, `NaN` for missing statistics
#[must_use]
pub fn format_float(value: f64, decimals: usize) -> String {
    if value.is_nan() {
        "NaN".to_string()
    } else {
        format!("{value:.decimals$}")
    }
}

/// Human-readable byte count
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn format_bytes(bytes: usize) -> String {
    const KB: f64 = 1024.0;
    let b = bytes as f64;
    if b < KB {
        format!("{bytes} bytes")
    } else if b < KB * KB {
        format!("{:.1} KB", b / KB)
    } else {
        format!("{:.1} MB", b / (KB * KB))
    }
}

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{ArrayRef, Float64Array, StringArray, UInt64Array};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use arrow::util::pretty::pretty_format_batches;
use parquet::arrow::ArrowWriter;

use crate::config::ExportFormat;
use crate::data::aggregate::CombinedTable;
use crate::data::model::{Direction, PerFileSummary, ResidueKey};

pub const RESIDUE_NUM: &str = "residue_num";
pub const RESIDUE_IDENTITY: &str = "residue_identity";

// ---------------------------------------------------------------------------
// File naming
// ---------------------------------------------------------------------------

pub fn per_file_name(file_id: &str, direction: Direction, format: ExportFormat) -> String {
    let ext = format.extension();
    match direction {
        Direction::Forward => format!("{file_id}_pae_minima.{ext}"),
        Direction::Reciprocal => format!("{file_id}_reciprocal_pae_minima.{ext}"),
    }
}

pub fn combined_name(direction: Direction, format: ExportFormat) -> String {
    let ext = format.extension();
    match direction {
        Direction::Forward => format!("combined_pae_minima.{ext}"),
        Direction::Reciprocal => format!("combined_reciprocal_pae.{ext}"),
    }
}

// ---------------------------------------------------------------------------
// Tabular view shared by per-file and combined exports
// ---------------------------------------------------------------------------

/// `residue_num`, `residue_identity`, then one optional value per column.
struct TableView<'a> {
    columns: Vec<&'a str>,
    rows: Vec<(ResidueKey, Vec<Option<f64>>)>,
}

impl<'a> From<&'a PerFileSummary> for TableView<'a> {
    fn from(summary: &'a PerFileSummary) -> Self {
        TableView {
            columns: vec![summary.label.as_str()],
            rows: summary
                .records
                .iter()
                .map(|r| (r.key(), vec![Some(r.value)]))
                .collect(),
        }
    }
}

impl<'a> From<&'a CombinedTable> for TableView<'a> {
    fn from(table: &'a CombinedTable) -> Self {
        TableView {
            columns: table.columns().iter().map(String::as_str).collect(),
            rows: table.rows().map(|(k, v)| (*k, v.to_vec())).collect(),
        }
    }
}

impl TableView<'_> {
    fn to_record_batch(&self) -> Result<RecordBatch> {
        let mut fields = vec![
            Field::new(RESIDUE_NUM, DataType::UInt64, false),
            Field::new(RESIDUE_IDENTITY, DataType::Utf8, false),
        ];
        fields.extend(
            self.columns
                .iter()
                .map(|c| Field::new(*c, DataType::Float64, true)),
        );
        let schema = Arc::new(Schema::new(fields));

        let nums: Vec<u64> = self.rows.iter().map(|(k, _)| k.residue_num as u64).collect();
        let ids: Vec<String> = self
            .rows
            .iter()
            .map(|(k, _)| k.residue_identity.to_string())
            .collect();

        let mut arrays: Vec<ArrayRef> = vec![
            Arc::new(UInt64Array::from(nums)),
            Arc::new(StringArray::from(ids)),
        ];
        for idx in 0..self.columns.len() {
            let values: Vec<Option<f64>> = self.rows.iter().map(|(_, v)| v[idx]).collect();
            arrays.push(Arc::new(Float64Array::from(values)));
        }

        RecordBatch::try_new(schema, arrays).context("building record batch")
    }

    fn write_csv(&self, path: &Path) -> Result<()> {
        let mut writer = csv::Writer::from_path(path)
            .with_context(|| format!("creating {}", path.display()))?;

        let mut header = vec![RESIDUE_NUM, RESIDUE_IDENTITY];
        header.extend(self.columns.iter().copied());
        writer.write_record(&header).context("writing CSV header")?;

        for (key, values) in &self.rows {
            let mut record = vec![key.residue_num.to_string(), key.residue_identity.to_string()];
            // Absent cells stay empty; present ones keep a decimal point.
            record.extend(
                values
                    .iter()
                    .map(|v| v.map(|x| format!("{x:?}")).unwrap_or_default()),
            );
            writer
                .write_record(&record)
                .with_context(|| format!("writing row {} to {}", key.residue_num, path.display()))?;
        }

        writer.flush().context("flushing CSV")?;
        Ok(())
    }

    fn write_parquet(&self, path: &Path) -> Result<()> {
        let batch = self.to_record_batch()?;
        let file = std::fs::File::create(path)
            .with_context(|| format!("creating {}", path.display()))?;
        let mut writer =
            ArrowWriter::try_new(file, batch.schema(), None).context("creating parquet writer")?;
        writer.write(&batch).context("writing parquet batch")?;
        writer.close().context("closing parquet writer")?;
        Ok(())
    }

    fn write(&self, path: &Path, format: ExportFormat) -> Result<()> {
        match format {
            ExportFormat::Csv => self.write_csv(path),
            ExportFormat::Parquet => self.write_parquet(path),
        }
    }
}

// ---------------------------------------------------------------------------
// Public writers
// ---------------------------------------------------------------------------

/// Write one file's summary into `dir` and return the path written.
pub fn write_summary(
    dir: &Path,
    file_id: &str,
    summary: &PerFileSummary,
    format: ExportFormat,
) -> Result<PathBuf> {
    let path = dir.join(per_file_name(file_id, summary.direction, format));
    TableView::from(summary).write(&path, format)?;
    Ok(path)
}

/// Write a combined table into `dir` and return the path written.
pub fn write_combined(dir: &Path, table: &CombinedTable, format: ExportFormat) -> Result<PathBuf> {
    let path = dir.join(combined_name(table.direction(), format));
    TableView::from(table).write(&path, format)?;
    Ok(path)
}

pub fn combined_record_batch(table: &CombinedTable) -> Result<RecordBatch> {
    TableView::from(table).to_record_batch()
}

/// Render a combined table as an ASCII grid for the terminal.
pub fn pretty_table(table: &CombinedTable) -> Result<String> {
    let batch = combined_record_batch(table)?;
    Ok(pretty_format_batches(&[batch])
        .context("formatting table")?
        .to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::PerFileRecord;
    use arrow::array::Array;

    fn summary(label: &str, direction: Direction, values: &[(usize, char, f64)]) -> PerFileSummary {
        PerFileSummary {
            label: label.to_string(),
            direction,
            records: values
                .iter()
                .map(|&(residue_num, residue_identity, value)| PerFileRecord {
                    residue_num,
                    residue_identity,
                    value,
                })
                .collect(),
        }
    }

    fn two_file_table() -> CombinedTable {
        let mut t = CombinedTable::new(Direction::Forward);
        t.outer_join(&summary("m1", Direction::Forward, &[(1, 'A', 2.0), (2, 'B', 3.5)]))
            .unwrap();
        t.outer_join(&summary("m2", Direction::Forward, &[(1, 'A', 1.25)]))
            .unwrap();
        t
    }

    #[test]
    fn file_names_follow_direction() {
        assert_eq!(
            per_file_name("m1", Direction::Reciprocal, ExportFormat::Csv),
            "m1_reciprocal_pae_minima.csv"
        );
        assert_eq!(
            combined_name(Direction::Forward, ExportFormat::Parquet),
            "combined_pae_minima.parquet"
        );
    }

    #[test]
    fn combined_csv_leaves_absent_cells_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_combined(dir.path(), &two_file_table(), ExportFormat::Csv).unwrap();
        let text = std::fs::read_to_string(path).unwrap();
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(
            lines,
            vec!["residue_num,residue_identity,m1,m2", "1,A,2.0,1.25", "2,B,3.5,"]
        );
    }

    #[test]
    fn record_batch_uses_nulls_for_absence() {
        let batch = combined_record_batch(&two_file_table()).unwrap();
        assert_eq!(batch.num_rows(), 2);
        assert_eq!(batch.num_columns(), 4);
        let m2 = batch
            .column(3)
            .as_any()
            .downcast_ref::<Float64Array>()
            .unwrap();
        assert_eq!(m2.value(0), 1.25);
        assert!(m2.is_null(1));
    }

    #[test]
    fn parquet_export_writes_a_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_combined(dir.path(), &two_file_table(), ExportFormat::Parquet).unwrap();
        assert!(path.ends_with("combined_pae_minima.parquet"));
        assert!(std::fs::metadata(&path).unwrap().len() > 0);
    }

    #[test]
    fn pretty_table_lists_columns() {
        let text = pretty_table(&two_file_table()).unwrap();
        assert!(text.contains("residue_identity"));
        assert!(text.contains("m2"));
    }

    #[test]
    fn empty_table_still_renders() {
        let t = CombinedTable::new(Direction::Reciprocal);
        let batch = combined_record_batch(&t).unwrap();
        assert_eq!(batch.num_rows(), 0);
        assert_eq!(batch.num_columns(), 2);
    }
}

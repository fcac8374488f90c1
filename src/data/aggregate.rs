use std::collections::BTreeMap;
use std::fmt;

use super::model::{Direction, FileSummaries, PerFileSummary, ResidueKey};
use crate::error::AggregationError;

// ---------------------------------------------------------------------------
// CombinedTable – batch-wide outer join for one direction
// ---------------------------------------------------------------------------

/// Residue rows × file columns. A missing cell is `None`, never `0.0`.
///
/// Every row vector has exactly `columns.len()` entries.
#[derive(Debug, Clone, PartialEq)]
pub struct CombinedTable {
    direction: Direction,
    columns: Vec<String>,
    rows: BTreeMap<ResidueKey, Vec<Option<f64>>>,
}

/// Two files disagree on which residue sits at `residue_num`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregationWarning {
    pub direction: Direction,
    pub column: String,
    pub residue_num: usize,
    pub residue_identity: char,
    pub existing_identity: char,
}

impl fmt::Display for AggregationWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} table: '{}' reports residue {} as {} but the table already holds it as {}; keeping both rows",
            self.direction,
            self.column,
            self.residue_num,
            self.residue_identity,
            self.existing_identity
        )
    }
}

impl CombinedTable {
    pub fn new(direction: Direction) -> Self {
        CombinedTable {
            direction,
            columns: Vec::new(),
            rows: BTreeMap::new(),
        }
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// File columns in the order they were joined.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Rows in ascending residue order.
    pub fn rows(&self) -> impl Iterator<Item = (&ResidueKey, &[Option<f64>])> {
        self.rows.iter().map(|(k, v)| (k, v.as_slice()))
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Cell lookup; `None` when the row, the column, or the value is absent.
    pub fn get(&self, key: &ResidueKey, column: &str) -> Option<f64> {
        let idx = self.columns.iter().position(|c| c == column)?;
        self.rows.get(key).and_then(|row| row[idx])
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.columns.iter().any(|c| c == column)
    }

    /// Full outer join of `summary` into the table on (residue_num, residue_identity).
    ///
    /// Returns a warning for every incoming row whose residue number is
    /// already present under a different identity. Those rows are kept as
    /// separate entries.
    pub fn outer_join(
        &mut self,
        summary: &PerFileSummary,
    ) -> Result<Vec<AggregationWarning>, AggregationError> {
        if self.has_column(&summary.label) {
            return Err(AggregationError::DuplicateColumn(summary.label.clone()));
        }

        let width = self.columns.len();
        self.columns.push(summary.label.clone());
        for row in self.rows.values_mut() {
            row.push(None);
        }

        let mut warnings = Vec::new();
        for record in &summary.records {
            let key = record.key();
            if !self.rows.contains_key(&key) {
                if let Some(existing) = self.identity_conflict(&key) {
                    warnings.push(AggregationWarning {
                        direction: self.direction,
                        column: summary.label.clone(),
                        residue_num: key.residue_num,
                        residue_identity: key.residue_identity,
                        existing_identity: existing,
                    });
                }
            }
            let row = self
                .rows
                .entry(key)
                .or_insert_with(|| vec![None; width + 1]);
            row[width] = Some(record.value);
        }

        Ok(warnings)
    }

    fn identity_conflict(&self, key: &ResidueKey) -> Option<char> {
        let lo = ResidueKey {
            residue_num: key.residue_num,
            residue_identity: '\0',
        };
        let hi = ResidueKey {
            residue_num: key.residue_num,
            residue_identity: char::MAX,
        };
        self.rows
            .range(lo..=hi)
            .map(|(k, _)| k.residue_identity)
            .find(|&c| c != key.residue_identity)
    }
}

// ---------------------------------------------------------------------------
// BatchAggregator – owns both tables for a whole run
// ---------------------------------------------------------------------------

/// Running forward and reciprocal tables, grown once per successful file.
#[derive(Debug, Clone)]
pub struct BatchAggregator {
    forward: CombinedTable,
    reciprocal: CombinedTable,
    warnings: Vec<AggregationWarning>,
}

/// The finished, read-only output of a [`BatchAggregator`].
#[derive(Debug, Clone, PartialEq)]
pub struct CombinedTables {
    pub forward: CombinedTable,
    pub reciprocal: CombinedTable,
    pub warnings: Vec<AggregationWarning>,
}

impl CombinedTables {
    pub fn get(&self, direction: Direction) -> &CombinedTable {
        match direction {
            Direction::Forward => &self.forward,
            Direction::Reciprocal => &self.reciprocal,
        }
    }
}

impl Default for BatchAggregator {
    fn default() -> Self {
        Self {
            forward: CombinedTable::new(Direction::Forward),
            reciprocal: CombinedTable::new(Direction::Reciprocal),
            warnings: Vec::new(),
        }
    }
}

impl BatchAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Join one file's summaries into both tables.
    ///
    /// Either both tables gain the file's columns or, on error, neither does.
    /// Labels only collide within the same direction.
    pub fn fold(&mut self, file: &FileSummaries) -> Result<(), AggregationError> {
        let pairs = [
            (&self.forward, &file.forward),
            (&self.reciprocal, &file.reciprocal),
        ];
        for (table, summary) in pairs {
            if table.has_column(&summary.label) {
                return Err(AggregationError::DuplicateColumn(summary.label.clone()));
            }
        }

        let mut warnings = self.forward.outer_join(&file.forward)?;
        warnings.extend(self.reciprocal.outer_join(&file.reciprocal)?);
        for w in &warnings {
            log::warn!("{w}");
        }
        self.warnings.extend(warnings);
        Ok(())
    }

    pub fn forward(&self) -> &CombinedTable {
        &self.forward
    }

    pub fn reciprocal(&self) -> &CombinedTable {
        &self.reciprocal
    }

    pub fn finish(self) -> CombinedTables {
        CombinedTables {
            forward: self.forward,
            reciprocal: self.reciprocal,
            warnings: self.warnings,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::PerFileRecord;

    fn summary(label: &str, residues: &[(usize, char, f64)]) -> PerFileSummary {
        PerFileSummary {
            label: label.to_string(),
            direction: Direction::Forward,
            records: residues
                .iter()
                .map(|&(residue_num, residue_identity, value)| PerFileRecord {
                    residue_num,
                    residue_identity,
                    value,
                })
                .collect(),
        }
    }

    fn key(residue_num: usize, residue_identity: char) -> ResidueKey {
        ResidueKey { residue_num, residue_identity }
    }

    #[test]
    fn missing_rows_are_absent_not_zero() {
        let mut t = CombinedTable::new(Direction::Forward);
        t.outer_join(&summary("a", &[(1, 'M', 1.0), (2, 'K', 2.0), (3, 'T', 3.0)]))
            .unwrap();
        t.outer_join(&summary("b", &[(1, 'M', 4.0), (2, 'K', 5.0)])).unwrap();

        assert_eq!(t.len(), 3);
        assert_eq!(t.columns(), &["a".to_string(), "b".to_string()]);
        assert_eq!(t.get(&key(3, 'T'), "a"), Some(3.0));
        assert_eq!(t.get(&key(3, 'T'), "b"), None);
        assert_eq!(t.get(&key(1, 'M'), "b"), Some(4.0));
    }

    #[test]
    fn new_rows_are_padded_for_earlier_columns() {
        let mut t = CombinedTable::new(Direction::Forward);
        t.outer_join(&summary("a", &[(1, 'M', 1.0)])).unwrap();
        t.outer_join(&summary("b", &[(1, 'M', 2.0), (2, 'K', 7.0)])).unwrap();

        let rows: Vec<_> = t.rows().map(|(k, v)| (*k, v.to_vec())).collect();
        assert_eq!(
            rows,
            vec![
                (key(1, 'M'), vec![Some(1.0), Some(2.0)]),
                (key(2, 'K'), vec![None, Some(7.0)]),
            ]
        );
    }

    #[test]
    fn conflicting_identity_keeps_both_rows() {
        let mut t = CombinedTable::new(Direction::Forward);
        t.outer_join(&summary("a", &[(1, 'M', 1.0)])).unwrap();
        let warnings = t.outer_join(&summary("b", &[(1, 'A', 2.0)])).unwrap();

        assert_eq!(t.len(), 2);
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].existing_identity, 'M');
        assert_eq!(t.get(&key(1, 'M'), "b"), None);
        assert_eq!(t.get(&key(1, 'A'), "b"), Some(2.0));
    }

    #[test]
    fn duplicate_column_leaves_table_untouched() {
        let mut t = CombinedTable::new(Direction::Forward);
        t.outer_join(&summary("a", &[(1, 'M', 1.0)])).unwrap();
        let before = t.clone();
        let err = t.outer_join(&summary("a", &[(2, 'K', 1.0)])).unwrap_err();
        assert_eq!(err, AggregationError::DuplicateColumn("a".into()));
        assert_eq!(t, before);
    }

    #[test]
    fn row_content_is_independent_of_fold_grouping() {
        let a = summary("a", &[(1, 'M', 1.0), (2, 'K', 2.0)]);
        let b = summary("b", &[(2, 'K', 3.0), (3, 'T', 4.0)]);
        let c = summary("c", &[(4, 'L', 5.0)]);

        let mut stepwise = CombinedTable::new(Direction::Forward);
        for s in [&a, &b] {
            stepwise.outer_join(s).unwrap();
        }
        let snapshot = stepwise.clone();
        stepwise.outer_join(&c).unwrap();

        let mut direct = CombinedTable::new(Direction::Forward);
        for s in [&c, &b, &a] {
            direct.outer_join(s).unwrap();
        }

        assert_eq!(snapshot.len(), 3);
        let keys_a: Vec<_> = stepwise.rows().map(|(k, _)| *k).collect();
        let keys_b: Vec<_> = direct.rows().map(|(k, _)| *k).collect();
        assert_eq!(keys_a, keys_b);
        for k in &keys_a {
            for col in ["a", "b", "c"] {
                assert_eq!(stepwise.get(k, col), direct.get(k, col));
            }
        }
    }

    fn file(id: &str) -> FileSummaries {
        FileSummaries {
            file_id: id.to_string(),
            forward: summary(id, &[(1, 'M', 1.0)]),
            reciprocal: PerFileSummary {
                direction: Direction::Reciprocal,
                ..summary(&Direction::Reciprocal.column_label(id), &[(1, 'M', 2.0)])
            },
        }
    }

    #[test]
    fn forward_label_may_match_an_earlier_reciprocal_label() {
        let mut agg = BatchAggregator::new();
        agg.fold(&file("foo")).unwrap();
        agg.fold(&file("foo_reciprocal_min")).unwrap();

        let tables = agg.finish();
        assert_eq!(tables.forward.columns(), &["foo", "foo_reciprocal_min"]);
        assert_eq!(
            tables.reciprocal.columns(),
            &["foo_reciprocal_min", "foo_reciprocal_min_reciprocal_min"]
        );
        assert_eq!(
            tables.forward.get(&key(1, 'M'), "foo_reciprocal_min"),
            Some(1.0)
        );
    }

    #[test]
    fn aggregator_rejects_file_atomically() {
        let mut agg = BatchAggregator::new();
        agg.fold(&file("m1")).unwrap();
        assert!(agg.fold(&file("m1")).is_err());
        assert_eq!(agg.forward().columns().len(), 1);
        assert_eq!(agg.reciprocal().columns().len(), 1);

        agg.fold(&file("m2")).unwrap();
        let tables = agg.finish();
        assert_eq!(tables.reciprocal.columns(), &["m1_reciprocal_min", "m2_reciprocal_min"]);
        assert!(tables.warnings.is_empty());
    }
}

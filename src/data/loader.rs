use std::path::Path;

use serde_json::Value as JsonValue;

use super::model::ErrorMatrix;
use crate::error::LoadError;

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Load a PAE matrix from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.json` – `{ "pae": [[...], [...], ...], ...other fields }`
pub fn load_file(path: &Path) -> Result<ErrorMatrix, LoadError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match ext.as_str() {
        "json" => {
            let text = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
                path: path.to_path_buf(),
                source,
            })?;
            parse_pae_json(&text)
        }
        other => Err(LoadError::UnsupportedExtension(other.to_string())),
    }
}

/// Parse a prediction payload and extract its `pae` matrix.
///
/// Expected JSON schema (only `pae` is read):
///
/// ```json
/// {
///   "pae": [[0.25, 3.1, ...], [2.9, 0.25, ...], ...],
///   "max_pae": 31.75,
///   "plddt": [...]
/// }
/// ```
pub fn parse_pae_json(text: &str) -> Result<ErrorMatrix, LoadError> {
    let root: JsonValue = serde_json::from_str(text)?;
    let pae = root
        .as_object()
        .and_then(|obj| obj.get("pae"))
        .ok_or(LoadError::MissingPae)?;
    matrix_from_json(pae)
}

/// Convert an already-parsed `pae` value into a validated matrix.
pub fn matrix_from_json(pae: &JsonValue) -> Result<ErrorMatrix, LoadError> {
    let rows = pae.as_array().ok_or(LoadError::NotAnArray)?;

    let parsed = rows
        .iter()
        .enumerate()
        .map(|(i, row)| json_row_to_f64(row, i))
        .collect::<Result<Vec<_>, _>>()?;

    ErrorMatrix::from_rows(parsed)
}

fn json_row_to_f64(val: &JsonValue, row: usize) -> Result<Vec<f64>, LoadError> {
    let arr = val.as_array().ok_or(LoadError::RowNotArray { row })?;

    arr.iter()
        .enumerate()
        .map(|(col, v)| v.as_f64().ok_or(LoadError::NotNumeric { row, col }))
        .collect()
}

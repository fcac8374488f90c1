//! Per-residue PAE minima for a batch of predicted peptide complexes.
//!
//! Each prediction's square predicted-aligned-error matrix is reduced to two
//! vectors over the shared N-terminal peptide of length `L`:
//!
//! * **forward** minima: for residue `i`, the smallest value in row `i`
//!   beyond column `L`;
//! * **reciprocal** minima: the same over column `i` beyond row `L`.
//!
//! Per-file vectors are then outer-joined across the batch into two combined
//! tables keyed by residue number and identity.
//!
//! ## Examples
//! ```rust
//! use pae_minima::batch::run_payloads;
//! use pae_minima::data::model::PeptideSpec;
//!
//! let peptide = PeptideSpec::new("AB").unwrap();
//! let payload = r#"{"pae": [[0,1,2,3],[1,0,3,4],[2,3,0,5],[3,4,5,0]]}"#;
//! let report = run_payloads(peptide, [("model_0", payload)]);
//! assert_eq!(report.processed[0].forward.records[1].value, 3.0);
//! ```

pub mod batch;
pub mod config;
pub mod data;
pub mod discover;
pub mod error;
pub mod export;
pub mod run;

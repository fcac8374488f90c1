use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::Serialize;

/// The subset of a prediction's score file that the pipeline reads.
#[derive(Serialize)]
struct PaePayload {
    pae: Vec<Vec<f64>>,
    max_pae: f64,
}

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    fn uniform(&mut self, lo: f64, hi: f64) -> f64 {
        lo + (hi - lo) * self.next_f64()
    }
}

const PEPTIDE: &str = "MKTAYIAKQR";
const RECEPTOR_LEN: usize = 80;
const MAX_PAE: f64 = 31.75;

/// One synthetic PAE matrix: the peptide docks onto `site` with a per-model
/// confidence; reciprocal values are noisier than forward ones.
fn generate_pae(rng: &mut SimpleRng, site: std::ops::Range<usize>, confidence: f64) -> Vec<Vec<f64>> {
    let l = PEPTIDE.len();
    let n = l + RECEPTOR_LEN;

    let mut pae = vec![vec![0.0; n]; n];
    for (r, row) in pae.iter_mut().enumerate() {
        for (c, cell) in row.iter_mut().enumerate() {
            let value = if r == c {
                0.25
            } else if r < l && c < l {
                rng.uniform(2.0, 6.0)
            } else if r >= l && c >= l {
                rng.uniform(1.0, 8.0)
            } else {
                // peptide ↔ receptor block
                let (pep, rec) = if r < l { (r, c - l) } else { (c, r - l) };
                let anchored = site.contains(&rec) && pep % 3 != 2;
                let base = if anchored {
                    rng.uniform(1.5, 4.0) / confidence
                } else {
                    rng.uniform(18.0, MAX_PAE)
                };
                if r < l { base } else { base + rng.uniform(0.0, 3.0) }
            };
            *cell = value.min(MAX_PAE);
        }
    }
    pae
}

fn main() -> Result<()> {
    env_logger::init();

    let out_dir = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("sample_pae"));
    std::fs::create_dir_all(&out_dir)
        .with_context(|| format!("creating {}", out_dir.display()))?;

    let mut rng = SimpleRng::new(42);
    let models = [(20..28, 1.0), (20..28, 0.6), (41..47, 0.8), (5..9, 0.3), (20..30, 1.2)];
    let written = models.len() + 1;

    for (i, (site, confidence)) in models.into_iter().enumerate() {
        let pae = generate_pae(&mut rng, site, confidence);
        let payload = PaePayload { pae, max_pae: MAX_PAE };
        let path = out_dir.join(format!("ranked_{i}_scores.json"));
        std::fs::write(&path, serde_json::to_string(&payload)?)
            .with_context(|| format!("writing {}", path.display()))?;
        log::info!("Wrote {}", path.display());
    }

    // A truncated prediction to exercise per-file error handling.
    let broken = out_dir.join("ranked_9_truncated.json");
    std::fs::write(&broken, r#"{"pae": [[0.25, 3.0], [3.0]]}"#)
        .with_context(|| format!("writing {}", broken.display()))?;
    log::info!("Wrote malformed {}", broken.display());

    println!(
        "Wrote {} PAE files ({} residues each, peptide {PEPTIDE}) to {}",
        written,
        PEPTIDE.len() + RECEPTOR_LEN,
        out_dir.display()
    );
    Ok(())
}

//! Best-score persistence
//!
//! A single JSON document on disk holding the all-time best score under a
//! fixed key. A missing file reads as zero so first launches start clean.

use std::path::PathBuf;

use anyhow::Context;

use block_breeze_types::BEST_SCORE_KEY;

/// File-backed store for the all-time best score
#[derive(Debug, Clone)]
pub struct BestScoreStore {
    path: PathBuf,
}

impl BestScoreStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Create from environment variables
    pub fn from_env() -> Self {
        let path = std::env::var("BREEZE_BEST_PATH")
            .unwrap_or_else(|_| "blockbreeze_best.json".to_string());
        Self::new(path)
    }

    pub fn path(&self) -> &std::path::Path {
        &self.path
    }

    /// Read the stored best score. A missing file is not an error, it reads
    /// as zero. A present but unreadable file is.
    pub fn load(&self) -> anyhow::Result<u32> {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(0),
            Err(e) => {
                return Err(e).with_context(|| format!("reading {}", self.path.display()));
            }
        };

        let doc: serde_json::Value = serde_json::from_str(&raw)
            .with_context(|| format!("parsing {}", self.path.display()))?;

        let best = doc
            .get(BEST_SCORE_KEY)
            .and_then(|v| v.as_u64())
            .unwrap_or(0);
        Ok(best as u32)
    }

    /// Write the best score, replacing any previous document.
    pub fn save(&self, best: u32) -> anyhow::Result<()> {
        let mut doc = serde_json::Map::new();
        doc.insert(
            BEST_SCORE_KEY.to_string(),
            serde_json::Value::from(u64::from(best)),
        );
        let raw = serde_json::to_string(&serde_json::Value::Object(doc))
            .context("encoding best score")?;
        std::fs::write(&self.path, raw)
            .with_context(|| format!("writing {}", self.path.display()))?;
        Ok(())
    }
}

use serde::Serialize;

// ---------------------------------------------------------------------------
// Scan
// ---------------------------------------------------------------------------

/// One emitted row from the amount column, augmented with its partition key.
#[derive(Debug, Clone, PartialEq)]
pub struct ScannedEntry {
    pub row: u32,
    pub value: f64,
    pub partition: String,
}

// ---------------------------------------------------------------------------
// Pairing
// ---------------------------------------------------------------------------

/// Row-level pairing outcome. The index is shared by the two rows of a pair;
/// `None` marks an unmatched row, annotated blank.
#[derive(Debug, Clone, PartialEq)]
pub struct Annotation {
    pub row: u32,
    pub match_index: Option<u32>,
}

#[derive(Debug)]
pub struct PairingOutput {
    pub annotations: Vec<Annotation>,
    pub bucket_count: usize,
    pub pair_count: usize,
    pub unmatched_count: usize,
}

// ---------------------------------------------------------------------------
// Summary + Output
// ---------------------------------------------------------------------------

/// Outcome of one sheet's pass.
#[derive(Debug, Clone, Serialize)]
pub struct SheetReport {
    pub sheet: String,
    pub target_column: u32,
    pub result_column: u32,
    pub rows_scanned: usize,
    pub buckets: usize,
    pub pairs: usize,
    pub unmatched: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct RunMeta {
    pub engine_version: String,
    pub run_at: String,
}

impl RunMeta {
    pub fn now() -> Self {
        Self {
            engine_version: env!("CARGO_PKG_VERSION").to_string(),
            run_at: chrono::Utc::now().to_rfc3339(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub meta: RunMeta,
    pub sheets: Vec<SheetReport>,
    pub warnings: Vec<String>,
}

impl RunReport {
    pub fn rows_scanned(&self) -> usize {
        self.sheets.iter().map(|s| s.rows_scanned).sum()
    }

    pub fn pairs(&self) -> usize {
        self.sheets.iter().map(|s| s.pairs).sum()
    }

    pub fn unmatched(&self) -> usize {
        self.sheets.iter().map(|s| s.unmatched).sum()
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// One-line run summary for the console.
    pub fn summary(&self) -> String {
        let sheets = self.sheets.len();
        format!(
            "{} sheet{}, {} rows scanned, {} pair{}, {} unmatched",
            sheets,
            if sheets == 1 { "" } else { "s" },
            self.rows_scanned(),
            self.pairs(),
            if self.pairs() == 1 { "" } else { "s" },
            self.unmatched(),
        )
    }
}

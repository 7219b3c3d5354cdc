use std::collections::BTreeMap;
use std::fs;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::csv::{parse_rows, write_row};
use crate::error::{CrawlError, Result};

const SEP: char = ';';

/// Columns kept in every per-state file, in this order.
pub const COLUMNS: &[&str] = &[
    "name",
    "parent_id",
    "community_id",
    "category",
    "pha",
    "population_proper",
    "state_id",
    "pha_url",
];

pub struct StateFile {
    pub state: String,
    pub path: PathBuf,
    pub rows: usize,
}

/// Split the national `;`-separated list into `us-<state>.csv` files under `out_dir`.
pub fn split_by_state(input: &Path, out_dir: &Path) -> Result<Vec<StateFile>> {
    let text = fs::read_to_string(input).map_err(|e| CrawlError::io(input, e))?;
    let grouped = group_by_state(&text).map_err(|message| CrawlError::SiteList {
        path: input.to_path_buf(),
        message,
    })?;

    fs::create_dir_all(out_dir).map_err(|e| CrawlError::io(out_dir, e))?;

    let mut written = Vec::new();
    for (state, rows) in grouped {
        let path = out_dir.join(format!("us-{}.csv", state.to_lowercase()));
        let file = fs::File::create(&path).map_err(|e| CrawlError::io(&path, e))?;
        let mut out = BufWriter::new(file);
        write_row(&mut out, COLUMNS, SEP).map_err(|e| CrawlError::io(&path, e))?;
        for row in &rows {
            write_row(&mut out, row.as_slice(), SEP).map_err(|e| CrawlError::io(&path, e))?;
        }
        out.flush().map_err(|e| CrawlError::io(&path, e))?;
        info!("Writing {} rows to {}", rows.len(), path.display());
        written.push(StateFile {
            state,
            path,
            rows: rows.len(),
        });
    }

    Ok(written)
}

/// state_id → rows projected onto `COLUMNS`, values trimmed.
fn group_by_state(text: &str) -> std::result::Result<BTreeMap<String, Vec<Vec<String>>>, String> {
    let mut rows = parse_rows(text, SEP).into_iter();
    let header: Vec<String> = rows
        .next()
        .ok_or("empty file")?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let index: Vec<Option<usize>> = COLUMNS
        .iter()
        .map(|c| header.iter().position(|h| h == c))
        .collect();
    let col = |name: &str| {
        COLUMNS
            .iter()
            .position(|c| *c == name)
            .and_then(|i| index[i])
    };
    let name_col = col("name").ok_or("no name column")?;
    let state_col = col("state_id").ok_or("no state_id column")?;

    let mut by_state: BTreeMap<String, Vec<Vec<String>>> = BTreeMap::new();
    for (i, row) in rows.enumerate() {
        let line = i + 2;
        let value = |c: usize| row.get(c).map(|v| v.trim()).unwrap_or("");
        let name = value(name_col);
        let state = value(state_col);

        if is_blank(name) {
            warn!("Row {}: empty name, skipping", line);
            continue;
        }
        if is_blank(state) {
            debug!("Row {}: no state for '{}', skipping", line, name);
            continue;
        }

        let projected = index
            .iter()
            .map(|c| c.map_or("", &value).to_string())
            .collect();
        by_state.entry(state.to_string()).or_default().push(projected);
    }

    Ok(by_state)
}

fn is_blank(value: &str) -> bool {
    value.is_empty() || value == "None"
}

// ── Tests ──

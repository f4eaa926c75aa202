use std::path::Path;
use std::sync::Arc;

// ---

use howl_domain::{HowlError, Result};

// ---------------------------------------------------------------------------
// load_phrases
// ---------------------------------------------------------------------------

/// Read the talk phrase file: one phrase per line, blank lines skipped.
///
/// Loaded once and shared by every agent; an empty file is a config error
/// since `talk` would have nothing to say.
pub fn load_phrases(path: &Path) -> Result<Arc<[String]>> {
    // ---
    let text = std::fs::read_to_string(path).map_err(|e| {
        HowlError::Config(format!("cannot read phrase file {}: {e}", path.display()))
    })?;

    let phrases: Arc<[String]> = text
        .lines()
        .map(str::trim_end)
        .filter(|line| !line.trim().is_empty())
        .map(str::to_string)
        .collect();

    if phrases.is_empty() {
        return Err(HowlError::Config(format!(
            "phrase file {} has no phrases",
            path.display()
        )));
    }
    Ok(phrases)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

//! Agent identifier parsing and canonical formatting.
//!
//! The server names participants `Agent[NN]`. Vote-style replies must be
//! rendered in exactly that shape, so any roster entry is reduced to its
//! embedded decimal index and re-rendered:
//!
//! ```text
//! "Agent[7]" ─extract_index→ 7 ─canonical_name→ "Agent[07]"
//! ```

use super::error::{HowlError, Result};

// ---

/// Parse the first run of decimal digits in `id`.
///
/// Returns [`HowlError::Identity`] when `id` contains no digits or the
/// digits overflow a `u32`.
pub fn extract_index(id: &str) -> Result<u32> {
    // ---
    let start = id
        .find(|c: char| c.is_ascii_digit())
        .ok_or_else(|| HowlError::Identity(id.to_string()))?;

    let digits = &id[start..];
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());

    digits[..end]
        .parse()
        .map_err(|_| HowlError::Identity(id.to_string()))
}

// ---

/// Render an index as the server's two-digit, zero-padded identifier.
pub fn canonical_name(index: u32) -> String {
    format!("Agent[{index:02}]")
}

// ---

/// `canonical_name(extract_index(id))`.
pub fn canonicalize(id: &str) -> Result<String> {
    extract_index(id).map(canonical_name)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    // ---
    use super::*;

    #[test]
    fn extracts_first_digit_run() {
        assert_eq!(extract_index("Agent[03]").unwrap(), 3);
        assert_eq!(extract_index("Agent[12]").unwrap(), 12);
        assert_eq!(extract_index("kanolab7-v2").unwrap(), 7);
    }

    #[test]
    fn no_digits_is_an_error() {
        let err = extract_index("Agent[]").unwrap_err();
        assert!(matches!(err, HowlError::Identity(ref s) if s == "Agent[]"));
    }

    #[test]
    fn overflow_is_an_error() {
        assert!(extract_index("Agent[99999999999]").is_err());
    }

    #[test]
    fn canonical_is_zero_padded() {
        assert_eq!(canonical_name(7), "Agent[07]");
        assert_eq!(canonical_name(0), "Agent[00]");
        assert_eq!(canonical_name(42), "Agent[42]");
    }

    /// name → index → canonical name is stable for every two-digit index,
    /// whatever padding the source identifier used.
    #[test]
    fn round_trip_is_stable() {
        for n in 0..=99u32 {
            for id in [format!("Agent[{n}]"), format!("Agent[{n:02}]"), format!("p{n}")] {
                let once = canonicalize(&id).unwrap();
                let twice = canonicalize(&canonical_name(extract_index(&id).unwrap())).unwrap();
                assert_eq!(once, twice, "unstable for {id}");
                assert_eq!(extract_index(&once).unwrap(), n);
            }
        }
    }
}

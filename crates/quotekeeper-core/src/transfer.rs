//! JSON export and import of the full quote sequence.

use serde::Deserialize;
use thiserror::Error;

use crate::Quote;

#[derive(Error, Debug)]
pub enum ImportError {
    /// The document was not valid JSON at all.
    #[error("invalid JSON: {0}")]
    Parse(#[from] serde_json::Error),
    /// Valid JSON, but the top-level value was not an array.
    #[error("import payload must be a JSON array of quotes")]
    NotAnArray,
}

/// Serialize the sequence as a pretty-printed UTF-8 JSON array.
///
/// Key order is stable: `text` before `category`, fixed by the field order
/// of [`Quote`].
pub fn export_json(quotes: &[Quote]) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(quotes)
}

/// Raw shape of one imported entry. Unknown keys are ignored.
#[derive(Debug, Deserialize)]
struct RawEntry {
    #[serde(default)]
    text: String,
    #[serde(default)]
    category: String,
}

/// Parse a JSON document into quotes.
///
/// The top-level value must be an array; anything else is rejected wholesale
/// and the caller's store stays untouched. Malformed individual entries
/// (non-objects, or entries whose `text`/`category` are missing or empty
/// after trimming) are skipped, not fatal.
pub fn import_json(raw: &str) -> Result<Vec<Quote>, ImportError> {
    let value: serde_json::Value = serde_json::from_str(raw)?;
    let items = value.as_array().ok_or(ImportError::NotAnArray)?;

    let mut quotes = Vec::new();
    let mut skipped = 0usize;
    for item in items {
        let Ok(entry) = serde_json::from_value::<RawEntry>(item.clone()) else {
            skipped += 1;
            continue;
        };
        let text = entry.text.trim();
        let category = entry.category.trim();
        if text.is_empty() || category.is_empty() {
            skipped += 1;
            continue;
        }
        quotes.push(Quote::new(text, category));
    }
    if skipped > 0 {
        tracing::warn!(skipped, "skipped malformed import entries");
    }
    Ok(quotes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn export_is_pretty_with_stable_key_order() {
        let quotes = vec![Quote::new("A", "B")];
        let out = export_json(&quotes).unwrap();
        let text_pos = out.find("\"text\"").unwrap();
        let cat_pos = out.find("\"category\"").unwrap();
        assert!(text_pos < cat_pos);
        assert!(out.contains('\n'));
    }

    #[test]
    fn round_trip_preserves_the_quote_set() {
        let quotes = vec![
            Quote::new("Stay hungry, stay foolish.", "Inspiration"),
            Quote::new("Talk is cheap.", "Programming"),
        ];
        let exported = export_json(&quotes).unwrap();
        let imported = import_json(&exported).unwrap();
        assert_eq!(imported, quotes);
    }

    #[test]
    fn import_rejects_non_array() {
        assert!(matches!(
            import_json("{\"text\": \"A\"}"),
            Err(ImportError::NotAnArray)
        ));
        assert!(matches!(import_json("not json"), Err(ImportError::Parse(_))));
    }

    #[test]
    fn import_skips_malformed_entries() {
        let raw = r#"[
            {"text": "A", "category": "B"},
            {"text": "", "category": "C"},
            {"category": "D"},
            42,
            {"text": "E", "category": "F", "extra": true}
        ]"#;
        let imported = import_json(raw).unwrap();
        assert_eq!(
            imported,
            vec![Quote::new("A", "B"), Quote::new("E", "F")]
        );
    }

    #[test]
    fn import_empty_array_is_ok() {
        assert!(import_json("[]").unwrap().is_empty());
    }
}

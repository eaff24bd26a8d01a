//! # Persistence — Loading the Lexicon
//!
//! The lexicon is the only file the engine reads. Without
//! `KAI_LEXICON_PATH` the document embedded at compile time
//! (`data/lexicon.json`) is used.
//!
//! Escalation records and tracker state are deliberately kept in memory:
//! a restart starts every user from `NONE`.

use std::path::Path;

use anyhow::{Context, Result};

use crate::core::Lexicon;

/// Loads and validates the lexicon. Any failure is fatal for the caller.
pub fn load_lexicon(path: Option<&Path>) -> Result<Lexicon> {
    let Some(path) = path else {
        let lexicon = Lexicon::builtin().context("Built-in lexicon is invalid")?;
        tracing::info!(entries = lexicon.len(), version = lexicon.version(), "Using built-in lexicon");
        return Ok(lexicon);
    };

    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read lexicon file {}", path.display()))?;
    let lexicon = Lexicon::from_json(&json)
        .with_context(|| format!("Lexicon file {} is invalid", path.display()))?;
    tracing::info!(
        path = %path.display(),
        entries = lexicon.len(),
        version = lexicon.version(),
        "Lexicon loaded from disk"
    );
    Ok(lexicon)
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    fn temp_file(name: &str, contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("kai-{}-{}", std::process::id(), name));
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn builtin_is_used_without_a_path() {
        let lexicon = load_lexicon(None).unwrap();
        assert!(lexicon.get("headache").is_some());
    }

    #[test]
    fn file_on_disk_is_loaded() {
        let path = temp_file(
            "ok.json",
            r#"{ "version": 7, "entries": [
                { "key": "cough", "urgency": "routine",
                  "advice": { "en": "Drink warm fluids.", "kri": "Drink wam wata." },
                  "variants": ["kof"] } ] }"#,
        );
        let lexicon = load_lexicon(Some(&path)).unwrap();
        assert_eq!(lexicon.version(), 7);
        assert_eq!(lexicon.len(), 1);
        std::fs::remove_file(path).ok();
    }

    #[test]
    fn missing_file_names_the_path() {
        let err = load_lexicon(Some(Path::new("/nonexistent/kai/lexicon.json"))).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/kai/lexicon.json"));
    }

    #[test]
    fn invalid_document_is_fatal() {
        let path = temp_file("bad.json", r#"{ "version": 1, "entries": [] }"#);
        assert!(load_lexicon(Some(&path)).is_err());
        std::fs::remove_file(path).ok();
    }
}

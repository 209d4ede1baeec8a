use std::fs;
use std::path::Path;

use anyhow::Context;
use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;

/// The output document: `{ "terms": [ ... ] }`.
#[derive(Clone, Debug, Serialize)]
pub struct YagtDictionary {
    pub terms: Vec<YagtTerm>,
}

/// One converted dictionary entry. Serialized as a flat object: the
/// pattern key, a singular `sourceLanguage` while exactly one source
/// language contributed (a `sourceLanguages` array otherwise), one field
/// per target language, and the comment when present.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct YagtTerm {
    pub pattern: String,
    pub source_languages: Vec<String>,
    pub translations: Vec<(String, String)>,
    pub comment: Option<String>,
}

impl Serialize for YagtTerm {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry("pattern", &self.pattern)?;
        if self.source_languages.len() == 1 {
            map.serialize_entry("sourceLanguage", &self.source_languages[0])?;
        } else if !self.source_languages.is_empty() {
            map.serialize_entry("sourceLanguages", &self.source_languages)?;
        }
        for (language, text) in &self.translations {
            map.serialize_entry(language, text)?;
        }
        if let Some(comment) = &self.comment {
            map.serialize_entry("comment", comment)?;
        }
        map.end()
    }
}

/// Pretty-printed (2-space indent) UTF-8 JSON.
pub fn write_yagt_dictionary(path: &Path, dict: &YagtDictionary) -> anyhow::Result<()> {
    let bytes = serde_json::to_vec_pretty(dict).context("serialize yagt dictionary")?;
    fs::write(path, bytes)
        .with_context(|| format!("write yagt dictionary: {}", path.display()))?;
    Ok(())
}

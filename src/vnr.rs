use std::fs;
use std::path::Path;

use anyhow::Context;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

/// One `<term>` record from a VNR shared-dictionary export, as read.
/// Fields may arrive as attributes or as singular child elements; a child
/// element overrides a same-named attribute.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct VnrTerm {
    pub source_language: String,
    pub language: String,
    pub text: String,
    pub pattern: String,
    pub term_type: String,
    pub regex: Option<String>,
    pub comment: Option<String>,
}

pub fn load_vnr_terms(path: &Path) -> anyhow::Result<Vec<VnrTerm>> {
    let bytes = fs::read(path)
        .with_context(|| format!("read source dictionary: {}", path.display()))?;
    let xml = decode_xml_bytes(&bytes);
    parse_vnr_terms(&xml).with_context(|| format!("parse source dictionary: {}", path.display()))
}

/// VNR exports in the wild are UTF-8 or UTF-16 with a BOM.
fn decode_xml_bytes(bytes: &[u8]) -> String {
    match encoding_rs::Encoding::for_bom(bytes) {
        Some((encoding, bom_len)) => encoding
            .decode_without_bom_handling(&bytes[bom_len..])
            .0
            .into_owned(),
        None => String::from_utf8_lossy(bytes).into_owned(),
    }
}

fn parse_vnr_terms(xml: &str) -> anyhow::Result<Vec<VnrTerm>> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut terms: Vec<VnrTerm> = Vec::new();
    let mut stack: Vec<String> = Vec::new();
    let mut current: Option<VnrTerm> = None;
    // Active direct child of <term> whose text is being captured.
    let mut field: Option<String> = None;
    let mut field_depth = 0usize;
    let mut field_text = String::new();

    loop {
        match reader.read_event().context("read xml event")? {
            Event::Eof => break,
            Event::Start(s) => {
                let name = bytes_to_string(s.name().as_ref());
                let parent = stack.last().map(|s| s.as_str()).unwrap_or("");
                if name == "term" && parent == "terms" {
                    current = Some(term_from_attrs(&s)?);
                } else if current.is_some() && parent == "term" {
                    field = Some(name.clone());
                    field_depth = stack.len() + 1;
                    field_text.clear();
                }
                stack.push(name);
            }
            Event::Empty(s) => {
                let name = bytes_to_string(s.name().as_ref());
                let parent = stack.last().map(|s| s.as_str()).unwrap_or("");
                if name == "term" && parent == "terms" {
                    terms.push(term_from_attrs(&s)?);
                } else if parent == "term" {
                    if let Some(term) = current.as_mut() {
                        set_field(term, &name, "");
                    }
                }
            }
            Event::Text(t) => {
                // Only the immediate text of the field element; nested
                // markup inside a field is not interpreted.
                if field.is_some() && stack.len() == field_depth {
                    field_text.push_str(&t.unescape().context("unescape text")?);
                }
            }
            Event::CData(t) => {
                if field.is_some() && stack.len() == field_depth {
                    field_text.push_str(&bytes_to_string(t.into_inner()));
                }
            }
            Event::End(e) => {
                let name = bytes_to_string(e.name().as_ref());
                let _ = stack.pop();
                if field.as_deref() == Some(name.as_str()) && stack.len() + 1 == field_depth {
                    if let Some(term) = current.as_mut() {
                        set_field(term, &name, &field_text);
                    }
                    field = None;
                } else if name == "term" {
                    if let Some(term) = current.take() {
                        terms.push(term);
                    }
                    field = None;
                }
            }
            _ => {}
        }
    }

    Ok(terms)
}

fn term_from_attrs(start: &BytesStart<'_>) -> anyhow::Result<VnrTerm> {
    let mut term = VnrTerm::default();
    for a in start.attributes() {
        let a = a.context("attr")?;
        let key = bytes_to_string(a.key.as_ref());
        let val = a.unescape_value().context("attr value")?.into_owned();
        set_field(&mut term, &key, &val);
    }
    Ok(term)
}

fn set_field(term: &mut VnrTerm, name: &str, value: &str) {
    match name {
        "sourceLanguage" => term.source_language = value.to_string(),
        "language" => term.language = value.to_string(),
        "text" => term.text = value.to_string(),
        "pattern" => term.pattern = value.to_string(),
        "type" => term.term_type = value.to_string(),
        "regex" => term.regex = Some(value.to_string()),
        "comment" => term.comment = Some(value.to_string()),
        _ => {}
    }
}

fn bytes_to_string(bytes: impl AsRef<[u8]>) -> String {
    String::from_utf8_lossy(bytes.as_ref()).into_owned()
}

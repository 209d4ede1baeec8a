use std::path::Path;

use regex::Regex;

use crate::mapper;
use crate::progress::ConsoleProgress;
use crate::vnr;
use crate::yagt::{self, YagtDictionary};

#[derive(Clone, Copy, Debug)]
pub struct ConvertStats {
    pub terms_read: usize,
    pub terms_dropped: usize,
    pub patterns_written: usize,
}

/// The whole pipeline: load the VNR export, map terms, write the YAGT
/// dictionary. Every error is fatal to the run; there is no partial
/// output.
pub fn convert_dictionary(
    source: &Path,
    output: &Path,
    progress: &ConsoleProgress,
) -> anyhow::Result<ConvertStats> {
    progress.info(format!("reading {}", source.display()));
    let terms = vnr::load_vnr_terms(source)?;

    warn_on_invalid_regex(&terms, progress);

    let mapped = mapper::map_terms(&terms);
    let stats = ConvertStats {
        terms_read: terms.len(),
        terms_dropped: terms.iter().filter(|t| !mapper::is_eligible(t)).count(),
        patterns_written: mapped.len(),
    };

    yagt::write_yagt_dictionary(output, &YagtDictionary { terms: mapped })?;
    progress.info(format!(
        "{} terms read, {} dropped by the filter, {} patterns written to {}",
        stats.terms_read,
        stats.terms_dropped,
        stats.patterns_written,
        output.display()
    ));
    Ok(stats)
}

/// A regex-flagged pattern that does not compile is still converted (the
/// consuming tool owns regex semantics), but it is almost always an
/// authoring mistake worth flagging.
fn warn_on_invalid_regex(terms: &[vnr::VnrTerm], progress: &ConsoleProgress) {
    for term in terms {
        if term.regex.as_deref() != Some("true") || !mapper::is_eligible(term) {
            continue;
        }
        if Regex::new(&term.pattern).is_err() {
            progress.warn(format!(
                "pattern {:?} is flagged as a regex but does not compile",
                term.pattern
            ));
        }
    }
}

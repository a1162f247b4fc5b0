//! Remote package catalog: descriptor types and index parsing.
//!
//! The package index is a JSON array of objects. Each useful entry carries a
//! `code` of the form `translate-{from}_{to}` and a `package_version`; the
//! downloadable archive name is derived from both.

use std::cmp::Ordering;
use std::fmt;

use log::debug;
use serde::Deserialize;

use crate::error::{UotError, UotResult};

/// File extension of model archives.
pub const MODEL_EXTENSION: &str = "argosmodel";

/// Package code prefix marking a translation model.
pub const TRANSLATE_PREFIX: &str = "translate-";

/// A source/target language code pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LanguagePair {
    pub from: String,
    pub to: String,
}

impl LanguagePair {
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
        }
    }
}

impl fmt::Display for LanguagePair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.from, self.to)
    }
}

/// One entry of the remote package index.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelDescriptor {
    /// Languages the model translates between.
    pub pair: LanguagePair,

    /// Package code, e.g. `translate-en_sk`.
    pub code: String,

    /// Package version, e.g. `1.9`.
    pub package_version: String,
}

impl ModelDescriptor {
    /// Archive filename: `{code}-{version with '.' as '_'}.argosmodel`.
    pub fn filename(&self) -> String {
        format!(
            "{}-{}.{}",
            self.code,
            self.package_version.replace('.', "_"),
            MODEL_EXTENSION
        )
    }

    /// Download URL under `base` (which ends with a slash).
    pub fn url(&self, base: &str) -> String {
        format!("{}{}", base, self.filename())
    }
}

impl fmt::Display for ModelDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} v{}", self.pair, self.package_version)
    }
}

/// Parsed package index plus the number of entries that were skipped.
#[derive(Debug, Default)]
pub struct Catalog {
    pub models: Vec<ModelDescriptor>,
    pub skipped: usize,
}

/// Raw JSON shape of one index entry. Unknown fields are ignored.
#[derive(Debug, Deserialize)]
struct RawEntry {
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    package_version: Option<String>,
}

/// Parse the raw index body.
///
/// The envelope contract is strict: anything that is not a JSON array of
/// objects is [`UotError::IndexFormat`]. Individual entries missing a code
/// or version, or whose code is not a translation pair, are skipped and
/// counted instead of failing the whole catalog.
pub fn parse_catalog(body: &[u8]) -> UotResult<Catalog> {
    let entries: Vec<RawEntry> = serde_json::from_slice(body).map_err(|e| UotError::IndexFormat {
        reason: e.to_string(),
    })?;

    let mut models = Vec::new();
    let mut skipped = 0usize;

    for entry in entries {
        match descriptor_from_entry(&entry) {
            Some(descriptor) => models.push(descriptor),
            None => {
                debug!("skipping index entry without usable code/version: {:?}", entry);
                skipped += 1;
            }
        }
    }

    Ok(Catalog { models, skipped })
}

fn descriptor_from_entry(entry: &RawEntry) -> Option<ModelDescriptor> {
    let code = entry.code.as_deref().filter(|c| !c.is_empty())?;
    let version = entry.package_version.as_deref().filter(|v| !v.is_empty())?;
    let pair = parse_pair_code(code)?;

    Some(ModelDescriptor {
        pair,
        code: code.to_string(),
        package_version: version.to_string(),
    })
}

/// Parse `translate-{from}_{to}` into a pair.
pub fn parse_pair_code(code: &str) -> Option<LanguagePair> {
    let rest = code.strip_prefix(TRANSLATE_PREFIX)?;
    let (from, to) = rest.split_once('_')?;
    if from.is_empty() || to.is_empty() {
        return None;
    }
    Some(LanguagePair::new(from, to))
}

/// Compare dotted version strings component-wise, numerically where both
/// components parse and lexically otherwise.
pub fn compare_versions(a: &str, b: &str) -> Ordering {
    let mut left = a.split('.');
    let mut right = b.split('.');
    loop {
        match (left.next(), right.next()) {
            (None, None) => return Ordering::Equal,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(x), Some(y)) => {
                let ord = match (x.parse::<u64>(), y.parse::<u64>()) {
                    (Ok(xn), Ok(yn)) => xn.cmp(&yn),
                    _ => x.cmp(y),
                };
                if ord != Ordering::Equal {
                    return ord;
                }
            }
        }
    }
}

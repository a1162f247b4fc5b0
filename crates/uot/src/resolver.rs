//! Language-pair path resolution.
//!
//! Pure functions over an [`InstalledModels`] set; no I/O happens here,
//! which keeps route selection trivially testable.

use crate::catalog::LanguagePair;
use crate::error::{UotError, UotResult};
use crate::store::{InstalledModel, InstalledModels};

/// An ordered sequence of translation hops.
///
/// Zero hops means source and target are the same language and text passes
/// through unchanged. One hop is a direct model, two hops a pivot route.
#[derive(Debug, Clone, PartialEq)]
pub struct TranslationPath {
    hops: Vec<InstalledModel>,
}

impl TranslationPath {
    fn identity() -> Self {
        Self { hops: Vec::new() }
    }

    fn direct(model: InstalledModel) -> Self {
        Self { hops: vec![model] }
    }

    fn pivot(first: InstalledModel, second: InstalledModel) -> Self {
        Self {
            hops: vec![first, second],
        }
    }

    pub fn hops(&self) -> &[InstalledModel] {
        &self.hops
    }

    pub fn is_identity(&self) -> bool {
        self.hops.is_empty()
    }

    pub fn is_pivot(&self) -> bool {
        self.hops.len() == 2
    }

    /// Human-readable route, e.g. `en -> fr -> sk`.
    pub fn describe(&self) -> String {
        match self.hops.as_slice() {
            [] => "identity".to_string(),
            hops => {
                let mut parts = vec![hops[0].pair.from.clone()];
                for hop in hops {
                    parts.push(hop.pair.to.clone());
                }
                parts.join(" -> ")
            }
        }
    }
}

/// Resolve a translation path from `from` to `to` over the installed set.
///
/// Preference order: identity, direct model, two-hop pivot. Among several
/// viable pivots the lexicographically smallest pivot code wins, so the
/// same store always yields the same route.
pub fn resolve(models: &InstalledModels, from: &str, to: &str) -> UotResult<TranslationPath> {
    if from == to {
        return Ok(TranslationPath::identity());
    }

    if let Some(direct) = models.get(&LanguagePair::new(from, to)) {
        return Ok(TranslationPath::direct(direct.clone()));
    }

    let mut candidates: Vec<(&InstalledModel, &InstalledModel)> = Vec::new();
    for first in models.iter() {
        if first.pair.from != from {
            continue;
        }
        let second_pair = LanguagePair::new(first.pair.to.as_str(), to);
        if let Some(second) = models.get(&second_pair) {
            candidates.push((first, second));
        }
    }
    candidates.sort_by(|a, b| a.0.pair.to.cmp(&b.0.pair.to));

    if let Some((first, second)) = candidates.first() {
        return Ok(TranslationPath::pivot((*first).clone(), (*second).clone()));
    }

    Err(UotError::NoPath {
        from: from.to_string(),
        to: to.to_string(),
    })
}

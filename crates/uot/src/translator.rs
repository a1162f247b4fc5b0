//! High-level translation API.
//!
//! `Translator` ties the store, the resolver and an engine together: it
//! resolves a path for each request and runs the hops in order.
//!
//! # Quick Start
//!
//! ```ignore
//! use uot::{ModelStore, ProcessEngine, Translator};
//!
//! let store = ModelStore::from_env();
//! let engine = ProcessEngine::from_env(store.root());
//! let translator = Translator::new(store, engine);
//! let slovak = translator.translate("en", "sk", "Hello, how are you?")?;
//! ```

use std::time::Instant;

use log::{debug, info};

use crate::engine::TranslationEngine;
use crate::error::{UotError, UotResult};
use crate::resolver::{TranslationPath, resolve};
use crate::store::ModelStore;

/// Offline translator over a model store and an engine.
pub struct Translator<E> {
    store: ModelStore,
    engine: E,
}

impl<E: TranslationEngine> Translator<E> {
    pub fn new(store: ModelStore, engine: E) -> Self {
        Self { store, engine }
    }

    pub fn store(&self) -> &ModelStore {
        &self.store
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// Translate text between two language codes.
    ///
    /// Both codes must appear in at least one installed model; the route is
    /// then a direct model or a two-hop pivot. Either the whole chain
    /// succeeds or an error is returned, never partial output.
    pub fn translate(&self, from: &str, to: &str, text: &str) -> UotResult<String> {
        if text.trim().is_empty() {
            return Err(UotError::EmptyInput);
        }

        let start = Instant::now();
        let models = self.store.installed()?;

        for code in [from, to] {
            if !models.knows_code(code) {
                return Err(UotError::UnknownLanguage {
                    code: code.to_string(),
                    available: match models.known_codes().as_slice() {
                        [] => "none".to_string(),
                        codes => codes.join(", "),
                    },
                });
            }
        }

        let path = resolve(&models, from, to)?;
        if path.is_identity() {
            info!("'{}' and '{}' are the same language, passing text through", from, to);
            return Ok(text.to_string());
        }

        info!("translating via {}", path.describe());
        let result = run_path(&self.engine, &path, text)?;

        info!(
            "translation complete: {} -> {} chars in {:.2}s",
            text.len(),
            result.len(),
            start.elapsed().as_secs_f32()
        );
        Ok(result)
    }
}

/// Run every hop of a path in order, feeding each hop's output to the next.
///
/// A failing hop aborts the whole run with its 1-based position; no partial
/// output is returned. The identity path echoes the input.
pub fn run_path<E: TranslationEngine>(
    engine: &E,
    path: &TranslationPath,
    text: &str,
) -> UotResult<String> {
    let hops = path.hops();
    let mut current = text.to_string();
    for (i, hop) in hops.iter().enumerate() {
        debug!("hop {}/{}: {} (v{})", i + 1, hops.len(), hop.pair, hop.version);
        current = engine
            .translate(hop, &current)
            .map_err(|source| UotError::Engine {
                hop: i + 1,
                of: hops.len(),
                pair: hop.pair.clone(),
                source,
            })?;
    }
    Ok(current)
}

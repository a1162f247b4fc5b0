//! uot: Universal Offline Translator core library.
//!
//! Translates text between natural languages using locally installed model
//! archives, with no network access at translation time. The network is
//! touched only when installing models from the remote package index.
//!
//! When no direct model connects two languages, translation pivots through
//! an intermediate language (two hops).
//!
//! # Quick Start
//!
//! ```ignore
//! use uot::{ModelStore, ProcessEngine, Translator};
//!
//! let store = ModelStore::from_env();
//! let engine = ProcessEngine::from_env(store.root());
//! let translator = Translator::new(store, engine);
//!
//! let slovak = translator.translate("en", "sk", "Hello, how are you?")?;
//! ```
//!
//! Installing models:
//!
//! ```ignore
//! use uot::{IndexClient, ModelStore};
//!
//! let store = ModelStore::from_env();
//! let client = IndexClient::new()?;
//! let catalog = client.fetch_catalog().await?;
//! for descriptor in &catalog.models {
//!     if !store.contains(descriptor) {
//!         let bytes = client.download(descriptor).await?;
//!         store.install(descriptor, &bytes)?;
//!     }
//! }
//! ```

pub mod catalog;
pub mod engine;
pub mod error;
pub mod index;
pub mod languages;
pub mod resolver;
pub mod store;
pub mod translator;

pub use catalog::{Catalog, LanguagePair, ModelDescriptor, compare_versions, parse_catalog};
pub use engine::{DEFAULT_ENGINE, ENGINE_ENV, ProcessEngine, TranslationEngine};
pub use error::{UotError, UotResult};
pub use index::{DEFAULT_BASE_URL, DEFAULT_INDEX_URL, IndexClient};
pub use resolver::{TranslationPath, resolve};
pub use store::{
    DEFAULT_MODELS_DIR, InstalledModel, InstalledModels, MODELS_DIR_ENV, ModelStore,
};
pub use translator::{Translator, run_path};

/// Returns the version of the uot crate.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

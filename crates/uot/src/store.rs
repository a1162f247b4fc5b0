//! Local model store.
//!
//! A store is one directory of `.argosmodel` archives. Everything else in
//! the directory is ignored, so interrupted downloads (kept under a `.part`
//! name until complete) are never visible as installed models.

use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::fs;
use std::io;
use std::io::Write;
use std::path::{Path, PathBuf};

use log::debug;

use crate::catalog::{
    LanguagePair, MODEL_EXTENSION, ModelDescriptor, TRANSLATE_PREFIX, compare_versions,
};
use crate::error::{UotError, UotResult};

/// Environment variable overriding the model directory.
pub const MODELS_DIR_ENV: &str = "UOT_MODELS_DIR";

/// Model directory used when the environment variable is not set.
pub const DEFAULT_MODELS_DIR: &str = "models";

const PART_SUFFIX: &str = ".part";

/// One model archive present on disk.
#[derive(Debug, Clone, PartialEq)]
pub struct InstalledModel {
    pub pair: LanguagePair,
    pub version: String,
    pub path: PathBuf,
}

impl InstalledModel {
    /// Parse a `translate-{from}_{to}-{ver}.argosmodel` path. Underscores in
    /// the version segment stand for dots. Returns `None` for anything that
    /// does not match the naming scheme.
    pub fn from_path(path: &Path) -> Option<Self> {
        let name = path.file_name()?.to_str()?;
        let suffix = format!(".{}", MODEL_EXTENSION);
        let stem = name.strip_suffix(suffix.as_str())?;
        let rest = stem.strip_prefix(TRANSLATE_PREFIX)?;
        let (from, tail) = rest.split_once('_')?;
        let (to, version) = tail.split_once('-')?;
        if from.is_empty() || to.is_empty() || version.is_empty() {
            return None;
        }
        Some(Self {
            pair: LanguagePair::new(from, to),
            version: version.replace('_', "."),
            path: path.to_path_buf(),
        })
    }
}

/// On-disk model store rooted at a single directory.
#[derive(Debug, Clone)]
pub struct ModelStore {
    root: PathBuf,
}

impl ModelStore {
    // =========================================================================
    // Construction
    // =========================================================================

    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Store at `$UOT_MODELS_DIR`, or `models` when unset.
    pub fn from_env() -> Self {
        match std::env::var(MODELS_DIR_ENV) {
            Ok(dir) if !dir.is_empty() => Self::new(dir),
            _ => Self::new(DEFAULT_MODELS_DIR),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    // =========================================================================
    // Inspection
    // =========================================================================

    /// Enumerate installed models, sorted by pair then version.
    ///
    /// Read-only: a missing root directory is an empty list and nothing is
    /// created. Files that do not follow the archive naming scheme are
    /// skipped.
    pub fn list_installed(&self) -> UotResult<Vec<InstalledModel>> {
        if !self.root.exists() {
            return Ok(Vec::new());
        }

        let entries = fs::read_dir(&self.root).map_err(|e| storage_error(&self.root, e))?;
        let mut models = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| storage_error(&self.root, e))?;
            let path = entry.path();
            if !path.is_file() {
                continue;
            }
            match InstalledModel::from_path(&path) {
                Some(model) => models.push(model),
                None => debug!("ignoring non-model file {}", path.display()),
            }
        }

        models.sort_by(|a, b| {
            a.pair
                .cmp(&b.pair)
                .then_with(|| compare_versions(&a.version, &b.version))
        });
        Ok(models)
    }

    /// Installed models deduplicated to the best version per pair.
    pub fn installed(&self) -> UotResult<InstalledModels> {
        Ok(InstalledModels::from_models(self.list_installed()?))
    }

    /// Whether the exact archive for a descriptor is already present.
    pub fn contains(&self, descriptor: &ModelDescriptor) -> bool {
        self.root.join(descriptor.filename()).exists()
    }

    // =========================================================================
    // Install
    // =========================================================================

    /// Persist a downloaded archive.
    ///
    /// The bytes are staged in a uniquely named `.part` sibling and renamed
    /// into place; the rename is atomic on the same filesystem, so readers
    /// see either no file or the complete file, and concurrent installs of
    /// one descriptor never share a staging file. Creates the root directory
    /// on demand. Returns the final path.
    pub fn install(&self, descriptor: &ModelDescriptor, bytes: &[u8]) -> UotResult<PathBuf> {
        fs::create_dir_all(&self.root).map_err(|e| storage_error(&self.root, e))?;

        let filename = descriptor.filename();
        let final_path = self.root.join(&filename);

        let mut part = tempfile::Builder::new()
            .prefix(filename.as_str())
            .suffix(PART_SUFFIX)
            .tempfile_in(&self.root)
            .map_err(|e| storage_error(&self.root, e))?;
        part.write_all(bytes)
            .map_err(|e| storage_error(part.path(), e))?;
        part.persist(&final_path)
            .map_err(|e| storage_error(&final_path, e.error))?;

        debug!("installed {} ({} bytes)", final_path.display(), bytes.len());
        Ok(final_path)
    }
}

fn storage_error(path: &Path, source: io::Error) -> UotError {
    UotError::Storage {
        path: path.to_path_buf(),
        source,
    }
}

/// Installed models keyed by pair; the highest version per pair wins.
#[derive(Debug, Clone, Default)]
pub struct InstalledModels {
    by_pair: HashMap<LanguagePair, InstalledModel>,
}

impl InstalledModels {
    pub fn from_models(models: Vec<InstalledModel>) -> Self {
        let mut by_pair: HashMap<LanguagePair, InstalledModel> = HashMap::new();
        for model in models {
            match by_pair.entry(model.pair.clone()) {
                Entry::Occupied(mut slot) => {
                    if compare_versions(&model.version, &slot.get().version)
                        == std::cmp::Ordering::Greater
                    {
                        slot.insert(model);
                    }
                }
                Entry::Vacant(slot) => {
                    slot.insert(model);
                }
            }
        }
        Self { by_pair }
    }

    pub fn get(&self, pair: &LanguagePair) -> Option<&InstalledModel> {
        self.by_pair.get(pair)
    }

    pub fn iter(&self) -> impl Iterator<Item = &InstalledModel> {
        self.by_pair.values()
    }

    pub fn len(&self) -> usize {
        self.by_pair.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_pair.is_empty()
    }

    /// Whether a code appears on either side of any installed pair.
    pub fn knows_code(&self, code: &str) -> bool {
        self.by_pair
            .keys()
            .any(|p| p.from == code || p.to == code)
    }

    /// Codes appearing on either side of any installed pair, sorted.
    pub fn known_codes(&self) -> Vec<String> {
        let mut codes: Vec<String> = self
            .by_pair
            .keys()
            .flat_map(|p| [p.from.clone(), p.to.clone()])
            .collect();
        codes.sort_unstable();
        codes.dedup();
        codes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn descriptor(code: &str, version: &str) -> ModelDescriptor {
        ModelDescriptor {
            pair: crate::catalog::parse_pair_code(code).unwrap(),
            code: code.to_string(),
            package_version: version.to_string(),
        }
    }

    fn touch(dir: &Path, name: &str) {
        fs::write(dir.join(name), b"stub").unwrap();
    }

    // =========================================================================
    // InstalledModel::from_path
    // =========================================================================

    #[test]
    fn test_from_path_valid() {
        let model =
            InstalledModel::from_path(Path::new("/m/translate-en_sk-1_9.argosmodel")).unwrap();
        assert_eq!(model.pair, LanguagePair::new("en", "sk"));
        assert_eq!(model.version, "1.9");
    }

    #[test]
    fn test_from_path_rejects_other_files() {
        for name in [
            "readme.txt",
            "translate-en_sk-1_9.argosmodel.part",
            "sbd-en-1_0.argosmodel",
            "translate-en-1_0.argosmodel",
            "translate-en_sk.argosmodel",
            ".argosmodel",
        ] {
            assert!(
                InstalledModel::from_path(Path::new(name)).is_none(),
                "{} should not parse",
                name
            );
        }
    }

    // =========================================================================
    // list_installed
    // =========================================================================

    #[test]
    fn test_list_installed_missing_dir_is_empty() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path().join("missing");
        let store = ModelStore::new(&root);

        assert!(store.list_installed().unwrap().is_empty());
        assert!(!root.exists(), "listing must not create the directory");
    }

    #[test]
    fn test_list_installed_is_idempotent() {
        let tmp = TempDir::new().unwrap();
        touch(tmp.path(), "translate-en_sk-1_9.argosmodel");
        touch(tmp.path(), "translate-sk_en-1_9.argosmodel");
        let store = ModelStore::new(tmp.path());

        let first = store.list_installed().unwrap();
        let second = store.list_installed().unwrap();
        assert_eq!(first, second);
        assert_eq!(first.len(), 2);
    }

    #[test]
    fn test_list_installed_skips_foreign_files() {
        let tmp = TempDir::new().unwrap();
        touch(tmp.path(), "translate-en_sk-1_9.argosmodel");
        touch(tmp.path(), "translate-en_fr-1_9.argosmodel.part");
        touch(tmp.path(), "notes.txt");
        fs::create_dir(tmp.path().join("subdir")).unwrap();
        let store = ModelStore::new(tmp.path());

        let models = store.list_installed().unwrap();
        assert_eq!(models.len(), 1);
        assert_eq!(models[0].pair, LanguagePair::new("en", "sk"));
    }

    #[test]
    fn test_list_installed_sorted() {
        let tmp = TempDir::new().unwrap();
        touch(tmp.path(), "translate-sk_en-1_0.argosmodel");
        touch(tmp.path(), "translate-en_sk-1_9.argosmodel");
        touch(tmp.path(), "translate-en_sk-1_0.argosmodel");
        let store = ModelStore::new(tmp.path());

        let models = store.list_installed().unwrap();
        let keys: Vec<(String, String)> = models
            .iter()
            .map(|m| (m.pair.to_string(), m.version.clone()))
            .collect();
        assert_eq!(
            keys,
            vec![
                ("en -> sk".to_string(), "1.0".to_string()),
                ("en -> sk".to_string(), "1.9".to_string()),
                ("sk -> en".to_string(), "1.0".to_string()),
            ]
        );
    }

    // =========================================================================
    // install
    // =========================================================================

    #[test]
    fn test_install_creates_dir_and_file() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path().join("models");
        let store = ModelStore::new(&root);
        let d = descriptor("translate-en_sk", "1.9");

        let path = store.install(&d, b"archive bytes").unwrap();
        assert_eq!(path, root.join("translate-en_sk-1_9.argosmodel"));
        assert_eq!(fs::read(&path).unwrap(), b"archive bytes");
        assert!(store.contains(&d));
    }

    #[test]
    fn test_install_leaves_no_part_file() {
        let tmp = TempDir::new().unwrap();
        let store = ModelStore::new(tmp.path());
        let d = descriptor("translate-en_sk", "1.9");

        store.install(&d, b"bytes").unwrap();
        let names: Vec<String> = fs::read_dir(tmp.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["translate-en_sk-1_9.argosmodel".to_string()]);
    }

    #[test]
    fn test_install_overwrites_existing() {
        let tmp = TempDir::new().unwrap();
        let store = ModelStore::new(tmp.path());
        let d = descriptor("translate-en_sk", "1.9");

        store.install(&d, b"old").unwrap();
        let path = store.install(&d, b"new").unwrap();
        assert_eq!(fs::read(path).unwrap(), b"new");
    }

    #[test]
    fn test_contains_only_exact_version() {
        let tmp = TempDir::new().unwrap();
        let store = ModelStore::new(tmp.path());
        store.install(&descriptor("translate-en_sk", "1.0"), b"x").unwrap();

        assert!(store.contains(&descriptor("translate-en_sk", "1.0")));
        assert!(!store.contains(&descriptor("translate-en_sk", "1.9")));
    }

    #[test]
    fn test_concurrent_installs_of_same_descriptor() {
        let tmp = TempDir::new().unwrap();
        let store = ModelStore::new(tmp.path());
        let d = descriptor("translate-en_sk", "1.9");

        // Simultaneous writers each stage under their own name, so none
        // can rename away another writer's half-written file.
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let store = store.clone();
                let d = d.clone();
                std::thread::spawn(move || store.install(&d, b"archive bytes"))
            })
            .collect();
        for handle in handles {
            handle.join().unwrap().unwrap();
        }

        let names: Vec<String> = fs::read_dir(tmp.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["translate-en_sk-1_9.argosmodel".to_string()]);
        assert_eq!(
            fs::read(tmp.path().join("translate-en_sk-1_9.argosmodel")).unwrap(),
            b"archive bytes"
        );
    }

    #[test]
    fn test_from_env_override() {
        unsafe {
            std::env::set_var(MODELS_DIR_ENV, "/tmp/uot-test-models");
        }
        let store = ModelStore::from_env();
        unsafe {
            std::env::remove_var(MODELS_DIR_ENV);
        }
        assert_eq!(store.root(), Path::new("/tmp/uot-test-models"));

        let store = ModelStore::from_env();
        assert_eq!(store.root(), Path::new(DEFAULT_MODELS_DIR));
    }

    // =========================================================================
    // InstalledModels
    // =========================================================================

    #[test]
    fn test_installed_models_dedup_keeps_highest_version() {
        let tmp = TempDir::new().unwrap();
        touch(tmp.path(), "translate-en_sk-1_0.argosmodel");
        touch(tmp.path(), "translate-en_sk-1_9.argosmodel");
        let store = ModelStore::new(tmp.path());

        let set = store.installed().unwrap();
        assert_eq!(set.len(), 1);
        let model = set.get(&LanguagePair::new("en", "sk")).unwrap();
        assert_eq!(model.version, "1.9");
    }

    #[test]
    fn test_installed_models_codes() {
        let tmp = TempDir::new().unwrap();
        touch(tmp.path(), "translate-en_sk-1_0.argosmodel");
        touch(tmp.path(), "translate-fr_en-1_0.argosmodel");
        let set = ModelStore::new(tmp.path()).installed().unwrap();

        assert!(set.knows_code("en"));
        assert!(set.knows_code("fr"));
        assert!(set.knows_code("sk"));
        assert!(!set.knows_code("de"));
        assert_eq!(set.known_codes(), vec!["en", "fr", "sk"]);
    }

    #[test]
    fn test_installed_models_empty() {
        let set = InstalledModels::from_models(Vec::new());
        assert!(set.is_empty());
        assert!(set.known_codes().is_empty());
    }
}

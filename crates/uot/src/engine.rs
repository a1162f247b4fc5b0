//! Seam to the external translation engine.
//!
//! The engine owns the actual translation algorithm; this crate only
//! resolves which models to run and in what order. [`ProcessEngine`] is the
//! production adapter; tests substitute their own [`TranslationEngine`].

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::thread;

use anyhow::{Context, Result, anyhow};
use log::debug;

use crate::store::InstalledModel;

/// Environment variable overriding the engine command.
pub const ENGINE_ENV: &str = "UOT_ENGINE";

/// Engine command used when the environment variable is not set.
pub const DEFAULT_ENGINE: &str = "argos-translate";

/// A backend able to translate text through one installed model.
///
/// The invoker drives one call per hop of a resolved path.
pub trait TranslationEngine {
    fn translate(&self, model: &InstalledModel, text: &str) -> Result<String>;
}

/// Engine adapter that spawns an external translator command per hop.
///
/// Contract: the command receives `--from-lang`/`--to-lang`, reads the
/// source text on stdin and writes the translation to stdout. The store
/// directory is exported as `ARGOS_PACKAGES_DIR` so the engine can locate
/// the installed packages. A nonzero exit status is a failure; stderr is
/// carried in the error.
#[derive(Debug, Clone)]
pub struct ProcessEngine {
    program: PathBuf,
    packages_dir: PathBuf,
}

impl ProcessEngine {
    pub fn new(program: impl Into<PathBuf>, packages_dir: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            packages_dir: packages_dir.into(),
        }
    }

    /// Engine from `$UOT_ENGINE`, or `argos-translate` when unset.
    pub fn from_env(packages_dir: impl Into<PathBuf>) -> Self {
        let program = std::env::var(ENGINE_ENV)
            .ok()
            .filter(|p| !p.is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_ENGINE));
        Self::new(program, packages_dir)
    }

    pub fn program(&self) -> &Path {
        &self.program
    }
}

impl TranslationEngine for ProcessEngine {
    fn translate(&self, model: &InstalledModel, text: &str) -> Result<String> {
        debug!(
            "spawning {} for {} (v{})",
            self.program.display(),
            model.pair,
            model.version
        );

        let mut child = Command::new(&self.program)
            .arg("--from-lang")
            .arg(&model.pair.from)
            .arg("--to-lang")
            .arg(&model.pair.to)
            .env("ARGOS_PACKAGES_DIR", &self.packages_dir)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .with_context(|| format!("failed to run '{}'", self.program.display()))?;

        let mut stdin = child.stdin.take().context("engine stdin was not captured")?;
        let payload = text.as_bytes().to_vec();
        // Feed stdin from its own thread while wait_with_output drains
        // stdout; writing inline deadlocks once the text outgrows the pipe
        // buffers and the engine streams output back.
        let writer = thread::spawn(move || {
            // Engines that fail early close stdin; their exit status carries
            // the real error, not this write.
            match stdin.write_all(&payload) {
                Err(e) if e.kind() != std::io::ErrorKind::BrokenPipe => Err(e),
                _ => Ok(()),
            }
        });

        let output = child
            .wait_with_output()
            .context("failed to collect engine output")?;
        let wrote = writer
            .join()
            .map_err(|_| anyhow!("engine stdin writer panicked"))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(anyhow!(
                "'{}' exited with {}: {}",
                self.program.display(),
                output.status,
                stderr.trim()
            ));
        }
        wrote.context("failed to write text to engine stdin")?;

        let stdout =
            String::from_utf8(output.stdout).context("engine produced invalid UTF-8 output")?;
        Ok(stdout.trim_end().to_string())
    }
}

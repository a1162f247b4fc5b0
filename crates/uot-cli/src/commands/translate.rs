//! Translate text between two languages.

use anyhow::{Result, bail};
use log::{Level, info, log_enabled};

use uot::{ModelStore, ProcessEngine, Translator};

use super::util::resolve_input;

pub async fn run(
    input_lang: Option<&str>,
    output_lang: Option<&str>,
    text: &[String],
) -> Result<()> {
    let Some(from) = input_lang else {
        bail!("missing input language: pass --il <LANG>");
    };
    let Some(to) = output_lang else {
        bail!("missing output language: pass --ol <LANG>");
    };

    let input = resolve_input(text)?;

    let store = ModelStore::from_env();
    let engine = ProcessEngine::from_env(store.root());
    info!(
        "models: {}, engine: {}",
        store.root().display(),
        engine.program().display()
    );

    let translator = Translator::new(store, engine);
    let translated = translator.translate(from, to, input.trim())?;

    println!("{}", translated);

    if log_enabled!(Level::Info) {
        if let Some(rss) = current_rss() {
            info!("process memory: {:.0} MB", rss as f64 / 1_048_576.0);
        }
    }

    Ok(())
}

/// Current resident set size in bytes, when the platform reports it.
fn current_rss() -> Option<u64> {
    use sysinfo::{ProcessRefreshKind, RefreshKind, System};

    let pid = sysinfo::get_current_pid().ok()?;
    let sys = System::new_with_specifics(
        RefreshKind::new().with_processes(ProcessRefreshKind::new().with_memory()),
    );
    sys.process(pid).map(|p| p.memory())
}

use clap::{ArgAction, Parser};

/// Version banner, credits included.
const VERSION_BANNER: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    "\nUniversal Offline Translator",
    "\nAuthor: Michal Fecko (feckom@gmail.com), https://github.com/feckom/uot.git",
);

/// Universal Offline Translator.
///
/// Translates text between languages using locally installed models; the
/// network is only used by `--im` to install models from the package index.
#[derive(Parser, Debug)]
#[command(name = "uot")]
#[command(about = "Universal Offline Translator: translate text without internet access")]
#[command(version = VERSION_BANNER, disable_version_flag = true)]
pub struct Cli {
    /// Input language code, e.g. en
    #[arg(long = "il", alias = "input-lang", value_name = "LANG")]
    pub input_lang: Option<String>,

    /// Output language code, e.g. sk
    #[arg(long = "ol", alias = "output-lang", value_name = "LANG")]
    pub output_lang: Option<String>,

    /// Verbose diagnostics on stderr (-i for [INFO], -ii for [DEBUG])
    #[arg(short = 'i', long = "info", action = ArgAction::Count)]
    pub verbose: u8,

    /// Print version and author information
    #[arg(short = 'v', long = "version", action = ArgAction::Version)]
    version: Option<bool>,

    /// Download and install all models from the remote package index
    #[arg(long = "im", alias = "install-models")]
    pub install_models: bool,

    /// List installed language pairs
    #[arg(short = 'p', long = "pairs")]
    pub list_pairs: bool,

    /// Text to translate (read from stdin when omitted)
    #[arg(value_name = "TEXT")]
    pub text: Vec<String>,
}

/// Convert the `-i` count to a log level string.
pub fn verbosity_to_log_level(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    }
}

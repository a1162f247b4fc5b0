//! Language code to display name mapping.
//!
//! Covers the languages the public package index publishes models for.
//! Lookup is by ISO-style code; names are used for listings and error
//! messages only, codes remain the canonical identifiers.

use std::collections::HashMap;

use once_cell::sync::Lazy;

/// English display name for a language code, if known.
pub fn language_name(code: &str) -> Option<&'static str> {
    let lower = code.to_lowercase();
    LANGUAGE_NAMES.get(lower.as_str()).copied()
}

/// Display name for a code, falling back to the code itself.
pub fn display_name(code: &str) -> String {
    match language_name(code) {
        Some(name) => name.to_string(),
        None => code.to_string(),
    }
}

static LANGUAGE_NAMES: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    let mut m = HashMap::new();

    m.insert("sq", "Albanian");
    m.insert("ar", "Arabic");
    m.insert("az", "Azerbaijani");
    m.insert("eu", "Basque");
    m.insert("bn", "Bengali");
    m.insert("bg", "Bulgarian");
    m.insert("ca", "Catalan");
    m.insert("zh", "Chinese");
    m.insert("zt", "Chinese (traditional)");
    m.insert("cs", "Czech");
    m.insert("da", "Danish");
    m.insert("nl", "Dutch");
    m.insert("en", "English");
    m.insert("eo", "Esperanto");
    m.insert("et", "Estonian");
    m.insert("fi", "Finnish");
    m.insert("fr", "French");
    m.insert("gl", "Galician");
    m.insert("de", "German");
    m.insert("el", "Greek");
    m.insert("he", "Hebrew");
    m.insert("hi", "Hindi");
    m.insert("hu", "Hungarian");
    m.insert("id", "Indonesian");
    m.insert("ga", "Irish");
    m.insert("it", "Italian");
    m.insert("ja", "Japanese");
    m.insert("ko", "Korean");
    m.insert("lv", "Latvian");
    m.insert("lt", "Lithuanian");
    m.insert("ms", "Malay");
    m.insert("nb", "Norwegian");
    m.insert("fa", "Persian");
    m.insert("pl", "Polish");
    m.insert("pt", "Portuguese");
    m.insert("ro", "Romanian");
    m.insert("ru", "Russian");
    m.insert("sk", "Slovak");
    m.insert("sl", "Slovenian");
    m.insert("es", "Spanish");
    m.insert("sv", "Swedish");
    m.insert("tl", "Tagalog");
    m.insert("th", "Thai");
    m.insert("tr", "Turkish");
    m.insert("uk", "Ukrainian");
    m.insert("ur", "Urdu");

    m
});

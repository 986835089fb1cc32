//! Internationalization for the two languages Tablero ships: English and
//! Spanish (the creative output itself is always requested in Spanish, see
//! [`crate::prompts`] — this module only covers the chrome around it).
//!
//! Translations are simple embedded `key=value` files looked up through the
//! `t!("key")` macro, with English as the fallback. The language can be
//! switched at runtime from the sidebar.

use std::collections::HashMap;
use std::sync::Mutex;

static I18N: Mutex<Option<I18nState>> = Mutex::new(None);

struct I18nState {
    current_lang: String,
    /// lang_code → (key → translated_string)
    translations: HashMap<String, HashMap<String, String>>,
}

/// Supported languages: (code, native_name)
pub const LANGUAGES: &[(&str, &str)] = &[("en", "English"), ("es", "Español")];

/// Load the embedded translation tables. Call once at startup.
pub fn init() {
    let mut translations = HashMap::new();
    translations.insert(
        "en".to_string(),
        parse_translations(include_str!("../locales/en.txt")),
    );
    translations.insert(
        "es".to_string(),
        parse_translations(include_str!("../locales/es.txt")),
    );

    *I18N.lock().unwrap() = Some(I18nState {
        current_lang: "en".to_string(),
        translations,
    });
}

/// Set the active language. Unknown codes fall back to English.
pub fn set_language(code: &str) {
    if let Ok(mut guard) = I18N.lock()
        && let Some(state) = guard.as_mut()
    {
        state.current_lang = if state.translations.contains_key(code) {
            code.to_string()
        } else {
            "en".to_string()
        };
    }
}

/// Current language code ("en" when uninitialized).
pub fn current_language() -> String {
    if let Ok(guard) = I18N.lock()
        && let Some(state) = guard.as_ref()
    {
        return state.current_lang.clone();
    }
    "en".to_string()
}

/// Look up a key in the current language, then English, then return the key
/// itself as a last resort.
pub fn translate(key: &str) -> String {
    if let Ok(guard) = I18N.lock()
        && let Some(state) = guard.as_ref()
    {
        if let Some(val) = state
            .translations
            .get(&state.current_lang)
            .and_then(|map| map.get(key))
        {
            return val.clone();
        }
        if let Some(val) = state.translations.get("en").and_then(|map| map.get(key)) {
            return val.clone();
        }
    }
    key.to_string()
}

/// Best-effort system language from the usual locale environment variables.
pub fn detect_system_language() -> String {
    for var in &["LANG", "LC_ALL", "LC_MESSAGES", "LANGUAGE"] {
        if let Ok(val) = std::env::var(var)
            && let Some(lang) = match_system_locale(&val)
        {
            return lang;
        }
    }
    "en".to_string()
}

/// Match a locale string ("es_CO.UTF-8", "en-US", ...) against [`LANGUAGES`].
fn match_system_locale(locale: &str) -> Option<String> {
    let normalized = locale.to_lowercase().replace('_', "-");
    let lang_part = normalized
        .split(['.', '@'])
        .next()
        .unwrap_or(&normalized);
    let primary = lang_part.split('-').next().unwrap_or(lang_part);

    LANGUAGES
        .iter()
        .find(|(code, _)| *code == primary)
        .map(|(code, _)| code.to_string())
}

/// Parse a `key=value` translation file. `#` lines are comments.
fn parse_translations(data: &str) -> HashMap<String, String> {
    let mut map = HashMap::new();
    for line in data.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        if let Some((key, val)) = line.split_once('=') {
            map.insert(key.trim().to_string(), val.trim().to_string());
        }
    }
    map
}

/// Translation macro. Usage: `t!("sidebar.brush")` or
/// `t!("status.error", detail = msg)`.
#[macro_export]
macro_rules! t {
    ($key:expr) => {
        $crate::i18n::translate($key)
    };
    ($key:expr, $($name:ident = $val:expr),+ $(,)?) => {{
        let mut s = $crate::i18n::translate($key);
        $(
            s = s.replace(concat!("{", stringify!($name), "}"), &format!("{}", $val));
        )+
        s
    }};
}

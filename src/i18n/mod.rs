//! Internationalization: localized UI strings and risk labels.
//!
//! Uses a `t(key, locale)` function for static strings and
//! `risk_label(score, locale)` for risk badges. Lookups fall back from the
//! requested locale to English, then to the key itself, so they never fail.
//! Supported locales: English (fallback), Indonesian, Malay, Thai,
//! Vietnamese, Filipino, Burmese, Khmer, Lao.

mod dictionary;
mod locale;


pub use locale::*;

use finguard_core::analysis::RiskScore;
use std::fmt;
use std::sync::Arc;

/// Return the localized string for `key` in `locale`.
/// Falls back to English, then to `key` verbatim.
pub fn t(key: &str, locale: Locale) -> &str {
    [locale, Locale::DEFAULT]
        .into_iter()
        .filter_map(dictionary::dictionary)
        .find_map(|d| d.get(key))
        .unwrap_or(key)
}

/// Return the localized label for a risk level.
/// Falls back to English, then to the score's own name.
pub fn risk_label(score: RiskScore, locale: Locale) -> &'static str {
    [locale, Locale::DEFAULT]
        .into_iter()
        .filter_map(dictionary::dictionary)
        .find_map(|d| d.risk_label(score))
        .unwrap_or(score.as_str())
}

/// Callback fired when the active locale changes.
pub type LangHook = Arc<dyn Fn(Locale) + Send + Sync>;

/// Session-scoped i18n state: the active locale plus an optional hook that
/// keeps the presentation layer's language marker in sync.
#[derive(Clone)]
pub struct Localizer {
    locale: Locale,
    on_change: Option<LangHook>,
}

impl Localizer {
    pub fn new(locale: Locale) -> Self {
        Self {
            locale,
            on_change: None,
        }
    }

    /// Start in the locale detected from the terminal environment.
    pub fn detect() -> Self {
        Self::new(detect_initial_locale(preferred_languages_from_env()))
    }

    /// Register the language-change hook. It fires once immediately so the
    /// presentation layer starts in sync.
    pub fn with_lang_hook(mut self, hook: LangHook) -> Self {
        hook(self.locale);
        self.on_change = Some(hook);
        self
    }

    pub fn lang(&self) -> Locale {
        self.locale
    }

    /// Switch locale for all later lookups.
    pub fn set_lang(&mut self, locale: Locale) {
        self.locale = locale;
        if let Some(hook) = &self.on_change {
            hook(locale);
        }
    }

    pub fn t<'a>(&self, key: &'a str) -> &'a str {
        t(key, self.locale)
    }

    pub fn risk_label(&self, score: RiskScore) -> &'static str {
        risk_label(score, self.locale)
    }
}

impl Default for Localizer {
    fn default() -> Self {
        Self::new(Locale::DEFAULT)
    }
}

impl fmt::Debug for Localizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Localizer")
            .field("locale", &self.locale)
            .field("on_change", &self.on_change.is_some())
            .finish()
    }
}

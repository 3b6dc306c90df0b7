//! Embedded per-locale string tables.
//!
//! Each locale ships as a TOML file under `locales/`, embedded at compile
//! time and parsed once on first lookup. The table is read-only afterwards.

use finguard_core::analysis::RiskScore;
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::OnceLock;
use tracing::warn;

use super::locale::Locale;

const EN: &str = include_str!("../../locales/en.toml");
const ID: &str = include_str!("../../locales/id.toml");
const MS: &str = include_str!("../../locales/ms.toml");
const TH: &str = include_str!("../../locales/th.toml");
const VI: &str = include_str!("../../locales/vi.toml");
const TL: &str = include_str!("../../locales/tl.toml");
const MY: &str = include_str!("../../locales/my.toml");
const KM: &str = include_str!("../../locales/km.toml");
const LO: &str = include_str!("../../locales/lo.toml");

/// Display labels for the three risk levels.
#[derive(Debug, Default, Deserialize)]
pub(super) struct RiskLabels {
    #[serde(rename = "Low")]
    low: Option<String>,
    #[serde(rename = "Medium")]
    medium: Option<String>,
    #[serde(rename = "High")]
    high: Option<String>,
}

impl RiskLabels {
    fn get(&self, score: RiskScore) -> Option<&str> {
        match score {
            RiskScore::Low => self.low.as_deref(),
            RiskScore::Medium => self.medium.as_deref(),
            RiskScore::High => self.high.as_deref(),
        }
    }
}

/// One locale's strings.
#[derive(Debug, Default, Deserialize)]
pub(super) struct Dictionary {
    #[serde(default)]
    risk_labels: RiskLabels,
    #[serde(flatten)]
    strings: HashMap<String, String>,
}

impl Dictionary {
    pub(super) fn get(&self, key: &str) -> Option<&str> {
        self.strings.get(key).map(String::as_str)
    }

    pub(super) fn risk_label(&self, score: RiskScore) -> Option<&str> {
        self.risk_labels.get(score)
    }

    #[cfg(test)]
    pub(super) fn keys(&self) -> impl Iterator<Item = &str> {
        self.strings.keys().map(String::as_str)
    }

    fn parse(locale: Locale, source: &str) -> Self {
        match toml::from_str(source) {
            Ok(dict) => dict,
            Err(e) => {
                warn!("i18n: dictionary for '{locale}' failed to parse: {e}");
                Self::default()
            }
        }
    }
}

fn source(locale: Locale) -> &'static str {
    match locale {
        Locale::En => EN,
        Locale::Id => ID,
        Locale::Ms => MS,
        Locale::Th => TH,
        Locale::Vi => VI,
        Locale::Tl => TL,
        Locale::My => MY,
        Locale::Km => KM,
        Locale::Lo => LO,
    }
}

static TABLE: OnceLock<HashMap<Locale, Dictionary>> = OnceLock::new();

/// The process-wide dictionary table.
pub(super) fn table() -> &'static HashMap<Locale, Dictionary> {
    TABLE.get_or_init(|| {
        super::LANGUAGES
            .iter()
            .map(|(locale, _)| (*locale, Dictionary::parse(*locale, source(*locale))))
            .collect()
    })
}

/// Dictionary for `locale`. Every locale is registered, so this only misses
/// if the table itself is incomplete.
pub(super) fn dictionary(locale: Locale) -> Option<&'static Dictionary> {
    table().get(&locale)
}

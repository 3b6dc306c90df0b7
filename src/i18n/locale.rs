//! Supported locales and detection from a client's preferred languages.

use std::fmt;

/// UI locale. Each variant has an embedded dictionary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Locale {
    En,
    Id,
    Ms,
    Th,
    Vi,
    Tl,
    My,
    Km,
    Lo,
}

/// Locales in the order they are offered to users, with display labels.
pub const LANGUAGES: [(Locale, &str); 9] = [
    (Locale::Id, "Bahasa Indonesia"),
    (Locale::Ms, "Bahasa Melayu"),
    (Locale::Th, "ไทย (Thai)"),
    (Locale::Vi, "Tiếng Việt"),
    (Locale::Tl, "Filipino"),
    (Locale::My, "မြန်မာ (Burmese)"),
    (Locale::Km, "ភាសាខ្មែរ (Khmer)"),
    (Locale::Lo, "ລາວ (Lao)"),
    (Locale::En, "English"),
];

impl Locale {
    pub const DEFAULT: Locale = Locale::En;

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::En => "en",
            Self::Id => "id",
            Self::Ms => "ms",
            Self::Th => "th",
            Self::Vi => "vi",
            Self::Tl => "tl",
            Self::My => "my",
            Self::Km => "km",
            Self::Lo => "lo",
        }
    }

    /// Human-readable name in the locale's own script.
    pub fn label(&self) -> &'static str {
        LANGUAGES
            .iter()
            .find(|(l, _)| l == self)
            .map(|(_, label)| *label)
            .unwrap_or("English")
    }

    /// Parse a language tag such as `th`, `th-TH` or `th_TH.UTF-8`.
    pub fn parse(tag: &str) -> Option<Self> {
        match primary_subtag(tag).as_str() {
            "en" => Some(Self::En),
            "id" => Some(Self::Id),
            "ms" => Some(Self::Ms),
            "th" => Some(Self::Th),
            "vi" => Some(Self::Vi),
            "tl" => Some(Self::Tl),
            "my" => Some(Self::My),
            "km" => Some(Self::Km),
            "lo" => Some(Self::Lo),
            _ => None,
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lowercased primary subtag: everything before a region, encoding or
/// modifier suffix.
pub fn primary_subtag(tag: &str) -> String {
    tag.trim()
        .split(['-', '_', '.', '@'])
        .next()
        .unwrap_or("")
        .to_ascii_lowercase()
}

/// First preferred tag with a registered dictionary, or English.
pub fn detect_initial_locale<I, S>(preferred: I) -> Locale
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    preferred
        .into_iter()
        .find_map(|tag| Locale::parse(tag.as_ref()))
        .unwrap_or(Locale::DEFAULT)
}

/// Preferred languages of the terminal session, most preferred first.
pub fn preferred_languages_from_env() -> Vec<String> {
    preferred_languages_from(|name| std::env::var(name).ok())
}

/// `LANGUAGE` (colon-separated list) first, then `LC_ALL`, `LC_MESSAGES`
/// and `LANG`. The `C` and `POSIX` locales carry no language.
fn preferred_languages_from(get: impl Fn(&str) -> Option<String>) -> Vec<String> {
    let mut tags = Vec::new();
    if let Some(list) = get("LANGUAGE") {
        tags.extend(list.split(':').map(str::to_string));
    }
    for var in ["LC_ALL", "LC_MESSAGES", "LANG"] {
        if let Some(v) = get(var) {
            tags.push(v);
        }
    }
    tags.retain(|t| {
        let p = primary_subtag(t);
        !p.is_empty() && p != "c" && p != "posix"
    });
    tags
}

/// Language tags from an HTTP `Accept-Language` header, highest quality
/// first. Ties keep header order; `*` and `q=0` entries are dropped.
pub fn parse_accept_language(header: &str) -> Vec<String> {
    let mut tags: Vec<(String, f32)> = header
        .split(',')
        .filter_map(|item| {
            let mut parts = item.split(';');
            let tag = parts.next()?.trim();
            if tag.is_empty() || tag == "*" {
                return None;
            }
            let q = parts
                .find_map(|p| p.trim().strip_prefix("q="))
                .and_then(|q| q.trim().parse::<f32>().ok())
                .unwrap_or(1.0);
            (q > 0.0).then(|| (tag.to_string(), q))
        })
        .collect();
    tags.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
    tags.into_iter().map(|(t, _)| t).collect()
}

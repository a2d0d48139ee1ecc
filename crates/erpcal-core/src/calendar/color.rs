//! Calendar color names and their hex values.

use std::collections::BTreeMap;

use crate::config::CalendarConfig;

const BUILTIN_COLORS: [(&str, &str); 10] = [
    ("red", "#ef4444"),
    ("orange", "#f97316"),
    ("yellow", "#eab308"),
    ("green", "#22c55e"),
    ("teal", "#14b8a6"),
    ("blue", "#3b82f6"),
    ("indigo", "#6366f1"),
    ("purple", "#a855f7"),
    ("pink", "#ec4899"),
    ("gray", "#6b7280"),
];

/// Name to hex lookup. Names are case-insensitive.
#[derive(Debug, Clone, PartialEq)]
pub struct ColorTable {
    colors: BTreeMap<String, String>,
    default_hex: String,
    confirmed: String,
}

impl ColorTable {
    /// Built-in table with config overrides applied.
    pub fn new(config: &CalendarConfig) -> Self {
        let mut colors: BTreeMap<String, String> = BUILTIN_COLORS
            .iter()
            .map(|(name, hex)| (name.to_string(), hex.to_string()))
            .collect();
        colors.extend(
            config
                .colors
                .iter()
                .map(|(name, hex)| (name.trim().to_lowercase(), hex.clone())),
        );

        Self {
            colors,
            default_hex: config.default_color_hex.clone(),
            confirmed: config.confirmed_color.trim().to_lowercase(),
        }
    }

    /// Hex for a color name, the default hex when the name is unknown.
    ///
    /// Values that already look like hex colors pass through.
    pub fn hex<'a>(&'a self, name: &'a str) -> &'a str {
        let name = name.trim();
        if name.starts_with('#') {
            return name;
        }
        self.colors
            .get(&name.to_lowercase())
            .map_or(self.default_hex.as_str(), String::as_str)
    }

    /// Color name forced onto confirmed doctor visits.
    pub fn confirmed(&self) -> &str {
        &self.confirmed
    }

    pub fn default_hex(&self) -> &str {
        &self.default_hex
    }
}

impl Default for ColorTable {
    fn default() -> Self {
        Self::new(&CalendarConfig::default())
    }
}

//! Condition category to icon lookup.

/// Image asset shown next to the reading, plus a glyph for text front ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Icon {
    pub asset: &'static str,
    pub glyph: &'static str,
}

pub const DEFAULT_ICON: Icon = Icon { asset: "assets/default.png", glyph: "🌡" };

/// Keyed on `weather[0].main`; matching is exact and case-sensitive.
pub const ICON_TABLE: &[(&str, Icon)] = &[
    ("Clouds", Icon { asset: "assets/Sun and cloud.webp", glyph: "⛅" }),
    ("Clear", Icon { asset: "assets/Sun.png", glyph: "☀" }),
    ("Rain", Icon { asset: "assets/Rain.jpg", glyph: "🌧" }),
    ("Mist", Icon { asset: "assets/mist.jpg", glyph: "🌫" }),
    ("Snow", Icon { asset: "assets/snow.jpg", glyph: "❄" }),
    ("Haze", Icon { asset: "assets/Haze.png", glyph: "🌁" }),
    ("Smoke", Icon { asset: "assets/Smoke.jpg", glyph: "💨" }),
];

pub fn icon_for(category: &str) -> Icon {
    ICON_TABLE
        .iter()
        .find(|(name, _)| *name == category)
        .map(|(_, icon)| *icon)
        .unwrap_or(DEFAULT_ICON)
}

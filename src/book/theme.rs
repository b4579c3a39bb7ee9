//! Background colors for interior story pages.

/// An 8-bit RGB triplet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const WHITE: Rgb = Rgb(255, 255, 255);
    pub const BLACK: Rgb = Rgb(0, 0, 0);

    /// Components scaled to the 0.0..=1.0 range PDF color operators expect.
    pub fn unit(self) -> (f32, f32, f32) {
        (
            f32::from(self.0) / 255.0,
            f32::from(self.1) / 255.0,
            f32::from(self.2) / 255.0,
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThemeColor {
    LightBlue,
    LightPink,
    LightGreen,
    LightYellow,
    LightGray,
    White,
}

/// Used when a theme name is not recognized.
pub const DEFAULT_THEME: ThemeColor = ThemeColor::White;

static THEMES: &[(&str, ThemeColor, Rgb)] = &[
    ("light blue", ThemeColor::LightBlue, Rgb(204, 229, 255)),
    ("light pink", ThemeColor::LightPink, Rgb(255, 204, 229)),
    ("light green", ThemeColor::LightGreen, Rgb(204, 255, 204)),
    ("light yellow", ThemeColor::LightYellow, Rgb(255, 255, 204)),
    ("light gray", ThemeColor::LightGray, Rgb(230, 230, 230)),
    ("white", ThemeColor::White, Rgb(255, 255, 255)),
];

impl ThemeColor {
    pub fn all() -> impl Iterator<Item = ThemeColor> {
        THEMES.iter().map(|(_, theme, _)| *theme)
    }

    /// Strict lookup. Case, hyphens and underscores are ignored.
    pub fn parse(name: &str) -> Option<ThemeColor> {
        let key = canonical_name(name);
        THEMES
            .iter()
            .find(|(theme_name, _, _)| *theme_name == key)
            .map(|(_, theme, _)| *theme)
    }

    pub fn name(self) -> &'static str {
        self.entry().0
    }

    pub fn rgb(self) -> Rgb {
        self.entry().2
    }

    fn entry(self) -> &'static (&'static str, ThemeColor, Rgb) {
        THEMES
            .iter()
            .find(|(_, theme, _)| *theme == self)
            .unwrap_or(&THEMES[THEMES.len() - 1])
    }
}

fn canonical_name(name: &str) -> String {
    name.split(|c: char| c.is_whitespace() || c == '-' || c == '_')
        .filter(|word| !word.is_empty())
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Resolve a free-text color name, falling back to [`DEFAULT_THEME`].
pub fn resolve_theme(name: &str) -> Rgb {
    match ThemeColor::parse(name) {
        Some(theme) => theme.rgb(),
        None => {
            tracing::warn!(
                "Unknown theme color '{}', using {}",
                name,
                DEFAULT_THEME.name()
            );
            DEFAULT_THEME.rgb()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_theme_resolves_in_any_casing() {
        for theme in ThemeColor::all() {
            let name = theme.name();
            assert_eq!(resolve_theme(name), theme.rgb());
            assert_eq!(resolve_theme(&name.to_uppercase()), theme.rgb());
            assert_eq!(resolve_theme(&name.replace(' ', "-")), theme.rgb());
            assert_eq!(resolve_theme(&format!("  {}  ", name)), theme.rgb());
        }
    }

    #[test]
    fn test_documented_triplets() {
        assert_eq!(resolve_theme("light blue"), Rgb(204, 229, 255));
        assert_eq!(resolve_theme("Light Pink"), Rgb(255, 204, 229));
        assert_eq!(resolve_theme("LIGHT_GREEN"), Rgb(204, 255, 204));
        assert_eq!(resolve_theme("light-yellow"), Rgb(255, 255, 204));
        assert_eq!(resolve_theme("light gray"), Rgb(230, 230, 230));
        assert_eq!(resolve_theme("white"), Rgb(255, 255, 255));
    }

    #[test]
    fn test_unknown_names_fall_back_to_default() {
        for name in ["", "blue", "light bleu", "lightblue", "ライトブルー", "#ccE5ff"] {
            assert_eq!(resolve_theme(name), DEFAULT_THEME.rgb(), "for {:?}", name);
        }
    }

    #[test]
    fn test_parse_is_strict() {
        assert_eq!(ThemeColor::parse("Light   Blue"), Some(ThemeColor::LightBlue));
        assert_eq!(ThemeColor::parse("purple"), None);
    }

    #[test]
    fn test_unit_components() {
        assert_eq!(Rgb::WHITE.unit(), (1.0, 1.0, 1.0));
        assert_eq!(Rgb::BLACK.unit(), (0.0, 0.0, 0.0));
    }
}

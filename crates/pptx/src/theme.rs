//! Visual themes for rendered decks.

use serde::{Deserialize, Serialize};

/// Colors (RRGGBB hex, no `#`) and fonts applied to every slide.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Theme {
    pub name: String,
    pub background: String,
    pub title_color: String,
    pub text_color: String,
    pub accent: String,
    pub title_font: String,
    pub body_font: String,
}

impl Default for Theme {
    fn default() -> Self {
        Self::professional()
    }
}

impl Theme {
    /// White background, navy titles.
    pub fn professional() -> Self {
        Self {
            name: "professional".to_string(),
            background: "FFFFFF".to_string(),
            title_color: "1F3864".to_string(),
            text_color: "333333".to_string(),
            accent: "2E75B6".to_string(),
            title_font: "Calibri Light".to_string(),
            body_font: "Calibri".to_string(),
        }
    }

    /// Dark background, light text.
    pub fn dark() -> Self {
        Self {
            name: "dark".to_string(),
            background: "1E1E2E".to_string(),
            title_color: "FFFFFF".to_string(),
            text_color: "DDDDDD".to_string(),
            accent: "F5A623".to_string(),
            title_font: "Segoe UI Semibold".to_string(),
            body_font: "Segoe UI".to_string(),
        }
    }

    /// Black on white, grey accent.
    pub fn minimal() -> Self {
        Self {
            name: "minimal".to_string(),
            background: "FFFFFF".to_string(),
            title_color: "000000".to_string(),
            text_color: "404040".to_string(),
            accent: "808080".to_string(),
            title_font: "Helvetica".to_string(),
            body_font: "Helvetica".to_string(),
        }
    }

    /// Warm background, saturated accents.
    pub fn vibrant() -> Self {
        Self {
            name: "vibrant".to_string(),
            background: "FFF8F0".to_string(),
            title_color: "C0392B".to_string(),
            text_color: "2C3E50".to_string(),
            accent: "E67E22".to_string(),
            title_font: "Georgia".to_string(),
            body_font: "Verdana".to_string(),
        }
    }

    /// Names accepted by [`from_name`](Self::from_name).
    pub fn names() -> &'static [&'static str] {
        &["professional", "dark", "minimal", "vibrant"]
    }

    /// Look up a built-in theme by name (case-insensitive).
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "professional" | "default" => Some(Self::professional()),
            "dark" => Some(Self::dark()),
            "minimal" => Some(Self::minimal()),
            "vibrant" => Some(Self::vibrant()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_name() {
        assert_eq!(Theme::from_name("Dark"), Some(Theme::dark()));
        assert_eq!(Theme::from_name("default"), Some(Theme::professional()));
        assert_eq!(Theme::from_name("neon"), None);
    }

    #[test]
    fn test_all_names_resolve() {
        for name in Theme::names() {
            let theme = Theme::from_name(name).unwrap();
            assert_eq!(&theme.name, name);
        }
    }

    #[test]
    fn test_colors_are_hex() {
        for name in Theme::names() {
            let theme = Theme::from_name(name).unwrap();
            for color in [&theme.background, &theme.title_color, &theme.text_color, &theme.accent] {
                assert_eq!(color.len(), 6);
                assert!(color.chars().all(|c| c.is_ascii_hexdigit()));
            }
        }
    }
}

//! Weight and slant metadata parsed from free-text font style names.

use std::sync::LazyLock;

use regex::Regex;

static SLANT: LazyLock<Regex> = LazyLock::new(|| Regex::new("italic|oblique").unwrap());
static SPACES: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

/// Substring token to numeric weight. Order matters: the first entry
/// contained in the style key wins, so "extra bold" resolves to 700 via
/// "bold" before the later "extra bold" entry is reached.
const WEIGHT_TABLE: &[(&str, u16)] = &[
    ("thin", 100),
    ("extra light", 200),
    ("ultra light", 200),
    ("light", 300),
    ("book", 400),
    ("regular", 400),
    ("normal", 400),
    ("medium", 500),
    ("semi bold", 600),
    ("demi bold", 600),
    ("bold", 700),
    ("extra bold", 800),
    ("ultra bold", 800),
    ("black", 900),
    ("heavy", 900),
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FontStyleMeta {
    /// Lower-cased style name without slant tokens, whitespace collapsed.
    pub style_key: String,
    pub italic: bool,
    pub weight: Option<u16>,
}

pub fn font_style_meta(style_name: &str) -> FontStyleMeta {
    let lower = style_name.trim().to_lowercase();
    let italic = SLANT.is_match(&lower);
    let stripped = SLANT.replace_all(&lower, "");
    let style_key = SPACES.replace_all(&stripped, " ").trim().to_string();
    let weight = WEIGHT_TABLE
        .iter()
        .find(|(token, _)| style_key.contains(token))
        .map(|&(_, weight)| weight);

    FontStyleMeta {
        style_key,
        italic,
        weight,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_semi_bold_italic() {
        let meta = font_style_meta("  Semi Bold Italic ");
        assert_eq!(meta.style_key, "semi bold");
        assert!(meta.italic);
        assert_eq!(meta.weight, Some(600));
    }

    #[test]
    fn oblique_counts_as_italic() {
        let meta = font_style_meta("Oblique");
        assert!(meta.italic);
        assert_eq!(meta.style_key, "");
        assert_eq!(meta.weight, None);
    }

    #[test]
    fn first_table_entry_wins() {
        assert_eq!(font_style_meta("Extra Light").weight, Some(200));
        assert_eq!(font_style_meta("Light").weight, Some(300));
        assert_eq!(font_style_meta("Extra Bold").weight, Some(700));
        assert_eq!(font_style_meta("Black").weight, Some(900));
        assert_eq!(font_style_meta("Regular").weight, Some(400));
    }

    #[test]
    fn unknown_style_has_no_weight() {
        let meta = font_style_meta("Condensed   Display");
        assert_eq!(meta.weight, None);
        assert_eq!(meta.style_key, "condensed display");
        assert!(!meta.italic);
    }
}

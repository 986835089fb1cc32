//! Hex color extraction from generated pack text.
//!
//! The provider is asked to format the palette as `#RRGGBB` tokens, but the
//! reply is free text, so this is a plain pattern scan over the whole
//! document: any `#`-prefixed 3- or 6-hex-digit token counts, wherever it
//! appears. Duplicates are preserved in document order.

use egui::Color32;
use regex::Regex;
use std::sync::OnceLock;

static HEX_TOKEN: OnceLock<Regex> = OnceLock::new();

fn hex_token() -> &'static Regex {
    HEX_TOKEN.get_or_init(|| {
        Regex::new(r"#(?:[0-9a-fA-F]{6}|[0-9a-fA-F]{3})\b").expect("valid hex token pattern")
    })
}

/// Iterate over `#RGB` / `#RRGGBB` tokens in `text`, in the order found.
///
/// Pure and restartable: calling it again on the same text yields the same
/// sequence. Zero matches is not an error — the caller simply renders no
/// swatches.
pub fn extract_hex_colors(text: &str) -> impl Iterator<Item = &str> + '_ {
    hex_token().find_iter(text).map(|m| m.as_str())
}

/// Parse an extracted token into a color. `#RGB` shorthand expands each
/// nibble (`#f80` → `#ff8800`).
pub fn parse_color(token: &str) -> Option<Color32> {
    let hex = token.strip_prefix('#')?;
    let (r, g, b) = match hex.len() {
        3 => {
            let v = u16::from_str_radix(hex, 16).ok()?;
            let (r, g, b) = ((v >> 8) & 0xf, (v >> 4) & 0xf, v & 0xf);
            ((r * 17) as u8, (g * 17) as u8, (b * 17) as u8)
        }
        6 => {
            let v = u32::from_str_radix(hex, 16).ok()?;
            ((v >> 16) as u8, (v >> 8) as u8, v as u8)
        }
        _ => return None,
    };
    Some(Color32::from_rgb(r, g, b))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_tokens_in_document_order() {
        let found: Vec<&str> = extract_hex_colors("#FFAA00 and #1a2b3c").collect();
        assert_eq!(found, vec!["#FFAA00", "#1a2b3c"]);
    }

    #[test]
    fn text_without_hash_tokens_yields_nothing() {
        let found: Vec<&str> = extract_hex_colors("rojo, azul y amarillo").collect();
        assert!(found.is_empty());
    }

    #[test]
    fn sequence_is_restartable_and_keeps_duplicates() {
        let text = "PALETA: #abc, #ABC y #abc";
        let first: Vec<&str> = extract_hex_colors(text).collect();
        let second: Vec<&str> = extract_hex_colors(text).collect();
        assert_eq!(first, vec!["#abc", "#ABC", "#abc"]);
        assert_eq!(first, second);
    }

    #[test]
    fn malformed_lengths_are_skipped() {
        // 4 and 5 hex digits are neither shorthand nor full form
        let found: Vec<&str> = extract_hex_colors("#abcd #FFAA0 #12").collect();
        assert!(found.is_empty());
    }

    #[test]
    fn shorthand_expands_per_nibble() {
        assert_eq!(parse_color("#f80"), Some(Color32::from_rgb(255, 136, 0)));
        assert_eq!(
            parse_color("#1a2b3c"),
            Some(Color32::from_rgb(0x1a, 0x2b, 0x3c))
        );
        assert_eq!(parse_color("ffffff"), None);
    }
}

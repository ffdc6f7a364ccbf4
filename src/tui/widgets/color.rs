use ratatui::style::Color;

use crate::models::TaskCategory;

/// Fixed colors used across the dashboard
pub struct Palette;

impl Palette {
    pub const FG: Color = Color::White;
    pub const BG: Color = Color::Reset;
    pub const MUTED: Color = Color::DarkGray;
    pub const ACCENT: Color = Color::Rgb(0x3B, 0x82, 0xF6);
    pub const HIGHLIGHT_BG: Color = Color::Rgb(0x25, 0x63, 0xEB);
    pub const TAB_BG: Color = Color::Rgb(0x37, 0x41, 0x51);
    pub const SUCCESS: Color = Color::Rgb(0x10, 0xB9, 0x81);
    pub const WARNING: Color = Color::Rgb(0xF5, 0x9E, 0x0B);
    pub const ERROR: Color = Color::Rgb(0xEF, 0x44, 0x44);
    pub const STAR: Color = Color::Rgb(0xFA, 0xCC, 0x15);
}

/// Parse "#RRGGBB" or "#RGB". Anything else is None.
pub fn parse_hex_color(s: &str) -> Option<Color> {
    let hex = s.trim().strip_prefix('#')?;
    if !hex.is_ascii() {
        return None;
    }

    match hex.len() {
        6 => {
            let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
            let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
            let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
            Some(Color::Rgb(r, g, b))
        }
        3 => {
            let r = u8::from_str_radix(&hex[0..1], 16).ok()?;
            let g = u8::from_str_radix(&hex[1..2], 16).ok()?;
            let b = u8::from_str_radix(&hex[2..3], 16).ok()?;
            // Expand: 0xF -> 0xFF
            Some(Color::Rgb((r << 4) | r, (g << 4) | g, (b << 4) | b))
        }
        _ => None,
    }
}

/// Badge color for a category; falls back to the accent color
pub fn category_color(category: &TaskCategory) -> Color {
    category
        .color
        .as_deref()
        .and_then(parse_hex_color)
        .unwrap_or(Palette::ACCENT)
}

/// Relative luminance (WCAG) between 0.0 (dark) and 1.0 (light)
fn luminance(r: u8, g: u8, b: u8) -> f64 {
    let channel = |c: u8| {
        let c = c as f64 / 255.0;
        if c <= 0.03928 {
            c / 12.92
        } else {
            ((c + 0.055) / 1.055).powf(2.4)
        }
    };
    0.2126 * channel(r) + 0.7152 * channel(g) + 0.0722 * channel(b)
}

/// Black or white text, whichever reads better on `background`
pub fn contrast_text_color(background: Color) -> Color {
    match background {
        Color::Rgb(r, g, b) => {
            if luminance(r, g, b) < 0.5 {
                Color::White
            } else {
                Color::Black
            }
        }
        Color::Black | Color::Blue | Color::Magenta | Color::Red | Color::DarkGray => Color::White,
        _ => Color::Black,
    }
}

use ratatui::style::Color;

use crate::model::UiConfig;

/// Parsed color theme for the TUI
#[derive(Debug, Clone)]
pub struct Theme {
    pub background: Color,
    pub text: Color,
    pub text_bright: Color,
    pub dim: Color,
    pub highlight: Color,
    pub header: Color,
    pub red: Color,
    pub yellow: Color,
    pub green: Color,
    pub cyan: Color,
    pub purple: Color,
    pub blue: Color,
    pub selection_bg: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Theme {
            background: Color::Rgb(0x10, 0x10, 0x18),
            text: Color::Rgb(0xC8, 0xC8, 0xD8),
            text_bright: Color::Rgb(0xFF, 0xFF, 0xFF),
            dim: Color::Rgb(0x6A, 0x6A, 0x80),
            highlight: Color::Rgb(0xE0, 0x5A, 0x8C),
            header: Color::Rgb(0x8A, 0xB4, 0xF8),
            red: Color::Rgb(0xFF, 0x55, 0x55),
            yellow: Color::Rgb(0xF1, 0xC4, 0x0F),
            green: Color::Rgb(0x50, 0xE0, 0x90),
            cyan: Color::Rgb(0x50, 0xC8, 0xE0),
            purple: Color::Rgb(0xB0, 0x70, 0xF0),
            blue: Color::Rgb(0x60, 0x90, 0xF0),
            selection_bg: Color::Rgb(0x2C, 0x2C, 0x44),
        }
    }
}

impl Theme {
    /// Build the theme from config, applying any color overrides.
    pub fn from_config(ui: &UiConfig) -> Self {
        let mut theme = Theme::default();
        for (name, hex) in &ui.colors {
            let Some(color) = parse_hex_color(hex) else {
                continue;
            };
            match name.as_str() {
                "background" => theme.background = color,
                "text" => theme.text = color,
                "text_bright" => theme.text_bright = color,
                "dim" => theme.dim = color,
                "highlight" => theme.highlight = color,
                "header" => theme.header = color,
                "red" => theme.red = color,
                "yellow" => theme.yellow = color,
                "green" => theme.green = color,
                "cyan" => theme.cyan = color,
                "purple" => theme.purple = color,
                "blue" => theme.blue = color,
                "selection_bg" => theme.selection_bg = color,
                _ => {}
            }
        }
        theme
    }

    /// Color for a priority badge: urgent red down to dim.
    pub fn priority_color(&self, ordinal: u8) -> Color {
        match ordinal {
            4 => self.red,
            3 => self.yellow,
            2 => self.blue,
            _ => self.dim,
        }
    }
}

/// Parse a hex color string like "#FF4444" into an RGB Color
fn parse_hex_color(hex: &str) -> Option<Color> {
    let hex = hex.strip_prefix('#')?;
    if hex.len() != 6 {
        return None;
    }
    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
    Some(Color::Rgb(r, g, b))
}

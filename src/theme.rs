//! Theme colors for the picker, in light and dark modes.
//! Values follow a gray/blue/red palette; individual tokens can be overridden
//! from the `[theme]` table of the config file.

use ratatui::style::Color;

use crate::config::{AppConfig, ColorMode, ThemeOverrides};

/// Theme colors for the UI
#[derive(Debug, Clone, PartialEq)]
pub struct Theme {
    pub accent: Color,         // Submit button, file icon (blue.500)
    pub border: Color,         // Idle drop zone border
    pub border_active: Color,  // Drop zone border while dragging (blue.400)
    pub zone_bg: Color,        // Idle drop zone background
    pub zone_bg_active: Color, // Drop zone background while dragging
    pub icon_idle: Color,      // Upload icon when idle
    pub danger: Color,         // Remove control, rejections
    pub text: Color,
    pub text_dim: Color,
    pub bg_selected: Color,    // Browser row highlight
    pub disabled: Color,       // Disabled submit button
}

impl Default for Theme {
    fn default() -> Self {
        Self::for_mode(ColorMode::Dark)
    }
}

impl Theme {
    pub fn for_mode(mode: ColorMode) -> Self {
        match mode {
            ColorMode::Light => Self {
                accent: Color::Rgb(49, 130, 206),          // #3182CE
                border: Color::Rgb(203, 213, 224),         // gray.300
                border_active: Color::Rgb(66, 153, 225),   // #4299E1
                zone_bg: Color::Rgb(247, 250, 252),        // gray.50
                zone_bg_active: Color::Rgb(237, 242, 247), // gray.100
                icon_idle: Color::Rgb(113, 128, 150),      // #718096
                danger: Color::Rgb(229, 62, 62),           // red.500
                text: Color::Rgb(26, 32, 44),              // gray.800
                text_dim: Color::Rgb(113, 128, 150),       // gray.500
                bg_selected: Color::Rgb(226, 232, 240),    // gray.200
                disabled: Color::Rgb(160, 174, 192),       // gray.400
            },
            ColorMode::Dark => Self {
                accent: Color::Rgb(49, 130, 206),
                border: Color::Rgb(74, 85, 104),           // gray.600
                border_active: Color::Rgb(66, 153, 225),
                zone_bg: Color::Rgb(45, 55, 72),           // gray.700
                zone_bg_active: Color::Rgb(74, 85, 104),   // gray.600
                icon_idle: Color::Rgb(113, 128, 150),
                danger: Color::Rgb(252, 129, 129),         // red.300
                text: Color::Rgb(237, 242, 247),
                text_dim: Color::Rgb(160, 174, 192),
                bg_selected: Color::Rgb(74, 85, 104),
                disabled: Color::Rgb(113, 128, 150),
            },
        }
    }

    /// Build the theme for the configured mode, then apply overrides
    pub fn load(config: &AppConfig) -> Self {
        let mut theme = Self::for_mode(config.color_mode);
        theme.apply_overrides(&config.theme);
        theme
    }

    fn apply_overrides(&mut self, overrides: &ThemeOverrides) {
        let slots = [
            (&overrides.accent, &mut self.accent),
            (&overrides.border, &mut self.border),
            (&overrides.danger, &mut self.danger),
            (&overrides.text, &mut self.text),
        ];

        for (value, slot) in slots {
            let Some(value) = value else { continue };
            match Self::parse_hex_color(value) {
                Some(color) => *slot = color,
                None => tracing::warn!("Ignoring invalid theme color: {}", value),
            }
        }
    }

    /// Parse a hex color string (#RRGGBB or #RGB)
    fn parse_hex_color(s: &str) -> Option<Color> {
        let s = s.trim().trim_start_matches('#');

        if !s.is_ascii() {
            return None;
        }

        if s.len() == 6 {
            let r = u8::from_str_radix(&s[0..2], 16).ok()?;
            let g = u8::from_str_radix(&s[2..4], 16).ok()?;
            let b = u8::from_str_radix(&s[4..6], 16).ok()?;
            Some(Color::Rgb(r, g, b))
        } else if s.len() == 3 {
            let r = u8::from_str_radix(&s[0..1], 16).ok()? * 17;
            let g = u8::from_str_radix(&s[1..2], 16).ok()? * 17;
            let b = u8::from_str_radix(&s[2..3], 16).ok()? * 17;
            Some(Color::Rgb(r, g, b))
        } else {
            None
        }
    }
}

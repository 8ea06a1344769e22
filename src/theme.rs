//! Visual theme for the settings window.
//!
//! A single dark theme with pre-computed hex colors. Components derive their
//! own `*Colors` structs from this so render closures can copy plain `u32`s
//! instead of borrowing the theme.

/// Hex color representation (u32, `0xRRGGBB`)
pub type HexColor = u32;

#[derive(Clone, Copy, Debug)]
pub struct ThemeColors {
    /// Window background
    pub background: HexColor,
    /// Panel / card background
    pub panel: HexColor,
    /// Input field background
    pub input: HexColor,
    /// Divider and border lines
    pub border: HexColor,
    /// Primary text
    pub text_primary: HexColor,
    /// Secondary text (descriptions)
    pub text_secondary: HexColor,
    /// Muted text (placeholders, hints)
    pub text_muted: HexColor,
    /// Accent for active toggles and focus rings
    pub accent: HexColor,
    /// Track color for inactive toggles
    pub toggle_off: HexColor,
}

#[derive(Clone, Copy, Debug)]
pub struct Theme {
    pub colors: ThemeColors,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            colors: ThemeColors {
                background: 0x1e1e1e,
                panel: 0x2d2d30,
                input: 0x3c3c3c,
                border: 0x464647,
                text_primary: 0xffffff,
                text_secondary: 0xcccccc,
                text_muted: 0x808080,
                accent: 0x3b82f6,
                toggle_off: 0x52525b,
            },
        }
    }
}

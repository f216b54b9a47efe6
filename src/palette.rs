//! Colour palettes
//!
//! Adjacent levels alternate light/dark so neighbouring tiers stay distinct.
//! Colours are packed `0xRRGGBB`.

use serde::{Deserialize, Serialize};

use crate::consts::LEVEL_COUNT;

/// Selectable palette
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorPalette {
    Green,
    Blue,
    Purple,
    Orange,
    Pink,
    #[default]
    Rainbow,
}

const GREEN: [u32; LEVEL_COUNT] = [
    0x86EFAC, 0x15803D, 0x4ADE80, 0x166534, 0x22C55E, 0x14532D, 0x86EFAC, 0x059669, 0x6EE7B7,
    0x047857, 0x34D399,
];
const BLUE: [u32; LEVEL_COUNT] = [
    0xBAE6FD, 0x0369A1, 0x38BDF8, 0x0C4A6E, 0x0EA5E9, 0x075985, 0x7DD3FC, 0x155E75, 0x67E8F9,
    0x0E7490, 0x22D3EE,
];
const PURPLE: [u32; LEVEL_COUNT] = [
    0xE9D5FF, 0x7E22CE, 0xC084FC, 0x581C87, 0xA855F7, 0x6B21A8, 0xD8B4FE, 0x5B21B6, 0xDDD6FE,
    0x6D28D9, 0xA78BFA,
];
const ORANGE: [u32; LEVEL_COUNT] = [
    0xFED7AA, 0xC2410C, 0xFB923C, 0x7C2D12, 0xF97316, 0x9A3412, 0xFDBA74, 0x991B1B, 0xFCA5A5,
    0xB91C1C, 0xEF4444,
];
const PINK: [u32; LEVEL_COUNT] = [
    0xFBCFE8, 0xBE185D, 0xF472B6, 0x831843, 0xEC4899, 0x9F1239, 0xF9A8D4, 0x9F1239, 0xFECDD3,
    0xBE123C, 0xFB7185,
];
const RAINBOW: [u32; LEVEL_COUNT] = [
    0xC4B5FD, 0x15803D, 0x60A5FA, 0xEA580C, 0xFDE047, 0x7C3AED, 0x34D399, 0xDC2626, 0x7DD3FC,
    0xC2410C, 0xA78BFA,
];

impl ColorPalette {
    pub const ALL: [ColorPalette; 6] = [
        ColorPalette::Green,
        ColorPalette::Blue,
        ColorPalette::Purple,
        ColorPalette::Orange,
        ColorPalette::Pink,
        ColorPalette::Rainbow,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ColorPalette::Green => "green",
            ColorPalette::Blue => "blue",
            ColorPalette::Purple => "purple",
            ColorPalette::Orange => "orange",
            ColorPalette::Pink => "pink",
            ColorPalette::Rainbow => "rainbow",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|p| p.as_str().eq_ignore_ascii_case(s.trim()))
    }

    pub fn colors(&self) -> &'static [u32; LEVEL_COUNT] {
        match self {
            ColorPalette::Green => &GREEN,
            ColorPalette::Blue => &BLUE,
            ColorPalette::Purple => &PURPLE,
            ColorPalette::Orange => &ORANGE,
            ColorPalette::Pink => &PINK,
            ColorPalette::Rainbow => &RAINBOW,
        }
    }

    /// Colour for a level; levels past the table reuse the top colour
    pub fn color_for(&self, level: u8) -> u32 {
        let colors = self.colors();
        colors[(level as usize).min(LEVEL_COUNT - 1)]
    }
}

/// Format a packed colour as a CSS hex string
pub fn to_hex(color: u32) -> String {
    format!("#{:06X}", color & 0xFF_FFFF)
}

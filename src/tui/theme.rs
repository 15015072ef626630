// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Tourline and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::{env, error::Error, fmt};

use ratatui::style::{Color, Modifier, Style};

const PALETTE_ENV: &str = "TOURLINE_TUI_PALETTE";

/// Colours for the route canvas, optionally overridden from `TOURLINE_TUI_PALETTE`.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct TuiTheme {
    palette: RoutePalette,
}

impl Default for TuiTheme {
    fn default() -> Self {
        Self { palette: RoutePalette::default() }
    }
}

impl TuiTheme {
    pub(crate) fn from_env() -> Result<Self, ThemeError> {
        let palette = palette_override_from_env()?.unwrap_or_default();
        Ok(Self { palette })
    }

    pub(crate) fn base_style(&self) -> Style {
        Style::default().fg(self.palette.fg).bg(self.palette.bg)
    }

    pub(crate) fn edge_color(&self, complete: bool) -> Color {
        if complete {
            self.palette.edge
        } else {
            self.palette.active
        }
    }

    pub(crate) fn node_color(&self, visited: bool) -> Color {
        if visited {
            self.palette.visited
        } else {
            self.palette.node
        }
    }

    pub(crate) fn marker_color(&self) -> Color {
        self.palette.marker
    }

    pub(crate) fn label_style(&self) -> Style {
        self.base_style().fg(self.palette.label)
    }

    pub(crate) fn number_style(&self, visited: bool) -> Style {
        self.base_style().fg(self.node_color(visited)).add_modifier(Modifier::BOLD)
    }

    pub(crate) fn distance_style(&self, complete: bool) -> Style {
        self.base_style().fg(self.edge_color(complete)).add_modifier(Modifier::ITALIC)
    }

    pub(crate) fn error_style(&self) -> Style {
        self.base_style().fg(Color::Red)
    }
}

#[derive(Debug, Clone, PartialEq)]
struct RoutePalette {
    fg: Color,
    bg: Color,
    edge: Color,
    active: Color,
    node: Color,
    visited: Color,
    marker: Color,
    label: Color,
}

impl Default for RoutePalette {
    fn default() -> Self {
        Self {
            fg: Color::Reset,
            bg: Color::Reset,
            edge: Color::Gray,
            active: Color::LightYellow,
            node: Color::LightBlue,
            visited: Color::LightGreen,
            marker: Color::LightRed,
            label: Color::White,
        }
    }
}

impl RoutePalette {
    const FIELDS: [&'static str; 8] =
        ["fg", "bg", "edge", "active", "node", "visited", "marker", "label"];

    fn parse_csv(value: &str) -> Result<Self, String> {
        let parts: Vec<&str> = value.split(',').map(|part| part.trim()).collect();
        if parts.len() != Self::FIELDS.len() {
            return Err(format!(
                "expected {} comma-separated colors ({}), got {}",
                Self::FIELDS.len(),
                Self::FIELDS.join(","),
                parts.len()
            ));
        }

        let mut colors = [Color::Reset; 8];
        for (slot, part) in colors.iter_mut().zip(&parts) {
            *slot = parse_palette_color(part)?;
        }
        let [fg, bg, edge, active, node, visited, marker, label] = colors;
        Ok(Self { fg, bg, edge, active, node, visited, marker, label })
    }
}

fn palette_override_from_env() -> Result<Option<RoutePalette>, ThemeError> {
    let value = match env::var(PALETTE_ENV) {
        Ok(value) => value,
        Err(env::VarError::NotPresent) => return Ok(None),
        Err(env::VarError::NotUnicode(_)) => {
            return Err(ThemeError::InvalidEnv {
                name: PALETTE_ENV.to_string(),
                value: "<non-unicode>".to_string(),
            });
        }
    };

    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    RoutePalette::parse_csv(trimmed).map(Some).map_err(|error| ThemeError::InvalidEnv {
        name: PALETTE_ENV.to_string(),
        value: format!("{trimmed} ({error})"),
    })
}

/// Accepts `#RRGGBB`, `0xRRGGBB` or a handful of ANSI colour names.
fn parse_palette_color(value: &str) -> Result<Color, String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err("empty color".to_string());
    }

    let named = match trimmed.to_ascii_lowercase().as_str() {
        "reset" | "default" => Some(Color::Reset),
        "black" => Some(Color::Black),
        "red" => Some(Color::Red),
        "green" => Some(Color::Green),
        "yellow" => Some(Color::Yellow),
        "blue" => Some(Color::Blue),
        "magenta" => Some(Color::Magenta),
        "cyan" => Some(Color::Cyan),
        "gray" | "grey" => Some(Color::Gray),
        "white" => Some(Color::White),
        _ => None,
    };
    if let Some(color) = named {
        return Ok(color);
    }

    let hex = trimmed
        .strip_prefix('#')
        .or_else(|| trimmed.strip_prefix("0x"))
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed);
    if hex.len() != 6 || !hex.chars().all(|ch| ch.is_ascii_hexdigit()) {
        return Err(format!("invalid color: {trimmed} (expected #RRGGBB or a color name)"));
    }
    let rgb = u32::from_str_radix(hex, 16).map_err(|_| format!("invalid hex color: {trimmed}"))?;
    Ok(Color::Rgb(((rgb >> 16) & 0xFF) as u8, ((rgb >> 8) & 0xFF) as u8, (rgb & 0xFF) as u8))
}

#[derive(Debug, Clone)]
pub(crate) enum ThemeError {
    InvalidEnv { name: String, value: String },
}

impl fmt::Display for ThemeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidEnv { name, value } => write!(f, "invalid env {name}={value}"),
        }
    }
}

impl Error for ThemeError {}

#[cfg(test)]
mod tests {
    use ratatui::style::Color;

    use super::{parse_palette_color, RoutePalette};

    #[test]
    fn palette_override_parses_valid_csv() {
        let palette = RoutePalette::parse_csv(
            "reset,#101010,gray,#ffcc00,blue,green,0xff0000,white",
        )
        .expect("palette");

        assert_eq!(palette.fg, Color::Reset);
        assert_eq!(palette.bg, Color::Rgb(0x10, 0x10, 0x10));
        assert_eq!(palette.active, Color::Rgb(0xff, 0xcc, 0x00));
        assert_eq!(palette.marker, Color::Rgb(0xff, 0, 0));
        assert_eq!(palette.label, Color::White);
    }

    #[test]
    fn palette_override_rejects_wrong_arity() {
        let err = RoutePalette::parse_csv("red,green").expect_err("arity");
        assert!(err.contains("expected 8"));
    }

    #[test]
    fn bad_hex_is_reported() {
        let err = parse_palette_color("#12345").expect_err("short hex");
        assert!(err.contains("invalid color"));
    }
}

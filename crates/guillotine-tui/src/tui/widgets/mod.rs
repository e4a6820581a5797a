// TUI widget modules for each dashboard panel, plus shared cell styling.

pub mod activity;
pub mod league;
pub mod profile;
pub mod recap;
pub mod standings;
pub mod status_bar;
pub mod summary;

use ratatui::style::{Color, Style};

use guillotine_core::color::{hex_to_rgb, TextColor, MID_COLOR};

/// Terminal color for a `#rrggbb` string. Unparseable input renders as the
/// neutral midpoint.
pub fn hex_color(hex: &str) -> Color {
    hex_to_rgb(hex)
        .or_else(|| hex_to_rgb(MID_COLOR))
        .map_or(Color::White, |rgb| Color::Rgb(rgb.r, rgb.g, rgb.b))
}

pub fn text_color(text: TextColor) -> Color {
    match text {
        TextColor::Black => Color::Black,
        TextColor::White => Color::White,
    }
}

/// Style for a cell painted with `background`, using a readable foreground.
pub fn cell_style(background: &str, text: TextColor) -> Style {
    Style::default().bg(hex_color(background)).fg(text_color(text))
}

/// Format a score with two decimals, or a dash when not applicable.
pub fn format_score(score: Option<f64>) -> String {
    score.map(|s| format!("{s:.2}")).unwrap_or_else(|| "-".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_color_parses() {
        assert_eq!(hex_color("#ff0000"), Color::Rgb(255, 0, 0));
        assert_eq!(hex_color("#ffffff"), Color::Rgb(255, 255, 255));
    }

    #[test]
    fn hex_color_falls_back_to_midpoint() {
        assert_eq!(hex_color("not a color"), Color::Rgb(255, 255, 255));
    }

    #[test]
    fn format_score_two_decimals() {
        assert_eq!(format_score(Some(101.25)), "101.25");
        assert_eq!(format_score(None), "-");
    }
}

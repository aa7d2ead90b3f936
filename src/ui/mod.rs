/// View helpers
///
/// Each helper builds one region of the window from the session state:
/// - `banner.rs` - header, error banner, endpoint field, "How It Works" strip
/// - `panels.rs` - upload panel and detection results panel
use iced::widget::container;
use iced::{Background, Border, Color, Theme};

pub mod banner;
pub mod panels;

pub const ACCENT: Color = Color::from_rgb(0.15, 0.39, 0.92);
pub const SUCCESS: Color = Color::from_rgb(0.02, 0.59, 0.41);
pub const DANGER: Color = Color::from_rgb(0.86, 0.15, 0.15);
pub const MUTED: Color = Color::from_rgb(0.58, 0.64, 0.72);

/// Rounded card with a thin border
pub fn card(theme: &Theme) -> container::Style {
    let palette = theme.extended_palette();

    container::Style {
        background: Some(Background::Color(palette.background.weak.color)),
        border: Border {
            color: palette.background.strong.color,
            width: 1.0,
            radius: 16.0.into(),
        },
        ..container::Style::default()
    }
}

/// Tinted notice box (error banner, success banner, drop zone)
pub fn notice(tint: Color) -> impl Fn(&Theme) -> container::Style {
    move |_theme: &Theme| container::Style {
        background: Some(Background::Color(Color { a: 0.12, ..tint })),
        border: Border {
            color: Color { a: 0.6, ..tint },
            width: 1.5,
            radius: 12.0.into(),
        },
        ..container::Style::default()
    }
}

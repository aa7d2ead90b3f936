use iced::widget::{button, column, container, mouse_area, row, text, Image, Space};
use iced::{Alignment, Element, Length};

use super::{card, notice, ACCENT, MUTED, SUCCESS};
use crate::state::Session;
use crate::Message;

const PANEL_WIDTH: f32 = 520.0;
const IMAGE_HEIGHT: f32 = 380.0;

/// Left panel: drop zone until an image is selected, then preview + actions
pub fn upload_panel(session: &Session) -> Element<'_, Message> {
    let body: Element<'_, Message> = match session.selected() {
        None => drop_zone(session.is_drop_hover(), session.is_idle()),
        Some(selected) => {
            let detect_label = if session.is_loading() {
                "⏳ Analyzing..."
            } else {
                "🔍 Detect Anomalies"
            };

            let detect = button(text(detect_label).size(16))
                .on_press_maybe(session.can_submit().then_some(Message::Detect))
                .padding([12, 24])
                .width(Length::Fill)
                .style(button::primary);

            let reset = button(text("Reset").size(16))
                .on_press_maybe(session.is_idle().then_some(Message::Reset))
                .padding([12, 24])
                .style(button::secondary);

            column![
                Image::new(selected.handle.clone())
                    .width(Length::Fill)
                    .height(Length::Fixed(IMAGE_HEIGHT)),
                text(selected.summary()).size(13).color(MUTED),
                row![detect, reset].spacing(12),
            ]
            .spacing(12)
            .into()
        }
    };

    panel("⬆️ Upload Image", body)
}

/// Right panel: placeholder, processing notice, or the annotated image
pub fn result_panel(session: &Session) -> Element<'_, Message> {
    let body: Element<'_, Message> = if session.is_loading() {
        placeholder(
            "⏳",
            "Processing Image",
            "The model is analyzing microscopic cell patterns...",
            Some(ACCENT),
        )
    } else if let Some(result) = session.result() {
        let complete = container(
            column![
                text("✅ Analysis Complete").size(16).color(SUCCESS),
                text("Anomalies detected and highlighted").size(13),
            ]
            .spacing(4),
        )
        .padding(12)
        .width(Length::Fill)
        .style(notice(SUCCESS));

        column![
            complete,
            Image::new(result.handle.clone())
                .width(Length::Fill)
                .height(Length::Fixed(IMAGE_HEIGHT)),
            text(result.summary()).size(13).color(MUTED),
        ]
        .spacing(12)
        .into()
    } else {
        placeholder(
            "📊",
            "Results will appear here",
            "Upload an image and click \"Detect Anomalies\" to begin",
            None,
        )
    };

    panel("📈 Detection Results", body)
}

fn drop_zone<'a>(hovering: bool, enabled: bool) -> Element<'a, Message> {
    let tint = if hovering { ACCENT } else { MUTED };

    let choose = button(text("Choose image").size(14))
        .on_press_maybe(enabled.then_some(Message::PickImage))
        .padding([8, 16])
        .style(button::secondary);

    let zone = container(
        column![
            text("⬆️").size(48),
            text("Drop your cell image here").size(18),
            text("or click to browse files").size(13).color(MUTED),
            choose,
        ]
        .spacing(10)
        .align_x(Alignment::Center),
    )
    .padding(48)
    .width(Length::Fill)
    .center_x(Length::Fill)
    .style(notice(tint));

    let area = mouse_area(zone);
    if enabled {
        area.on_press(Message::PickImage).into()
    } else {
        area.into()
    }
}

fn placeholder<'a>(
    icon: &'a str,
    title: &'a str,
    hint: &'a str,
    tint: Option<iced::Color>,
) -> Element<'a, Message> {
    container(
        column![
            text(icon).size(48),
            text(title).size(18),
            text(hint).size(13).color(MUTED),
        ]
        .spacing(10)
        .align_x(Alignment::Center),
    )
    .padding(48)
    .width(Length::Fill)
    .center_x(Length::Fill)
    .style(notice(tint.unwrap_or(MUTED)))
    .into()
}

fn panel<'a>(title: &'a str, body: Element<'a, Message>) -> Element<'a, Message> {
    container(
        column![text(title).size(24), Space::with_height(8), body].spacing(12),
    )
    .padding(28)
    .width(Length::Fixed(PANEL_WIDTH))
    .style(card)
    .into()
}

use iced::widget::{column, container, row, text, text_input};
use iced::{Alignment, Element, Length};

use super::{notice, DANGER, MUTED};
use crate::error::AppError;
use crate::Message;

/// Title and subtitle
pub fn header<'a>() -> Element<'a, Message> {
    column![
        text("🔬 🧠").size(40),
        text("AI-Powered Microscopic Cell").size(40),
        text("Anomaly Detection").size(40).color(super::ACCENT),
        text(
            "Machine learning system for detecting anomalies in microscopic cell images"
        )
        .size(16)
        .color(MUTED),
    ]
    .spacing(6)
    .align_x(Alignment::Center)
    .into()
}

/// Error banner, shown only while an error is present
pub fn error_banner(error: Option<&AppError>) -> Option<Element<'_, Message>> {
    let error = error?;

    let content = row![
        text("⚠️").size(20),
        column![
            text("Error").size(16).color(DANGER),
            text(error.to_string()).size(14),
        ]
        .spacing(4),
    ]
    .spacing(12)
    .align_y(Alignment::Start);

    Some(
        container(content)
            .padding(16)
            .width(Length::Fixed(640.0))
            .style(notice(DANGER))
            .into(),
    )
}

/// Editable inference endpoint; parsed when the user submits
pub fn endpoint_field(value: &str, editable: bool) -> Element<'_, Message> {
    let input = text_input("https://host/generate-heatmap/", value)
        .padding(8)
        .size(14);
    let input = if editable {
        input.on_input(Message::EndpointChanged)
    } else {
        input
    };

    row![text("Endpoint").size(14).color(MUTED), input]
        .spacing(12)
        .align_y(Alignment::Center)
        .width(Length::Fixed(640.0))
        .into()
}

/// The three-step explanation below the panels
pub fn how_it_works<'a>() -> Element<'a, Message> {
    let step = |number: &'a str, title: &'a str, body: &'a str| {
        column![
            text(number).size(28).color(super::ACCENT),
            text(title).size(16),
            text(body).size(13).color(MUTED),
        ]
        .spacing(6)
        .align_x(Alignment::Center)
        .width(Length::FillPortion(1))
    };

    let steps = row![
        step("1", "Upload Image", "Select or drag and drop your microscopic cell image"),
        step("2", "AI Analysis", "The inference service analyzes cellular structures"),
        step("3", "View Results", "Get the heat map with anomalies highlighted"),
    ]
    .spacing(24);

    container(column![text("How It Works").size(22), steps].spacing(16))
        .padding(24)
        .width(Length::Fixed(880.0))
        .style(super::card)
        .into()
}

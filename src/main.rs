use clap::Parser;
use iced::widget::{column, container, row, scrollable};
use iced::{event, window, Alignment, Element, Event, Length, Subscription, Task, Theme};
use rfd::FileDialog;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod config;
mod error;
mod inference;
mod media;
mod state;
mod ui;

use config::Settings;
use error::{DetectError, Origin, SelectError};
use inference::InferenceClient;
use media::LoadedFile;
use state::{ResultImage, Session};

/// Microscopic cell anomaly detection client
#[derive(Parser, Debug)]
#[command(name = "cell-inspector")]
#[command(about = "Upload a microscopic cell image and view the anomaly heat map")]
struct Args {
    /// Inference endpoint URL (overrides the settings file)
    #[arg(short, long, env = "CELL_INSPECTOR_ENDPOINT")]
    endpoint: Option<String>,

    /// Settings file (default: <config dir>/cell-inspector/settings.json)
    #[arg(short, long)]
    config: Option<PathBuf>,
}

/// Main application state
struct CellInspector {
    /// Selection, result, loading flag and error
    session: Session,
    /// HTTP client for the inference service
    client: InferenceClient,
    /// Contents of the endpoint field
    endpoint_input: String,
}

/// Application messages (events)
#[derive(Debug, Clone)]
pub enum Message {
    /// User clicked the drop zone or "Choose image"
    PickImage,
    /// A file is dragged over the window
    FileHovered,
    /// The drag left the window without dropping
    FilesHoveredLeft,
    /// A file was dropped onto the window
    FileDropped(PathBuf),
    /// Background file read finished
    ImageLoaded(Result<LoadedFile, SelectError>),
    /// User edited the endpoint field
    EndpointChanged(String),
    /// User clicked "Detect Anomalies"
    Detect,
    /// Inference request settled (ticket id, outcome)
    DetectionFinished(u64, Result<ResultImage, DetectError>),
    /// User clicked "Reset"
    Reset,
}

impl CellInspector {
    /// Create a new instance of the application
    fn new(settings: Settings, client: InferenceClient) -> (Self, Task<Message>) {
        tracing::info!("🎨 Cell Inspector ready, endpoint {}", settings.endpoint);

        (
            CellInspector {
                session: Session::new(),
                client,
                endpoint_input: settings.endpoint.to_string(),
            },
            Task::none(),
        )
    }

    /// Handle application messages and update state
    fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::PickImage => {
                if !self.session.is_idle() || self.session.is_reading() {
                    return Task::none();
                }

                let file = FileDialog::new()
                    .set_title("Select Cell Image")
                    .add_filter(
                        "Images",
                        &["png", "jpg", "jpeg", "bmp", "gif", "tif", "tiff", "webp"],
                    )
                    .add_filter("All files", &["*"])
                    .pick_file();

                match file {
                    Some(path) if self.session.begin_read() => Task::perform(
                        media::read_file(path, Origin::Picker),
                        Message::ImageLoaded,
                    ),
                    _ => Task::none(),
                }
            }
            Message::FileHovered => {
                if self.session.is_idle() {
                    self.session.set_drop_hover(true);
                }
                Task::none()
            }
            Message::FilesHoveredLeft => {
                self.session.set_drop_hover(false);
                Task::none()
            }
            Message::FileDropped(path) => {
                // Only the first file of a drop is read; the rest arrive while it is in flight
                if !self.session.begin_read() {
                    tracing::debug!("Ignoring drop of {}", path.display());
                    self.session.set_drop_hover(false);
                    return Task::none();
                }

                Task::perform(media::read_file(path, Origin::Drop), Message::ImageLoaded)
            }
            Message::ImageLoaded(Ok(file)) => {
                let name = file.name.clone();
                match self.session.select(file) {
                    Ok(()) => {
                        if let Some(selected) = self.session.selected() {
                            tracing::info!(
                                "🖼️  Selected {} ({})",
                                selected.path.display(),
                                selected.summary()
                            );
                        }
                    }
                    Err(e) => match e.media_type() {
                        Some(media_type) => tracing::warn!("⚠️  Rejected {} ({})", name, media_type),
                        None => tracing::warn!("⚠️  Rejected {}: {}", name, e),
                    },
                }
                Task::none()
            }
            Message::ImageLoaded(Err(e)) => {
                tracing::warn!("⚠️  {}", e);
                self.session.reject(e);
                Task::none()
            }
            Message::EndpointChanged(value) => {
                self.endpoint_input = value;
                Task::none()
            }
            Message::Detect => {
                let endpoint = match config::parse_endpoint(&self.endpoint_input) {
                    Ok(endpoint) => endpoint,
                    Err(reason) if self.session.can_submit() => {
                        let err = DetectError::InvalidEndpoint {
                            input: self.endpoint_input.clone(),
                            reason,
                        };
                        tracing::warn!("⚠️  {}", err);
                        self.session.report(err);
                        return Task::none();
                    }
                    // No image or a pending request: the session reports that instead
                    Err(_) => {
                        if let Err(e) = self.session.begin_detection() {
                            tracing::debug!("Detection not started: {}", e);
                        }
                        return Task::none();
                    }
                };

                let ticket = match self.session.begin_detection() {
                    Ok(ticket) => ticket,
                    Err(e) => {
                        tracing::debug!("Detection not started: {}", e);
                        return Task::none();
                    }
                };

                let client = self.client.clone();
                let id = ticket.id;
                Task::perform(
                    async move { client.detect(endpoint, ticket.bytes, &ticket.media_type).await },
                    move |outcome| Message::DetectionFinished(id, outcome),
                )
            }
            Message::DetectionFinished(id, outcome) => {
                match &outcome {
                    Ok(result) => tracing::info!(
                        "📊 Detection #{} returned {}",
                        id,
                        result.media_type.as_deref().unwrap_or("an untyped body")
                    ),
                    Err(e) => tracing::warn!("❌ Detection #{} failed: {}", id, e),
                }
                if !self.session.finish_detection(id, outcome) {
                    tracing::debug!("Discarded outcome of superseded detection #{}", id);
                }
                Task::none()
            }
            Message::Reset => {
                if self.session.is_idle() {
                    self.session.reset();
                    tracing::info!("🔄 Session reset");
                }
                Task::none()
            }
        }
    }

    /// Build the user interface
    fn view(&self) -> Element<Message> {
        let mut content = column![ui::banner::header()]
            .spacing(24)
            .padding(40)
            .align_x(Alignment::Center);

        if let Some(banner) = ui::banner::error_banner(self.session.error()) {
            content = content.push(banner);
        }

        let content = content
            .push(ui::banner::endpoint_field(
                &self.endpoint_input,
                self.session.is_idle(),
            ))
            .push(
                row![
                    ui::panels::upload_panel(&self.session),
                    ui::panels::result_panel(&self.session),
                ]
                .spacing(32),
            )
            .push(ui::banner::how_it_works());

        scrollable(container(content).width(Length::Fill).center_x(Length::Fill)).into()
    }

    /// Window file drag-and-drop events
    fn subscription(&self) -> Subscription<Message> {
        event::listen_with(|event, _status, _window| match event {
            Event::Window(window::Event::FileHovered(_)) => Some(Message::FileHovered),
            Event::Window(window::Event::FilesHoveredLeft) => Some(Message::FilesHoveredLeft),
            Event::Window(window::Event::FileDropped(path)) => Some(Message::FileDropped(path)),
            _ => None,
        })
    }

    /// Set the application theme
    fn theme(&self) -> Theme {
        Theme::Light
    }
}

fn main() -> iced::Result {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("cell_inspector=info")),
        )
        .init();

    let settings = match Settings::load(args.config.as_deref(), args.endpoint.as_deref()) {
        Ok(settings) => settings,
        Err(e) => {
            tracing::error!("❌ {}", e);
            std::process::exit(2);
        }
    };

    if let Ok(json) = settings.to_json() {
        tracing::debug!("Settings: {}", json);
    }

    let client = match InferenceClient::new(&settings) {
        Ok(client) => client,
        Err(e) => {
            tracing::error!("❌ Failed to create HTTP client: {}", e);
            std::process::exit(1);
        }
    };

    iced::application("Cell Inspector", CellInspector::update, CellInspector::view)
        .subscription(CellInspector::subscription)
        .theme(CellInspector::theme)
        .window_size((1200.0, 960.0))
        .centered()
        .run_with(move || CellInspector::new(settings, client))
}

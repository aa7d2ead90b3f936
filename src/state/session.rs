/// The UI controller
///
/// `Session` owns everything the window displays and is the only place that
/// state changes. It moves between idle, loading and done/error:
///
/// ```text
/// idle --begin_detection--> loading --finish_detection--> done | error
///   ^                                                        |
///   +---------------- select / reset ------------------------+
/// ```
///
/// Every request gets a ticket id. Selecting a new image or resetting makes the
/// outstanding ticket stale, so a late response can clear the loading flag
/// but never resurrect a result or error for an image that is gone.
use bytes::Bytes;

use super::data::{ResultImage, SelectedImage};
use crate::error::{AppError, DetectError, SelectError};
use crate::media::LoadedFile;

/// Handed out when a request starts; returned with its outcome
#[derive(Debug, Clone)]
pub struct Ticket {
    /// Identifies the request within this session
    pub id: u64,
    /// Encoded image to upload
    pub bytes: Bytes,
    /// Content type of the upload
    pub media_type: String,
}

#[derive(Debug, Default)]
pub struct Session {
    selected: Option<SelectedImage>,
    result: Option<ResultImage>,
    loading: bool,
    error: Option<AppError>,
    /// A file is being dragged over the window
    drop_hover: bool,
    /// A picked or dropped file is being read
    reading: bool,
    last_ticket: u64,
    pending: Option<u64>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selected(&self) -> Option<&SelectedImage> {
        self.selected.as_ref()
    }

    pub fn result(&self) -> Option<&ResultImage> {
        self.result.as_ref()
    }

    pub fn error(&self) -> Option<&AppError> {
        self.error.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn is_drop_hover(&self) -> bool {
        self.drop_hover
    }

    /// The detect button is enabled
    pub fn can_submit(&self) -> bool {
        self.selected.is_some() && !self.loading
    }

    /// Picking, dropping and resetting are enabled
    pub fn is_idle(&self) -> bool {
        !self.loading
    }

    pub fn is_reading(&self) -> bool {
        self.reading
    }

    /// Claim the single file-read slot before reading a picked or dropped file.
    ///
    /// Returns false while a request is pending or another read is in flight,
    /// so only the first file of a multi-file drop is considered.
    pub fn begin_read(&mut self) -> bool {
        if self.loading || self.reading {
            return false;
        }
        self.reading = true;
        true
    }

    /// Accept a picked or dropped file as the new selection.
    ///
    /// A file without an image media type is rejected: the error is shown and
    /// nothing else changes.
    pub fn select(&mut self, file: LoadedFile) -> Result<(), SelectError> {
        self.drop_hover = false;
        self.reading = false;

        if !file.is_image() {
            let err = SelectError::not_an_image(file.origin, file.media_type);
            self.error = Some(err.clone().into());
            return Err(err);
        }

        self.selected = Some(SelectedImage::from_file(file));
        self.result = None;
        self.error = None;
        self.pending = None;
        Ok(())
    }

    /// Show a selection failure that happened before a file could be inspected
    pub fn reject(&mut self, err: SelectError) {
        self.drop_hover = false;
        self.reading = false;
        self.error = Some(err.into());
    }

    /// Start a detection request for the selected image.
    ///
    /// Without a selection the "select an image first" error is shown and no
    /// ticket is issued. While a request is pending nothing changes.
    pub fn begin_detection(&mut self) -> Result<Ticket, DetectError> {
        if self.loading {
            return Err(DetectError::Busy);
        }

        let Some(selected) = &self.selected else {
            self.error = Some(DetectError::NoImage.into());
            return Err(DetectError::NoImage);
        };

        self.last_ticket += 1;
        let ticket = Ticket {
            id: self.last_ticket,
            bytes: selected.bytes.clone(),
            media_type: selected.media_type.clone(),
        };

        self.loading = true;
        self.error = None;
        self.result = None;
        self.pending = Some(ticket.id);
        Ok(ticket)
    }

    /// Settle a request. Loading is always cleared; the outcome is only
    /// applied if the ticket is still current. Returns whether it was applied.
    pub fn finish_detection(
        &mut self,
        ticket_id: u64,
        outcome: Result<ResultImage, DetectError>,
    ) -> bool {
        self.loading = false;

        if self.pending != Some(ticket_id) {
            return false;
        }
        self.pending = None;

        match outcome {
            Ok(result) => {
                self.result = Some(result);
                self.error = None;
            }
            Err(err) => {
                self.error = Some(err.into());
            }
        }
        true
    }

    /// Show a detection failure found before any request was issued
    /// (e.g. an unparsable endpoint). Selection and result are kept.
    pub fn report(&mut self, err: DetectError) {
        self.error = Some(err.into());
    }

    pub fn set_drop_hover(&mut self, hovering: bool) {
        self.drop_hover = hovering;
    }

    /// Clear selection, result, error and drop-zone state
    pub fn reset(&mut self) {
        self.selected = None;
        self.result = None;
        self.error = None;
        self.drop_hover = false;
        self.pending = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Origin;
    use crate::media::tiny_png;
    use std::time::Duration;

    fn png_file(name: &str, origin: Origin) -> LoadedFile {
        LoadedFile::from_bytes(name, tiny_png(3, 3), origin)
    }

    fn text_file(origin: Origin) -> LoadedFile {
        LoadedFile::from_bytes("notes.txt", b"not an image".to_vec(), origin)
    }

    fn heat_map() -> ResultImage {
        ResultImage::new(
            Bytes::from(tiny_png(5, 5)),
            Some("image/png".into()),
            Duration::from_millis(20),
        )
    }

    fn server_error() -> DetectError {
        DetectError::Status {
            code: 500,
            reason: "Internal Server Error".into(),
            detail: None,
        }
    }

    /// Session with a selection and a finished result
    fn finished_session() -> Session {
        let mut session = Session::new();
        session.select(png_file("a.png", Origin::Picker)).unwrap();
        let ticket = session.begin_detection().unwrap();
        assert!(session.finish_detection(ticket.id, Ok(heat_map())));
        session
    }

    #[test]
    fn test_non_image_rejected_without_touching_state() {
        for origin in [Origin::Picker, Origin::Drop] {
            let mut session = finished_session();

            let err = session.select(text_file(origin)).unwrap_err();
            assert!(matches!(err, SelectError::NotAnImage { .. }));

            assert_eq!(session.selected().unwrap().name, "a.png");
            assert!(session.result().is_some());
            assert!(session.error().is_some());
        }
    }

    #[test]
    fn test_rejection_message_follows_origin() {
        let mut session = Session::new();

        session.select(text_file(Origin::Drop)).unwrap_err();
        assert_eq!(session.error().unwrap().to_string(), "Please drop a valid image file");

        session.select(text_file(Origin::Picker)).unwrap_err();
        assert_eq!(session.error().unwrap().to_string(), "Please select a valid image file");
    }

    #[test]
    fn test_valid_selection_clears_result_and_error() {
        let mut session = finished_session();
        session.report(DetectError::Transport("boom".into()));

        session.select(png_file("b.png", Origin::Drop)).unwrap();

        assert_eq!(session.selected().unwrap().name, "b.png");
        assert_eq!(session.selected().unwrap().dimensions, Some((3, 3)));
        assert!(session.result().is_none());
        assert!(session.error().is_none());
    }

    #[test]
    fn test_submit_without_image() {
        let mut session = Session::new();

        let err = session.begin_detection().unwrap_err();

        assert_eq!(err, DetectError::NoImage);
        assert_eq!(session.error().unwrap().to_string(), "Please select an image first");
        assert!(!session.is_loading());
    }

    #[test]
    fn test_loading_spans_request() {
        let mut session = Session::new();
        session.select(png_file("a.png", Origin::Picker)).unwrap();
        assert!(session.can_submit());

        let ticket = session.begin_detection().unwrap();
        assert!(session.is_loading());
        assert!(!session.can_submit());
        assert!(!session.is_idle());
        assert_eq!(ticket.media_type, "image/png");

        // A second submit while pending is refused and changes nothing
        assert_eq!(session.begin_detection().unwrap_err(), DetectError::Busy);
        assert!(session.error().is_none());

        session.finish_detection(ticket.id, Err(server_error()));
        assert!(!session.is_loading());
        assert!(session.can_submit());
    }

    #[test]
    fn test_success_shows_result() {
        let mut session = Session::new();
        session.select(png_file("a.png", Origin::Picker)).unwrap();
        let ticket = session.begin_detection().unwrap();

        assert!(session.finish_detection(ticket.id, Ok(heat_map())));

        assert!(!session.is_loading());
        assert_eq!(session.result().unwrap().dimensions, Some((5, 5)));
        assert!(session.error().is_none());
    }

    #[test]
    fn test_server_error_shows_status() {
        let mut session = Session::new();
        session.select(png_file("a.png", Origin::Picker)).unwrap();
        let ticket = session.begin_detection().unwrap();

        session.finish_detection(ticket.id, Err(server_error()));

        assert!(!session.is_loading());
        assert!(session.result().is_none());
        assert!(session.error().unwrap().to_string().contains("500"));
    }

    #[test]
    fn test_new_request_clears_previous_outcome() {
        let mut session = finished_session();

        let ticket = session.begin_detection().unwrap();
        assert!(session.result().is_none());
        assert!(session.error().is_none());

        session.finish_detection(ticket.id, Err(server_error()));
        let retry = session.begin_detection().unwrap();
        assert!(session.error().is_none());
        assert!(retry.id > ticket.id);
    }

    #[test]
    fn test_reset_clears_everything() {
        let mut session = finished_session();
        session.set_drop_hover(true);
        session.report(DetectError::Transport("boom".into()));

        session.reset();

        assert!(session.selected().is_none());
        assert!(session.result().is_none());
        assert!(session.error().is_none());
        assert!(!session.is_drop_hover());

        // Resetting an empty session is fine too
        session.reset();
        assert!(session.selected().is_none());
    }

    #[test]
    fn test_report_keeps_selection() {
        let mut session = finished_session();

        session.report(DetectError::InvalidEndpoint {
            input: "nope".into(),
            reason: "relative URL without a base".into(),
        });

        assert!(!session.is_loading());
        assert!(session.selected().is_some());
        assert!(session.result().is_some());
        assert!(session.error().unwrap().to_string().starts_with("Invalid endpoint URL"));
    }

    #[test]
    fn test_selection_during_request_makes_ticket_stale() {
        let mut session = Session::new();
        session.select(png_file("a.png", Origin::Picker)).unwrap();
        let ticket = session.begin_detection().unwrap();

        // A read that started before the request lands while it is pending
        session.select(png_file("b.png", Origin::Drop)).unwrap();
        assert!(session.is_loading());

        assert!(!session.finish_detection(ticket.id, Ok(heat_map())));
        assert!(!session.is_loading());
        assert_eq!(session.selected().unwrap().name, "b.png");
        assert!(session.result().is_none());
        assert!(session.error().is_none());
    }

    #[test]
    fn test_single_read_slot() {
        let mut session = Session::new();

        assert!(session.begin_read());
        assert!(!session.begin_read());

        session.select(text_file(Origin::Drop)).unwrap_err();
        assert!(!session.is_reading());
        assert!(session.begin_read());

        session.reject(SelectError::Read {
            path: "gone.png".into(),
            reason: "No such file or directory".into(),
        });
        assert!(!session.is_reading());

        session.select(png_file("a.png", Origin::Picker)).unwrap();
        session.begin_detection().unwrap();
        assert!(!session.begin_read());
    }

    #[test]
    fn test_stale_completion_only_clears_loading() {
        let mut session = Session::new();
        session.select(png_file("a.png", Origin::Picker)).unwrap();
        let ticket = session.begin_detection().unwrap();

        session.reset();
        assert!(session.is_loading());

        assert!(!session.finish_detection(ticket.id, Ok(heat_map())));
        assert!(!session.is_loading());
        assert!(session.result().is_none());
        assert!(session.selected().is_none());
    }
}

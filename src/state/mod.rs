/// State management module
///
/// This module holds all UI state of the application:
/// - Displayable image data for the selection and the result (data.rs)
/// - The controller that moves between idle, loading and done/error (session.rs)

pub mod data;
pub mod session;

pub use data::{ResultImage, SelectedImage};
pub use session::Session;

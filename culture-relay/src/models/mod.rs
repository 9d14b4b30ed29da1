//! Data models for the culture relay
//!
//! Request types are validated from raw form fields before any side effect.

pub mod category;
pub mod feedback;
pub mod form;
pub mod upload;

pub use category::ContentCategory;
pub use feedback::{ColorRequest, FeedbackRequest, FeedbackResponse};
pub use form::{FormFields, UploadedFile};
pub use upload::{SegmentedImage, UploadRequest, UploadResponse, UploadSession, UploadState};

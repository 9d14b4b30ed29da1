//! Database access for the culture relay
//!
//! Schema creation lives in `culture_common::db`; this module holds the
//! statements the relay runs against it.

pub mod records;

pub use records::{apply_feedback, find_by_session, insert_upload, FeedbackOutcome, NewUploadRecord};

//! Services composing the upload workflow and the color proxy

pub mod color_client;
pub mod result_materializer;
pub mod segmentation_client;
pub mod storage_layout;
pub mod upload_orchestrator;

pub use color_client::{ColorClient, ColorError, ColorReply};
pub use result_materializer::{materialize, MaterializeError};
pub use segmentation_client::{SegmentResult, SegmentationClient, SegmentationError, Segmenter};
pub use storage_layout::{SessionDirs, StorageLayout};
pub use upload_orchestrator::{UploadError, UploadOrchestrator};

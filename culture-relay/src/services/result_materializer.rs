//! Writes decoded segmentation results into the output directory
//!
//! Every payload is decoded and every filename checked before the first
//! write, so a bad entry anywhere in the response leaves no files behind.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::models::SegmentedImage;
use crate::services::segmentation_client::SegmentResult;
use crate::services::storage_layout::confined_path;

/// Materialization errors
#[derive(Debug, Error)]
pub enum MaterializeError {
    #[error("Invalid base64 payload for '{filename}': {source}")]
    Decode {
        filename: String,
        #[source]
        source: base64::DecodeError,
    },

    #[error("Refusing result file name {0:?}")]
    UnsafeFileName(String),

    #[error("Failed to write {path:?}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Decode each result, write it under `output_dir` and echo the pairs back unchanged
pub async fn materialize(
    results: Vec<SegmentResult>,
    output_dir: &Path,
) -> Result<Vec<SegmentedImage>, MaterializeError> {
    let mut decoded = Vec::with_capacity(results.len());
    for result in &results {
        let path = confined_path(output_dir, &result.filename)
            .map_err(|_| MaterializeError::UnsafeFileName(result.filename.clone()))?;
        let bytes = decode_payload(&result.data).map_err(|source| MaterializeError::Decode {
            filename: result.filename.clone(),
            source,
        })?;
        decoded.push((path, bytes));
    }

    for (path, bytes) in &decoded {
        tokio::fs::write(path, bytes)
            .await
            .map_err(|source| MaterializeError::Write {
                path: path.clone(),
                source,
            })?;
    }

    tracing::debug!(
        output_dir = %output_dir.display(),
        files = decoded.len(),
        "Segmented images written"
    );

    Ok(results
        .into_iter()
        .map(|r| SegmentedImage {
            filename: r.filename,
            base64_data: r.data,
        })
        .collect())
}

/// Standard-alphabet base64; line breaks and other ASCII whitespace are ignored
///
/// Any other character outside the alphabet is a decode error rather than
/// being silently dropped.
fn decode_payload(data: &str) -> Result<Vec<u8>, base64::DecodeError> {
    if data.bytes().any(|b| b.is_ascii_whitespace()) {
        let compact: String = data.chars().filter(|c| !c.is_ascii_whitespace()).collect();
        STANDARD.decode(compact)
    } else {
        STANDARD.decode(data)
    }
}

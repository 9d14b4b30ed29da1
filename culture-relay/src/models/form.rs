//! Raw form extraction
//!
//! The browser client posts either `multipart/form-data` (whenever a file is
//! attached) or a plain urlencoded form. [`FormFields`] accepts both and
//! leaves typed validation to the request models.

use axum::{
    async_trait,
    extract::{FromRequest, Multipart, Request},
    http::header,
    Form,
};
use std::collections::HashMap;

use crate::error::ApiError;

/// A file part of a multipart form
#[derive(Debug, Clone, Default)]
pub struct UploadedFile {
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

/// Named text fields and file parts of one request
#[derive(Debug, Default)]
pub struct FormFields {
    text: HashMap<String, String>,
    files: HashMap<String, UploadedFile>,
}

impl FormFields {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_text(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.text.insert(name.into(), value.into());
        self
    }

    pub fn with_file(mut self, name: impl Into<String>, file: UploadedFile) -> Self {
        self.files.insert(name.into(), file);
        self
    }

    pub fn text(&self, name: &str) -> Option<&str> {
        self.text.get(name).map(String::as_str)
    }

    /// Text field that must be present (an empty value is still present)
    pub fn require_text(&self, name: &str) -> Result<&str, ApiError> {
        self.text(name)
            .ok_or_else(|| ApiError::Validation(format!("Missing form field '{}'", name)))
    }

    /// Remove and return a file part that must be present
    pub fn require_file(&mut self, name: &str) -> Result<UploadedFile, ApiError> {
        self.files
            .remove(name)
            .ok_or_else(|| ApiError::Validation(format!("Missing file field '{}'", name)))
    }

    /// Drain a multipart stream; parts carrying a file name are files
    pub async fn from_multipart(mut multipart: Multipart) -> Result<Self, ApiError> {
        let mut fields = Self::new();

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| ApiError::Validation(format!("Invalid multipart body: {}", e)))?
        {
            let Some(name) = field.name().map(str::to_string) else {
                continue;
            };

            if field.file_name().is_some() {
                let file_name = field.file_name().map(str::to_string);
                let content_type = field.content_type().map(str::to_string);
                let bytes = field.bytes().await.map_err(|e| {
                    ApiError::Validation(format!("Failed to read file field '{}': {}", name, e))
                })?;
                fields.files.insert(
                    name,
                    UploadedFile {
                        file_name,
                        content_type,
                        bytes: bytes.to_vec(),
                    },
                );
            } else {
                let value = field.text().await.map_err(|e| {
                    ApiError::Validation(format!("Failed to read form field '{}': {}", name, e))
                })?;
                fields.text.insert(name, value);
            }
        }

        Ok(fields)
    }
}

#[async_trait]
impl<S> FromRequest<S> for FormFields
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let is_multipart = req
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|ct| ct.starts_with("multipart/form-data"));

        if is_multipart {
            let multipart = Multipart::from_request(req, state)
                .await
                .map_err(|e| ApiError::Validation(format!("Invalid multipart body: {}", e)))?;
            Self::from_multipart(multipart).await
        } else {
            let Form(text) = Form::<HashMap<String, String>>::from_request(req, state)
                .await
                .map_err(|e| ApiError::Validation(format!("Invalid form body: {}", e)))?;
            Ok(Self {
                text,
                files: HashMap::new(),
            })
        }
    }
}

use std::collections::HashMap;

use axum::extract::Multipart;

use crate::error::ApiError;
use crate::storage::UploadedFile;

/// A fully read multipart body: text fields plus uploaded files by field name
#[derive(Debug, Default)]
pub struct MultipartForm {
    fields: HashMap<String, String>,
    files: HashMap<String, UploadedFile>,
}

impl MultipartForm {
    pub async fn read(mut multipart: Multipart) -> Result<Self, ApiError> {
        let mut form = Self::default();

        while let Some(field) = multipart.next_field().await.map_err(|e| {
            tracing::debug!("Failed to read multipart field: {}", e);
            ApiError::validation("Malformed multipart body")
        })? {
            let Some(name) = field.name().map(str::to_string) else {
                continue;
            };

            match field.file_name().map(str::to_string) {
                Some(file_name) => {
                    let bytes = field.bytes().await.map_err(|e| {
                        tracing::debug!("Failed to read file data for {}: {}", name, e);
                        ApiError::validation("Malformed multipart body")
                    })?;

                    // Browsers send an empty part when no file was chosen
                    if file_name.is_empty() && bytes.is_empty() {
                        continue;
                    }

                    form.files.insert(
                        name,
                        UploadedFile { file_name, bytes },
                    );
                }
                None => {
                    let text = field
                        .text()
                        .await
                        .map_err(|_| ApiError::validation("Malformed multipart body"))?;
                    form.fields.insert(name, text);
                }
            }
        }

        Ok(form)
    }

    /// Text field value, empty when absent
    pub fn text(&self, name: &str) -> String {
        self.fields.get(name).cloned().unwrap_or_default()
    }

    pub fn take_file(&mut self, name: &str) -> Option<UploadedFile> {
        self.files.remove(name)
    }
}

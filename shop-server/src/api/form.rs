//! Multipart form collection

use std::collections::HashMap;

use axum::extract::Multipart;
use shared::ErrorCode;

use crate::utils::AppError;

/// An uploaded file part
#[derive(Debug)]
pub struct FilePart {
    pub filename: String,
    pub data: Vec<u8>,
}

/// Text fields and file parts of a multipart request
#[derive(Debug, Default)]
pub struct MultipartForm {
    pub fields: HashMap<String, String>,
    pub files: HashMap<String, FilePart>,
}

impl MultipartForm {
    /// Read every part; parts with a file name are files, the rest text
    pub async fn read(mut multipart: Multipart) -> Result<Self, AppError> {
        let mut form = Self::default();

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| AppError::invalid_request(format!("Invalid multipart request: {e}")))?
        {
            let Some(name) = field.name().map(str::to_string) else {
                continue;
            };

            match field.file_name().map(str::to_string) {
                Some(filename) => {
                    let data = field.bytes().await.map_err(|e| {
                        AppError::invalid_request(format!("Multipart error: {e}"))
                    })?;
                    // Browsers send an empty part when no file was chosen
                    if filename.is_empty() && data.is_empty() {
                        continue;
                    }
                    form.files.insert(
                        name,
                        FilePart {
                            filename,
                            data: data.to_vec(),
                        },
                    );
                }
                None => {
                    let text = field.text().await.map_err(|e| {
                        AppError::invalid_request(format!("Multipart error: {e}"))
                    })?;
                    form.fields.insert(name, text);
                }
            }
        }

        Ok(form)
    }

    /// A required text field
    pub fn text(&self, name: &str) -> Result<&str, AppError> {
        self.fields.get(name).map(String::as_str).ok_or_else(|| {
            AppError::with_message(ErrorCode::RequiredField, format!("{name} is required"))
                .with_detail("field", name)
        })
    }

    /// Remove and return the first file found under any of `names`
    pub fn take_file(&mut self, names: &[&str]) -> Option<FilePart> {
        names.iter().find_map(|name| self.files.remove(*name))
    }
}

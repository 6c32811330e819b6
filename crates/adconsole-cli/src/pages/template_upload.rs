//! `/upload-template`: register a named reference video.

use std::path::Path;

use adconsole_api_client::{log_error, ApiClient, TemplateUploaded};
use adconsole_core::{ConsoleError, ConsoleResult, ErrorMetadata};

use crate::components::{Accept, Navbar, SelectedFile};
use crate::router::Route;
use crate::pages::upload::IN_FLIGHT_MESSAGE;

pub const MISSING_INPUT_MESSAGE: &str = "Please provide both template name and video file";
pub const SUCCESS_MESSAGE: &str = "Upload successful!";

#[derive(Debug, Default)]
pub struct TemplateUploadForm {
    name: String,
    file: Option<SelectedFile>,
    uploading: bool,
    error: Option<String>,
    success: bool,
}

impl TemplateUploadForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn file(&self) -> Option<&SelectedFile> {
        self.file.as_ref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn succeeded(&self) -> bool {
        self.success
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
        self.success = false;
        self.error = None;
    }

    pub fn select(&mut self, file: SelectedFile) {
        self.file = Some(file);
        self.success = false;
        self.error = None;
    }

    pub fn select_path(&mut self, path: impl AsRef<Path>) -> ConsoleResult<()> {
        match SelectedFile::from_path(path, Accept::VideosOnly) {
            Ok(file) => {
                self.select(file);
                Ok(())
            }
            Err(e) => {
                self.error = Some(e.client_message());
                self.success = false;
                Err(e)
            }
        }
    }

    pub fn can_submit(&self) -> bool {
        self.file.is_some() && !self.name.trim().is_empty() && !self.uploading
    }

    /// Upload the template. On success the form is cleared for the next one.
    pub async fn submit(&mut self, client: &ApiClient) -> ConsoleResult<TemplateUploaded> {
        if self.uploading {
            return Err(ConsoleError::validation(IN_FLIGHT_MESSAGE));
        }
        let name = self.name.trim().to_string();
        let file = match &self.file {
            Some(file) if !name.is_empty() => file.to_upload(),
            _ => {
                self.error = Some(MISSING_INPUT_MESSAGE.to_string());
                return Err(ConsoleError::validation(MISSING_INPUT_MESSAGE));
            }
        };

        self.error = None;
        self.success = false;

        let result = {
            let _uploading = UploadingFlag::raise(&mut self.uploading);
            client.upload_template(file, &name).await
        };

        match result {
            Ok(ack) => {
                tracing::info!(template = %name, "Template uploaded");
                self.success = true;
                self.file = None;
                self.name.clear();
                Ok(ack)
            }
            Err(e) => {
                log_error(&e, "Template upload failed");
                self.error = Some(e.client_message());
                Err(e)
            }
        }
    }

    pub fn render(&self) -> String {
        let mut out = Navbar::new(Some(&Route::TemplateUpload)).render();
        out.push_str("\n\nUpload Video Template\n\n");

        let name = if self.name.is_empty() { "(enter template name)" } else { &self.name };
        out.push_str(&format!("Template Name: {}\n", name));
        match &self.file {
            Some(file) => out.push_str(&format!("Video File:\n{}\n", file.summary())),
            None => out.push_str("Video File: (none selected)\n"),
        }

        if let Some(error) = &self.error {
            out.push_str(&format!("\nError: {}\n", error));
        }
        if self.success {
            out.push_str(&format!("\n{}\n", SUCCESS_MESSAGE));
        }

        let button = if self.uploading { "Uploading..." } else { "Upload" };
        let disabled = if self.can_submit() { "" } else { " (disabled)" };
        out.push_str(&format!("\n[ {} ]{}", button, disabled));
        out
    }
}

/// Raises `uploading` for its lifetime; an abandoned submit lowers it too.
struct UploadingFlag<'a>(&'a mut bool);

impl<'a> UploadingFlag<'a> {
    fn raise(flag: &'a mut bool) -> Self {
        *flag = true;
        Self(flag)
    }
}

impl Drop for UploadingFlag<'_> {
    fn drop(&mut self) {
        *self.0 = false;
    }
}

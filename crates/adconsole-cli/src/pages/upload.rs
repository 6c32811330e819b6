//! `/upload`: pick one image or video and send it to the backend.

use std::path::Path;

use adconsole_api_client::{log_error, ApiClient};
use adconsole_core::{ConsoleError, ConsoleResult, ErrorMetadata};

use crate::components::{Accept, Navbar, SelectedFile};
use crate::router::Route;

pub const NO_FILE_MESSAGE: &str = "Please select a file to upload";
pub const IN_FLIGHT_MESSAGE: &str = "An upload is already in progress";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum UploadState {
    #[default]
    Idle,
    FileSelected(SelectedFile),
    Uploading(SelectedFile),
}

/// Asset upload form. At most one upload is in flight; a failed upload
/// keeps the file selected so it can be retried.
#[derive(Debug, Default)]
pub struct UploadForm {
    state: UploadState,
    name: Option<String>,
    error: Option<String>,
}

impl UploadForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &UploadState {
        &self.state
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Name sent with the upload instead of the file name.
    pub fn set_name(&mut self, name: Option<String>) {
        self.name = name.filter(|n| !n.trim().is_empty());
    }

    pub fn select(&mut self, file: SelectedFile) {
        if self.is_uploading() {
            return;
        }
        self.state = UploadState::FileSelected(file);
        self.error = None;
    }

    /// Read and select a file from disk; a rejected file is reported as the
    /// form error.
    pub fn select_path(&mut self, path: impl AsRef<Path>) -> ConsoleResult<()> {
        match SelectedFile::from_path(path, Accept::ImagesAndVideos) {
            Ok(file) => {
                self.select(file);
                Ok(())
            }
            Err(e) => {
                self.error = Some(e.client_message());
                Err(e)
            }
        }
    }

    pub fn is_uploading(&self) -> bool {
        matches!(self.state, UploadState::Uploading(_))
    }

    pub fn can_submit(&self) -> bool {
        matches!(self.state, UploadState::FileSelected(_))
    }

    /// Upload the selected file and return the detail route of the new asset.
    pub async fn submit(&mut self, client: &ApiClient) -> ConsoleResult<Route> {
        let file = match std::mem::take(&mut self.state) {
            UploadState::FileSelected(file) => file,
            UploadState::Idle => {
                self.error = Some(NO_FILE_MESSAGE.to_string());
                return Err(ConsoleError::validation(NO_FILE_MESSAGE));
            }
            uploading @ UploadState::Uploading(_) => {
                self.state = uploading;
                return Err(ConsoleError::validation(IN_FLIGHT_MESSAGE));
            }
        };

        self.error = None;
        let name = self
            .name
            .clone()
            .unwrap_or_else(|| file.name().to_string());
        let upload = file.to_upload();
        let file_name = file.name().to_string();

        self.state = UploadState::Uploading(file);
        let mut in_flight = InFlight { state: &mut self.state };

        match client.upload_asset(upload, &name).await {
            Ok(asset) => {
                tracing::info!(asset_id = %asset.id, file = %file_name, "Asset uploaded");
                in_flight.finish();
                Ok(Route::AssetDetail(asset.id))
            }
            Err(e) => {
                log_error(&e, "Upload failed");
                self.error = Some(e.client_message());
                Err(e)
            }
        }
    }

    pub fn render(&self) -> String {
        let mut out = Navbar::new(Some(&Route::Upload)).render();
        out.push_str("\n\nUpload Creative Asset\n");
        out.push_str("Upload your creative asset to generate a screensaver ad\n");

        match &self.state {
            UploadState::Idle => out.push_str("\nNo file selected (images and videos)\n"),
            UploadState::FileSelected(file) | UploadState::Uploading(file) => {
                out.push_str("\nSelected File\n");
                out.push_str(&file.summary());
                out.push('\n');
            }
        }

        if let Some(error) = &self.error {
            out.push_str(&format!("\nError: {}\n", error));
        }

        let button = if self.is_uploading() { "Uploading..." } else { "Upload" };
        let disabled = if self.can_submit() { "" } else { " (disabled)" };
        out.push_str(&format!("\n[ {} ]{}", button, disabled));
        out
    }
}

/// Holds the form in `Uploading` while a request runs. Unless finished,
/// dropping it puts the file back as selected, so an abandoned submit leaves
/// the form retryable.
struct InFlight<'a> {
    state: &'a mut UploadState,
}

impl InFlight<'_> {
    fn finish(&mut self) {
        *self.state = UploadState::Idle;
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if let UploadState::Uploading(file) = std::mem::take(self.state) {
            *self.state = UploadState::FileSelected(file);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use adconsole_core::AssetId;
    use mockito::Server;
    use std::io::Write;

    fn client_for(server: &Server) -> ApiClient {
        ApiClient::new(format!("{}/api", server.url())).unwrap()
    }

    fn png_file(dir: &tempfile::TempDir) -> std::path::PathBuf {
        let path = dir.path().join("banner.png");
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(&[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 1, 2, 3, 4])
            .unwrap();
        path
    }

    #[tokio::test]
    async fn submit_without_file_makes_no_request() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", mockito::Matcher::Any)
            .expect(0)
            .create_async()
            .await;

        let mut form = UploadForm::new();
        let err = form.submit(&client_for(&server)).await.unwrap_err();

        mock.assert_async().await;
        assert!(err.is_validation());
        assert_eq!(form.error(), Some(NO_FILE_MESSAGE));
        assert_eq!(form.state(), &UploadState::Idle);
        assert!(form.render().contains("Error: Please select a file to upload"));
    }

    #[tokio::test]
    async fn successful_upload_navigates_to_detail() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/api/assets/upload")
            .match_body(mockito::Matcher::Regex("Spring promo".to_string()))
            .with_status(201)
            .with_body(r#"{"message": "ok", "asset": {"id": 77, "status": "uploaded"}}"#)
            .create_async()
            .await;

        let dir = tempfile::tempdir().unwrap();
        let mut form = UploadForm::new();
        form.select_path(png_file(&dir)).unwrap();
        form.set_name(Some("Spring promo".to_string()));
        assert!(form.can_submit());

        let route = form.submit(&client_for(&server)).await.unwrap();

        mock.assert_async().await;
        assert_eq!(route, Route::AssetDetail(AssetId::new("77")));
        assert_eq!(route.path(), "/asset/77");
        assert_eq!(form.state(), &UploadState::Idle);
    }

    #[tokio::test]
    async fn failed_upload_keeps_file_and_reports_error() {
        let mut server = Server::new_async().await;
        server
            .mock("POST", "/api/assets/upload")
            .with_status(500)
            .create_async()
            .await;

        let dir = tempfile::tempdir().unwrap();
        let mut form = UploadForm::new();
        form.select_path(png_file(&dir)).unwrap();

        let err = form.submit(&client_for(&server)).await.unwrap_err();

        assert_eq!(err.client_message(), "Failed to upload asset");
        assert_eq!(form.error(), Some("Failed to upload asset"));
        assert!(matches!(form.state(), UploadState::FileSelected(_)));
        assert!(form.render().ends_with("[ Upload ]"));
    }

    /// A backend that accepts connections and never answers.
    async fn silent_backend() -> (ApiClient, tokio::task::JoinHandle<()>) {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let handle = tokio::spawn(async move {
            let mut held = Vec::new();
            while let Ok((socket, _)) = listener.accept().await {
                held.push(socket);
            }
        });
        (ApiClient::new(format!("http://{}/api", addr)).unwrap(), handle)
    }

    #[tokio::test]
    async fn second_submit_while_uploading_is_rejected() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", mockito::Matcher::Any)
            .expect(0)
            .create_async()
            .await;

        let dir = tempfile::tempdir().unwrap();
        let file = SelectedFile::from_path(png_file(&dir), Accept::ImagesAndVideos).unwrap();
        let mut form = UploadForm::new();
        form.state = UploadState::Uploading(file);
        assert!(form.render().contains("[ Uploading... ] (disabled)"));

        let err = form.submit(&client_for(&server)).await.unwrap_err();

        mock.assert_async().await;
        assert_eq!(err.to_string(), IN_FLIGHT_MESSAGE);
        assert!(form.is_uploading());
    }

    #[tokio::test]
    async fn abandoned_submit_leaves_the_file_selected() {
        let (client, backend) = silent_backend().await;
        let dir = tempfile::tempdir().unwrap();
        let mut form = UploadForm::new();
        form.select_path(png_file(&dir)).unwrap();

        let outcome =
            tokio::time::timeout(std::time::Duration::from_millis(200), form.submit(&client))
                .await;
        backend.abort();

        assert!(outcome.is_err(), "silent backend should not answer");
        assert!(matches!(form.state(), UploadState::FileSelected(_)));
        assert!(form.can_submit());
        assert!(form.render().ends_with("[ Upload ]"));
    }

    #[test]
    fn rejected_file_is_reported() {
        let mut form = UploadForm::new();
        assert!(form.select_path("../outside.png").is_err());
        assert!(form.error().unwrap().starts_with("Invalid input"));
        assert_eq!(form.state(), &UploadState::Idle);
    }
}

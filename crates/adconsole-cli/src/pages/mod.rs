//! One module per console route.

pub mod detail;
pub mod list;
pub mod template_upload;
pub mod upload;

pub use detail::{AssetDetailPage, DetailOptions, UrlState};
pub use list::AssetListPage;
pub use template_upload::TemplateUploadForm;
pub use upload::{UploadForm, UploadState};

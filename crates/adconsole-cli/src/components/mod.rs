//! Reusable text components shared by the pages.

pub mod asset_card;
pub mod file_upload;
pub mod navbar;
pub mod status_badge;
pub mod tv_frame;

pub use asset_card::AssetCard;
pub use file_upload::{Accept, SelectedFile};
pub use navbar::Navbar;
pub use status_badge::render_badge;
pub use tv_frame::{TvBody, TvFrame};

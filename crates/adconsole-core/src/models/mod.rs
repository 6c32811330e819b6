pub mod asset;
pub mod presigned;
pub mod status;
pub mod template;

pub use asset::{parse_timestamp, Asset, AssetId, MediaKind, StorageLocation};
pub use presigned::{PresignedUrl, PresignedUrls};
pub use status::{AssetStatus, StatusBadge};
pub use template::{find_template, Template};

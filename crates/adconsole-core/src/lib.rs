//! Ad console core library
//!
//! Domain models, the status table, error types and configuration shared by
//! the API client and the console pages.

pub mod config;
pub mod error;
pub mod format;
pub mod models;

// Re-export commonly used types
pub use config::ConsoleConfig;
pub use error::{ConsoleError, ConsoleResult, ErrorMetadata, LogLevel};
pub use format::{format_date, format_datetime, format_file_size, truncate_string};
pub use models::{
    find_template, parse_timestamp, Asset, AssetId, AssetStatus, MediaKind, PresignedUrl,
    PresignedUrls, StatusBadge, StorageLocation, Template,
};

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};

use super::status::AssetStatus;

/// Backend identifier of an asset. Backends send either strings or integers;
/// both are kept as their string form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct AssetId(String);

impl AssetId {
    pub fn new(id: impl Into<String>) -> Self {
        AssetId(id.into())
    }

    /// `None` for an empty or whitespace-only identifier.
    pub fn parse(id: &str) -> Option<Self> {
        let trimmed = id.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(AssetId(trimmed.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for AssetId {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(&self.0)
    }
}

impl From<&str> for AssetId {
    fn from(value: &str) -> Self {
        AssetId(value.to_string())
    }
}

impl<'de> Deserialize<'de> for AssetId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawId {
            Text(String),
            Unsigned(u64),
            Signed(i64),
        }

        Ok(match RawId::deserialize(deserializer)? {
            RawId::Text(s) => AssetId(s),
            RawId::Unsigned(n) => AssetId(n.to_string()),
            RawId::Signed(n) => AssetId(n.to_string()),
        })
    }
}

/// Broad media category derived from the content type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Image,
    Video,
    Other,
}

impl MediaKind {
    pub fn from_content_type(content_type: Option<&str>) -> Self {
        match content_type {
            Some(ct) if ct.starts_with("image/") => MediaKind::Image,
            Some(ct) if ct.starts_with("video/") => MediaKind::Video,
            _ => MediaKind::Other,
        }
    }
}

/// Where the backend stored the original and the processed output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageLocation {
    pub bucket: Option<String>,
    pub key: String,
    pub output_key: Option<String>,
}

impl StorageLocation {
    /// Public S3 URL of the original upload, when the bucket is known.
    pub fn public_url(&self) -> Option<String> {
        self.bucket
            .as_ref()
            .map(|bucket| format!("https://{}.s3.amazonaws.com/{}", bucket, self.key))
    }
}

/// Normalized asset record.
///
/// Every backend shape is converted into this type when the response is
/// decoded, so nothing past the API client has to care which backend
/// produced it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "WireAsset")]
pub struct Asset {
    pub id: AssetId,
    pub name: Option<String>,
    pub content_type: Option<String>,
    pub file_size: Option<u64>,
    pub status: AssetStatus,
    pub storage: Option<StorageLocation>,
    pub created_at: Option<DateTime<Utc>>,
    pub processed_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    pub ad_url: Option<String>,
    pub thumbnail_url: Option<String>,
}

impl Asset {
    /// Name to show in headings: the file name, or `Asset {id}`.
    pub fn display_name(&self) -> String {
        match self.name.as_deref() {
            Some(name) if !name.trim().is_empty() => name.to_string(),
            _ => format!("Asset {}", self.id),
        }
    }

    pub fn media_kind(&self) -> MediaKind {
        MediaKind::from_content_type(self.content_type.as_deref())
    }

    pub fn is_in_progress(&self) -> bool {
        self.status.is_in_progress()
    }
}

/// Union of every field name the backends are known to send.
#[derive(Debug, Deserialize)]
struct WireAsset {
    id: AssetId,
    #[serde(default)]
    name: Option<String>,
    #[serde(default, alias = "fileName", alias = "filename")]
    file_name: Option<String>,
    #[serde(default, alias = "contentType", alias = "fileType")]
    content_type: Option<String>,
    #[serde(default, alias = "fileSize")]
    file_size: Option<u64>,
    #[serde(default)]
    status: AssetStatus,
    #[serde(default)]
    s3_bucket: Option<String>,
    #[serde(default)]
    s3_key: Option<String>,
    #[serde(default)]
    output_s3_key: Option<String>,
    #[serde(default, alias = "uploadedAt", deserialize_with = "lenient_timestamp")]
    uploaded_at: Option<DateTime<Utc>>,
    #[serde(default, alias = "createdAt", deserialize_with = "lenient_timestamp")]
    created_at: Option<DateTime<Utc>>,
    #[serde(default, alias = "processedAt", deserialize_with = "lenient_timestamp")]
    processed_at: Option<DateTime<Utc>>,
    #[serde(default, alias = "updatedAt", deserialize_with = "lenient_timestamp")]
    updated_at: Option<DateTime<Utc>>,
    #[serde(default, alias = "adUrl")]
    ad_url: Option<String>,
    #[serde(default, alias = "thumbnailUrl")]
    thumbnail_url: Option<String>,
    // Present when an `Asset` is serialized by this crate and read back.
    #[serde(default)]
    storage: Option<StorageLocation>,
}

impl From<WireAsset> for Asset {
    fn from(wire: WireAsset) -> Self {
        let storage = wire.storage.or_else(|| {
            wire.s3_key.map(|key| StorageLocation {
                bucket: wire.s3_bucket,
                key,
                output_key: wire.output_s3_key,
            })
        });

        Asset {
            id: wire.id,
            name: wire.file_name.or(wire.name),
            content_type: wire.content_type,
            file_size: wire.file_size,
            status: wire.status,
            storage,
            created_at: wire.uploaded_at.or(wire.created_at),
            processed_at: wire.processed_at,
            updated_at: wire.updated_at,
            ad_url: wire.ad_url,
            thumbnail_url: wire.thumbnail_url,
        }
    }
}

/// Parse the timestamp formats seen from the backends. Unparseable values
/// become `None` rather than failing the whole record.
pub fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(value, format) {
            return Some(Utc.from_utc_datetime(&naive));
        }
    }
    None
}

fn lenient_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawTimestamp {
        Text(String),
        Millis(i64),
    }

    Ok(match Option::<RawTimestamp>::deserialize(deserializer)? {
        Some(RawTimestamp::Text(s)) => parse_timestamp(&s),
        Some(RawTimestamp::Millis(ms)) => Utc.timestamp_millis_opt(ms).single(),
        None => None,
    })
}

//! Domain methods for the asset backend.
//!
//! Backends wrap some responses in envelopes (`{assets: [...]}`,
//! `{message, asset}`) and not others; the private wire enums below accept
//! both and hand callers the plain resource.

use crate::ApiClient;
use adconsole_core::{
    Asset, AssetId, AssetStatus, ConsoleError, ConsoleResult, PresignedUrl, PresignedUrls,
    Template,
};
use reqwest::Method;
use serde::{Deserialize, Serialize};

/// Result of `GET /assets`, whatever shape the backend used.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssetListing {
    pub assets: Vec<Asset>,
    pub total: u64,
    pub limit: Option<u64>,
    pub offset: Option<u64>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ListingWire {
    Enveloped {
        assets: Vec<Asset>,
        #[serde(default)]
        total: Option<u64>,
        #[serde(default)]
        limit: Option<u64>,
        #[serde(default)]
        offset: Option<u64>,
    },
    Bare(Vec<Asset>),
}

impl From<ListingWire> for AssetListing {
    fn from(wire: ListingWire) -> Self {
        match wire {
            ListingWire::Enveloped {
                assets,
                total,
                limit,
                offset,
            } => AssetListing {
                total: total.unwrap_or(assets.len() as u64),
                assets,
                limit,
                offset,
            },
            ListingWire::Bare(assets) => AssetListing {
                total: assets.len() as u64,
                assets,
                limit: None,
                offset: None,
            },
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum AssetWire {
    Enveloped { asset: Asset },
    Bare(Asset),
}

impl AssetWire {
    fn into_asset(self) -> Asset {
        match self {
            AssetWire::Enveloped { asset } | AssetWire::Bare(asset) => asset,
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum TemplatesWire {
    Enveloped { templates: Vec<Template> },
    Bare(Vec<Template>),
}

/// Acknowledgement of a template upload. Backends answer with the created
/// template, an envelope around it, or only a message.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateUploaded {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub template: Option<Template>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum TemplateUploadWire {
    Bare(Template),
    Ack(TemplateUploaded),
}

/// Body of a successful `DELETE /assets/{id}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteConfirmation {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub id: Option<AssetId>,
}

#[derive(Serialize)]
struct StatusUpdate {
    status: AssetStatus,
}

/// File contents ready to be sent as the `file` part of a multipart upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadFile {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl UploadFile {
    pub fn new(
        file_name: impl Into<String>,
        content_type: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: content_type.into(),
            bytes,
        }
    }

    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }

    fn into_form(self, name: &str) -> ConsoleResult<reqwest::multipart::Form> {
        let part = reqwest::multipart::Part::bytes(self.bytes)
            .file_name(self.file_name)
            .mime_str(&self.content_type)
            .map_err(|_| {
                ConsoleError::validation(format!("Invalid content type: {}", self.content_type))
            })?;

        Ok(reqwest::multipart::Form::new()
            .part("file", part)
            .text("name", name.to_string()))
    }
}

fn asset_path(id: &AssetId) -> String {
    format!("/assets/{}", urlencoding::encode(id.as_str()))
}

impl ApiClient {
    /// List all assets.
    pub async fn list_assets(&self) -> ConsoleResult<AssetListing> {
        let wire: ListingWire = self.get("/assets", &[], "Failed to fetch assets").await?;
        let listing = AssetListing::from(wire);
        tracing::debug!(count = listing.assets.len(), total = listing.total, "Fetched assets");
        Ok(listing)
    }

    /// Get a single asset by ID.
    pub async fn get_asset(&self, id: &AssetId) -> ConsoleResult<Asset> {
        let wire: AssetWire = self
            .get(
                &asset_path(id),
                &[],
                &format!("Failed to fetch asset {}", id),
            )
            .await?;
        Ok(wire.into_asset())
    }

    /// Upload a new asset; `name` is the display name sent alongside the file.
    #[tracing::instrument(skip(self, file), fields(file_name = %file.file_name, size = file.size()))]
    pub async fn upload_asset(&self, file: UploadFile, name: &str) -> ConsoleResult<Asset> {
        let form = file.into_form(name)?;
        let wire: AssetWire = self
            .post_multipart(self.upload_path(), form, "Failed to upload asset")
            .await?;
        let asset = wire.into_asset();
        tracing::info!(asset_id = %asset.id, status = %asset.status, "Asset uploaded");
        Ok(asset)
    }

    /// Upload a template video under `name`.
    #[tracing::instrument(skip(self, file), fields(file_name = %file.file_name))]
    pub async fn upload_template(
        &self,
        file: UploadFile,
        name: &str,
    ) -> ConsoleResult<TemplateUploaded> {
        let form = file.into_form(name)?;
        let wire: Option<TemplateUploadWire> = self
            .post_multipart("/templates/upload", form, "Failed to upload template")
            .await?;
        let ack = match wire {
            Some(TemplateUploadWire::Bare(template)) => TemplateUploaded {
                message: None,
                template: Some(template),
            },
            Some(TemplateUploadWire::Ack(ack)) => ack,
            None => TemplateUploaded::default(),
        };
        tracing::info!(template = name, "Template uploaded");
        Ok(ack)
    }

    /// List available templates.
    pub async fn list_templates(&self) -> ConsoleResult<Vec<Template>> {
        let wire: TemplatesWire = self
            .get("/templates", &[], "Failed to fetch templates")
            .await?;
        Ok(match wire {
            TemplatesWire::Enveloped { templates } | TemplatesWire::Bare(templates) => templates,
        })
    }

    /// Replace an asset's status and return the updated record.
    pub async fn update_asset_status(
        &self,
        id: &AssetId,
        status: AssetStatus,
    ) -> ConsoleResult<Asset> {
        let wire: AssetWire = self
            .send_json(
                Method::PATCH,
                &format!("{}/status", asset_path(id)),
                &StatusUpdate { status },
                "Failed to update asset status",
            )
            .await?;
        let asset = wire.into_asset();
        tracing::info!(asset_id = %id, status = %asset.status, "Asset status updated");
        Ok(asset)
    }

    /// Delete an asset by ID.
    pub async fn delete_asset(&self, id: &AssetId) -> ConsoleResult<DeleteConfirmation> {
        let confirmation: Option<DeleteConfirmation> = self
            .delete(&asset_path(id), &format!("Failed to delete asset {}", id))
            .await?;
        tracing::info!(asset_id = %id, "Asset deleted");
        Ok(confirmation.unwrap_or_default())
    }

    /// Single presigned link to the asset's stored content.
    pub async fn get_presigned_url(
        &self,
        id: &AssetId,
        expiration_minutes: u32,
    ) -> ConsoleResult<PresignedUrl> {
        self.get(
            &format!("{}/url", asset_path(id)),
            &[("expiration", expiration_minutes.to_string())],
            "Failed to get presigned URL",
        )
        .await
    }

    /// Presigned input and output links for an asset.
    pub async fn get_presigned_urls(
        &self,
        id: &AssetId,
        expiration_minutes: u32,
    ) -> ConsoleResult<PresignedUrls> {
        self.get(
            &format!("{}/urls", asset_path(id)),
            &[("expiration", expiration_minutes.to_string())],
            "Failed to get presigned URLs",
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn listing_accepts_bare_array() {
        let wire: ListingWire =
            serde_json::from_value(json!([{ "id": 1, "status": "uploaded" }])).unwrap();
        let listing = AssetListing::from(wire);
        assert_eq!(listing.total, 1);
        assert!(listing.limit.is_none());
    }

    #[test]
    fn listing_accepts_envelope() {
        let wire: ListingWire = serde_json::from_value(json!({
            "assets": [{ "id": 1 }, { "id": 2 }],
            "total": 10,
            "limit": 2,
            "offset": 4
        }))
        .unwrap();
        let listing = AssetListing::from(wire);
        assert_eq!(listing.assets.len(), 2);
        assert_eq!(listing.total, 10);
        assert_eq!(listing.offset, Some(4));
    }

    #[test]
    fn asset_envelope_is_unwrapped() {
        let wire: AssetWire = serde_json::from_value(json!({
            "message": "Asset uploaded",
            "asset": { "id": "abc", "status": "pending" }
        }))
        .unwrap();
        assert_eq!(wire.into_asset().id.as_str(), "abc");
    }

    #[test]
    fn template_upload_ack_shapes() {
        let bare: TemplateUploadWire =
            serde_json::from_value(json!({ "name": "intro", "url": "https://t/intro.mp4" }))
                .unwrap();
        assert!(matches!(bare, TemplateUploadWire::Bare(_)));

        let ack: TemplateUploadWire =
            serde_json::from_value(json!({ "message": "Template uploaded" })).unwrap();
        match ack {
            TemplateUploadWire::Ack(ack) => {
                assert_eq!(ack.message.as_deref(), Some("Template uploaded"));
                assert!(ack.template.is_none());
            }
            TemplateUploadWire::Bare(_) => panic!("expected acknowledgement"),
        }
    }

    #[test]
    fn asset_path_escapes_ids() {
        assert_eq!(asset_path(&AssetId::new("a b/c")), "/assets/a%20b%2Fc");
    }

    #[test]
    fn status_update_body_uses_canonical_name() {
        let body = serde_json::to_value(StatusUpdate {
            status: AssetStatus::Processing,
        })
        .unwrap();
        assert_eq!(body, json!({ "status": "processing" }));
    }
}

//! Asset detail page: live status, metadata, presigned links and preview.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use adconsole_api_client::{log_error, ApiClient, AssetState, AssetWatch, StatusWatcher};
use adconsole_core::{
    find_template, format_datetime, format_file_size, Asset, AssetId, AssetStatus,
    ErrorMetadata, MediaKind, PresignedUrls, Template,
};

use crate::components::{render_badge, Navbar, TvBody, TvFrame};
use crate::router::Route;

/// Knobs the binary passes through from config and flags.
#[derive(Debug, Clone)]
pub struct DetailOptions {
    pub poll_interval: Duration,
    pub url_expiration_minutes: u32,
    pub template: Option<String>,
}

/// Presigned links for the current asset.
#[derive(Debug, Clone, PartialEq)]
pub enum UrlState {
    Pending,
    Loaded(PresignedUrls),
    Failed(String),
}

pub struct AssetDetailPage {
    client: ApiClient,
    route: Route,
    options: DetailOptions,
    watch: AssetWatch,
    templates: Vec<Template>,
    urls: UrlState,
    // (id, status) the current links were fetched for.
    urls_for: Option<(AssetId, AssetStatus)>,
}

impl AssetDetailPage {
    /// Start watching the asset and load the template list.
    pub async fn open(client: ApiClient, asset_id: AssetId, options: DetailOptions) -> Self {
        let watcher = StatusWatcher::with_interval(options.poll_interval);
        let watch = watcher.watch(Arc::new(client.clone()), Some(asset_id.clone()));

        let templates = match client.list_templates().await {
            Ok(templates) => templates,
            Err(e) => {
                log_error(&e, "Failed to load templates");
                Vec::new()
            }
        };

        Self {
            client,
            route: Route::AssetDetail(asset_id),
            options,
            watch,
            templates,
            urls: UrlState::Pending,
            urls_for: None,
        }
    }

    pub fn state(&self) -> AssetState {
        self.watch.state()
    }

    pub fn urls(&self) -> &UrlState {
        &self.urls
    }

    pub fn templates(&self) -> &[Template] {
        &self.templates
    }

    /// Wait for the first response, then bring the links up to date.
    pub async fn load(&mut self) {
        while self.watch.state().loading {
            if !self.watch.changed().await {
                break;
            }
        }
        self.sync_urls().await;
    }

    /// Whether polling has stopped for good: the asset settled, or it never
    /// loaded at all.
    pub fn is_settled(&self) -> bool {
        let state = self.watch.state();
        match state.asset {
            Some(asset) => !asset.is_in_progress(),
            None => !state.loading,
        }
    }

    /// Re-render on every watcher update until the asset settles or the user
    /// interrupts.
    pub async fn follow(&mut self, on_update: impl FnMut(&str)) {
        self.follow_until(tokio::signal::ctrl_c(), on_update).await
    }

    /// `follow`, stopping as soon as `interrupt` completes. Every wait races
    /// it, the first load and link refreshes included.
    pub async fn follow_until<F: Future>(
        &mut self,
        interrupt: F,
        mut on_update: impl FnMut(&str),
    ) {
        tokio::pin!(interrupt);

        tokio::select! {
            _ = self.load() => {}
            _ = &mut interrupt => return interrupted(),
        }
        on_update(&self.render());

        while !self.is_settled() {
            tokio::select! {
                changed = self.watch.changed() => {
                    if !changed {
                        break;
                    }
                }
                _ = &mut interrupt => return interrupted(),
            }
            tokio::select! {
                _ = self.sync_urls() => {}
                _ = &mut interrupt => return interrupted(),
            }
            on_update(&self.render());
        }
    }

    /// Stop the status watcher. Dropping the page does the same.
    pub fn close(self) {
        self.watch.detach();
    }

    /// Refetch presigned links when the asset's id or status changed.
    async fn sync_urls(&mut self) {
        let Some(asset) = self.watch.state().asset else {
            return;
        };
        let key = (asset.id.clone(), asset.status);
        if self.urls_for.as_ref() == Some(&key) {
            return;
        }

        self.urls = match self
            .client
            .get_presigned_urls(&asset.id, self.options.url_expiration_minutes)
            .await
        {
            Ok(urls) => UrlState::Loaded(urls),
            Err(e) => {
                let _span = tracing::debug_span!("presigned_urls", asset_id = %asset.id).entered();
                log_error(&e, "Failed to load presigned URLs");
                UrlState::Failed(e.client_message())
            }
        };
        self.urls_for = Some(key);
    }

    pub fn render(&self) -> String {
        let nav = Navbar::new(Some(&self.route)).render();
        let body = render_detail(
            &self.watch.state(),
            &self.urls,
            &self.templates,
            self.options.template.as_deref(),
        );
        format!("{}\n\n{}", nav, body)
    }
}

fn interrupted() {
    tracing::info!("Interrupted, stopping status watch");
}

/// Page body for one snapshot of the watcher and the links.
pub fn render_detail(
    state: &AssetState,
    urls: &UrlState,
    templates: &[Template],
    selected_template: Option<&str>,
) -> String {
    let asset = match (&state.asset, &state.error) {
        (Some(asset), _) => asset,
        (None, _) if state.loading => return "Loading asset details...".to_string(),
        (None, Some(error)) => {
            return format!(
                "Error loading asset: {}\n\n← Back to Assets: adconsole list",
                error
            )
        }
        (None, None) => return "Asset not found\n\n← Back to Assets: adconsole list".to_string(),
    };

    let mut out = String::new();
    out.push_str(&format!("{}  {}\n", asset.display_name(), render_badge(asset.status)));
    if let Some(error) = &state.error {
        out.push_str(&format!("⚠ Error loading asset: {} (showing last known state)\n", error));
    }

    out.push_str("\nAsset Information\n");
    push_field(&mut out, "Asset ID", asset.id.as_str());
    push_field(&mut out, "File Name", asset.name.as_deref().unwrap_or("N/A"));
    push_field(
        &mut out,
        "Content Type",
        asset.content_type.as_deref().unwrap_or("Unknown"),
    );
    push_field(&mut out, "File Size", &format_file_size(asset.file_size));
    push_field(&mut out, "Status", &render_badge(asset.status));
    push_field(&mut out, "Uploaded At", &format_datetime(asset.created_at.as_ref()));
    if asset.processed_at.is_some() {
        push_field(&mut out, "Processed At", &format_datetime(asset.processed_at.as_ref()));
    }
    push_field(&mut out, "Last Updated", &format_datetime(asset.updated_at.as_ref()));

    if let Some(storage) = &asset.storage {
        out.push_str("\nStorage Information\n");
        push_field(&mut out, "S3 Bucket", storage.bucket.as_deref().unwrap_or("N/A"));
        push_field(&mut out, "S3 Key", &storage.key);
        if let Some(output_key) = &storage.output_key {
            push_field(&mut out, "Output Key", output_key);
        }
    }

    out.push_str("\nLinks\n");
    match urls {
        UrlState::Pending => out.push_str("  Loading links...\n"),
        UrlState::Loaded(urls) => {
            push_field(&mut out, "Input URL", urls.input_url.as_deref().unwrap_or("N/A"));
            push_field(&mut out, "Output URL", urls.output_url.as_deref().unwrap_or("N/A"));
        }
        UrlState::Failed(message) => {
            out.push_str(&format!("  Could not load links: {}\n", message));
        }
    }

    out.push('\n');
    match asset.status {
        AssetStatus::Pending | AssetStatus::Processing => {
            out.push_str("Asset is uploaded and is being processed.\n");
        }
        AssetStatus::Ready => out.push_str(&render_preview(asset, urls, templates, selected_template)),
        AssetStatus::Failed => {
            out.push_str("Processing failed. Upload the asset again to retry.\n");
        }
    }

    out.push_str("\n← Back to Assets: adconsole list");
    out
}

fn push_field(out: &mut String, label: &str, value: &str) {
    out.push_str(&format!("  {:<14} {}\n", format!("{}:", label), value));
}

/// Output preview for a ready asset, plus the selected template if any.
fn render_preview(
    asset: &Asset,
    urls: &UrlState,
    templates: &[Template],
    selected_template: Option<&str>,
) -> String {
    let mut out = String::from("Asset Preview\n");

    let output_url = match urls {
        UrlState::Loaded(urls) => urls.output_url.clone(),
        _ => None,
    }
    .or_else(|| asset.ad_url.clone())
    .or_else(|| asset.storage.as_ref().and_then(|s| s.public_url()));

    match (output_url, asset.media_kind()) {
        (Some(url), MediaKind::Image) => {
            out.push_str(&TvFrame::new(TvBody::Content(format!("🖼 {}", url))).render());
        }
        (Some(url), _) => out.push_str(&TvFrame::video(url).render()),
        (None, _) => out.push_str("Preview not available"),
    }
    out.push('\n');

    out.push_str("\nTemplates: ");
    if templates.is_empty() {
        out.push_str("none available\n");
    } else {
        let names: Vec<&str> = templates.iter().map(|t| t.name.as_str()).collect();
        out.push_str(&names.join(", "));
        out.push('\n');
    }

    if let Some(name) = selected_template {
        match find_template(templates, name) {
            Some(template) => {
                out.push('\n');
                out.push_str(
                    &TvFrame::video(template.url.clone())
                        .with_title(format!("Template: {}", template.name))
                        .render(),
                );
                out.push('\n');
            }
            None => out.push_str(&format!("Template '{}' not found\n", name.trim())),
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn asset(json: &str) -> Asset {
        serde_json::from_str(json).unwrap()
    }

    fn loaded(asset: Asset) -> AssetState {
        AssetState {
            asset: Some(asset),
            loading: false,
            error: None,
        }
    }

    fn templates() -> Vec<Template> {
        vec![Template {
            name: "kitchen".into(),
            url: "https://t/kitchen.mp4".into(),
        }]
    }

    #[test]
    fn loading_error_and_not_found_branches() {
        let loading = render_detail(&AssetState::initial(), &UrlState::Pending, &[], None);
        assert_eq!(loading, "Loading asset details...");

        let failed = AssetState {
            asset: None,
            loading: false,
            error: Some("Asset not found".into()),
        };
        let out = render_detail(&failed, &UrlState::Pending, &[], None);
        assert!(out.starts_with("Error loading asset: Asset not found"));

        let empty = AssetState {
            asset: None,
            loading: false,
            error: None,
        };
        let out = render_detail(&empty, &UrlState::Pending, &[], None);
        assert!(out.starts_with("Asset not found"));
    }

    #[test]
    fn in_progress_asset_shows_processing_notice() {
        let a = asset(
            r#"{"id": 4, "file_name": "spot.mp4", "file_size": 5242880, "status": "uploaded",
                "s3_bucket": "ads", "s3_key": "raw/spot.mp4"}"#,
        );
        let out = render_detail(&loaded(a), &UrlState::Pending, &[], None);

        assert!(out.starts_with("spot.mp4  [⏳ Pending]"));
        assert!(out.contains("5.00 MB"));
        assert!(out.contains("Storage Information"));
        assert!(out.contains("raw/spot.mp4"));
        assert!(out.contains("Loading links..."));
        assert!(out.contains("Asset is uploaded and is being processed."));
        assert!(!out.contains("Asset Preview"));
    }

    #[test]
    fn ready_asset_previews_output_and_template() {
        let a = asset(r#"{"id": 4, "name": "spot.mp4", "content_type": "video/mp4", "status": "ready"}"#);
        let urls = UrlState::Loaded(PresignedUrls {
            input_url: Some("https://s3/in".into()),
            output_url: Some("https://s3/out".into()),
        });
        let out = render_detail(&loaded(a), &urls, &templates(), Some("kitchen"));

        assert!(out.contains("Input URL:"));
        assert!(out.contains("Asset Preview"));
        assert!(out.contains("https://s3/out"));
        assert!(out.contains("Output Preview"));
        assert!(out.contains("Template: kitchen"));
        assert!(out.contains("https://t/kitchen.mp4"));
    }

    #[test]
    fn unknown_template_is_reported() {
        let a = asset(r#"{"id": 4, "status": "ready", "adUrl": "https://cdn/ad.mp4"}"#);
        let out = render_detail(&loaded(a), &UrlState::Pending, &templates(), Some("garage"));

        assert!(out.contains("https://cdn/ad.mp4"));
        assert!(out.contains("Template 'garage' not found"));
    }

    #[test]
    fn url_failure_keeps_asset_visible() {
        let a = asset(r#"{"id": 4, "status": "processed"}"#);
        let out = render_detail(
            &loaded(a),
            &UrlState::Failed("Failed to get presigned URLs".into()),
            &[],
            None,
        );

        assert!(out.contains("Asset 4"));
        assert!(out.contains("Could not load links: Failed to get presigned URLs"));
        assert!(out.contains("Preview not available"));
        assert!(out.contains("Templates: none available"));
    }

    #[test]
    fn refresh_error_keeps_last_asset() {
        let mut state = loaded(asset(r#"{"id": 4, "status": "processing"}"#));
        state.error = Some("Network error".into());
        let out = render_detail(&state, &UrlState::Pending, &[], None);

        assert!(out.starts_with("Asset 4  [⚙️ Processing]"));
        assert!(out.contains("⚠ Error loading asset: Network error"));
    }

    #[test]
    fn failed_asset_shows_notice() {
        let out = render_detail(
            &loaded(asset(r#"{"id": 4, "status": "failed"}"#)),
            &UrlState::Pending,
            &[],
            None,
        );
        assert!(out.contains("Processing failed"));
    }
}

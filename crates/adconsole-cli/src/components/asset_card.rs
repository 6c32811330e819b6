use adconsole_core::{format_date, format_file_size, truncate_string, Asset};

use super::status_badge::render_badge;
use crate::view::ViewMode;

const CARD_WIDTH: usize = 40;

/// Summary of one asset, either as a boxed grid card or a table row.
pub struct AssetCard<'a> {
    asset: &'a Asset,
    mode: ViewMode,
}

impl<'a> AssetCard<'a> {
    pub fn new(asset: &'a Asset, mode: ViewMode) -> Self {
        Self { asset, mode }
    }

    pub fn render(&self) -> String {
        match self.mode {
            ViewMode::Grid => self.render_card(),
            ViewMode::List => self.render_row(),
        }
    }

    /// Column headings matching [`AssetCard::render_row`].
    pub fn list_header() -> String {
        let header = format!(
            "{:<12} {:<30} {:<16} {:>10} {:<10} {}",
            "ID", "NAME", "TYPE", "SIZE", "UPLOADED", "STATUS"
        );
        format!("{}\n{}", header, "-".repeat(header.chars().count()))
    }

    fn content_type(&self) -> &str {
        self.asset.content_type.as_deref().unwrap_or("Unknown")
    }

    fn render_card(&self) -> String {
        let inner = CARD_WIDTH - 4;
        let rule = format!("+{}+", "-".repeat(CARD_WIDTH - 2));
        let lines = [
            truncate_string(&self.asset.display_name(), inner),
            truncate_string(&format!("ID: {}", self.asset.id), inner),
            truncate_string(&format!("Type: {}", self.content_type()), inner),
            format!("Size: {}", format_file_size(self.asset.file_size)),
            format!("Uploaded: {}", format_date(self.asset.created_at.as_ref())),
            render_badge(self.asset.status),
        ];

        let mut out = rule.clone();
        for line in lines {
            out.push_str(&format!("\n| {} ", line));
        }
        out.push('\n');
        out.push_str(&rule);
        out
    }

    fn render_row(&self) -> String {
        format!(
            "{:<12} {:<30} {:<16} {:>10} {:<10} {}",
            truncate_string(self.asset.id.as_str(), 12),
            truncate_string(&self.asset.display_name(), 30),
            truncate_string(self.content_type(), 16),
            format_file_size(self.asset.file_size),
            format_date(self.asset.created_at.as_ref()),
            render_badge(self.asset.status),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn asset(json: &str) -> Asset {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn grid_card_shows_all_fields() {
        let a = asset(
            r#"{"id": 3, "file_name": "spot.mp4", "content_type": "video/mp4",
                "file_size": 2048, "status": "processing",
                "created_at": "2024-03-01T10:00:00Z"}"#,
        );
        let card = AssetCard::new(&a, ViewMode::Grid).render();

        assert!(card.starts_with('+'));
        assert!(card.contains("| spot.mp4"));
        assert!(card.contains("ID: 3"));
        assert!(card.contains("Type: video/mp4"));
        assert!(card.contains("Size: 2.00 KB"));
        assert!(card.contains("Uploaded: 2024-03-01"));
        assert!(card.contains("[⚙️ Processing]"));
    }

    #[test]
    fn missing_fields_fall_back() {
        let a = asset(r#"{"id": "abc"}"#);
        let card = AssetCard::new(&a, ViewMode::Grid).render();

        assert!(card.contains("| Asset abc"));
        assert!(card.contains("Type: Unknown"));
        assert!(card.contains("Size: N/A"));
        assert!(card.contains("Uploaded: N/A"));
        assert!(card.contains("[⏳ Pending]"));
    }

    #[test]
    fn list_row_is_single_line() {
        let a = asset(r#"{"id": 9, "file_name": "banner.png", "file_size": 512, "status": "ready"}"#);
        let row = AssetCard::new(&a, ViewMode::List).render();

        assert_eq!(row.lines().count(), 1);
        assert!(row.starts_with("9 "));
        assert!(row.contains("512 B"));
        assert!(row.ends_with("[✓ Ready]"));
    }
}

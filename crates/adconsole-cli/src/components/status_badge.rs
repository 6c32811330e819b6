use adconsole_core::{AssetStatus, StatusBadge};

/// Bracketed badge, e.g. `[⏳ Pending]`.
pub fn render_badge(status: AssetStatus) -> String {
    format!("[{}]", StatusBadge::for_status(status))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_each_status() {
        assert_eq!(render_badge(AssetStatus::Pending), "[⏳ Pending]");
        assert_eq!(render_badge(AssetStatus::Processing), "[⚙️ Processing]");
        assert_eq!(render_badge(AssetStatus::Ready), "[✓ Ready]");
        assert_eq!(render_badge(AssetStatus::Failed), "[✗ Failed]");
    }
}

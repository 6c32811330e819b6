use adconsole_api_client::{log_error, ApiClient, AssetListing};

use crate::components::{AssetCard, Navbar};
use crate::router::Route;
use crate::view::{ViewMode, ViewState};

pub const EMPTY_MESSAGE: &str = "No assets found. Upload your first asset to get started!";

/// `/`: every asset, as cards or rows.
pub struct AssetListPage {
    mode: ViewMode,
    state: ViewState<AssetListing>,
}

impl AssetListPage {
    pub fn new(mode: ViewMode) -> Self {
        Self {
            mode,
            state: ViewState::Loading,
        }
    }

    pub async fn load(&mut self, client: &ApiClient) {
        self.state = ViewState::Loading;
        let result = client.list_assets().await;
        if let Err(e) = &result {
            log_error(e, "Failed to load assets");
        }
        self.state = ViewState::from_result(result, |listing| listing.assets.is_empty());
    }

    pub fn state(&self) -> &ViewState<AssetListing> {
        &self.state
    }

    pub fn render(&self) -> String {
        let mut out = Navbar::new(Some(&Route::AssetList)).render();
        out.push_str("\n\nAssets");

        match &self.state {
            ViewState::Loading => out.push_str("\n\nLoading assets..."),
            ViewState::Error(message) => {
                out.push_str(&format!(
                    "\n\nFailed to load assets: {}\nRun `adconsole list` to try again.",
                    message
                ));
            }
            ViewState::Empty => {
                out.push_str(&format!("\n\n{}\n+ Upload Asset: adconsole upload <file>", EMPTY_MESSAGE));
            }
            ViewState::Ready(listing) => {
                out.push_str(&format!(" ({} total)\n\n", listing.total));
                let rendered: Vec<String> = listing
                    .assets
                    .iter()
                    .map(|asset| AssetCard::new(asset, self.mode).render())
                    .collect();
                match self.mode {
                    ViewMode::Grid => out.push_str(&rendered.join("\n")),
                    ViewMode::List => {
                        out.push_str(&AssetCard::list_header());
                        out.push('\n');
                        out.push_str(&rendered.join("\n"));
                    }
                }
            }
        }
        out
    }
}

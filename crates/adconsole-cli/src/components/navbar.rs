use crate::router::Route;

pub const BRAND: &str = "📺 Screensaver Ad Platform";

const LINKS: [(&str, Route); 3] = [
    ("Assets", Route::AssetList),
    ("Upload", Route::Upload),
    ("Templates", Route::TemplateUpload),
];

/// Top bar with the brand and the three console links.
pub struct Navbar<'a> {
    active: Option<&'a Route>,
}

impl<'a> Navbar<'a> {
    pub fn new(active: Option<&'a Route>) -> Self {
        Self { active }
    }

    pub fn render(&self) -> String {
        let links: Vec<String> = LINKS
            .iter()
            .map(|(label, route)| {
                if self.is_active(route) {
                    format!("[{}]", label)
                } else {
                    format!(" {} ", label)
                }
            })
            .collect();
        let bar = format!("{}   {}", BRAND, links.join(" "));
        let rule = "=".repeat(bar.chars().count());
        format!("{}\n{}", bar, rule)
    }

    /// Detail pages highlight Assets, since that is where they are reached from.
    fn is_active(&self, link: &Route) -> bool {
        match (self.active, link) {
            (Some(Route::AssetDetail(_)), Route::AssetList) => true,
            (Some(active), link) => active == link,
            (None, _) => false,
        }
    }
}

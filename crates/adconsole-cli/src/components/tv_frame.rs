const SCREEN_WIDTH: usize = 56;
pub const DEFAULT_TITLE: &str = "Output Preview";

/// What plays inside the frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TvBody {
    /// A looping, muted, autoplaying video.
    Video { url: String },
    /// Any pre-rendered text.
    Content(String),
}

/// TV-shaped chrome around a preview, with a caption underneath.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TvFrame {
    title: String,
    body: TvBody,
}

impl TvFrame {
    pub fn new(body: TvBody) -> Self {
        Self {
            title: DEFAULT_TITLE.to_string(),
            body,
        }
    }

    pub fn video(url: impl Into<String>) -> Self {
        Self::new(TvBody::Video { url: url.into() })
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn render(&self) -> String {
        let screen: Vec<String> = match &self.body {
            TvBody::Video { url } => vec![
                "▶ autoplay · loop · muted".to_string(),
                url.clone(),
            ],
            TvBody::Content(text) => text.lines().map(str::to_string).collect(),
        };

        let mut out = format!("╔{}╗\n", "═".repeat(SCREEN_WIDTH + 2));
        for line in screen {
            out.push_str(&screen_line(&line));
        }
        out.push_str(&format!("╚{}╝\n", "═".repeat(SCREEN_WIDTH + 2)));
        let stand = "▄".repeat(12);
        out.push_str(&format!("{:^width$}\n", stand, width = SCREEN_WIDTH + 4));
        out.push_str(&format!("{:^width$}", self.title, width = SCREEN_WIDTH + 4));
        out
    }
}

/// One screen row per `SCREEN_WIDTH` characters; long lines wrap.
fn screen_line(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    if chars.is_empty() {
        return screen_row("");
    }
    chars
        .chunks(SCREEN_WIDTH)
        .map(|row| screen_row(&row.iter().collect::<String>()))
        .collect()
}

fn screen_row(text: &str) -> String {
    let pad = SCREEN_WIDTH - text.chars().count();
    format!("║ {}{} ║\n", text, " ".repeat(pad))
}

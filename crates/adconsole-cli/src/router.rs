//! Console paths and the pages they open.

use adconsole_core::{AssetId, ConsoleError};
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// `/`
    AssetList,
    /// `/asset/:id`
    AssetDetail(AssetId),
    /// `/upload`
    Upload,
    /// `/upload-template`
    TemplateUpload,
}

impl Route {
    pub fn parse(path: &str) -> Result<Self, ConsoleError> {
        let trimmed = path.trim();
        let normalized = trimmed.trim_end_matches('/');
        let segments: Vec<&str> = normalized
            .trim_start_matches('/')
            .split('/')
            .filter(|s| !s.is_empty())
            .collect();

        match segments.as_slice() {
            [] if trimmed.starts_with('/') => Ok(Route::AssetList),
            ["upload"] => Ok(Route::Upload),
            ["upload-template"] => Ok(Route::TemplateUpload),
            ["asset", id] => AssetId::parse(id)
                .map(Route::AssetDetail)
                .ok_or_else(|| no_route(path)),
            _ => Err(no_route(path)),
        }
    }

    pub fn path(&self) -> String {
        match self {
            Route::AssetList => "/".to_string(),
            Route::AssetDetail(id) => format!("/asset/{}", id),
            Route::Upload => "/upload".to_string(),
            Route::TemplateUpload => "/upload-template".to_string(),
        }
    }
}

fn no_route(path: &str) -> ConsoleError {
    ConsoleError::validation(format!("No route matches '{}'", path))
}

impl FromStr for Route {
    type Err = ConsoleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Route::parse(s)
    }
}

impl Display for Route {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(&self.path())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_the_four_routes() {
        assert_eq!(Route::parse("/").unwrap(), Route::AssetList);
        assert_eq!(
            Route::parse("/asset/42").unwrap(),
            Route::AssetDetail(AssetId::new("42"))
        );
        assert_eq!(Route::parse("/upload").unwrap(), Route::Upload);
        assert_eq!(Route::parse("/upload-template/").unwrap(), Route::TemplateUpload);
    }

    #[test]
    fn paths_round_trip() {
        for route in [
            Route::AssetList,
            Route::AssetDetail(AssetId::new("abc")),
            Route::Upload,
            Route::TemplateUpload,
        ] {
            assert_eq!(Route::parse(&route.path()).unwrap(), route);
        }
    }

    #[test]
    fn unknown_paths_are_rejected() {
        for path in ["", "/assets", "/asset", "/asset/", "/asset/1/edit", "upload-templates"] {
            let err = Route::parse(path).unwrap_err();
            assert!(err.is_validation(), "{} should not route", path);
        }
    }
}

use adconsole_core::{ConsoleResult, ErrorMetadata};

/// What a page currently has to show.
#[derive(Debug, Clone, PartialEq)]
pub enum ViewState<T> {
    Loading,
    Error(String),
    Empty,
    Ready(T),
}

impl<T> ViewState<T> {
    /// Map a load result, treating values `is_empty` reports as empty.
    pub fn from_result(result: ConsoleResult<T>, is_empty: impl FnOnce(&T) -> bool) -> Self {
        match result {
            Ok(value) if is_empty(&value) => ViewState::Empty,
            Ok(value) => ViewState::Ready(value),
            Err(e) => ViewState::Error(e.client_message()),
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, ViewState::Error(_))
    }
}

/// Layout of the asset list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum ViewMode {
    #[default]
    Grid,
    List,
}

#[cfg(test)]
mod tests {
    use super::*;
    use adconsole_core::ConsoleError;

    #[test]
    fn from_result_branches() {
        let ready: ViewState<Vec<u8>> = ViewState::from_result(Ok(vec![1]), |v| v.is_empty());
        assert_eq!(ready, ViewState::Ready(vec![1]));

        let empty: ViewState<Vec<u8>> = ViewState::from_result(Ok(vec![]), |v| v.is_empty());
        assert_eq!(empty, ViewState::Empty);

        let error: ViewState<Vec<u8>> = ViewState::from_result(
            Err(ConsoleError::Http {
                status: 500,
                message: "Failed to fetch assets".to_string(),
            }),
            |v| v.is_empty(),
        );
        assert_eq!(error, ViewState::Error("Failed to fetch assets".to_string()));
        assert!(error.is_error());
    }
}

use thiserror::Error;

use super::api_utils::ApiError;

/// Failures as the screens see them.
///
/// None of them is fatal: every variant leaves the screen interactive so the
/// user can retry the action.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum UiError {
    /// Initial fetch or re-fetch of a collection/order failed
    #[error("{context}: {source}")]
    Load {
        context: &'static str,
        source: ApiError,
    },
    /// create / update / delete / reactivate / progress registration failed
    #[error("{context}: {source}")]
    Mutation {
        context: &'static str,
        source: ApiError,
    },
    /// Handled locally, no request is sent
    #[error("{0}")]
    Validation(String),
}

impl UiError {
    pub fn load(context: &'static str, source: ApiError) -> Self {
        UiError::Load { context, source }
    }

    pub fn mutation(context: &'static str, source: ApiError) -> Self {
        UiError::Mutation { context, source }
    }
}

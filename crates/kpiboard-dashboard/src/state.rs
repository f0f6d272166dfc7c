//! Dashboard load state.

use kpiboard_core::KpiSnapshot;

/// Shown when a fetch fails without a usable message.
pub const FETCH_FAILED_FALLBACK: &str = "Failed to fetch KPIs";

/// What the dashboard currently shows. Exactly one variant is active.
///
/// Starts in `Loading` and moves once to `Loaded` or `Failed`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum LoadState {
    #[default]
    Loading,
    Loaded(KpiSnapshot),
    Failed(String),
}

impl LoadState {
    /// Failed state with `message`, or the generic fallback if it is blank.
    pub fn failed(message: impl Into<String>) -> Self {
        let message = message.into();
        if message.trim().is_empty() {
            Self::Failed(FETCH_FAILED_FALLBACK.to_string())
        } else {
            Self::Failed(message)
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    pub fn snapshot(&self) -> Option<&KpiSnapshot> {
        match self {
            Self::Loaded(snapshot) => Some(snapshot),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Failed(message) => Some(message),
            _ => None,
        }
    }

    /// Short label for logs and metrics.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Loading => "loading",
            Self::Loaded(_) => "loaded",
            Self::Failed(_) => "failed",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_loading() {
        let state = LoadState::default();
        assert!(state.is_loading());
        assert_eq!(state.snapshot(), None);
        assert_eq!(state.error(), None);
        assert_eq!(state.label(), "loading");
    }

    #[test]
    fn test_blank_failure_uses_fallback() {
        assert_eq!(LoadState::failed("  ").error(), Some(FETCH_FAILED_FALLBACK));
        assert_eq!(LoadState::failed("Network Error").error(), Some("Network Error"));
    }

    #[test]
    fn test_loaded_exposes_snapshot() {
        let state = LoadState::Loaded(KpiSnapshot::default());
        assert!(!state.is_loading());
        assert!(state.snapshot().is_some());
        assert_eq!(state.label(), "loaded");
    }
}

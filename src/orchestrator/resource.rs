use tracing::debug;

use crate::error::FetchError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchState {
    Idle,
    Loading,
    Success,
    Error,
}

/// Sequence number handed out when a fetch is issued. Only the most recently
/// issued token may write into the resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct RequestToken(u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    Applied,
    Failed,
    Stale,
}

/// `{data, loading, error}` for one dashboard panel.
///
/// Data from the last successful fetch survives later failures and reloads,
/// so a panel keeps showing something while it retries.
#[derive(Debug)]
pub struct FetchResource<T> {
    data: Option<T>,
    error: Option<String>,
    state: FetchState,
    issued: u64,
}

impl<T> Default for FetchResource<T> {
    fn default() -> Self {
        Self {
            data: None,
            error: None,
            state: FetchState::Idle,
            issued: 0,
        }
    }
}

impl<T> FetchResource<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn data(&self) -> Option<&T> {
        self.data.as_ref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn state(&self) -> FetchState {
        self.state
    }

    pub fn is_loading(&self) -> bool {
        self.state == FetchState::Loading
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_none()
    }

    pub fn begin(&mut self) -> RequestToken {
        self.issued += 1;
        self.state = FetchState::Loading;
        self.error = None;
        RequestToken(self.issued)
    }

    pub fn is_current(&self, token: RequestToken) -> bool {
        token.0 == self.issued
    }

    pub fn resolve(&mut self, token: RequestToken, result: Result<T, FetchError>) -> Resolution {
        if !self.is_current(token) {
            debug!(
                token = token.0,
                latest = self.issued,
                "Discarding superseded response"
            );
            return Resolution::Stale;
        }

        match result {
            Ok(data) => {
                self.data = Some(data);
                self.error = None;
                self.state = FetchState::Success;
                Resolution::Applied
            }
            Err(e) => {
                self.error = Some(e.to_string());
                self.state = FetchState::Error;
                Resolution::Failed
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lifecycle() {
        let mut resource: FetchResource<u32> = FetchResource::new();
        assert_eq!(resource.state(), FetchState::Idle);

        let token = resource.begin();
        assert!(resource.is_loading());
        assert_eq!(resource.resolve(token, Ok(7)), Resolution::Applied);
        assert_eq!(resource.data(), Some(&7));
        assert_eq!(resource.state(), FetchState::Success);

        let token = resource.begin();
        let failed = resource.resolve(token, Err(FetchError::Source("boom".into())));
        assert_eq!(failed, Resolution::Failed);
        assert_eq!(resource.error(), Some("Data source error: boom"));
        assert_eq!(resource.data(), Some(&7));

        resource.begin();
        assert_eq!(resource.error(), None);
    }

    #[test]
    fn older_token_cannot_overwrite_newer_result() {
        let mut resource: FetchResource<&str> = FetchResource::new();
        let first = resource.begin();
        let second = resource.begin();

        assert_eq!(resource.resolve(second, Ok("new")), Resolution::Applied);
        assert_eq!(resource.resolve(first, Ok("old")), Resolution::Stale);
        assert_eq!(resource.data(), Some(&"new"));
    }

    #[test]
    fn stale_error_is_not_surfaced() {
        let mut resource: FetchResource<&str> = FetchResource::new();
        let first = resource.begin();
        let second = resource.begin();

        let stale = resource.resolve(first, Err(FetchError::Source("late".into())));
        assert_eq!(stale, Resolution::Stale);
        assert_eq!(resource.error(), None);
        assert!(resource.is_loading());

        resource.resolve(second, Ok("fresh"));
        assert_eq!(resource.state(), FetchState::Success);
    }
}

use std::time::Duration;
use tokio::time::Instant;

pub const SEARCH_DEBOUNCE: Duration = Duration::from_millis(500);

/// Holds the latest input until it has been quiet for `delay`. Every `push`
/// replaces the pending value and restarts the timer.
#[derive(Debug)]
pub struct Debouncer<T> {
    delay: Duration,
    pending: Option<(T, Instant)>,
}

impl<T> Debouncer<T> {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    pub fn push(&mut self, value: T) {
        self.pending = Some((value, Instant::now() + self.delay));
    }

    pub fn cancel(&mut self) -> Option<T> {
        self.pending.take().map(|(value, _)| value)
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|(_, deadline)| *deadline)
    }

    /// Resolves with the pending value once its deadline passes; never
    /// resolves while nothing is pending. Safe to drop inside `select!`.
    pub async fn ready(&mut self) -> T {
        let Some(deadline) = self.deadline() else {
            return std::future::pending().await;
        };
        tokio::time::sleep_until(deadline).await;
        match self.pending.take() {
            Some((value, _)) => value,
            None => std::future::pending().await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn only_the_last_value_fires() {
        let mut debouncer = Debouncer::new(SEARCH_DEBOUNCE);
        debouncer.push("a");
        tokio::time::advance(Duration::from_millis(200)).await;
        debouncer.push("ab");
        tokio::time::advance(Duration::from_millis(200)).await;
        debouncer.push("abc");
        let pushed_at = Instant::now();

        assert_eq!(debouncer.ready().await, "abc");
        assert!(pushed_at.elapsed() >= SEARCH_DEBOUNCE);
        assert!(!debouncer.is_pending());
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_drops_pending_value() {
        let mut debouncer = Debouncer::new(SEARCH_DEBOUNCE);
        debouncer.push(1);
        assert_eq!(debouncer.cancel(), Some(1));

        let fired = tokio::time::timeout(Duration::from_secs(5), debouncer.ready()).await;
        assert!(fired.is_err());
    }
}

//! Bounded windowed fan-out
//!
//! One primitive for every per-item remote operation (create, delete).
//! Items are split into windows of at most `concurrency` operations; each
//! window's futures run concurrently and are all joined before the next
//! window starts.
//!
//! **Guarantees:**
//! - At most `concurrency` operations are in flight at any time
//! - Outcomes are returned in input order regardless of completion order
//! - `concurrency == 1` is strictly sequential
//!
//! A failing operation only produces a failing outcome; it never stops the
//! rest of its window or the windows after it.

use futures::future::join_all;
use std::future::Future;

/// Windowed fan-out executor
#[derive(Debug, Clone, Copy)]
pub struct FanOut {
    concurrency: usize,
}

/// Outcomes of one fan-out run
#[derive(Debug)]
pub struct FanOutResult<T> {
    /// One outcome per input item, in input order
    pub outcomes: Vec<T>,
    /// Number of windows issued
    pub windows: usize,
}

impl FanOut {
    /// Create executor; `concurrency` is clamped to at least 1
    pub fn new(concurrency: usize) -> Self {
        Self {
            concurrency: concurrency.max(1),
        }
    }

    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    /// Run `op` over every item, one window at a time
    pub async fn run<I, F, Fut, T>(&self, items: I, mut op: F) -> FanOutResult<T>
    where
        I: IntoIterator,
        F: FnMut(I::Item) -> Fut,
        Fut: Future<Output = T>,
    {
        let mut items = items.into_iter().peekable();
        let mut outcomes = Vec::new();
        let mut windows = 0;

        while items.peek().is_some() {
            let window: Vec<Fut> = items.by_ref().take(self.concurrency).map(&mut op).collect();
            windows += 1;

            tracing::debug!(
                window = windows,
                size = window.len(),
                concurrency = self.concurrency,
                "Fan-out window started"
            );

            outcomes.extend(join_all(window).await);
        }

        FanOutResult { outcomes, windows }
    }
}

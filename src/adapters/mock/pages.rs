//! Mock page source for testing.
//!
//! Scripts per-call outcomes (a page, a failure, a delay, a hang) and
//! records every fetch, so tests can drive the pagination engine through
//! exact sequences without network access.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use crate::error::PageError;
use crate::paging::PageSource;

/// One fetched page as the mock returns it.
#[derive(Debug, Clone, PartialEq)]
pub struct MockPage {
    /// Page items.
    pub items: Vec<i64>,
    /// Next-page cursor, if any.
    pub cursor: Option<String>,
}

/// What one scripted fetch does.
#[derive(Debug, Clone)]
pub enum MockOutcome {
    /// Resolve immediately with a page.
    Page { items: Vec<i64>, cursor: Option<String> },
    /// Resolve with a page after a delay.
    Delayed {
        items: Vec<i64>,
        cursor: Option<String>,
        delay_ms: u64,
    },
    /// Fail with a source error.
    Fail(String),
    /// Never resolve. Only cancellation ends this fetch.
    Hang,
}

impl MockOutcome {
    /// A page resolving immediately.
    pub fn page(items: Vec<i64>, cursor: Option<String>) -> Self {
        MockOutcome::Page { items, cursor }
    }

    /// A page resolving after `delay_ms` milliseconds.
    pub fn delayed(items: Vec<i64>, cursor: Option<String>, delay_ms: u64) -> Self {
        MockOutcome::Delayed {
            items,
            cursor,
            delay_ms,
        }
    }

    /// A failing fetch.
    pub fn fail(message: impl Into<String>) -> Self {
        MockOutcome::Fail(message.into())
    }

    /// A fetch that never resolves.
    pub fn hang() -> Self {
        MockOutcome::Hang
    }
}

/// A recorded fetch for verification in tests.
#[derive(Debug, Clone, PartialEq)]
pub enum RecordedFetch {
    /// `load_initial` with the session parameters.
    Initial(Option<String>),
    /// `load_after` with the cursor.
    After(String),
}

/// Mock page source with scripted outcomes.
///
/// Outcomes are consumed in order, separately for initial and cursor
/// fetches. A fetch with no scripted outcome fails, so a test that
/// under-scripts shows up as an error rather than a hang.
#[derive(Debug, Default)]
pub struct MockPageSource {
    initial: Mutex<VecDeque<MockOutcome>>,
    after: Mutex<VecDeque<MockOutcome>>,
    calls: Arc<Mutex<Vec<RecordedFetch>>>,
}

impl MockPageSource {
    /// Create a source with nothing scripted.
    pub fn new() -> Self {
        Self::default()
    }

    /// Script the next `load_initial` outcome.
    pub fn push_initial(&self, outcome: MockOutcome) {
        self.initial.lock().unwrap().push_back(outcome);
    }

    /// Script the next `load_after` outcome.
    pub fn push_after(&self, outcome: MockOutcome) {
        self.after.lock().unwrap().push_back(outcome);
    }

    /// Handle to the recorded fetches; stays valid after the source moves
    /// into a pager.
    pub fn calls(&self) -> Arc<Mutex<Vec<RecordedFetch>>> {
        Arc::clone(&self.calls)
    }
}

async fn resolve(outcome: Option<MockOutcome>) -> Result<MockPage, PageError> {
    match outcome {
        Some(MockOutcome::Page { items, cursor }) => Ok(MockPage { items, cursor }),
        Some(MockOutcome::Delayed {
            items,
            cursor,
            delay_ms,
        }) => {
            tokio::time::sleep(Duration::from_millis(delay_ms)).await;
            Ok(MockPage { items, cursor })
        }
        Some(MockOutcome::Fail(message)) => Err(PageError::source(message)),
        Some(MockOutcome::Hang) => futures_util::future::pending().await,
        None => Err(PageError::source("no scripted outcome for this fetch")),
    }
}

#[async_trait]
impl PageSource for MockPageSource {
    type Params = Option<String>;
    type Item = i64;
    type Cursor = String;
    type Page = MockPage;

    async fn load_initial(&self, params: &Self::Params) -> Result<Self::Page, PageError> {
        self.calls
            .lock()
            .unwrap()
            .push(RecordedFetch::Initial(params.clone()));
        let outcome = self.initial.lock().unwrap().pop_front();
        resolve(outcome).await
    }

    async fn load_after(&self, cursor: &Self::Cursor) -> Result<Self::Page, PageError> {
        self.calls
            .lock()
            .unwrap()
            .push(RecordedFetch::After(cursor.clone()));
        let outcome = self.after.lock().unwrap().pop_front();
        resolve(outcome).await
    }

    fn items(&self, page: &Self::Page) -> Vec<Self::Item> {
        page.items.clone()
    }

    fn cursor(&self, page: &Self::Page) -> Option<Self::Cursor> {
        page.cursor.clone()
    }
}

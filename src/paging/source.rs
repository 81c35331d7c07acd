//! The page-fetch abstraction.

use async_trait::async_trait;

use crate::error::PageError;

/// One way of fetching pages for one screen.
///
/// The engine never knows the wire protocol. A source fetches one page at
/// a time - by the session's start parameters for the first page, by an
/// opaque cursor for every page after it - and tells the engine how to
/// pull the item list and the "more" cursor out of a fetched page.
///
/// A returned future can succeed with a page, fail, or be dropped: the
/// engine drops in-flight futures when a session is superseded or the
/// owning lifecycle terminates, and sources must tolerate that.
#[async_trait]
pub trait PageSource: Send + Sync + 'static {
    /// Parameters of a fresh load (query text, filters).
    type Params: Send + Sync + Clone + 'static;
    /// One element of the accumulated result sequence.
    type Item: Send + Sync + Clone + PartialEq + 'static;
    /// Opaque locator for the next page.
    type Cursor: Send + Sync + Clone + 'static;
    /// One fetched page, before extraction.
    type Page: Send + 'static;

    /// Fetch the first page of a session.
    async fn load_initial(&self, params: &Self::Params) -> Result<Self::Page, PageError>;

    /// Fetch the page after `cursor`.
    async fn load_after(&self, cursor: &Self::Cursor) -> Result<Self::Page, PageError>;

    /// Pull the item list out of a fetched page.
    fn items(&self, page: &Self::Page) -> Vec<Self::Item>;

    /// Pull the next-page cursor out of a fetched page, if the page
    /// advertises more data.
    fn cursor(&self, page: &Self::Page) -> Option<Self::Cursor>;
}

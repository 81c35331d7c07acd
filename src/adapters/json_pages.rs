//! Generic page source for JSON cursor-paged endpoints.
//!
//! Many paged APIs share one shape: a GET endpoint returning an item
//! array plus an opaque next-page cursor, where the cursor is echoed back
//! as a query parameter. [`JsonPageSource`] implements
//! [`PageSource`](crate::paging::PageSource) for that shape over any
//! [`HttpClient`], with the field and parameter names configurable.

use std::marker::PhantomData;
use std::sync::Arc;

use async_trait::async_trait;
use serde::de::DeserializeOwned;

use crate::error::PageError;
use crate::paging::PageSource;
use crate::traits::{Headers, HttpClient, HttpError, Query};

/// One decoded page.
#[derive(Debug, Clone)]
pub struct JsonPage<T> {
    /// Decoded items.
    pub items: Vec<T>,
    /// Cursor advertised for the next page, if any.
    pub next: Option<String>,
}

/// A [`PageSource`] for JSON endpoints shaped like
/// `{ "items": [...], "next": "cursor-or-null" }`.
///
/// Session parameters are extra query pairs merged over the base query;
/// the cursor goes out as its own query parameter.
pub struct JsonPageSource<T> {
    http: Arc<dyn HttpClient>,
    url: String,
    headers: Headers,
    base_query: Query,
    items_field: String,
    cursor_field: String,
    cursor_param: String,
    _items: PhantomData<fn() -> T>,
}

impl<T> JsonPageSource<T> {
    /// Create a source for `url` over `http`, with the default field
    /// names (`items`, `next`) and cursor parameter (`cursor`).
    pub fn new(http: Arc<dyn HttpClient>, url: impl Into<String>) -> Self {
        Self {
            http,
            url: url.into(),
            headers: Headers::new(),
            base_query: Query::new(),
            items_field: "items".to_string(),
            cursor_field: "next".to_string(),
            cursor_param: "cursor".to_string(),
            _items: PhantomData,
        }
    }

    /// Add a header to every page request.
    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    /// Add a query pair to every page request.
    pub fn with_query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.base_query.push((key.into(), value.into()));
        self
    }

    /// Rename the payload field holding the item array.
    pub fn items_field(mut self, name: impl Into<String>) -> Self {
        self.items_field = name.into();
        self
    }

    /// Rename the payload field holding the next-page cursor.
    pub fn cursor_field(mut self, name: impl Into<String>) -> Self {
        self.cursor_field = name.into();
        self
    }

    /// Rename the query parameter the cursor is echoed back through.
    pub fn cursor_param(mut self, name: impl Into<String>) -> Self {
        self.cursor_param = name.into();
        self
    }
}

impl<T: DeserializeOwned> JsonPageSource<T> {
    async fn fetch(&self, extra: &Query) -> Result<JsonPage<T>, PageError> {
        let mut query = self.base_query.clone();
        query.extend(extra.iter().cloned());

        let response = self.http.get(&self.url, &query, &self.headers).await?;
        if !response.is_success() {
            return Err(PageError::Http(HttpError::ServerError {
                status: response.status,
                message: response.text().unwrap_or_default(),
            }));
        }

        let payload: serde_json::Value = response
            .json()
            .map_err(|e| PageError::source(format!("page payload is not JSON: {}", e)))?;
        let items = payload
            .get(&self.items_field)
            .cloned()
            .ok_or_else(|| {
                PageError::source(format!("page payload has no \"{}\" field", self.items_field))
            })?;
        let items: Vec<T> = serde_json::from_value(items)
            .map_err(|e| PageError::source(format!("page items failed to decode: {}", e)))?;
        let next = payload
            .get(&self.cursor_field)
            .and_then(|v| v.as_str())
            .map(str::to_string);

        Ok(JsonPage { items, next })
    }
}

#[async_trait]
impl<T> PageSource for JsonPageSource<T>
where
    T: DeserializeOwned + Clone + PartialEq + Send + Sync + 'static,
{
    type Params = Query;
    type Item = T;
    type Cursor = String;
    type Page = JsonPage<T>;

    async fn load_initial(&self, params: &Self::Params) -> Result<Self::Page, PageError> {
        self.fetch(params).await
    }

    async fn load_after(&self, cursor: &Self::Cursor) -> Result<Self::Page, PageError> {
        let query = vec![(self.cursor_param.clone(), cursor.clone())];
        self.fetch(&query).await
    }

    fn items(&self, page: &Self::Page) -> Vec<Self::Item> {
        page.items.clone()
    }

    fn cursor(&self, page: &Self::Page) -> Option<Self::Cursor> {
        page.next.clone()
    }
}

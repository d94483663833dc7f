//! Lazy page-at-a-time iteration over server-paginated collections.
//!
//! This module provides [`Page`], the immutable value produced by one
//! paginated fetch, and [`PageStream`], a lazy `Stream` of pages driven by
//! a caller-supplied page-fetch function.
//!
//! Two continuation modes are supported, selected per endpoint via
//! [`Continuation`]: most collections report a total page count through the
//! `Result-Pages` header, but a few do not, and for those the returned item
//! count is the only continuation signal.

use std::collections::HashMap;
use std::pin::Pin;
use std::task::{Context, Poll};

use chrono::{DateTime, Utc};
use futures_util::{Stream, StreamExt};

use crate::clients::errors::HttpError;

/// One page of a server-paginated collection.
///
/// A `Page` is created once per fetch and never mutated. `page_number` is
/// the caller-supplied number of the request that produced it.
#[derive(Clone, Debug)]
pub struct Page<T> {
    /// The records in this page, in server order.
    pub items: Vec<T>,
    /// The 1-based page number this page was requested with.
    pub page_number: u32,
    /// Total page count, as reported by the server.
    pub total_pages: u32,
    /// Total item count across all pages, as reported by the server.
    pub total_count: u64,
}

/// How a [`PageStream`] decides whether to fetch another page.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Continuation {
    /// Continue while the page just yielded reports
    /// `page_number < total_pages`. Requires the server's total-count
    /// headers.
    TotalPages,
    /// Continue while the page just yielded returned at least `page_size`
    /// items; an empty or short page terminates iteration. Used for
    /// endpoints with no total-count header.
    ItemCount {
        /// The page size the fetches were issued with.
        page_size: u32,
    },
}

/// Options shared by every collection listing.
///
/// Mirrors the query surface of the simPRO collection endpoints:
/// `pageSize`, arbitrary dotted filter parameters (e.g. `Group.ID`), an
/// optional comma-joined `columns` projection, and an optional
/// modified-since instant for conditional fetches.
///
/// # Example
///
/// ```rust
/// use simpro_api::ListParams;
///
/// let params = ListParams::new()
///     .page_size(50)
///     .filter("Group.ID", "47")
///     .columns(["ID", "Name"]);
/// ```
#[derive(Clone, Debug, Default)]
pub struct ListParams {
    pub(crate) page_size: Option<u32>,
    pub(crate) filters: HashMap<String, String>,
    pub(crate) columns: Option<String>,
    pub(crate) modified_since: Option<DateTime<Utc>>,
}

impl ListParams {
    /// Creates an empty set of listing options.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the number of items requested per page.
    #[must_use]
    pub const fn page_size(mut self, page_size: u32) -> Self {
        self.page_size = Some(page_size);
        self
    }

    /// Adds a filter query parameter, e.g. `("Group.ID", "47")`.
    #[must_use]
    pub fn filter(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.filters.insert(key.into(), value.into());
        self
    }

    /// Restricts the returned fields to the named columns (comma-joined
    /// into a single `columns` parameter).
    #[must_use]
    pub fn columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let joined = columns
            .into_iter()
            .map(|c| c.as_ref().to_string())
            .collect::<Vec<_>>()
            .join(",");
        self.columns = Some(joined);
        self
    }

    /// Requests only records modified since `instant` (sent as an
    /// `If-Modified-Since` header).
    #[must_use]
    pub const fn modified_since(mut self, instant: DateTime<Utc>) -> Self {
        self.modified_since = Some(instant);
        self
    }
}

/// Type alias for a boxed future used internally.
type BoxFuture<'a, T> = Pin<Box<dyn std::future::Future<Output = T> + Send + 'a>>;

type FetchPage<T> =
    Box<dyn Fn(u32) -> BoxFuture<'static, Result<Page<T>, HttpError>> + Send + Sync>;

/// A lazy, finite, forward-only stream of [`Page`] values.
///
/// The stream fetches page 1 on first poll and yields it unconditionally
/// (even an empty collection produces one page), then keeps fetching while
/// the configured [`Continuation`] signal from the page just yielded says
/// more remain. It holds no cross-page state beyond the next page number,
/// so dropping it mid-sequence triggers no further fetches and needs no
/// cleanup. A fetch error is yielded once and ends the stream.
///
/// # Example
///
/// ```rust,ignore
/// use futures_util::StreamExt;
///
/// let mut pages = client.invoice_pages(ListParams::new().page_size(250));
/// while let Some(page) = pages.next().await {
///     let page = page?;
///     println!("page {} of {}", page.page_number, page.total_pages);
/// }
/// ```
pub struct PageStream<T> {
    fetch_page: FetchPage<T>,
    continuation: Continuation,
    /// Next page number to fetch; `None` once the sequence is exhausted.
    next_page: Option<u32>,
    pending: Option<BoxFuture<'static, Result<Page<T>, HttpError>>>,
}

impl<T> PageStream<T> {
    /// Creates a new stream from a page-fetch function, starting at page 1.
    pub fn new<F>(continuation: Continuation, fetch_page: F) -> Self
    where
        F: Fn(u32) -> BoxFuture<'static, Result<Page<T>, HttpError>> + Send + Sync + 'static,
    {
        Self {
            fetch_page: Box::new(fetch_page),
            continuation,
            next_page: Some(1),
            pending: None,
        }
    }

    /// Whether the page just yielded signals that another page exists.
    fn has_more(&self, page: &Page<T>) -> bool {
        match self.continuation {
            Continuation::TotalPages => page.page_number < page.total_pages,
            Continuation::ItemCount { page_size } => page.items.len() as u64 >= u64::from(page_size),
        }
    }
}

impl<T> PageStream<T>
where
    T: Unpin,
{
    /// Drains the remaining pages and concatenates their items.
    ///
    /// # Errors
    ///
    /// Returns the first fetch error encountered.
    pub async fn drain(mut self) -> Result<Vec<T>, HttpError> {
        let mut items = Vec::new();
        while let Some(page) = self.next().await {
            items.extend(page?.items);
        }
        Ok(items)
    }
}

impl<T> Stream for PageStream<T>
where
    T: Unpin,
{
    type Item = Result<Page<T>, HttpError>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = &mut *self;

        loop {
            if let Some(ref mut fut) = this.pending {
                match fut.as_mut().poll(cx) {
                    Poll::Ready(Ok(page)) => {
                        this.pending = None;
                        // The continuation signal of the page being yielded
                        // governs whether another fetch happens; later pages
                        // are consulted again on each subsequent step.
                        this.next_page = this.has_more(&page).then(|| page.page_number + 1);
                        return Poll::Ready(Some(Ok(page)));
                    }
                    Poll::Ready(Err(e)) => {
                        this.pending = None;
                        this.next_page = None;
                        return Poll::Ready(Some(Err(e)));
                    }
                    Poll::Pending => return Poll::Pending,
                }
            }

            if let Some(page_number) = this.next_page {
                this.pending = Some((this.fetch_page)(page_number));
                continue;
            }

            return Poll::Ready(None);
        }
    }
}

impl<T> Unpin for PageStream<T> {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    /// A fetch function yielding `total_pages` pages of one item each.
    fn counted_fetch(
        total_pages: u32,
        calls: Arc<AtomicU32>,
    ) -> impl Fn(u32) -> BoxFuture<'static, Result<Page<u32>, HttpError>> + Send + Sync {
        move |page_number| {
            calls.fetch_add(1, Ordering::SeqCst);
            Box::pin(async move {
                Ok(Page {
                    items: vec![page_number],
                    page_number,
                    total_pages,
                    total_count: u64::from(total_pages),
                })
            })
        }
    }

    #[tokio::test]
    async fn test_yields_exactly_total_pages_in_order() {
        let calls = Arc::new(AtomicU32::new(0));
        let mut stream =
            PageStream::new(Continuation::TotalPages, counted_fetch(3, calls.clone()));

        let mut numbers = Vec::new();
        while let Some(page) = stream.next().await {
            numbers.push(page.unwrap().page_number);
        }

        assert_eq!(numbers, vec![1, 2, 3]);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_single_page_collection_yields_once() {
        let calls = Arc::new(AtomicU32::new(0));
        let mut stream =
            PageStream::new(Continuation::TotalPages, counted_fetch(1, calls.clone()));

        assert_eq!(stream.next().await.unwrap().unwrap().page_number, 1);
        assert!(stream.next().await.is_none());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_early_abandon_triggers_no_further_fetches() {
        let calls = Arc::new(AtomicU32::new(0));
        let mut stream =
            PageStream::new(Continuation::TotalPages, counted_fetch(10, calls.clone()));

        let _first = stream.next().await;
        drop(stream);

        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_item_count_mode_stops_on_short_page() {
        // Pages of size 2 until page 3, which is short.
        let fetch = |page_number: u32| -> BoxFuture<'static, Result<Page<u32>, HttpError>> {
            Box::pin(async move {
                let items = if page_number < 3 {
                    vec![0, 1]
                } else {
                    vec![0]
                };
                Ok(Page {
                    items,
                    page_number,
                    total_pages: 1,
                    total_count: 0,
                })
            })
        };
        let mut stream = PageStream::new(Continuation::ItemCount { page_size: 2 }, fetch);

        let mut numbers = Vec::new();
        while let Some(page) = stream.next().await {
            numbers.push(page.unwrap().page_number);
        }
        assert_eq!(numbers, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn test_item_count_mode_yields_empty_first_page() {
        let fetch = |page_number: u32| -> BoxFuture<'static, Result<Page<u32>, HttpError>> {
            Box::pin(async move {
                Ok(Page {
                    items: Vec::new(),
                    page_number,
                    total_pages: 1,
                    total_count: 0,
                })
            })
        };
        let mut stream = PageStream::new(Continuation::ItemCount { page_size: 50 }, fetch);

        let first = stream.next().await.unwrap().unwrap();
        assert!(first.items.is_empty());
        assert!(stream.next().await.is_none());
    }

    #[tokio::test]
    async fn test_error_ends_stream_after_yielding_it() {
        let fetch = |page_number: u32| -> BoxFuture<'static, Result<Page<u32>, HttpError>> {
            Box::pin(async move {
                if page_number == 1 {
                    Ok(Page {
                        items: vec![1],
                        page_number: 1,
                        total_pages: 5,
                        total_count: 5,
                    })
                } else {
                    Err(HttpError::AuthenticationRequired)
                }
            })
        };
        let mut stream = PageStream::new(Continuation::TotalPages, fetch);

        assert!(stream.next().await.unwrap().is_ok());
        assert!(stream.next().await.unwrap().is_err());
        assert!(stream.next().await.is_none());
    }

    #[tokio::test]
    async fn test_drain_concatenates_items() {
        let calls = Arc::new(AtomicU32::new(0));
        let stream = PageStream::new(Continuation::TotalPages, counted_fetch(4, calls));
        assert_eq!(stream.drain().await.unwrap(), vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_list_params_joins_columns() {
        let params = ListParams::new().columns(["ID", "Name", "ParentGroup"]);
        assert_eq!(params.columns.as_deref(), Some("ID,Name,ParentGroup"));
    }
}

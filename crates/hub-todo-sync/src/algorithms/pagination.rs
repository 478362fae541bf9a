//! # Pagination
//!
//! Continuation-token paging as a lazy page stream.
//!
//! Pages are only requested when the stream is polled, so callers decide how
//! far to follow the server. Building a new stream restarts from the first
//! page.

use std::future::Future;

use futures::stream::{self, Stream, TryStreamExt};

use crate::domain::{HubError, Page};

/// Lazily page through a query.
///
/// `fetch` is called with `None` for the first page and with the previous
/// page's skip token afterwards. The stream ends after the first page that
/// carries no skip token, and ends immediately after yielding an error.
pub fn paginate<T, F, Fut>(mut fetch: F) -> impl Stream<Item = Result<Page<T>, HubError>>
where
    F: FnMut(Option<String>) -> Fut,
    Fut: Future<Output = Result<Page<T>, HubError>>,
{
    // Outer `None` marks the stream as exhausted.
    let start: Option<Option<String>> = Some(None);

    stream::try_unfold(start, move |cursor| {
        let request = cursor.map(&mut fetch);
        async move {
            let Some(request) = request else {
                return Ok::<_, HubError>(None);
            };
            let page = request.await?;
            let next = page.skip_token.clone().map(Some);
            Ok(Some((page, next)))
        }
    })
}

/// Drain a page stream into a flat item list.
///
/// With `max_pages` set, fails with [`HubError::PageLimitExceeded`] instead
/// of requesting a page beyond the limit. Any page error aborts the whole
/// collection; partial results are dropped.
pub async fn collect_pages<T, S>(pages: S, max_pages: Option<usize>) -> Result<Vec<T>, HubError>
where
    S: Stream<Item = Result<Page<T>, HubError>>,
{
    futures::pin_mut!(pages);

    let mut items = Vec::new();
    let mut page_count = 0usize;

    while let Some(page) = pages.try_next().await? {
        page_count += 1;
        let more = page.has_skip_token();
        items.extend(page.items);

        if let Some(limit) = max_pages {
            if more && page_count >= limit {
                return Err(HubError::PageLimitExceeded { limit });
            }
        }
    }

    Ok(items)
}

use std::future::Future;

use crate::{
    error::{Result, SpotifyError},
    types::Page,
};

/// Drains a cursor-paginated listing into a single vector.
///
/// `fetch` is called with `None` for the first page and then with each page's
/// `next` cursor until a page reports none. Items keep the order in which the
/// server returned them and are not de-duplicated.
///
/// The remote paging contract is the only termination guarantee, so the walk
/// is capped at `max_pages` fetches; needing more is an error. Any failed
/// fetch aborts the walk and the items collected so far are dropped, so a
/// caller never mistakes a partial listing for the complete one.
pub async fn collect_all<T, F, Fut>(max_pages: usize, mut fetch: F) -> Result<Vec<T>>
where
    F: FnMut(Option<String>) -> Fut,
    Fut: Future<Output = Result<Page<T>>>,
{
    let mut items = Vec::new();
    let mut cursor: Option<String> = None;
    let mut pages = 0;

    loop {
        if pages == max_pages {
            return Err(SpotifyError::PageLimitExceeded { limit: max_pages });
        }

        let page = fetch(cursor.take()).await?;
        pages += 1;
        items.extend(page.items);

        match page.next {
            Some(next) if !next.is_empty() => cursor = Some(next),
            _ => break,
        }
    }

    tracing::debug!(pages, items = items.len(), "pagination finished");
    Ok(items)
}

/// Reads at most `max_items` items from a cursor-paginated listing.
///
/// Unlike [`collect_all`], reaching `max_pages` is not an error: the caller
/// asked for a bounded prefix and gets the items read so far. Fetch failures
/// still abort the walk.
pub async fn collect_up_to<T, F, Fut>(
    max_pages: usize,
    max_items: usize,
    mut fetch: F,
) -> Result<Vec<T>>
where
    F: FnMut(Option<String>) -> Fut,
    Fut: Future<Output = Result<Page<T>>>,
{
    let mut items = Vec::new();
    let mut cursor: Option<String> = None;
    let mut pages = 0;

    while pages < max_pages && items.len() < max_items {
        let page = fetch(cursor.take()).await?;
        pages += 1;
        items.extend(page.items);

        match page.next {
            Some(next) if !next.is_empty() => cursor = Some(next),
            _ => break,
        }
    }

    items.truncate(max_items);
    tracing::debug!(pages, items = items.len(), "bounded pagination finished");
    Ok(items)
}

use std::future::Future;

use futures_util::future::{join_all, try_join_all};

/// Upper bound on in-flight calls when none is given.
pub const DEFAULT_CONCURRENCY: usize = 5;

/// Runs `op` over `items` in consecutive chunks of `limit`, each chunk fully
/// concurrent and fully settled before the next starts. Output order always
/// follows input order. The first `Err` fails the whole call; later chunks
/// are never started.
pub async fn try_map_bounded<T, R, E, F, Fut>(
    items: Vec<T>,
    limit: usize,
    mut op: F,
) -> Result<Vec<R>, E>
where
    F: FnMut(T) -> Fut,
    Fut: Future<Output = Result<R, E>>,
{
    let limit = limit.max(1);
    let mut results = Vec::with_capacity(items.len());
    let mut items = items.into_iter().peekable();
    while items.peek().is_some() {
        let chunk: Vec<Fut> = items.by_ref().take(limit).map(&mut op).collect();
        results.extend(try_join_all(chunk).await?);
    }
    Ok(results)
}

/// Infallible variant of [`try_map_bounded`]. Callers fold their own errors
/// into the output value.
pub async fn map_bounded<T, R, F, Fut>(items: Vec<T>, limit: usize, mut op: F) -> Vec<R>
where
    F: FnMut(T) -> Fut,
    Fut: Future<Output = R>,
{
    let limit = limit.max(1);
    let mut results = Vec::with_capacity(items.len());
    let mut items = items.into_iter().peekable();
    while items.peek().is_some() {
        let chunk: Vec<Fut> = items.by_ref().take(limit).map(&mut op).collect();
        results.extend(join_all(chunk).await);
    }
    results
}

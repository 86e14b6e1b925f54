use std::future::Future;

/// Upper bound on bound parameters per statement in the embedded store.
pub const BIND_PARAMS_LIMIT: usize = 500;

/// Runs `query_fn` over `items` in chunks of at most [`BIND_PARAMS_LIMIT`]
/// elements and concatenates the results in chunk order.
///
/// Chunks run sequentially, one statement in flight at a time, so an
/// arbitrarily long item list never fans out into concurrent store load.
/// An error from any chunk aborts the whole call.
pub async fn batched_query<I, T, E, F, Fut>(items: &[I], query_fn: F) -> Result<Vec<T>, E>
where
	I: Clone,
	F: FnMut(Vec<I>) -> Fut,
	Fut: Future<Output = Result<Vec<T>, E>>,
{
	batched_query_with_limit(items, BIND_PARAMS_LIMIT, query_fn).await
}

pub async fn batched_query_with_limit<I, T, E, F, Fut>(
	items: &[I],
	limit: usize,
	mut query_fn: F,
) -> Result<Vec<T>, E>
where
	I: Clone,
	F: FnMut(Vec<I>) -> Fut,
	Fut: Future<Output = Result<Vec<T>, E>>,
{
	let limit = limit.max(1);
	let mut all = Vec::new();

	for chunk in items.chunks(limit) {
		all.extend(query_fn(chunk.to_vec()).await?);
	}

	Ok(all)
}

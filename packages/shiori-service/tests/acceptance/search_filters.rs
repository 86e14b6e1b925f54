use shiori_service::SearchRequest;
use shiori_testkit::IllustSeed;

use super::{build_service, seed_illust, seed_user, test_store};

#[tokio::test]
async fn restriction_filters_by_bookmark_privacy() {
	let store = test_store().await;

	seed_user(&store, 1).await;
	seed_illust(&store, IllustSeed::new(1, 1), &[]).await;
	seed_illust(&store, IllustSeed::new(2, 1), &[]).await;
	seed_illust(&store, IllustSeed { bookmark_private: true, ..IllustSeed::new(3, 1) }, &[])
		.await;

	let service = build_service(&store).await;
	let public = service
		.search(SearchRequest {
			restrict: Some("public".to_string()),
			..SearchRequest::default()
		})
		.await
		.expect("Search failed.");

	assert_eq!(public.count, 2);

	let private = service
		.search(SearchRequest {
			restrict: Some("private".to_string()),
			..SearchRequest::default()
		})
		.await
		.expect("Search failed.");

	assert_eq!(private.count, 1);
	assert_eq!(private.illusts[0].id, 3);

	let all = service
		.search(SearchRequest { restrict: Some("all".to_string()), ..SearchRequest::default() })
		.await
		.expect("Search failed.");

	assert_eq!(all.count, 3);

	store.cleanup().await.expect("Failed to clean up test store.");
}

#[tokio::test]
async fn square_image_satisfies_both_aspects() {
	let store = test_store().await;

	seed_user(&store, 1).await;
	seed_illust(&store, IllustSeed { width: 1000, height: 1000, ..IllustSeed::new(1, 1) }, &[])
		.await;
	seed_illust(&store, IllustSeed { width: 2000, height: 1000, ..IllustSeed::new(2, 1) }, &[])
		.await;
	seed_illust(&store, IllustSeed { width: 1000, height: 2000, ..IllustSeed::new(3, 1) }, &[])
		.await;

	let service = build_service(&store).await;
	let horizontal = service
		.search(SearchRequest {
			aspect: Some("horizontal".to_string()),
			..SearchRequest::default()
		})
		.await
		.expect("Search failed.");
	let mut horizontal_ids: Vec<i64> =
		horizontal.illusts.iter().map(|illust| illust.id).collect();

	horizontal_ids.sort_unstable();

	assert_eq!(horizontal_ids, vec![1, 2], "Square and wide images are horizontal.");

	let vertical = service
		.search(SearchRequest {
			aspect: Some("vertical".to_string()),
			..SearchRequest::default()
		})
		.await
		.expect("Search failed.");
	let mut vertical_ids: Vec<i64> = vertical.illusts.iter().map(|illust| illust.id).collect();

	vertical_ids.sort_unstable();

	assert_eq!(vertical_ids, vec![1, 3], "Square and tall images are vertical.");

	store.cleanup().await.expect("Failed to clean up test store.");
}

#[tokio::test]
async fn inconclusive_ai_tier_counts_as_non_ai() {
	let store = test_store().await;

	seed_user(&store, 1).await;
	seed_illust(&store, IllustSeed { ai_type: 0, ..IllustSeed::new(1, 1) }, &[]).await;
	seed_illust(&store, IllustSeed { ai_type: 1, ..IllustSeed::new(2, 1) }, &[]).await;
	seed_illust(&store, IllustSeed { ai_type: 2, ..IllustSeed::new(3, 1) }, &[]).await;

	let service = build_service(&store).await;
	let non_ai = service
		.search(SearchRequest {
			ai_mode: Some("non-ai-only".to_string()),
			..SearchRequest::default()
		})
		.await
		.expect("Search failed.");
	let mut non_ai_ids: Vec<i64> = non_ai.illusts.iter().map(|illust| illust.id).collect();

	non_ai_ids.sort_unstable();

	assert_eq!(non_ai_ids, vec![1, 2]);

	let ai_only = service
		.search(SearchRequest {
			ai_mode: Some("ai-only".to_string()),
			..SearchRequest::default()
		})
		.await
		.expect("Search failed.");

	assert_eq!(ai_only.count, 1);
	assert_eq!(ai_only.illusts[0].id, 3);

	store.cleanup().await.expect("Failed to clean up test store.");
}

#[tokio::test]
async fn sizer_threshold_filters_by_dimension() {
	let store = test_store().await;

	seed_user(&store, 1).await;
	seed_illust(&store, IllustSeed { width: 800, height: 600, ..IllustSeed::new(1, 1) }, &[])
		.await;
	seed_illust(&store, IllustSeed { width: 1920, height: 1080, ..IllustSeed::new(2, 1) }, &[])
		.await;

	let service = build_service(&store).await;
	let wide_enough = service
		.search(SearchRequest {
			sizer_mode: Some("width".to_string()),
			sizer_size: Some("1000".to_string()),
			..SearchRequest::default()
		})
		.await
		.expect("Search failed.");

	assert_eq!(wide_enough.count, 1);
	assert_eq!(wide_enough.illusts[0].id, 2);

	let tall_enough = service
		.search(SearchRequest {
			sizer_mode: Some("height".to_string()),
			sizer_size: Some("700".to_string()),
			..SearchRequest::default()
		})
		.await
		.expect("Search failed.");

	assert_eq!(tall_enough.count, 1);
	assert_eq!(tall_enough.illusts[0].id, 2);

	// Threshold zero disables the rule regardless of mode.
	let unfiltered = service
		.search(SearchRequest {
			sizer_mode: Some("width".to_string()),
			sizer_size: Some("0".to_string()),
			..SearchRequest::default()
		})
		.await
		.expect("Search failed.");

	assert_eq!(unfiltered.count, 2);

	store.cleanup().await.expect("Failed to clean up test store.");
}

#[tokio::test]
async fn page_count_bounds_apply_and_non_positive_upper_bound_is_open() {
	let store = test_store().await;

	seed_user(&store, 1).await;
	seed_illust(&store, IllustSeed { page_count: 1, ..IllustSeed::new(1, 1) }, &[]).await;
	seed_illust(&store, IllustSeed { page_count: 5, ..IllustSeed::new(2, 1) }, &[]).await;
	seed_illust(&store, IllustSeed { page_count: 12, ..IllustSeed::new(3, 1) }, &[]).await;

	let service = build_service(&store).await;
	let bounded = service
		.search(SearchRequest {
			minimum_page_count: Some("2".to_string()),
			maximum_page_count: Some("5".to_string()),
			..SearchRequest::default()
		})
		.await
		.expect("Search failed.");

	assert_eq!(bounded.count, 1);
	assert_eq!(bounded.illusts[0].id, 2);

	for open_bound in ["0", "-1"] {
		let open = service
			.search(SearchRequest {
				maximum_page_count: Some(open_bound.to_string()),
				..SearchRequest::default()
			})
			.await
			.expect("Search failed.");

		assert_eq!(open.count, 3, "maximumPageCount = {open_bound} must not bound anything.");
	}

	store.cleanup().await.expect("Failed to clean up test store.");
}

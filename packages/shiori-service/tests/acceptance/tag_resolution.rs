use shiori_service::SearchRequest;
use shiori_testkit::IllustSeed;

use super::{build_service, seed_illust, seed_tags, seed_user, tag_list, test_store};

const TAG_A: i64 = 1;
const TAG_B: i64 = 2;
const TAG_C: i64 = 3;

async fn seed_three_entities(store: &shiori_testkit::TestStore) {
	seed_user(store, 1).await;
	seed_tags(store, &[(TAG_A, "a"), (TAG_B, "b"), (TAG_C, "c")]).await;
	seed_illust(store, IllustSeed::new(1, 1), &[TAG_A, TAG_B]).await;
	seed_illust(store, IllustSeed::new(2, 1), &[TAG_A]).await;
	seed_illust(store, IllustSeed::new(3, 1), &[TAG_A, TAG_B, TAG_C]).await;
}

#[tokio::test]
async fn include_tags_intersect_memberships() {
	let store = test_store().await;

	seed_three_entities(&store).await;

	let service = build_service(&store).await;
	let response = service
		.search(SearchRequest { include_tags: tag_list(&["a", "b"]), ..SearchRequest::default() })
		.await
		.expect("Search failed.");
	let mut ids: Vec<i64> = response.illusts.iter().map(|illust| illust.id).collect();

	ids.sort_unstable();

	assert_eq!(ids, vec![1, 3], "Only entities carrying every include tag qualify.");
	assert_eq!(response.count, 2);

	store.cleanup().await.expect("Failed to clean up test store.");
}

#[tokio::test]
async fn exclude_tags_subtract_memberships() {
	let store = test_store().await;

	seed_three_entities(&store).await;

	let service = build_service(&store).await;
	let response = service
		.search(SearchRequest {
			include_tags: tag_list(&["a"]),
			exclude_tags: tag_list(&["b"]),
			..SearchRequest::default()
		})
		.await
		.expect("Search failed.");

	assert_eq!(response.count, 1);
	assert_eq!(response.illusts[0].id, 2);

	store.cleanup().await.expect("Failed to clean up test store.");
}

#[tokio::test]
async fn unknown_include_tag_yields_the_empty_set() {
	let store = test_store().await;

	seed_three_entities(&store).await;

	let service = build_service(&store).await;
	let response = service
		.search(SearchRequest {
			include_tags: tag_list(&["a", "nonexistent"]),
			..SearchRequest::default()
		})
		.await
		.expect("Search failed.");

	assert_eq!(response.count, 0);
	assert!(response.illusts.is_empty());
	assert_eq!(response.paginate.max, 0);

	store.cleanup().await.expect("Failed to clean up test store.");
}

#[tokio::test]
async fn unknown_exclude_tag_excludes_nothing() {
	let store = test_store().await;

	seed_three_entities(&store).await;

	let service = build_service(&store).await;
	let response = service
		.search(SearchRequest {
			exclude_tags: tag_list(&["nonexistent"]),
			..SearchRequest::default()
		})
		.await
		.expect("Search failed.");

	assert_eq!(response.count, 3);

	store.cleanup().await.expect("Failed to clean up test store.");
}

#[tokio::test]
async fn exclude_only_subtracts_from_the_filtered_set() {
	let store = test_store().await;

	seed_three_entities(&store).await;

	let service = build_service(&store).await;
	let response = service
		.search(SearchRequest { exclude_tags: tag_list(&["c"]), ..SearchRequest::default() })
		.await
		.expect("Search failed.");
	let mut ids: Vec<i64> = response.illusts.iter().map(|illust| illust.id).collect();

	ids.sort_unstable();

	assert_eq!(ids, vec![1, 2]);

	store.cleanup().await.expect("Failed to clean up test store.");
}

#[tokio::test]
async fn tag_membership_is_scoped_by_scalar_filters() {
	let store = test_store().await;

	seed_user(&store, 1).await;
	seed_tags(&store, &[(TAG_A, "a")]).await;
	seed_illust(&store, IllustSeed::new(1, 1), &[TAG_A]).await;
	seed_illust(&store, IllustSeed { bookmark_private: true, ..IllustSeed::new(2, 1) }, &[TAG_A])
		.await;

	let service = build_service(&store).await;
	let response = service
		.search(SearchRequest {
			restrict: Some("public".to_string()),
			include_tags: tag_list(&["a"]),
			..SearchRequest::default()
		})
		.await
		.expect("Search failed.");

	assert_eq!(response.count, 1);
	assert_eq!(response.illusts[0].id, 1);

	store.cleanup().await.expect("Failed to clean up test store.");
}

#[tokio::test]
async fn include_tag_with_no_entities_in_scope_short_circuits() {
	let store = test_store().await;

	seed_user(&store, 1).await;
	seed_tags(&store, &[(TAG_A, "a"), (TAG_B, "b")]).await;
	// Tag "b" exists in the vocabulary but no entity carries it.
	seed_illust(&store, IllustSeed::new(1, 1), &[TAG_A]).await;

	let service = build_service(&store).await;
	let response = service
		.search(SearchRequest { include_tags: tag_list(&["b"]), ..SearchRequest::default() })
		.await
		.expect("Search failed.");

	assert_eq!(response.count, 0);
	assert_eq!(response.paginate.max, 0);

	store.cleanup().await.expect("Failed to clean up test store.");
}

use std::collections::HashMap;

use shiori_storage::{
	models::{IllustRow, IllustTagRow, TagRow},
	queries,
};

use crate::{
	Error, Result, ShioriService, TagEntry, TagName,
	filter::{self, ProcessedTags, TagParam},
	illust::Illust,
	resolve,
};

pub(crate) const PAGE_SIZE: i64 = 30;
const RELATED_TAGS_LIMIT: usize = 10;

#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SearchRequest {
	pub page: Option<String>,
	pub include_tags: Option<TagParam>,
	pub exclude_tags: Option<TagParam>,
	pub restrict: Option<String>,
	pub aspect: Option<String>,
	pub sizer_mode: Option<String>,
	pub sizer_size: Option<String>,
	pub ai_mode: Option<String>,
	pub minimum_page_count: Option<String>,
	pub maximum_page_count: Option<String>,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct Paginate {
	pub current: i64,
	pub max: i64,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct SearchResponse {
	pub illusts: Vec<Illust>,
	pub count: i64,
	/// Top tags of the current page, offered as refinement suggestions.
	pub tags: Vec<TagEntry>,
	pub paginate: Paginate,
}

impl ShioriService {
	pub async fn search(&self, req: SearchRequest) -> Result<SearchResponse> {
		let page = parse_page(req.page.as_deref());
		let filters = filter::build_illust_filters(&req);
		let tags = filter::process_tag_params(&req);
		let target_ids = resolve::resolve_tag_filters(&self.db, &tags, &filters).await?;
		let tag_filtered = target_ids.is_some();

		if let Some(ids) = target_ids.as_ref()
			&& ids.is_empty()
		{
			return Ok(empty_response(page));
		}

		let total = match target_ids.as_ref() {
			Some(ids) => ids.len() as i64,
			None => resolve::filtered_illust_count(&self.db, &filters).await?,
		};

		if total == 0 {
			return Ok(empty_response(page));
		}

		let offset = (page - 1) * PAGE_SIZE;
		let page_rows = match target_ids {
			Some(mut ids) => {
				// The candidate set is already materialized; page it in
				// memory instead of pushing LIMIT/OFFSET to the store.
				ids.sort_unstable_by(|a, b| b.cmp(a));

				let start = usize::try_from(offset).unwrap_or(usize::MAX).min(ids.len());
				let end = start.saturating_add(PAGE_SIZE as usize).min(ids.len());
				let mut rows = queries::illusts_by_ids(&self.db, &ids[start..end]).await?;

				rows.sort_unstable_by(|a, b| b.id.cmp(&a.id));

				rows
			},
			None => {
				let mut builder = sqlx::QueryBuilder::new("SELECT * FROM illusts");

				filter::push_filters(&mut builder, &filters);
				builder.push(" ORDER BY id DESC LIMIT ");
				builder.push_bind(PAGE_SIZE);
				builder.push(" OFFSET ");
				builder.push_bind(offset);

				builder.build_query_as::<IllustRow>().fetch_all(&self.db.pool).await?
			},
		};
		let page_ids: Vec<i64> = page_rows.iter().map(|row| row.id).collect();
		// The author and tag joins read disjoint junction tables, so the
		// two lookups run as concurrent siblings.
		let (user_rows, tag_rows) = tokio::try_join!(
			queries::users_for_illusts(&self.db, &page_ids),
			queries::tags_for_illusts(&self.db, &page_ids),
		)?;
		let users_by_illust: HashMap<i64, _> =
			user_rows.into_iter().map(|row| (row.illust_id, row.user)).collect();
		let mut tags_by_illust: HashMap<i64, Vec<TagRow>> = HashMap::new();

		for row in &tag_rows {
			tags_by_illust.entry(row.illust_id).or_default().push(row.tag.clone());
		}

		let mut illusts = Vec::with_capacity(page_rows.len());

		for row in page_rows {
			let user = users_by_illust.get(&row.id).ok_or_else(|| Error::MalformedRecord {
				illust_id: row.id,
				message: "uploader row is missing".to_string(),
			})?;
			let illust_tags = tags_by_illust.get(&row.id).map(Vec::as_slice).unwrap_or(&[]);

			illusts.push(Illust::assemble(row, user, illust_tags)?);
		}

		let related = related_tags(&tag_rows, &tags);

		tracing::debug!(total, page, tag_filtered, "Illust search resolved.");

		Ok(SearchResponse {
			illusts,
			count: total,
			tags: related,
			paginate: Paginate { current: page, max: (total + PAGE_SIZE - 1) / PAGE_SIZE },
		})
	}
}

/// 1-based page number; absent, unparsable, or non-positive input
/// lands on the first page.
fn parse_page(raw: Option<&str>) -> i64 {
	filter::lenient_i64(raw).max(1)
}

fn empty_response(page: i64) -> SearchResponse {
	SearchResponse {
		illusts: Vec::new(),
		count: 0,
		tags: Vec::new(),
		paginate: Paginate { current: page, max: 0 },
	}
}

/// Counts the tags of the current page, skipping names the request
/// already includes or excludes, and keeps the most frequent ones.
fn related_tags(tag_rows: &[IllustTagRow], tags: &ProcessedTags) -> Vec<TagEntry> {
	let mut entries: Vec<TagEntry> = Vec::new();
	let mut index_by_name: HashMap<&str, usize> = HashMap::new();

	for row in tag_rows {
		let name = row.tag.name.as_str();

		if tags.include_tags.iter().any(|tag| tag == name)
			|| tags.exclude_tags.iter().any(|tag| tag == name)
		{
			continue;
		}

		match index_by_name.get(name) {
			Some(&index) => entries[index].count += 1,
			None => {
				index_by_name.insert(name, entries.len());
				entries.push(TagEntry {
					name: TagName {
						original: row.tag.name.clone(),
						translated: row.tag.translated_name.clone(),
					},
					count: 1,
					is_include_tag: None,
				});
			},
		}
	}

	entries.sort_by(|a, b| b.count.cmp(&a.count));
	entries.truncate(RELATED_TAGS_LIMIT);

	entries
}

use std::collections::HashMap;

use shiori_storage::{models::TagRow, queries};

use crate::{
	Result, ShioriService, TagEntry, TagName, TagSearchResponse, filter, resolve,
	search::SearchRequest,
};

const TOP_TAGS_LIMIT: usize = 10;

impl ShioriService {
	/// Highest-frequency tags across the WHOLE filtered population, not
	/// just one result page. The request's include tags always appear in
	/// the response with their true count (zero when nothing matches),
	/// flagged so the caller can render them apart from the organic top
	/// entries.
	pub async fn top_tags(&self, req: SearchRequest) -> Result<TagSearchResponse> {
		let filters = filter::build_illust_filters(&req);
		let tags = filter::process_tag_params(&req);
		let target_ids = resolve::resolve_tag_filters(&self.db, &tags, &filters).await?;

		if let Some(ids) = target_ids.as_ref()
			&& ids.is_empty()
		{
			return Ok(TagSearchResponse { tags: Vec::new() });
		}

		let candidate_ids = match target_ids {
			Some(ids) => ids,
			None => resolve::filtered_illust_ids(&self.db, &filters).await?,
		};

		if candidate_ids.is_empty() {
			return Ok(TagSearchResponse { tags: Vec::new() });
		}

		// Grouped counts arrive per batch; fold them into one map.
		let mut counts: HashMap<i64, i64> = HashMap::new();

		for row in queries::tag_counts_for_illusts(&self.db, &candidate_ids).await? {
			*counts.entry(row.tag_id).or_insert(0) += row.count;
		}

		let include_rows = queries::tags_by_names(&self.db, &tags.include_tags).await?;
		let include_by_name: HashMap<&str, i64> =
			include_rows.iter().map(|tag| (tag.name.as_str(), tag.id)).collect();
		let mut include_ids: Vec<i64> = Vec::new();

		for name in &tags.include_tags {
			if let Some(&tag_id) = include_by_name.get(name.as_str())
				&& !include_ids.contains(&tag_id)
			{
				include_ids.push(tag_id);
				counts.entry(tag_id).or_insert(0);
			}
		}

		if counts.is_empty() {
			return Ok(TagSearchResponse { tags: Vec::new() });
		}

		let mut ranked: Vec<(i64, i64)> =
			counts.iter().map(|(&tag_id, &count)| (tag_id, count)).collect();

		// Count-descending; tag ID settles ties so repeated runs rank
		// identically.
		ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));

		let top_other: Vec<(i64, i64)> = ranked
			.into_iter()
			.filter(|(tag_id, _)| !include_ids.contains(tag_id))
			.take(TOP_TAGS_LIMIT)
			.collect();
		let mut wanted = include_ids.clone();

		wanted.extend(top_other.iter().map(|(tag_id, _)| *tag_id));

		let details = queries::tags_by_ids(&self.db, &wanted).await?;
		let details_by_id: HashMap<i64, &TagRow> =
			details.iter().map(|tag| (tag.id, tag)).collect();
		let mut out = Vec::with_capacity(wanted.len());

		for &tag_id in &include_ids {
			let Some(tag) = details_by_id.get(&tag_id) else {
				continue;
			};

			out.push(TagEntry {
				name: TagName {
					original: tag.name.clone(),
					translated: tag.translated_name.clone(),
				},
				count: counts.get(&tag_id).copied().unwrap_or(0),
				is_include_tag: Some(true),
			});
		}
		for (tag_id, count) in top_other {
			let Some(tag) = details_by_id.get(&tag_id) else {
				continue;
			};

			out.push(TagEntry {
				name: TagName {
					original: tag.name.clone(),
					translated: tag.translated_name.clone(),
				},
				count,
				is_include_tag: Some(false),
			});
		}

		Ok(TagSearchResponse { tags: out })
	}
}

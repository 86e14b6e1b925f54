use std::collections::{HashMap, HashSet};

use shiori_storage::{models::TagRow, queries};

use crate::{
	Result, ShioriService, TagEntry, TagName, TagSearchResponse,
	filter::{TagParam, tag_param_names},
	resolve,
};

const DEFAULT_LIMIT: usize = 20;

#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TagSearchRequest {
	/// Free-text needle; empty matches every tag.
	pub query: Option<String>,
	/// Scoping context: only entities carrying ALL of these tags count.
	pub selected_tags: Option<TagParam>,
	/// Names the picker already shows; never suggested again.
	pub already_selected_tags: Option<TagParam>,
	pub limit: Option<LimitParam>,
}

/// `limit` arrives as a number from JSON callers and as text from
/// query strings.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(untagged)]
pub enum LimitParam {
	Number(i64),
	Text(String),
}
impl LimitParam {
	fn resolve(&self) -> usize {
		let value = match self {
			Self::Number(value) => *value,
			Self::Text(raw) => raw.trim().parse().unwrap_or(0),
		};

		if value > 0 { value as usize } else { DEFAULT_LIMIT }
	}
}

impl ShioriService {
	pub async fn search_tags(&self, req: TagSearchRequest) -> Result<TagSearchResponse> {
		let query = req.query.unwrap_or_default().to_lowercase();
		let selected = tag_param_names(req.selected_tags.as_ref());
		let already_selected: HashSet<String> =
			tag_param_names(req.already_selected_tags.as_ref()).into_iter().collect();
		let limit = req.limit.as_ref().map(LimitParam::resolve).unwrap_or(DEFAULT_LIMIT);
		let mut counts: HashMap<i64, i64> = HashMap::new();

		if selected.is_empty() {
			// No selection context: one grouped scan of the junction
			// table, no entity-set materialization.
			for row in queries::all_tag_counts(&self.db).await? {
				counts.insert(row.tag_id, row.count);
			}
		} else {
			let rows = queries::tags_by_names(&self.db, &selected).await?;
			let by_name: HashMap<&str, i64> =
				rows.iter().map(|tag| (tag.name.as_str(), tag.id)).collect();
			let mut member_sets = Vec::with_capacity(selected.len());

			for name in &selected {
				// A selection naming an unknown tag can never scope to
				// anything.
				let Some(&tag_id) = by_name.get(name.as_str()) else {
					return Ok(TagSearchResponse { tags: Vec::new() });
				};
				let members = queries::all_illust_ids_with_tag(&self.db, tag_id).await?;

				member_sets.push(members.into_iter().collect::<HashSet<i64>>());
			}

			let scoped = resolve::intersect_smallest_first(member_sets);

			if scoped.is_empty() {
				return Ok(TagSearchResponse { tags: Vec::new() });
			}

			for row in queries::tag_counts_for_illusts(&self.db, &scoped).await? {
				*counts.entry(row.tag_id).or_insert(0) += row.count;
			}
		}

		if counts.is_empty() {
			return Ok(TagSearchResponse { tags: Vec::new() });
		}

		let tag_ids: Vec<i64> = counts.keys().copied().collect();
		let details = queries::tags_by_ids(&self.db, &tag_ids).await?;
		let mut tags = collect_entries(details, &counts, &query, &already_selected);

		tags.sort_by(|a, b| {
			b.count.cmp(&a.count).then_with(|| a.name.original.cmp(&b.name.original))
		});
		tags.truncate(limit);

		Ok(TagSearchResponse { tags })
	}
}

/// Applies the needle and the already-selected exclusion, deduplicating
/// by name. Duplicate names are a data anomaly; the higher count wins.
fn collect_entries(
	details: Vec<TagRow>,
	counts: &HashMap<i64, i64>,
	query: &str,
	already_selected: &HashSet<String>,
) -> Vec<TagEntry> {
	let mut best_by_name: HashMap<String, TagEntry> = HashMap::new();

	for tag in details {
		if !matches_query(&tag, query) {
			continue;
		}
		if already_selected.contains(&tag.name) {
			continue;
		}

		let count = counts.get(&tag.id).copied().unwrap_or(0);
		let replace =
			best_by_name.get(&tag.name).map(|existing| count > existing.count).unwrap_or(true);

		if replace {
			best_by_name.insert(
				tag.name.clone(),
				TagEntry {
					name: TagName { original: tag.name, translated: tag.translated_name },
					count,
					is_include_tag: None,
				},
			);
		}
	}

	best_by_name.into_values().collect()
}

fn matches_query(tag: &TagRow, query: &str) -> bool {
	if query.is_empty() {
		return true;
	}

	tag.name.to_lowercase().contains(query)
		|| tag
			.translated_name
			.as_deref()
			.map(|translated| translated.to_lowercase().contains(query))
			.unwrap_or(false)
}

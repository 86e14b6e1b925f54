use std::collections::{HashMap, HashSet};

use sqlx::QueryBuilder;

use shiori_storage::{db::Db, queries};

use crate::{
	Result,
	filter::{IllustFilter, ProcessedTags, push_filters},
};

/// Resolves include/exclude tag name lists to the definitive candidate
/// ID set. `None` signals that no tag-based restriction applies and the
/// caller should use the scalar filters alone.
///
/// An include tag every entity must carry: the per-tag membership sets
/// are intersected. An exclude tag no entity may carry: the union of
/// their membership sets is subtracted. An unknown include tag can
/// never be satisfied, so it collapses the result to the empty set;
/// an unknown exclude tag excludes nothing.
pub(crate) async fn resolve_tag_filters(
	db: &Db,
	tags: &ProcessedTags,
	base_filters: &[IllustFilter],
) -> Result<Option<Vec<i64>>> {
	if tags.include_tags.is_empty() && tags.exclude_tags.is_empty() {
		return Ok(None);
	}

	let base_ids = filtered_illust_ids(db, base_filters).await?;

	if base_ids.is_empty() {
		return Ok(Some(Vec::new()));
	}

	let mut working: Option<Vec<i64>> = None;

	if !tags.include_tags.is_empty() {
		let Some(include_ids) = resolve_all_tag_ids(db, &tags.include_tags).await? else {
			tracing::debug!("Unknown include tag; the search cannot match anything.");

			return Ok(Some(Vec::new()));
		};
		let mut member_sets = Vec::with_capacity(include_ids.len());

		for tag_id in include_ids {
			let members = queries::illust_ids_with_tag(db, tag_id, &base_ids).await?;

			member_sets.push(members.into_iter().collect::<HashSet<i64>>());
		}

		let intersection = intersect_smallest_first(member_sets);

		if intersection.is_empty() {
			return Ok(Some(Vec::new()));
		}

		working = Some(intersection);
	}

	if !tags.exclude_tags.is_empty() {
		let exclude_ids = resolve_known_tag_ids(db, &tags.exclude_tags).await?;

		if !exclude_ids.is_empty() {
			let scope = match working.take() {
				Some(ids) => ids,
				None => base_ids,
			};
			let mut excluded = HashSet::new();

			for tag_id in exclude_ids {
				for illust_id in queries::illust_ids_with_tag(db, tag_id, &scope).await? {
					excluded.insert(illust_id);
				}
			}

			working = Some(scope.into_iter().filter(|id| !excluded.contains(id)).collect());
		} else if working.is_none() {
			// Every exclude name was unknown and there were no include
			// tags; nothing restricts the base set.
			working = Some(base_ids);
		}
	}

	Ok(working)
}

/// IDs of the entities matching the scalar predicates, independent of
/// any tag restriction.
pub(crate) async fn filtered_illust_ids(db: &Db, filters: &[IllustFilter]) -> Result<Vec<i64>> {
	let mut builder = QueryBuilder::new("SELECT id FROM illusts");

	push_filters(&mut builder, filters);

	Ok(builder.build_query_scalar::<i64>().fetch_all(&db.pool).await?)
}

pub(crate) async fn filtered_illust_count(db: &Db, filters: &[IllustFilter]) -> Result<i64> {
	let mut builder = QueryBuilder::new("SELECT COUNT(*) FROM illusts");

	push_filters(&mut builder, filters);

	Ok(builder.build_query_scalar::<i64>().fetch_one(&db.pool).await?)
}

/// Name -> ID for every listed tag, or `None` as soon as one name has
/// no tag row.
async fn resolve_all_tag_ids(db: &Db, names: &[String]) -> Result<Option<Vec<i64>>> {
	let rows = queries::tags_by_names(db, names).await?;
	let by_name: HashMap<&str, i64> = rows.iter().map(|tag| (tag.name.as_str(), tag.id)).collect();
	let mut ids = Vec::with_capacity(names.len());

	for name in names {
		match by_name.get(name.as_str()) {
			Some(id) => ids.push(*id),
			None => return Ok(None),
		}
	}

	Ok(Some(ids))
}

/// Name -> ID for the listed tags, silently dropping unknown names.
async fn resolve_known_tag_ids(db: &Db, names: &[String]) -> Result<Vec<i64>> {
	Ok(queries::tags_by_names(db, names).await?.into_iter().map(|tag| tag.id).collect())
}

/// Intersects the membership sets, iterating the smallest one and
/// testing membership against the rest.
pub(crate) fn intersect_smallest_first(mut sets: Vec<HashSet<i64>>) -> Vec<i64> {
	let Some(smallest_index) = (0..sets.len()).min_by_key(|index| sets[*index].len()) else {
		return Vec::new();
	};
	let smallest = sets.swap_remove(smallest_index);

	smallest.into_iter().filter(|id| sets.iter().all(|set| set.contains(id))).collect()
}

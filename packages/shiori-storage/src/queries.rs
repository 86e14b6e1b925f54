//! Read-side lookups over the junction tables. Anything keyed by an
//! ID or name list goes through [`crate::batch`] so a large candidate
//! set never exceeds the store's bound-parameter ceiling.

use sqlx::QueryBuilder;

use crate::{
	Result, batch,
	db::Db,
	models::{IllustRow, IllustTagRow, IllustUserRow, TagCountRow, TagRow},
};

pub async fn tags_by_names(db: &Db, names: &[String]) -> Result<Vec<TagRow>> {
	let rows = batch::batched_query(names, |chunk| async move {
		let mut builder =
			QueryBuilder::new("SELECT id, name, translated_name FROM tags WHERE name IN (");
		let mut separated = builder.separated(", ");

		for name in chunk {
			separated.push_bind(name);
		}

		builder.push(")");

		builder.build_query_as::<TagRow>().fetch_all(&db.pool).await
	})
	.await?;

	Ok(rows)
}

pub async fn tags_by_ids(db: &Db, ids: &[i64]) -> Result<Vec<TagRow>> {
	let rows = batch::batched_query(ids, |chunk| async move {
		let mut builder =
			QueryBuilder::new("SELECT id, name, translated_name FROM tags WHERE id IN (");
		let mut separated = builder.separated(", ");

		for id in chunk {
			separated.push_bind(id);
		}

		builder.push(")");

		builder.build_query_as::<TagRow>().fetch_all(&db.pool).await
	})
	.await?;

	Ok(rows)
}

pub async fn illusts_by_ids(db: &Db, ids: &[i64]) -> Result<Vec<IllustRow>> {
	let rows = batch::batched_query(ids, |chunk| async move {
		let mut builder = QueryBuilder::new("SELECT * FROM illusts WHERE id IN (");
		let mut separated = builder.separated(", ");

		for id in chunk {
			separated.push_bind(id);
		}

		builder.push(")");

		builder.build_query_as::<IllustRow>().fetch_all(&db.pool).await
	})
	.await?;

	Ok(rows)
}

/// IDs of the illustrations in `scope` that carry the given tag.
pub async fn illust_ids_with_tag(db: &Db, tag_id: i64, scope: &[i64]) -> Result<Vec<i64>> {
	let rows = batch::batched_query(scope, |chunk| async move {
		let mut builder = QueryBuilder::new("SELECT illust_id FROM illust_tags WHERE tag_id = ");

		builder.push_bind(tag_id);
		builder.push(" AND illust_id IN (");

		let mut separated = builder.separated(", ");

		for id in chunk {
			separated.push_bind(id);
		}

		builder.push(")");

		builder.build_query_scalar::<i64>().fetch_all(&db.pool).await
	})
	.await?;

	Ok(rows)
}

/// IDs of every illustration carrying the given tag, unscoped.
pub async fn all_illust_ids_with_tag(db: &Db, tag_id: i64) -> Result<Vec<i64>> {
	let rows = sqlx::query_scalar("SELECT illust_id FROM illust_tags WHERE tag_id = ?")
		.bind(tag_id)
		.fetch_all(&db.pool)
		.await?;

	Ok(rows)
}

pub async fn users_for_illusts(db: &Db, ids: &[i64]) -> Result<Vec<IllustUserRow>> {
	let rows = batch::batched_query(ids, |chunk| async move {
		let mut builder = QueryBuilder::new(
			"SELECT iu.illust_id, u.id, u.name, u.account, u.profile_image_urls, u.is_followed \
			 FROM illust_users iu \
			 INNER JOIN users u ON iu.user_id = u.id \
			 WHERE iu.illust_id IN (",
		);
		let mut separated = builder.separated(", ");

		for id in chunk {
			separated.push_bind(id);
		}

		builder.push(")");

		builder.build_query_as::<IllustUserRow>().fetch_all(&db.pool).await
	})
	.await?;

	Ok(rows)
}

pub async fn tags_for_illusts(db: &Db, ids: &[i64]) -> Result<Vec<IllustTagRow>> {
	let rows = batch::batched_query(ids, |chunk| async move {
		let mut builder = QueryBuilder::new(
			"SELECT it.illust_id, t.id, t.name, t.translated_name \
			 FROM illust_tags it \
			 INNER JOIN tags t ON it.tag_id = t.id \
			 WHERE it.illust_id IN (",
		);
		let mut separated = builder.separated(", ");

		for id in chunk {
			separated.push_bind(id);
		}

		builder.push(")");

		builder.build_query_as::<IllustTagRow>().fetch_all(&db.pool).await
	})
	.await?;

	Ok(rows)
}

/// Per-tag occurrence counts inside the given illustration set. Each
/// chunk is grouped store-side; the caller accumulates across chunks.
pub async fn tag_counts_for_illusts(db: &Db, ids: &[i64]) -> Result<Vec<TagCountRow>> {
	let rows = batch::batched_query(ids, |chunk| async move {
		let mut builder = QueryBuilder::new(
			"SELECT tag_id, COUNT(illust_id) AS count FROM illust_tags WHERE illust_id IN (",
		);
		let mut separated = builder.separated(", ");

		for id in chunk {
			separated.push_bind(id);
		}

		builder.push(") GROUP BY tag_id");

		builder.build_query_as::<TagCountRow>().fetch_all(&db.pool).await
	})
	.await?;

	Ok(rows)
}

/// Per-tag occurrence counts over the whole junction table.
pub async fn all_tag_counts(db: &Db) -> Result<Vec<TagCountRow>> {
	let rows = sqlx::query_as(
		"SELECT tag_id, COUNT(illust_id) AS count FROM illust_tags GROUP BY tag_id",
	)
	.fetch_all(&db.pool)
	.await?;

	Ok(rows)
}

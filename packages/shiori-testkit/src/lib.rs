mod error;

pub use error::{Error, Result};

use std::{
	env, fs,
	path::{Path, PathBuf},
	sync::atomic::{AtomicU64, Ordering},
	time::{SystemTime, UNIX_EPOCH},
};

use shiori_storage::db::Db;

/// A throwaway store backed by a uniquely named database file under the
/// system temp directory, with the schema already applied. Call
/// [`TestStore::cleanup`] at the end of a test; [`Drop`] removes the
/// files best-effort if a test bails early.
pub struct TestStore {
	pub db: Db,
	path: PathBuf,
	cleaned: bool,
}
impl TestStore {
	pub async fn new() -> Result<Self> {
		static COUNTER: AtomicU64 = AtomicU64::new(0);

		let nanos = SystemTime::now()
			.duration_since(UNIX_EPOCH)
			.map_err(|err| Error::Message(format!("System time is before the epoch: {err}.")))?
			.as_nanos();
		let ordinal = COUNTER.fetch_add(1, Ordering::SeqCst);
		let pid = std::process::id();
		let mut path = env::temp_dir();

		path.push(format!("shiori_test_{nanos}_{pid}_{ordinal}.db"));

		let cfg = shiori_config::Sqlite {
			path: path.to_string_lossy().into_owned(),
			pool_max_conns: 4,
		};
		let db = Db::connect(&cfg).await?;

		db.ensure_schema().await?;

		Ok(Self { db, path, cleaned: false })
	}

	/// Database file path, for callers that build their own pool over
	/// the same store.
	pub fn path(&self) -> &Path {
		&self.path
	}

	pub async fn cleanup(mut self) -> Result<()> {
		self.db.pool.close().await;
		self.remove_files();
		self.cleaned = true;

		Ok(())
	}

	fn remove_files(&self) {
		let _ = fs::remove_file(&self.path);

		// Rollback journal and WAL sidecars, if the store created them.
		for suffix in ["-journal", "-wal", "-shm"] {
			let mut sidecar = self.path.clone().into_os_string();

			sidecar.push(suffix);

			let _ = fs::remove_file(PathBuf::from(sidecar));
		}
	}
}
impl Drop for TestStore {
	fn drop(&mut self) {
		if !self.cleaned {
			self.remove_files();
		}
	}
}

/// Everything about a seeded illustration the search predicates can
/// see. The remaining columns get fixed defaults.
#[derive(Debug, Clone)]
pub struct IllustSeed {
	pub id: i64,
	pub user_id: i64,
	pub title: String,
	pub page_count: i64,
	pub width: i64,
	pub height: i64,
	pub ai_type: i64,
	pub bookmark_private: bool,
}
impl IllustSeed {
	pub fn new(id: i64, user_id: i64) -> Self {
		Self {
			id,
			user_id,
			title: format!("illust-{id}"),
			page_count: 1,
			width: 1200,
			height: 800,
			ai_type: 0,
			bookmark_private: false,
		}
	}
}

pub async fn insert_user(db: &Db, id: i64, name: &str, account: &str) -> Result<()> {
	let profile_image_urls =
		serde_json::json!({ "medium": format!("https://img.example/profile/{id}.jpg") });

	sqlx::query(
		"INSERT INTO users (id, name, account, profile_image_urls, is_followed) \
		 VALUES (?, ?, ?, ?, NULL)",
	)
	.bind(id)
	.bind(name)
	.bind(account)
	.bind(profile_image_urls.to_string())
	.execute(&db.pool)
	.await?;

	Ok(())
}

pub async fn insert_tag(db: &Db, id: i64, name: &str, translated_name: Option<&str>) -> Result<()> {
	sqlx::query("INSERT INTO tags (id, name, translated_name) VALUES (?, ?, ?)")
		.bind(id)
		.bind(name)
		.bind(translated_name)
		.execute(&db.pool)
		.await?;

	Ok(())
}

pub async fn insert_illust(db: &Db, seed: &IllustSeed) -> Result<()> {
	let image_urls = serde_json::json!({
		"square_medium": format!("https://img.example/sq/{}.jpg", seed.id),
		"medium": format!("https://img.example/md/{}.jpg", seed.id),
		"large": format!("https://img.example/lg/{}.jpg", seed.id),
	});
	let meta_single_page = if seed.page_count == 1 {
		serde_json::json!({
			"original_image_url": format!("https://img.example/orig/{}.png", seed.id),
		})
	} else {
		serde_json::json!({})
	};
	let meta_pages: Vec<serde_json::Value> = if seed.page_count > 1 {
		(0..seed.page_count)
			.map(|page| {
				serde_json::json!({
					"image_urls": {
						"original": format!("https://img.example/orig/{}_p{page}.png", seed.id),
					},
				})
			})
			.collect()
	} else {
		Vec::new()
	};

	sqlx::query(
		"INSERT INTO illusts (\
			id, title, \"type\", caption, create_date, page_count, width, height, \
			sanity_level, total_view, total_bookmarks, is_bookmarked, visible, x_restrict, \
			is_muted, total_comments, ai_type, book_style, \"restrict\", bookmark_private, \
			image_urls, meta_single_page, meta_pages, tools, url\
		 ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
	)
	.bind(seed.id)
	.bind(&seed.title)
	.bind("illust")
	.bind("")
	.bind("2024-01-01T00:00:00+09:00")
	.bind(seed.page_count)
	.bind(seed.width)
	.bind(seed.height)
	.bind(2_i64)
	.bind(100_i64)
	.bind(10_i64)
	.bind(true)
	.bind(true)
	.bind(0_i64)
	.bind(false)
	.bind(0_i64)
	.bind(seed.ai_type)
	.bind(0_i64)
	.bind(0_i64)
	.bind(seed.bookmark_private)
	.bind(image_urls.to_string())
	.bind(meta_single_page.to_string())
	.bind(serde_json::Value::Array(meta_pages).to_string())
	.bind("[]")
	.bind(None::<String>)
	.execute(&db.pool)
	.await?;

	sqlx::query("INSERT INTO illust_users (illust_id, user_id) VALUES (?, ?)")
		.bind(seed.id)
		.bind(seed.user_id)
		.execute(&db.pool)
		.await?;

	Ok(())
}

pub async fn link_tag(db: &Db, illust_id: i64, tag_id: i64) -> Result<()> {
	sqlx::query("INSERT INTO illust_tags (illust_id, tag_id) VALUES (?, ?)")
		.bind(illust_id)
		.bind(tag_id)
		.execute(&db.pool)
		.await?;

	Ok(())
}

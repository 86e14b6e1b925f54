/// One saved illustration as the ingestion process stores it. The
/// `image_urls`, `meta_single_page`, `meta_pages`, and `tools` columns
/// hold JSON text; parsing them into typed shapes happens at the
/// response boundary, not here.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct IllustRow {
	pub id: i64,
	pub title: String,
	pub r#type: String,
	pub caption: String,
	pub create_date: String,
	pub page_count: i64,
	pub width: i64,
	pub height: i64,
	pub sanity_level: i64,
	pub total_view: i64,
	pub total_bookmarks: i64,
	pub is_bookmarked: bool,
	pub visible: bool,
	pub x_restrict: i64,
	pub is_muted: bool,
	pub total_comments: i64,
	pub ai_type: i64,
	pub book_style: i64,
	pub restrict: i64,
	pub bookmark_private: bool,
	pub image_urls: String,
	pub meta_single_page: String,
	pub meta_pages: String,
	pub tools: String,
	pub url: Option<String>,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct UserRow {
	pub id: i64,
	pub name: String,
	pub account: String,
	pub profile_image_urls: String,
	pub is_followed: Option<bool>,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct TagRow {
	pub id: i64,
	pub name: String,
	pub translated_name: Option<String>,
}

/// Uploader join row keyed by the illustration it belongs to.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct IllustUserRow {
	pub illust_id: i64,
	#[sqlx(flatten)]
	pub user: UserRow,
}

/// Tag join row keyed by the illustration it belongs to.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct IllustTagRow {
	pub illust_id: i64,
	#[sqlx(flatten)]
	pub tag: TagRow,
}

#[derive(Debug, Clone, Copy, sqlx::FromRow)]
pub struct TagCountRow {
	pub tag_id: i64,
	pub count: i64,
}

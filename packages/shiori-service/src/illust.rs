use serde::{Deserialize, Serialize};

use shiori_storage::models::{IllustRow, TagRow, UserRow};

use crate::{Error, Result};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageUrls {
	pub square_medium: Option<String>,
	pub medium: Option<String>,
	pub large: Option<String>,
	pub original: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MetaSinglePage {
	pub original_image_url: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MetaPage {
	pub image_urls: ImageUrls,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfileImageUrls {
	pub medium: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IllustAuthor {
	pub id: i64,
	pub name: String,
	pub account: String,
	pub profile_image_urls: ProfileImageUrls,
	pub is_followed: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IllustTag {
	pub name: String,
	pub translated_name: Option<String>,
}

/// Denormalized search hit: the illustration row with its author and
/// tags joined in and the JSON-text columns parsed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Illust {
	pub id: i64,
	pub title: String,
	#[serde(rename = "type")]
	pub kind: String,
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
	pub image_urls: ImageUrls,
	pub meta_single_page: MetaSinglePage,
	pub meta_pages: Vec<MetaPage>,
	pub tools: Vec<String>,
	pub url: Option<String>,
	pub user: IllustAuthor,
	pub tags: Vec<IllustTag>,
}
impl Illust {
	/// Record integrity is the ingestion side's contract; a malformed
	/// blob column surfaces as an error rather than being papered over.
	pub(crate) fn assemble(row: IllustRow, user: &UserRow, tags: &[TagRow]) -> Result<Self> {
		let image_urls = parse_blob(row.id, "image_urls", &row.image_urls)?;
		let meta_single_page = parse_blob(row.id, "meta_single_page", &row.meta_single_page)?;
		let meta_pages = parse_blob(row.id, "meta_pages", &row.meta_pages)?;
		let tools = parse_blob(row.id, "tools", &row.tools)?;
		let profile_image_urls =
			parse_blob(row.id, "profile_image_urls", &user.profile_image_urls)?;

		Ok(Self {
			id: row.id,
			title: row.title,
			kind: row.r#type,
			caption: row.caption,
			create_date: row.create_date,
			page_count: row.page_count,
			width: row.width,
			height: row.height,
			sanity_level: row.sanity_level,
			total_view: row.total_view,
			total_bookmarks: row.total_bookmarks,
			is_bookmarked: row.is_bookmarked,
			visible: row.visible,
			x_restrict: row.x_restrict,
			is_muted: row.is_muted,
			total_comments: row.total_comments,
			ai_type: row.ai_type,
			book_style: row.book_style,
			restrict: row.restrict,
			bookmark_private: row.bookmark_private,
			image_urls,
			meta_single_page,
			meta_pages,
			tools,
			url: row.url,
			user: IllustAuthor {
				id: user.id,
				name: user.name.clone(),
				account: user.account.clone(),
				profile_image_urls,
				is_followed: user.is_followed,
			},
			tags: tags
				.iter()
				.map(|tag| IllustTag {
					name: tag.name.clone(),
					translated_name: tag.translated_name.clone(),
				})
				.collect(),
		})
	}
}

fn parse_blob<T>(illust_id: i64, field: &str, raw: &str) -> Result<T>
where
	T: serde::de::DeserializeOwned,
{
	serde_json::from_str(raw).map_err(|err| Error::MalformedRecord {
		illust_id,
		message: format!("invalid {field}: {err}"),
	})
}

pub mod filter;
pub mod search;
pub mod tag_search;
pub mod top_tags;

mod error;
mod illust;
mod resolve;

pub use error::{Error, Result};
pub use filter::{ProcessedTags, TagParam, process_tag_params};
pub use illust::{
	Illust, IllustAuthor, IllustTag, ImageUrls, MetaPage, MetaSinglePage, ProfileImageUrls,
};
pub use search::{Paginate, SearchRequest, SearchResponse};
pub use tag_search::{LimitParam, TagSearchRequest};

use shiori_storage::db::Db;

/// The search core. Holds the explicitly injected store handle; no
/// global connection state exists anywhere in the crate.
pub struct ShioriService {
	pub db: Db,
}
impl ShioriService {
	pub fn new(db: Db) -> Self {
		Self { db }
	}
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct TagName {
	pub original: String,
	pub translated: Option<String>,
}

/// Per-request tag facet entry; computed on the fly, never persisted.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct TagEntry {
	pub name: TagName,
	pub count: i64,
	#[serde(default, rename = "isIncludeTag", skip_serializing_if = "Option::is_none")]
	pub is_include_tag: Option<bool>,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct TagSearchResponse {
	pub tags: Vec<TagEntry>,
}

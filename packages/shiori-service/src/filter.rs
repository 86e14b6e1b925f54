use serde::{Deserialize, Serialize};
use sqlx::{QueryBuilder, Sqlite};

use crate::search::SearchRequest;

/// ai_type value meaning fully AI-generated. 1 ("inconclusive") counts
/// as non-AI throughout.
const AI_GENERATED: i64 = 2;

/// Request field that query-string deserialization may deliver as a
/// single value or as a repeated list. Normalized to a plain name list
/// before anything below the request boundary sees it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TagParam {
	One(String),
	Many(Vec<String>),
}
impl TagParam {
	fn to_names(&self) -> Vec<String> {
		match self {
			Self::One(name) if name.is_empty() => Vec::new(),
			Self::One(name) => vec![name.clone()],
			Self::Many(names) => names.clone(),
		}
	}
}

pub(crate) fn tag_param_names(param: Option<&TagParam>) -> Vec<String> {
	param.map(TagParam::to_names).unwrap_or_default()
}

#[derive(Debug, Clone, Default)]
pub struct ProcessedTags {
	pub include_tags: Vec<String>,
	pub exclude_tags: Vec<String>,
}

pub fn process_tag_params(request: &SearchRequest) -> ProcessedTags {
	ProcessedTags {
		include_tags: tag_param_names(request.include_tags.as_ref()),
		exclude_tags: tag_param_names(request.exclude_tags.as_ref()),
	}
}

/// One scalar predicate over the illusts table. The predicates are
/// independent and the final WHERE clause ANDs them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum IllustFilter {
	BookmarkPrivate(bool),
	Horizontal,
	Vertical,
	WidthAtLeast(i64),
	HeightAtLeast(i64),
	PageCountAtLeast(i64),
	PageCountAtMost(i64),
	AiGenerated,
	NotAiGenerated,
}
impl IllustFilter {
	fn push_sql(self, builder: &mut QueryBuilder<'_, Sqlite>) {
		match self {
			Self::BookmarkPrivate(value) => {
				builder.push("bookmark_private = ");
				builder.push_bind(value);
			},
			// A square image satisfies both aspect predicates; that is
			// the documented behavior, not an oversight.
			Self::Horizontal => {
				builder.push("width >= height");
			},
			Self::Vertical => {
				builder.push("width <= height");
			},
			Self::WidthAtLeast(size) => {
				builder.push("width >= ");
				builder.push_bind(size);
			},
			Self::HeightAtLeast(size) => {
				builder.push("height >= ");
				builder.push_bind(size);
			},
			Self::PageCountAtLeast(count) => {
				builder.push("page_count >= ");
				builder.push_bind(count);
			},
			Self::PageCountAtMost(count) => {
				builder.push("page_count <= ");
				builder.push_bind(count);
			},
			Self::AiGenerated => {
				builder.push("ai_type = ");
				builder.push_bind(AI_GENERATED);
			},
			Self::NotAiGenerated => {
				builder.push("ai_type != ");
				builder.push_bind(AI_GENERATED);
			},
		}
	}
}

pub(crate) fn push_filters(builder: &mut QueryBuilder<'_, Sqlite>, filters: &[IllustFilter]) {
	for (index, filter) in filters.iter().enumerate() {
		builder.push(if index == 0 { " WHERE " } else { " AND " });
		filter.push_sql(builder);
	}
}

/// Translates a search request into scalar predicates. Each rule only
/// fires when the request field deviates from its no-op default.
pub(crate) fn build_illust_filters(request: &SearchRequest) -> Vec<IllustFilter> {
	let minimum_page_count = lenient_i64(request.minimum_page_count.as_deref());
	let maximum_page_count = lenient_i64(request.maximum_page_count.as_deref());
	let sizer_size = lenient_i64(request.sizer_size.as_deref());
	let mut filters = Vec::new();

	match request.restrict.as_deref() {
		Some("public") => filters.push(IllustFilter::BookmarkPrivate(false)),
		Some("private") => filters.push(IllustFilter::BookmarkPrivate(true)),
		_ => {},
	}

	match request.aspect.as_deref() {
		Some("horizontal") => filters.push(IllustFilter::Horizontal),
		Some("vertical") => filters.push(IllustFilter::Vertical),
		_ => {},
	}

	if sizer_size > 0 {
		match request.sizer_mode.as_deref() {
			Some("width") => filters.push(IllustFilter::WidthAtLeast(sizer_size)),
			Some("height") => filters.push(IllustFilter::HeightAtLeast(sizer_size)),
			_ => {},
		}
	}

	if minimum_page_count > 0 {
		filters.push(IllustFilter::PageCountAtLeast(minimum_page_count));
	}
	// A non-positive upper bound means "no upper bound".
	if maximum_page_count > 0 {
		filters.push(IllustFilter::PageCountAtMost(maximum_page_count));
	}

	match request.ai_mode.as_deref() {
		Some("non-ai-only") => filters.push(IllustFilter::NotAiGenerated),
		Some("ai-only") => filters.push(IllustFilter::AiGenerated),
		_ => {},
	}

	filters
}

/// Query-string numbers arrive as text; absent or unparsable values
/// collapse to zero, which disables the corresponding rule.
pub(crate) fn lenient_i64(raw: Option<&str>) -> i64 {
	raw.and_then(|value| value.trim().parse::<i64>().ok()).unwrap_or(0)
}

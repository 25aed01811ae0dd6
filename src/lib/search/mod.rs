//! Flat search index over static pages, posts, tags and projects.

use serde::Serialize;

use crate::{
    config::{FEATURED_POST_COUNT, MISSING_FEATURED_SENTINEL, StaticPage},
    post::{Post, Project},
    tags::{TagCounts, display_name, generate_tag_slug},
    types::Href,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchItemKind {
    Page,
    Post,
    Tag,
}

impl SearchItemKind {
    pub fn as_str(self) -> &'static str {
        match self {
            SearchItemKind::Page => "page",
            SearchItemKind::Post => "post",
            SearchItemKind::Tag => "tag",
        }
    }
}

/// One searchable entry as consumed by the palette.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchItem {
    pub id: String,
    pub title: String,
    pub url: String,
    #[serde(rename = "type")]
    pub kind: SearchItemKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub excerpt: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub featured: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_featured: Option<bool>,
}

impl SearchItem {
    pub fn is_featured(&self) -> bool {
        self.is_featured.unwrap_or(false)
    }

    /// Priority used when ranking featured items, lower first.
    pub fn featured_rank(&self) -> i64 {
        self.featured.unwrap_or(MISSING_FEATURED_SENTINEL)
    }

    /// Case-insensitive substring match on title or excerpt. `needle` must
    /// already be lowercase.
    pub fn matches(&self, needle: &str) -> bool {
        self.title.to_lowercase().contains(needle)
            || self
                .excerpt
                .as_deref()
                .is_some_and(|e| e.to_lowercase().contains(needle))
    }
}

impl From<&StaticPage> for SearchItem {
    fn from(page: &StaticPage) -> Self {
        Self {
            id: page.id.to_string(),
            title: page.title.to_string(),
            url: page.url.to_string(),
            kind: SearchItemKind::Page,
            excerpt: Some(page.excerpt.to_string()),
            featured: None,
            is_featured: None,
        }
    }
}

impl From<&Project> for SearchItem {
    fn from(project: &Project) -> Self {
        Self {
            id: project.id.clone(),
            title: project.title.clone(),
            url: project.href().into_string(),
            kind: SearchItemKind::Page,
            excerpt: Some(project.description.clone().unwrap_or_default()),
            featured: None,
            is_featured: None,
        }
    }
}

/// Index entries for posts, lowest `featured` first; the first
/// [`FEATURED_POST_COUNT`] are flagged as featured.
pub fn post_items(posts: &[Post]) -> Vec<SearchItem> {
    let mut ranked: Vec<&Post> = posts.iter().collect();
    ranked.sort_by_key(|p| p.featured);

    ranked
        .into_iter()
        .enumerate()
        .map(|(rank, post)| SearchItem {
            id: post.slug.clone(),
            title: post.title.clone(),
            url: post.href().into_string(),
            kind: SearchItemKind::Post,
            excerpt: Some(post.description.clone()),
            featured: Some(post.featured),
            is_featured: Some(rank < FEATURED_POST_COUNT),
        })
        .collect()
}

fn article_count(count: usize, display: &str) -> String {
    let noun = if count == 1 { "article" } else { "articles" };
    format!("{count} {noun} about {display}")
}

/// Index entries for tags, titled with the tag's first spelling in `posts`.
///
/// Tags whose slug is empty (no ASCII letters or digits) have no tag page to
/// link to and are left out.
pub fn tag_items(tag_counts: &TagCounts, posts: &[Post]) -> Vec<SearchItem> {
    tag_counts
        .iter()
        .filter_map(|(tag, &count)| {
            let slug = generate_tag_slug(tag);
            if slug.is_empty() {
                tracing::debug!(%tag, "tag has no slug, not indexed");
                return None;
            }
            let display = display_name(tag, posts);
            Some(SearchItem {
                id: format!("tag-{slug}"),
                title: display.to_string(),
                url: Href::tag(&slug).into_string(),
                kind: SearchItemKind::Tag,
                excerpt: Some(article_count(count, display)),
                featured: None,
                is_featured: None,
            })
        })
        .collect()
}

/// Assemble the search index: static pages, then posts, tags and projects.
///
/// `None` marks a source that could not be loaded; it contributes nothing
/// and the rest of the index is still built.
pub fn build_search_index(
    pages: &[StaticPage],
    posts: Option<&[Post]>,
    projects: Option<&[Project]>,
    tag_counts: &TagCounts,
) -> Vec<SearchItem> {
    let mut items: Vec<SearchItem> = pages.iter().map(SearchItem::from).collect();

    match posts {
        Some(posts) => {
            items.extend(post_items(posts));
            items.extend(tag_items(tag_counts, posts));
        }
        None => {
            tracing::debug!("posts unavailable, indexing tags without display names");
            items.extend(tag_items(tag_counts, &[]));
        }
    }

    match projects {
        Some(projects) => items.extend(projects.iter().map(SearchItem::from)),
        None => tracing::debug!("projects unavailable, skipping"),
    }

    tracing::debug!(items = items.len(), "built search index");
    items
}

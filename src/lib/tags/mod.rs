//! Tag counting and tag-overlap based related posts.

use std::collections::{BTreeMap, HashSet};

use rayon::prelude::*;

use crate::{config::LINK_SUGGESTION_LIMIT, content::by_published_at, post::Post, utils::slugify};

/// Lowercased tag to number of posts referencing it.
pub type TagCounts = BTreeMap<String, usize>;

/// Count tag usage across `posts`, case-insensitively.
pub fn extract_all_tags(posts: &[Post]) -> TagCounts {
    let mut counts = TagCounts::new();
    for post in posts {
        for tag in &post.tags {
            *counts.entry(tag.to_lowercase()).or_default() += 1;
        }
    }
    counts
}

/// Slug used in tag URLs and ids.
pub fn generate_tag_slug(tag: &str) -> String {
    slugify(tag)
}

/// First spelling of `normalized` as written in a post, or the normalized
/// form when no post uses it.
pub fn display_name<'a>(normalized: &'a str, posts: &'a [Post]) -> &'a str {
    posts
        .iter()
        .flat_map(|p| p.tags.iter())
        .find(|t| t.to_lowercase() == normalized)
        .map_or(normalized, String::as_str)
}

fn tag_set(post: &Post) -> HashSet<String> {
    post.tags.iter().map(|t| t.to_lowercase()).collect()
}

/// Up to `limit` posts sharing the most tags with `current`, newest first
/// among equals. Without tags on `current` this is simply the most recent
/// other posts.
pub fn find_related_posts<'a>(current: &Post, all: &'a [Post], limit: usize) -> Vec<&'a Post> {
    let others = all.iter().filter(|p| p.slug != current.slug);
    let current_tags = tag_set(current);

    if current_tags.is_empty() {
        let mut recent: Vec<&Post> = others.collect();
        recent.sort_by(|a, b| by_published_at(a, b));
        recent.truncate(limit);
        return recent;
    }

    let mut scored: Vec<(usize, &Post)> = others
        .map(|post| {
            let score = tag_set(post).intersection(&current_tags).count();
            (score, post)
        })
        .filter(|(score, _)| *score > 0)
        .collect();

    scored.sort_by(|(sa, a), (sb, b)| sb.cmp(sa).then_with(|| by_published_at(a, b)));

    scored
        .into_iter()
        .take(limit)
        .map(|(_, post)| post)
        .collect()
}

/// Related posts for every post, keyed by slug.
pub fn generate_internal_link_suggestions(posts: &[Post]) -> BTreeMap<&str, Vec<&Post>> {
    posts
        .par_iter()
        .map(|post| {
            (
                post.slug.as_str(),
                find_related_posts(post, posts, LINK_SUGGESTION_LIMIT),
            )
        })
        .collect()
}

//! Visibility filtering, ordering and reading-time helpers for posts.

use std::cmp::Ordering;

use crate::{
    config::{BuildMode, FilterOptions, WORDS_PER_MINUTE},
    post::Post,
};

/// Whether `post` may be listed under `options` in the given build mode.
pub fn is_visible(post: &Post, options: &FilterOptions, mode: BuildMode) -> bool {
    // Hide drafts unless explicitly allowed (or in development)
    if !options.drafts_visible(mode) && post.draft {
        return false;
    }
    if !options.archived && post.archived {
        return false;
    }
    true
}

/// Predicate form of [`is_visible`], for use with `Iterator::filter`.
pub fn filter_posts(options: FilterOptions, mode: BuildMode) -> impl Fn(&&Post) -> bool {
    move |post| is_visible(post, &options, mode)
}

/// Owned copies of the posts visible under `options`, in input order.
pub fn visible_posts(posts: &[Post], options: FilterOptions, mode: BuildMode) -> Vec<Post> {
    posts
        .iter()
        .filter(filter_posts(options, mode))
        .cloned()
        .collect()
}

/// Most recently published first. Equal dates compare equal, so stable
/// sorts keep input order for them.
pub fn by_published_at(a: &Post, b: &Post) -> Ordering {
    b.published_at.cmp(&a.published_at)
}

/// Lower `featured` first, then most recently published.
pub fn by_featured(a: &Post, b: &Post) -> Ordering {
    a.featured
        .cmp(&b.featured)
        .then_with(|| by_published_at(a, b))
}

pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Estimated minutes to read `words` words, never less than one.
pub fn reading_time(words: usize) -> usize {
    words.div_ceil(WORDS_PER_MINUTE).max(1)
}

pub fn format_reading_time(minutes: usize) -> String {
    format!("{minutes} min read")
}

//! Post builders shared by unit tests.

use crate::{
    post::Post,
    types::{Icon, IsoDate},
};

pub(crate) fn post(slug: &str, published: &str, tags: &[&str]) -> Post {
    Post {
        slug: slug.to_string(),
        title: slug.to_string(),
        description: format!("About {slug}"),
        published_at: IsoDate::parse(published).expect("fixture date"),
        last_modified_at: None,
        tags: tags.iter().map(|t| t.to_string()).collect(),
        featured: 100,
        draft: false,
        archived: false,
        icon: Icon::default(),
        word_count: 0,
    }
}

pub(crate) fn featured(slug: &str, published: &str, featured: i64) -> Post {
    Post {
        featured,
        ..post(slug, published, &[])
    }
}

pub(crate) fn slugs(posts: &[&Post]) -> Vec<String> {
    posts.iter().map(|p| p.slug.clone()).collect()
}

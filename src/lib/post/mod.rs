use serde::{Deserialize, Serialize};

use crate::{
    content::reading_time,
    types::{Href, Icon, IsoDate},
};

/// A published article as loaded from the content tree.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub slug: String,
    pub title: String,
    pub description: String,
    pub published_at: IsoDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_modified_at: Option<IsoDate>,
    pub tags: Vec<String>,
    /// Lower values are more prominent.
    pub featured: i64,
    pub draft: bool,
    pub archived: bool,
    pub icon: Icon,
    pub word_count: usize,
}

impl Post {
    pub fn href(&self) -> Href {
        Href::post(&self.slug)
    }

    /// Most recent of the publish and modification dates.
    pub fn updated_at(&self) -> IsoDate {
        self.last_modified_at
            .map_or(self.published_at, |m| m.max(self.published_at))
    }
}

/// A post shaped for listing pages.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListItem<'a> {
    #[serde(flatten)]
    pub post: &'a Post,
    pub href: Href,
    pub reading_time: usize,
    pub updated_at: IsoDate,
}

impl<'a> From<&'a Post> for ListItem<'a> {
    fn from(post: &'a Post) -> Self {
        Self {
            post,
            href: post.href(),
            reading_time: reading_time(post.word_count),
            updated_at: post.updated_at(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectStatus {
    Idea,
    Development,
    Maintenance,
    Production,
    Archived,
}

/// Project metadata, one JSON file per project.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Project {
    #[serde(skip_deserializing)]
    pub id: String,
    #[serde(rename = "$schema", default, skip_serializing)]
    pub schema: Option<String>,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub date: Option<IsoDate>,
    #[serde(default)]
    pub icon: Option<Icon>,
    #[serde(default)]
    pub status: Option<ProjectStatus>,
}

impl Project {
    pub fn href(&self) -> Href {
        Href::project(&self.id)
    }
}

#[cfg(test)]
pub(crate) mod fixtures;

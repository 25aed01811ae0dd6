use std::{fmt, str::FromStr};

pub const INPUT_DIR: &str = "contents";
pub const OUTPUT_DIR: &str = "public";
pub const POSTS_DIR: &str = "posts";
pub const PROJECTS_DIR: &str = "projects";

// Artefacts written by the build.
pub const SEARCH_INDEX_FILE: &str = "search.json";
pub const TAG_COUNTS_FILE: &str = "tags.json";
pub const RELATED_FILE: &str = "related.json";
pub const POST_LIST_FILE: &str = "posts.json";

// Environment variable the CLI reads the build mode from.
pub const MODE_ENV_VAR: &str = "FOLIO_MODE";

// Maximum number of results the palette shows.
pub const SEARCH_RESULT_LIMIT: usize = 8;
// Posts with the lowest featured values get a star in search.
pub const FEATURED_POST_COUNT: usize = 5;
pub const RELATED_POST_LIMIT: usize = 3;
pub const LINK_SUGGESTION_LIMIT: usize = 5;
// Stand-in priority for search items without a featured value.
pub const MISSING_FEATURED_SENTINEL: i64 = 999;
pub const WORDS_PER_MINUTE: usize = 200;

/// A hand-written page that is not generated from content.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StaticPage {
    pub id: &'static str,
    pub title: &'static str,
    pub url: &'static str,
    pub excerpt: &'static str,
}

pub const STATIC_PAGES: &[StaticPage] = &[
    StaticPage {
        id: "home",
        title: "Home",
        url: "/",
        excerpt: "Welcome to my personal website",
    },
    StaticPage {
        id: "posts",
        title: "Posts",
        url: "/posts",
        excerpt: "Browse all blog posts and articles",
    },
    StaticPage {
        id: "tags",
        title: "Tags",
        url: "/tags",
        excerpt: "Browse posts by topic",
    },
    StaticPage {
        id: "projects",
        title: "Projects",
        url: "/projects",
        excerpt: "View my latest projects and work",
    },
    StaticPage {
        id: "uses",
        title: "Uses",
        url: "/uses",
        excerpt: "Tools and software I use daily",
    },
];

/// Whether the site is being built for local development or for release.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum BuildMode {
    Development,
    #[default]
    Production,
}

impl BuildMode {
    pub fn is_development(self) -> bool {
        matches!(self, BuildMode::Development)
    }
}

impl FromStr for BuildMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "dev" | "development" => Ok(BuildMode::Development),
            "prod" | "production" => Ok(BuildMode::Production),
            other => Err(format!("unknown build mode `{other}`")),
        }
    }
}

impl fmt::Display for BuildMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            BuildMode::Development => "development",
            BuildMode::Production => "production",
        })
    }
}

/// Which hidden posts a listing lets through.
///
/// `archived` defaults to `false`. `draft` defaults to `None`, meaning
/// drafts follow the build mode: shown in development, hidden in production.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FilterOptions {
    pub archived: bool,
    pub draft: Option<bool>,
}

impl FilterOptions {
    pub fn new(archived: bool) -> Self {
        Self {
            archived,
            draft: None,
        }
    }

    pub fn with_drafts(mut self, draft: bool) -> Self {
        self.draft = Some(draft);
        self
    }

    pub fn drafts_visible(&self, mode: BuildMode) -> bool {
        self.draft.unwrap_or(mode.is_development())
    }
}

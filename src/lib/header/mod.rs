use color_eyre::{Section, eyre::eyre};
use gray_matter::{Matter, engine::YAML};
use pulldown_cmark::{Event, Options, Parser, Tag, TagEnd};
use serde::Deserialize;

use crate::{
    content::word_count,
    post::Post,
    types::{Icon, IsoDate},
};

/// YAML front matter of a post. Keys used only by the render layer
/// (canonical URL, social image) are ignored.
#[derive(Deserialize, Default, Debug)]
pub struct Header {
    title: Option<String>,
    description: Option<String>,
    #[serde(alias = "publishedAt", alias = "ctime")]
    published_at: Option<String>,
    #[serde(alias = "lastModifiedAt", alias = "mtime")]
    last_modified_at: Option<String>,
    tags: Option<Vec<String>>,
    featured: Option<i64>,
    draft: Option<bool>,
    archived: Option<bool>,
    icon: Option<String>,
}

/// Front matter plus the markdown body that follows it.
#[derive(Debug)]
pub struct Document {
    pub header: Header,
    pub body: String,
}

impl TryFrom<&str> for Document {
    type Error = color_eyre::Report;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let matter = Matter::<YAML>::new();
        matter
            .parse::<Header>(value)
            .with_note(|| "While parsing frontmatter.")
            .map(|res| Document {
                header: res.data.unwrap_or_default(),
                body: res.content,
            })
    }
}

impl Header {
    /// Validate the header and build the post it describes.
    pub fn into_post(self, slug: String, body: &str) -> color_eyre::Result<Post> {
        let title = self
            .title
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| eyre!("`title` is required"))?;

        let published_raw = self
            .published_at
            .ok_or_else(|| eyre!("`published_at` is required"))?;
        let published_at = IsoDate::parse(&published_raw)
            .ok_or_else(|| eyre!("`published_at` is not a date: {published_raw}"))?;

        let last_modified_at = match self.last_modified_at {
            Some(raw) => Some(
                IsoDate::parse(&raw)
                    .ok_or_else(|| eyre!("`last_modified_at` is not a date: {raw}"))?,
            ),
            None => None,
        };

        let featured = self
            .featured
            .ok_or_else(|| eyre!("`featured` is required"))?;

        let icon = match self.icon {
            Some(raw) => raw.parse::<Icon>().map_err(|e| eyre!(e))?,
            None => Icon::default(),
        };

        Ok(Post {
            slug,
            title,
            description: self.description.unwrap_or_default(),
            published_at,
            last_modified_at,
            tags: self.tags.unwrap_or_default(),
            featured,
            draft: self.draft.unwrap_or(false),
            archived: self.archived.unwrap_or(false),
            icon,
            word_count: body_word_count(body),
        })
    }
}

/// Words of prose in a markdown body, ignoring markup and code blocks.
///
/// Text inside a block is joined back together before counting, so inline
/// markup and stray delimiters never split a word.
pub fn body_word_count(markdown: &str) -> usize {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_GFM);
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_FOOTNOTES);
    options.insert(Options::ENABLE_MATH);

    let mut in_code_block = false;
    let mut prose = String::with_capacity(markdown.len());
    for event in Parser::new_ext(markdown, options) {
        match event {
            Event::Start(Tag::CodeBlock(_)) => in_code_block = true,
            Event::End(TagEnd::CodeBlock) => {
                in_code_block = false;
                prose.push(' ');
            }
            Event::Text(text) | Event::Code(text) if !in_code_block => prose.push_str(&text),
            // Inline spans sit inside a word as often as around one.
            Event::End(
                TagEnd::Emphasis
                | TagEnd::Strong
                | TagEnd::Strikethrough
                | TagEnd::Link
                | TagEnd::Image,
            ) => {}
            Event::SoftBreak | Event::HardBreak | Event::Rule | Event::End(_) => prose.push(' '),
            _ => {}
        }
    }
    word_count(&prose)
}

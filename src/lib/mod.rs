//! Search, ranking and related-content core of a static blog.
//!
//! Posts come in from the content tree, pass the visibility filter, get
//! ranked and tag-indexed, and end up as a flat search index that the
//! command palette filters interactively.

pub mod config;
pub mod content;
pub mod header;
pub mod palette;
pub mod pipeline;
pub mod post;
pub mod search;
pub mod tags;
pub mod types;
pub mod utils;

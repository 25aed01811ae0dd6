use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
};

use color_eyre::{
    Section,
    eyre::{WrapErr, eyre},
};
use itertools::{Either, Itertools};
use rayon::prelude::*;
use serde::Serialize;
use walkdir::WalkDir;

use crate::{
    config::{
        BuildMode, FilterOptions, INPUT_DIR, OUTPUT_DIR, POST_LIST_FILE, POSTS_DIR, PROJECTS_DIR,
        RELATED_FILE, SEARCH_INDEX_FILE, STATIC_PAGES, TAG_COUNTS_FILE,
    },
    content::{by_featured, visible_posts},
    header::Document,
    post::{ListItem, Post, Project},
    search::{SearchItem, build_search_index},
    tags::{TagCounts, extract_all_tags, find_related_posts, generate_internal_link_suggestions},
    types::RelPath,
};

/// Build the site rooted at `root` and write the artefacts into OUTPUT_DIR.
pub fn build_at(root: &Path, mode: BuildMode) -> color_eyre::Result<SiteIndex> {
    let ctx = BuildCtx::new(root, mode);
    Pipeline::new(ctx).load().index().emit()
}

/// Load and index the content under `root` without writing anything.
pub fn index_at(root: &Path, mode: BuildMode) -> SiteIndex {
    let ctx = BuildCtx::new(root, mode);
    Pipeline::new(ctx).load().index().state.0
}

struct BuildCtx {
    posts_dir: PathBuf,
    projects_dir: PathBuf,
    output_dir: PathBuf,
    mode: BuildMode,
    filter: FilterOptions,
}

impl BuildCtx {
    fn new(root: &Path, mode: BuildMode) -> Self {
        let input_dir = root.join(INPUT_DIR);
        Self {
            posts_dir: input_dir.join(POSTS_DIR),
            projects_dir: input_dir.join(PROJECTS_DIR),
            output_dir: root.join(OUTPUT_DIR),
            mode,
            filter: FilterOptions::default(),
        }
    }
}

/// Everything derived from one pass over the content tree.
#[derive(Debug, Default)]
pub struct SiteIndex {
    /// Visible posts, most featured first.
    pub posts: Vec<Post>,
    pub projects: Vec<Project>,
    pub tag_counts: TagCounts,
    pub search_items: Vec<SearchItem>,
}

impl SiteIndex {
    pub fn post(&self, slug: &str) -> Option<&Post> {
        self.posts.iter().find(|p| p.slug == slug)
    }

    /// Posts related to `slug`, or `None` when no visible post has it.
    pub fn related(&self, slug: &str, limit: usize) -> Option<Vec<&Post>> {
        let current = self.post(slug)?;
        Some(find_related_posts(current, &self.posts, limit))
    }
}

fn collect_files(dir: &Path, extension: &str, max_depth: usize) -> color_eyre::Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(eyre!("{} is not a directory", dir.display()));
    }

    let (entries, errors): (Vec<walkdir::DirEntry>, Vec<walkdir::Error>) = WalkDir::new(dir)
        .max_depth(max_depth)
        .into_iter()
        .partition_map(|r| match r {
            Ok(v) => Either::Left(v),
            Err(e) => Either::Right(e),
        });

    if !errors.is_empty() {
        return Err(eyre!("Failed to open some directory entries: {errors:?}"));
    }

    let mut paths: Vec<PathBuf> = entries
        .into_iter()
        .filter(|e| e.file_type().is_file())
        .filter(|e| e.path().extension().is_some_and(|ext| ext == extension))
        .map(walkdir::DirEntry::into_path)
        .collect();
    paths.sort();
    Ok(paths)
}

fn load_post(posts_dir: &Path, path: &Path) -> color_eyre::Result<Post> {
    let rel = path
        .strip_prefix(posts_dir)
        .ok()
        .and_then(|p| RelPath::new(p.to_path_buf()))
        .ok_or_else(|| eyre!("Path outside the posts directory: {}", path.display()))?;

    let content = fs::read_to_string(path).with_note(|| format!("While reading {}", path.display()))?;
    let doc = Document::try_from(content.as_str())
        .wrap_err_with(|| format!("Invalid front matter in {}", path.display()))?;

    doc.header
        .into_post(rel.to_slug(), &doc.body)
        .wrap_err_with(|| format!("Invalid post {}", path.display()))
}

/// Every post under `posts_dir`, ordered by path. One malformed post fails
/// the whole collection.
pub fn load_posts(posts_dir: &Path) -> color_eyre::Result<Vec<Post>> {
    let paths = collect_files(posts_dir, "md", usize::MAX)?;
    paths
        .par_iter()
        .map(|path| load_post(posts_dir, path))
        .collect()
}

fn load_project(path: &Path) -> color_eyre::Result<Project> {
    let raw = fs::read_to_string(path).with_note(|| format!("While reading {}", path.display()))?;
    let mut project = serde_json::from_str::<Project>(&raw)
        .wrap_err_with(|| format!("Invalid project {}", path.display()))?;
    project.id = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .ok_or_else(|| eyre!("Project file without a name: {}", path.display()))?;
    Ok(project)
}

/// Every `*.json` project directly under `projects_dir`, ordered by path.
pub fn load_projects(projects_dir: &Path) -> color_eyre::Result<Vec<Project>> {
    collect_files(projects_dir, "json", 1)?
        .iter()
        .map(|path| load_project(path))
        .collect()
}

trait PipelineStage {}
/// Pipeline typestate driver
struct Pipeline<S: PipelineStage> {
    ctx: BuildCtx,
    state: S,
}

impl PipelineStage for () {}

struct Loaded {
    posts: Option<Vec<Post>>,
    projects: Option<Vec<Project>>,
}
impl PipelineStage for Loaded {}

struct Indexed(SiteIndex);
impl PipelineStage for Indexed {}

// initial state
impl Pipeline<()> {
    fn new(ctx: BuildCtx) -> Self {
        Self { ctx, state: () }
    }

    /// Load both collections concurrently. A source that fails to load is
    /// reported and left out; it never aborts the other one.
    fn load(self) -> Pipeline<Loaded> {
        let (posts, projects) = rayon::join(
            || load_posts(&self.ctx.posts_dir),
            || load_projects(&self.ctx.projects_dir),
        );

        let posts = posts
            .inspect_err(|e| tracing::warn!("Could not load posts for search: {e:#}"))
            .ok();
        let projects = projects
            .inspect_err(|e| tracing::warn!("Could not load projects for search: {e:#}"))
            .ok();

        Pipeline {
            ctx: self.ctx,
            state: Loaded { posts, projects },
        }
    }
}

impl Pipeline<Loaded> {
    fn index(self) -> Pipeline<Indexed> {
        let Loaded { posts, projects } = self.state;

        let posts = posts.map(|all| {
            let mut visible = visible_posts(&all, self.ctx.filter, self.ctx.mode);
            tracing::debug!(
                total = all.len(),
                visible = visible.len(),
                mode = %self.ctx.mode,
                "filtered posts"
            );
            visible.sort_by(by_featured);
            visible
        });

        let tag_counts = posts.as_deref().map(extract_all_tags).unwrap_or_default();
        let search_items = build_search_index(
            STATIC_PAGES,
            posts.as_deref(),
            projects.as_deref(),
            &tag_counts,
        );

        let site = SiteIndex {
            posts: posts.unwrap_or_default(),
            projects: projects.unwrap_or_default(),
            tag_counts,
            search_items,
        };

        Pipeline {
            ctx: self.ctx,
            state: Indexed(site),
        }
    }
}

impl Pipeline<Indexed> {
    fn emit(self) -> color_eyre::Result<SiteIndex> {
        let site = self.state.0;
        let out = &self.ctx.output_dir;
        fs::create_dir_all(out).with_note(|| format!("While creating {}", out.display()))?;

        write_json(&out.join(SEARCH_INDEX_FILE), &site.search_items)?;
        write_json(&out.join(TAG_COUNTS_FILE), &site.tag_counts)?;

        let related: BTreeMap<&str, Vec<&str>> = generate_internal_link_suggestions(&site.posts)
            .into_iter()
            .map(|(slug, posts)| (slug, posts.iter().map(|p| p.slug.as_str()).collect()))
            .collect();
        write_json(&out.join(RELATED_FILE), &related)?;

        let listing: Vec<ListItem<'_>> = site.posts.iter().map(ListItem::from).collect();
        write_json(&out.join(POST_LIST_FILE), &listing)?;

        tracing::info!(
            posts = site.posts.len(),
            projects = site.projects.len(),
            tags = site.tag_counts.len(),
            search_items = site.search_items.len(),
            "wrote {}",
            out.display()
        );

        Ok(site)
    }
}

fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> color_eyre::Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    fs::write(path, json).with_note(|| format!("While writing {}", path.display()))
}

#[cfg(test)]
mod tests;

use std::{
    fs,
    path::{Path, PathBuf},
};

use proptest::{
    prelude::*,
    test_runner::{Config, TestRunner},
};
use serde_json::Value;
use tempfile::TempDir;

use crate::{
    config::{
        BuildMode, INPUT_DIR, OUTPUT_DIR, POST_LIST_FILE, POSTS_DIR, PROJECTS_DIR, RELATED_FILE,
        SEARCH_INDEX_FILE, STATIC_PAGES, TAG_COUNTS_FILE,
    },
    pipeline::{build_at, index_at, load_posts, load_projects},
};

prop_compose! {
fn rel_markdown_path()(segments in proptest::collection::vec("[a-z0-9]{1,10}", 1..4)) -> PathBuf {
    let mut p = PathBuf::new();
    for seg in segments {
        p.push(seg);
    }
    p.set_extension("md");
    p
}
}

fn write_post(root: &Path, rel_path: &Path, body: &str) -> std::io::Result<()> {
    let full = root.join(INPUT_DIR).join(POSTS_DIR).join(rel_path);
    if let Some(parent) = full.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(full, body)
}

fn write_project(root: &Path, id: &str, json: &str) -> std::io::Result<()> {
    let dir = root.join(INPUT_DIR).join(PROJECTS_DIR);
    fs::create_dir_all(&dir)?;
    fs::write(dir.join(format!("{id}.json")), json)
}

fn md(title: &str, date: &str, featured: i64, tags: &[&str], extra: &str) -> String {
    format!(
        "---\ntitle: {title}\ndescription: About {title}\npublished_at: {date}\nfeatured: {featured}\ntags: [{}]\n{extra}---\nSome body text here.\n",
        tags.join(", ")
    )
}

fn read_public(tmp: &TempDir, file: &str) -> Value {
    let raw = fs::read_to_string(tmp.path().join(OUTPUT_DIR).join(file)).expect("public file");
    serde_json::from_str(&raw).expect("valid json")
}

fn sample_site() -> TempDir {
    let tmp = TempDir::new().expect("tempdir");
    let root = tmp.path();
    write_post(root, Path::new("rust-intro.md"), &md("Rust Intro", "2024-01-01", 2, &["Rust", "Beginners"], "")).unwrap();
    write_post(root, Path::new("rust-async.md"), &md("Async Rust", "2024-03-01", 1, &["rust"], "")).unwrap();
    write_post(root, Path::new("go/channels.md"), &md("Go Channels", "2024-02-01", 3, &["Go"], "")).unwrap();
    write_post(root, Path::new("wip.md"), &md("Work In Progress", "2024-04-01", 4, &["Rust"], "draft: true\n")).unwrap();
    write_post(root, Path::new("old.md"), &md("Old News", "2019-01-01", 5, &["Rust"], "archived: true\n")).unwrap();
    write_project(root, "folio", r#"{"title":"Folio","description":"Search core","status":"production"}"#).unwrap();
    tmp
}

#[test]
fn build_emits_all_artefacts() {
    let tmp = sample_site();
    let site = build_at(tmp.path(), BuildMode::Production).unwrap();

    assert_eq!(site.posts.len(), 3);
    assert_eq!(site.projects.len(), 1);

    for file in [SEARCH_INDEX_FILE, TAG_COUNTS_FILE, RELATED_FILE, POST_LIST_FILE] {
        assert!(tmp.path().join(OUTPUT_DIR).join(file).exists(), "{file} missing");
    }
}

#[test]
fn production_hides_drafts_and_archived() {
    let tmp = sample_site();
    build_at(tmp.path(), BuildMode::Production).unwrap();

    let posts = read_public(&tmp, POST_LIST_FILE);
    let slugs: Vec<&str> = posts
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["slug"].as_str().unwrap())
        .collect();
    // Ordered by featured priority.
    assert_eq!(slugs, ["rust-async", "rust-intro", "go/channels"]);
    assert_eq!(posts[0]["href"], "/posts/rust-async");
    assert_eq!(posts[0]["readingTime"], 1);

    let tags = read_public(&tmp, TAG_COUNTS_FILE);
    assert_eq!(tags["rust"], 2);
    assert_eq!(tags["go"], 1);
    assert_eq!(tags["beginners"], 1);
}

#[test]
fn development_shows_drafts_but_not_archived() {
    let tmp = sample_site();
    let site = index_at(tmp.path(), BuildMode::Development);
    assert!(site.post("wip").is_some());
    assert!(site.post("old").is_none());
    assert_eq!(site.tag_counts["rust"], 3);
}

#[test]
fn search_index_has_every_kind() {
    let tmp = sample_site();
    build_at(tmp.path(), BuildMode::Production).unwrap();

    let index = read_public(&tmp, SEARCH_INDEX_FILE);
    let items = index.as_array().unwrap();
    assert_eq!(items.len(), STATIC_PAGES.len() + 3 + 3 + 1);
    assert_eq!(items[0]["id"], "home");

    let post = items.iter().find(|i| i["id"] == "rust-async").unwrap();
    assert_eq!(post["type"], "post");
    assert_eq!(post["isFeatured"], true);
    assert_eq!(post["url"], "/posts/rust-async");

    let tag = items.iter().find(|i| i["id"] == "tag-rust").unwrap();
    assert_eq!(tag["type"], "tag");
    assert_eq!(tag["excerpt"], "2 articles about rust");
    assert_eq!(tag["url"], "/tags/rust");

    let project = items.iter().find(|i| i["id"] == "folio").unwrap();
    assert_eq!(project["type"], "page");
    assert_eq!(project["url"], "/projects/folio");
}

#[test]
fn related_links_follow_shared_tags() {
    let tmp = sample_site();
    build_at(tmp.path(), BuildMode::Production).unwrap();

    let related = read_public(&tmp, RELATED_FILE);
    assert_eq!(related["rust-intro"], serde_json::json!(["rust-async"]));
    assert_eq!(related["go/channels"], serde_json::json!([]));

    let site = index_at(tmp.path(), BuildMode::Production);
    let slugs: Vec<&str> = site
        .related("rust-async", 3)
        .unwrap()
        .iter()
        .map(|p| p.slug.as_str())
        .collect();
    assert_eq!(slugs, ["rust-intro"]);
    assert!(site.related("missing", 3).is_none());
}

#[test]
fn missing_projects_do_not_fail_the_build() {
    let tmp = TempDir::new().expect("tempdir");
    write_post(tmp.path(), Path::new("only.md"), &md("Only", "2024-01-01", 1, &[], "")).unwrap();

    let site = build_at(tmp.path(), BuildMode::Production).unwrap();
    assert_eq!(site.posts.len(), 1);
    assert!(site.projects.is_empty());
    assert!(load_projects(&tmp.path().join(INPUT_DIR).join(PROJECTS_DIR)).is_err());
}

#[test]
fn broken_posts_leave_static_pages_and_projects() {
    let tmp = TempDir::new().expect("tempdir");
    write_post(tmp.path(), Path::new("bad.md"), "---\ntitle: No featured\npublished_at: 2024-01-01\n---\n").unwrap();
    write_project(tmp.path(), "folio", r#"{"title":"Folio"}"#).unwrap();

    let site = build_at(tmp.path(), BuildMode::Production).unwrap();
    assert!(site.posts.is_empty());
    assert_eq!(site.search_items.len(), STATIC_PAGES.len() + 1);

    let err = load_posts(&tmp.path().join(INPUT_DIR).join(POSTS_DIR)).unwrap_err();
    let message = format!("{err:#}");
    assert!(message.contains("bad.md"));
    assert!(message.contains("featured"));
}

#[test]
fn empty_root_still_builds() {
    let tmp = TempDir::new().expect("tempdir");
    let site = build_at(tmp.path(), BuildMode::Production).unwrap();
    assert_eq!(site.search_items.len(), STATIC_PAGES.len());
    assert_eq!(read_public(&tmp, TAG_COUNTS_FILE), serde_json::json!({}));
}

#[test]
fn build_is_deterministic_across_runs() {
    let tmp = sample_site();
    build_at(tmp.path(), BuildMode::Production).unwrap();
    let first = read_public(&tmp, SEARCH_INDEX_FILE);
    build_at(tmp.path(), BuildMode::Production).unwrap();
    let second = read_public(&tmp, SEARCH_INDEX_FILE);
    assert_eq!(first, second);
}

#[test]
fn slugs_mirror_source_paths() {
    let mut runner = TestRunner::new(Config {
        cases: 16,
        failure_persistence: None,
        ..Config::default()
    });

    runner
        .run(&rel_markdown_path(), |rel_path| {
            let tmp = TempDir::new().expect("tempdir");
            write_post(tmp.path(), &rel_path, &md("Example", "2024-01-01", 1, &[], "")).unwrap();

            let posts = load_posts(&tmp.path().join(INPUT_DIR).join(POSTS_DIR)).unwrap();
            prop_assert_eq!(posts.len(), 1);

            let expected = rel_path
                .with_extension("")
                .components()
                .map(|c| c.as_os_str().to_string_lossy().into_owned())
                .collect::<Vec<_>>()
                .join("/");
            prop_assert_eq!(&posts[0].slug, &expected);
            Ok(())
        })
        .unwrap();
}

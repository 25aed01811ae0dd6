use std::path::PathBuf;

use clap::{Parser, Subcommand};
use color_eyre::{Section, eyre::eyre};
use libfolio::{
    config::{BuildMode, MODE_ENV_VAR, RELATED_POST_LIMIT},
    content::{format_reading_time, reading_time},
    palette::{Palette, PaletteEvent},
    pipeline::{build_at, index_at},
    tags::generate_tag_slug,
    utils::truncate_text,
};
use tracing::Level;

const EXCERPT_WIDTH: usize = 60;

#[derive(Parser, Debug)]
#[command(name = "folio", version, about = "Search index and related posts for a static blog")]
struct Cli {
    /// Site root containing the `contents` directory.
    #[arg(long, default_value = ".")]
    root: PathBuf,

    /// `development` shows drafts, `production` hides them.
    #[arg(long, env = MODE_ENV_VAR, default_value_t = BuildMode::Production)]
    mode: BuildMode,

    /// More logging; repeat for trace output.
    #[arg(short, long, action = clap::ArgAction::Count, conflicts_with = "quiet")]
    verbose: u8,

    /// Only log errors.
    #[arg(short, long)]
    quiet: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Write the search index, tag counts, related posts and post listing.
    Build,
    /// Show the palette results for a query.
    Search { query: String },
    /// Show posts related to a post.
    Related {
        slug: String,
        #[arg(long, default_value_t = RELATED_POST_LIMIT)]
        limit: usize,
    },
    /// Show tag usage counts.
    Tags,
}

fn init_logging(cli: &Cli) {
    let level = match (cli.quiet, cli.verbose) {
        (true, _) => Level::ERROR,
        (false, 0) => Level::INFO,
        (false, 1) => Level::DEBUG,
        (false, _) => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    init_logging(&cli);

    let mode = cli.mode;
    let root = cli.root.as_path();

    match cli.command.unwrap_or(Command::Build) {
        Command::Build => {
            build_at(root, mode).with_note(|| format!("While building {}", root.display()))?;
        }
        Command::Search { query } => {
            let site = index_at(root, mode);
            let mut palette = Palette::new(site.search_items);
            palette.dispatch(PaletteEvent::OpenButton);
            palette.dispatch(PaletteEvent::Input(query));

            let state = palette.state();
            if let Some(message) = state.empty_message() {
                println!("{message}");
            }
            for item in &state.filtered_items {
                let star = if item.is_featured() { " *" } else { "" };
                let excerpt = item.excerpt.as_deref().unwrap_or_default();
                println!(
                    "{:<5} {}{star}  {}\n      {}",
                    item.kind.as_str(),
                    item.title,
                    item.url,
                    truncate_text(excerpt, EXCERPT_WIDTH)
                );
            }
        }
        Command::Related { slug, limit } => {
            let site = index_at(root, mode);
            let related = site
                .related(&slug, limit)
                .ok_or_else(|| eyre!("No visible post with slug `{slug}`"))
                .with_suggestion(|| "Drafts are only visible with `--mode development`")?;
            if related.is_empty() {
                println!("No related posts for {slug}");
            }
            for post in related {
                println!(
                    "{}  {}  ({}, {})",
                    post.published_at,
                    post.title,
                    post.href(),
                    format_reading_time(reading_time(post.word_count))
                );
            }
        }
        Command::Tags => {
            let site = index_at(root, mode);
            for (tag, count) in &site.tag_counts {
                println!("{count:>4}  {tag}  /tags/{}", generate_tag_slug(tag));
            }
        }
    }

    Ok(())
}

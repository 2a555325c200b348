// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use console::Emoji;
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use tracing_subscriber::EnvFilter;

use video_shuttle::config::{
    DEFAULT_API_BASE, DEFAULT_FEED_URL, DEFAULT_PROJECT_NAME, DEFAULT_UPLOAD_URL,
};
use video_shuttle::progress::describe_total;
use video_shuttle::{
    Credentials, Endpoints, ProgressEvent, ProgressReporter, ReqwestClient,
    SharedProgressReporter, ShuttleOptions, TracingReporter, shuttle_videos,
};

// Emoji with fallback for terminals without Unicode support
static FILM: Emoji<'_, '_> = Emoji("🎞️  ", "");
static SEARCH: Emoji<'_, '_> = Emoji("🔍 ", "[~] ");
static CLIPBOARD: Emoji<'_, '_> = Emoji("📋 ", "[i] ");
static DOWNLOAD: Emoji<'_, '_> = Emoji("📥 ", "[v] ");
static UPLOAD: Emoji<'_, '_> = Emoji("📤 ", "[^] ");
static PENCIL: Emoji<'_, '_> = Emoji("✏️  ", "[=] ");
static SUCCESS: Emoji<'_, '_> = Emoji("✅ ", "[+] ");
static FAILURE: Emoji<'_, '_> = Emoji("❌ ", "[!] ");
static PARTY: Emoji<'_, '_> = Emoji("🎉 ", "[*] ");

/// Copy episodes missing from the video host and fix drifted titles
#[derive(Parser, Debug)]
#[command(name = "video-shuttle")]
#[command(about = "Copy episodes missing from the video host and fix drifted titles")]
#[command(version)]
struct Args {
    /// Source feed URL
    #[arg(long, default_value = DEFAULT_FEED_URL)]
    feed_url: String,

    /// Destination API base URL
    #[arg(long, default_value = DEFAULT_API_BASE)]
    api_base: String,

    /// Destination upload endpoint
    #[arg(long, default_value = DEFAULT_UPLOAD_URL)]
    upload_url: String,

    /// Destination project holding the episodes
    #[arg(short, long, default_value = DEFAULT_PROJECT_NAME)]
    project: String,

    /// Maximum number of episodes to transfer
    #[arg(short, long)]
    limit: Option<usize>,

    /// Show what would change without transferring or renaming anything
    #[arg(short = 'n', long)]
    dry_run: bool,

    /// Directory for temporary download files
    #[arg(long)]
    temp_dir: Option<PathBuf>,

    /// Quiet mode - log through RUST_LOG only, no progress bars
    #[arg(short, long)]
    quiet: bool,
}

/// Progress reporter using indicatif for terminal output
struct IndicatifReporter {
    multi: MultiProgress,
    bar: Mutex<Option<ProgressBar>>,
    main_bar: ProgressBar,
}

impl IndicatifReporter {
    fn new() -> Self {
        let multi = MultiProgress::new();

        let main_style = ProgressStyle::default_bar()
            .template("{spinner:.green} {wide_msg}")
            .unwrap();

        let main_bar = multi.add(ProgressBar::new_spinner());
        main_bar.set_style(main_style);
        main_bar.enable_steady_tick(std::time::Duration::from_millis(100));

        Self {
            multi,
            bar: Mutex::new(None),
            main_bar,
        }
    }

    fn current_bar(&self) -> ProgressBar {
        let mut bar = self.bar.lock().unwrap();

        if let Some(bar) = bar.as_ref() {
            return bar.clone();
        }

        let style = ProgressStyle::default_bar()
            .template(&format!(
                "  {DOWNLOAD}[{{bar:30.cyan/blue}}] {{bytes}}/{{total_bytes}} {{wide_msg}}"
            ))
            .unwrap()
            .progress_chars("█▓░");

        let new_bar = self.multi.add(ProgressBar::new(0));
        new_bar.set_style(style);
        *bar = Some(new_bar.clone());
        new_bar
    }

    fn finish_bar(&self) {
        if let Some(bar) = self.bar.lock().unwrap().take() {
            bar.finish_and_clear();
        }
    }

    fn println(&self, line: String) {
        let _ = self.multi.println(line);
    }
}

impl ProgressReporter for IndicatifReporter {
    fn report(&self, event: ProgressEvent) {
        match event {
            ProgressEvent::FetchingSource { url } => {
                self.main_bar
                    .set_message(format!("{SEARCH}Fetching feed: {}", url.cyan()));
            }

            ProgressEvent::SourceFetched { total_episodes } => {
                self.println(format!(
                    "{CLIPBOARD}{} episodes available",
                    total_episodes.to_string().cyan()
                ));
            }

            ProgressEvent::FetchingDestination { project_name } => {
                self.main_bar.set_message(format!(
                    "{SEARCH}Listing project: {}",
                    project_name.bold()
                ));
            }

            ProgressEvent::DestinationFetched { total_videos } => {
                self.println(format!(
                    "{CLIPBOARD}{} videos already posted",
                    total_videos.to_string().cyan()
                ));
            }

            ProgressEvent::DiffReady {
                missing,
                to_transfer,
                mismatches,
            } => {
                let list = if missing.is_empty() {
                    "none".to_string()
                } else {
                    missing.join(", ")
                };
                self.println(format!(
                    "{CLIPBOARD}Missing: {} • {} to transfer, {} to rename",
                    list.yellow(),
                    to_transfer.to_string().cyan(),
                    mismatches.to_string().cyan()
                ));
            }

            ProgressEvent::DownloadStarting {
                episode_title,
                episode_index,
                total_to_transfer,
                content_length,
            } => {
                self.main_bar.set_message(format!(
                    "{DOWNLOAD}[{}/{}] Downloading {}",
                    (episode_index + 1).to_string().cyan(),
                    total_to_transfer.to_string().cyan(),
                    truncate_title(&episode_title, 40)
                ));
                let bar = self.current_bar();
                bar.set_length(content_length.unwrap_or(0));
                bar.set_position(0);
                bar.set_message(truncate_title(&episode_title, 40));
            }

            ProgressEvent::DownloadProgress {
                bytes_downloaded,
                total_bytes,
                ..
            } => {
                let bar = self.current_bar();
                if let Some(total) = total_bytes {
                    bar.set_length(total);
                }
                bar.set_position(bytes_downloaded);
            }

            ProgressEvent::DownloadCompleted {
                episode_title,
                bytes_downloaded,
                total_bytes,
            } => {
                self.finish_bar();
                self.println(format!(
                    "  {DOWNLOAD}{} ({} of {} bytes)",
                    truncate_title(&episode_title, 40),
                    bytes_downloaded,
                    describe_total(total_bytes)
                ));
            }

            ProgressEvent::UploadStarting {
                episode_title,
                bytes,
            } => {
                self.main_bar.set_message(format!(
                    "{UPLOAD}Uploading {} ({} bytes)",
                    truncate_title(&episode_title, 40),
                    bytes
                ));
            }

            ProgressEvent::UploadCompleted { episode_title } => {
                self.println(format!(
                    "  {SUCCESS}{}",
                    truncate_title(&episode_title, 40).green()
                ));
            }

            ProgressEvent::Renaming { from, to } => {
                self.println(format!(
                    "{PENCIL}Renaming {} to '{}'",
                    from.dimmed(),
                    to.green()
                ));
            }

            ProgressEvent::Failed { error } => {
                self.finish_bar();
                self.main_bar.abandon_with_message(format!(
                    "{FAILURE}{}",
                    error.red()
                ));
            }

            ProgressEvent::ShuttleCompleted {
                transferred_count,
                renamed_count,
                limited_count,
                dry_run,
            } => {
                self.main_bar.finish_and_clear();
                let heading = if dry_run {
                    "Dry run complete:"
                } else {
                    "Shuttle complete:"
                };
                println!(
                    "\n{PARTY}{} {} transferred, {} renamed, {} left for later",
                    heading.bold().green(),
                    transferred_count.to_string().green().bold(),
                    renamed_count.to_string().green(),
                    limited_count.to_string().yellow()
                );
            }
        }
    }
}

fn truncate_title(title: &str, max_len: usize) -> String {
    if title.chars().count() <= max_len {
        title.to_string()
    } else {
        let kept: String = title.chars().take(max_len.saturating_sub(3)).collect();
        format!("{kept}...")
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env file is fine; the environment may already be populated
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let credentials = Credentials::from_env().context("Failed to load credentials")?;

    let endpoints = Endpoints {
        feed_url: args.feed_url,
        api_base: args.api_base,
        upload_url: args.upload_url,
        project_name: args.project,
    };

    let options = ShuttleOptions {
        limit: args.limit,
        dry_run: args.dry_run,
        temp_dir: args.temp_dir,
    };

    if !args.quiet {
        println!(
            "\n{}{} {}\n",
            FILM,
            "video-shuttle".bold().magenta(),
            "- Episode Reconciler".dimmed()
        );
    }

    let reporter: SharedProgressReporter = if args.quiet {
        TracingReporter::shared()
    } else {
        Arc::new(IndicatifReporter::new())
    };

    let client = ReqwestClient::new();

    shuttle_videos(&client, &credentials, &endpoints, &options, reporter)
        .await
        .context("Failed to shuttle videos")?;

    Ok(())
}

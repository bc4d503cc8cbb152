//! Command-line front end.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use ks_app::usecases::WaitForProcessingError;
use ks_app::SessionError;
use ks_core::{ExportFormat, Highlight, Project, ProjectId, ProjectSummary};
use tracing::info;

use crate::bootstrap::AppRuntime;

#[derive(Parser)]
#[command(name = "karaoke-sync")]
#[command(about = "Lyrics alignment editor for the karaoke alignment store", long_about = None)]
pub struct Cli {
    /// Config file (defaults to <config dir>/karaoke-sync/config.toml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Check that the alignment store answers
    Health,
    /// List projects known to the store
    List,
    /// Show a project with its aligned words
    Show { id: String },
    /// Poll until a freshly uploaded project finished processing
    Wait { id: String },
    /// Download a rendered subtitle file
    Export {
        id: String,
        /// ttml or lrc
        #[arg(short, long, default_value = "lrc")]
        format: ExportFormat,
        /// Output file path (defaults to <id>.<format>)
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
    /// Replace one word's timing and push it to the store
    Correct {
        id: String,
        segment: usize,
        word: usize,
        start: f64,
        end: f64,
    },
    /// Simulate playback and print the highlighted word at each change
    Play {
        id: String,
        #[arg(long, default_value_t = 0.0)]
        from: f64,
        /// Defaults to the audio duration
        #[arg(long)]
        to: Option<f64>,
        #[arg(long, default_value_t = 0.1)]
        step: f64,
    },
}

pub async fn run(command: Commands, app: &AppRuntime) -> Result<()> {
    match command {
        Commands::Health => run_health(app).await,
        Commands::List => run_list(app).await,
        Commands::Show { id } => run_show(app, ProjectId::from(id)).await,
        Commands::Wait { id } => run_wait(app, ProjectId::from(id)).await,
        Commands::Export { id, format, out } => {
            run_export(app, ProjectId::from(id), format, out).await
        }
        Commands::Correct {
            id,
            segment,
            word,
            start,
            end,
        } => run_correct(app, ProjectId::from(id), segment, word, start, end).await,
        Commands::Play { id, from, to, step } => {
            run_play(app, ProjectId::from(id), from, to, step).await
        }
    }
}

async fn run_health(app: &AppRuntime) -> Result<()> {
    let banner = app
        .check_store_health()
        .execute()
        .await
        .with_context(|| format!("Alignment store at {} is not reachable", app.config.store.base_url))?;
    println!("{}: {banner}", app.config.store.base_url);
    Ok(())
}

async fn run_list(app: &AppRuntime) -> Result<()> {
    let projects = app.session.list_projects().await?;
    if projects.is_empty() {
        println!("no projects");
    }
    for project in &projects {
        print_summary(project);
    }
    Ok(())
}

async fn run_show(app: &AppRuntime, id: ProjectId) -> Result<()> {
    match app.session.open_project(&id).await {
        Ok(_) => {}
        Err(SessionError::NotReady { status, .. }) => {
            println!("{id}: {status}, no aligned words yet");
            return Ok(());
        }
        Err(err) => return Err(err.into()),
    }
    let project = app.session.project().await.context("project closed while loading")?;
    print_project(&project);
    if let Some(url) = app.session.audio_url().await {
        println!("audio: {url}");
    }
    Ok(())
}

async fn run_wait(app: &AppRuntime, id: ProjectId) -> Result<()> {
    match app.wait_for_processing().execute(&id).await {
        Ok(project) => {
            println!("{id}: {}", project.status);
            if let Some(message) = project.error_message {
                println!("error: {message}");
            }
            Ok(())
        }
        Err(WaitForProcessingError::StillProcessing { status, attempts }) => {
            bail!("{id} still {status} after {attempts} polls")
        }
        Err(err) => Err(err.into()),
    }
}

async fn run_export(
    app: &AppRuntime,
    id: ProjectId,
    format: ExportFormat,
    out: Option<PathBuf>,
) -> Result<()> {
    let payload = app.session.request_export(&id, format).await?;
    let out = out.unwrap_or_else(|| PathBuf::from(payload.suggested_file_name(id.as_str())));
    tokio::fs::write(&out, &payload.bytes)
        .await
        .with_context(|| format!("Failed to write {}", out.display()))?;
    info!(path = %out.display(), size = payload.len(), %format, "export written");
    println!("wrote {} ({} bytes)", out.display(), payload.len());
    Ok(())
}

async fn run_correct(
    app: &AppRuntime,
    id: ProjectId,
    segment: usize,
    word: usize,
    start: f64,
    end: f64,
) -> Result<()> {
    let session = &app.session;
    session.open_project(&id).await?;
    session.select(segment, word).await?;
    session.update_draft(start, end).await?;
    if let Err(err) = session.commit().await {
        session.cancel().await?;
        return Err(err).context("correction refused");
    }
    session.flush_pushes().await?;

    if !session.unsynced_corrections().await.is_empty() {
        bail!("correction applied locally but the store did not accept it");
    }
    let project = session.project().await.context("project closed during correction")?;
    if let Some(seg) = project.segment(segment) {
        println!("segment {segment}: {:.2}-{:.2}", seg.start, seg.end);
        print_words(segment, &project);
    }
    Ok(())
}

async fn run_play(
    app: &AppRuntime,
    id: ProjectId,
    from: f64,
    to: Option<f64>,
    step: f64,
) -> Result<()> {
    anyhow::ensure!(step > 0.0 && step.is_finite(), "--step must be a positive number");
    let session = &app.session;
    session.open_project(&id).await?;
    let project = session.project().await.context("project closed while loading")?;
    let to = to
        .or(project.audio_duration)
        .or_else(|| project.segments().last().map(|s| s.end))
        .unwrap_or(from);

    session.seek(from).await?;
    session.play().await?;

    let steps = ((to - from) / step).ceil().max(0.0) as u64;
    let mut last = None;
    for i in 0..=steps {
        let t = (from + i as f64 * step).min(to);
        let highlight = session.on_playback_tick(t).await?;
        if last != Some(highlight) {
            println!("{t:>8.2}  {}", describe(&project, highlight));
            last = Some(highlight);
        }
    }
    session.pause().await?;
    Ok(())
}

fn describe(project: &Project, highlight: Highlight) -> String {
    match (highlight.segment, highlight.word) {
        (_, Some(position)) => project
            .word(position)
            .map(|w| format!("[{position}] {}", w.text))
            .unwrap_or_default(),
        (Some(segment), None) => format!("[{segment}:-] ..."),
        (None, None) => "-".to_string(),
    }
}

fn print_summary(project: &ProjectSummary) {
    let created = project
        .created_at
        .map(|ts| ts.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| "-".to_string());
    println!(
        "{}  {:<10}  {}  {}  ({})",
        project.id, project.status, created, project.name, project.language
    );
}

fn print_project(project: &Project) {
    print_summary(&project.summary());
    if let Some(duration) = project.audio_duration {
        println!("duration: {duration:.2}s");
    }
    println!(
        "segments: {}, words: {}",
        project.segments().len(),
        project.word_count()
    );
    for (index, segment) in project.segments().iter().enumerate() {
        println!(
            "\n#{index} {:.2}-{:.2}  {}",
            segment.start, segment.end, segment.text
        );
        print_words(index, project);
    }
}

fn print_words(segment_index: usize, project: &Project) {
    let Some(segment) = project.segment(segment_index) else {
        return;
    };
    for (index, word) in segment.words.iter().enumerate() {
        let confidence = word
            .confidence
            .map(|c| format!("  ({c:.2})"))
            .unwrap_or_default();
        println!(
            "  {segment_index}:{index}  {:>7.2} {:>7.2}  {}{confidence}",
            word.start, word.end, word.text
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn export_parses_format_case_insensitively() {
        let cli = Cli::parse_from(["karaoke-sync", "export", "p1", "--format", "TTML"]);
        match cli.command {
            Commands::Export { format, out, .. } => {
                assert_eq!(format, ExportFormat::Ttml);
                assert!(out.is_none());
            }
            _ => panic!("expected export"),
        }
    }

    #[test]
    fn correct_takes_positional_timing() {
        let cli = Cli::parse_from([
            "karaoke-sync",
            "--config",
            "/tmp/k.toml",
            "correct",
            "p1",
            "0",
            "1",
            "1.0",
            "1.35",
        ]);
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/k.toml")));
        assert!(matches!(
            cli.command,
            Commands::Correct { segment: 0, word: 1, end, .. } if end == 1.35
        ));
    }

    #[test]
    fn describe_gap_inside_segment() {
        let project = Project {
            id: ProjectId::from("p1"),
            name: "Song".to_string(),
            audio_filename: String::new(),
            text_filename: String::new(),
            language: "en".to_string(),
            status: ks_core::ProjectStatus::Completed,
            created_at: None,
            audio_duration: None,
            error_message: None,
            segments: Some(vec![ks_core::Segment::from_words(vec![
                ks_core::Word::new("sing", 1.0, 1.5),
            ])]),
        };
        let highlight = Highlight {
            segment: Some(0),
            word: None,
        };
        assert_eq!(describe(&project, highlight), "[0:-] ...");
        assert_eq!(describe(&project, Highlight::default()), "-");
    }
}

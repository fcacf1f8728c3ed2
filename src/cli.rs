// src/cli.rs
use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

use crate::app_log;
use crate::core::{FsOps, JobService, ServiceClient};
use crate::environment::ClientConfig;
use crate::listing_scraper::{ListingAccumulator, ListingScraper};
use crate::session::{MaterialsEntry, MaterialsField, SessionController, SessionState, SessionStore};
use crate::types::{JobAnalysis, SavedRecord};
use crate::utils::{
    display_or_unavailable, fit_average, is_description_collapsible, sanitize_description,
    skill_preview, DESCRIPTION_PREVIEW_CHARS,
};

pub const DEFAULT_LISTINGS_FILE: &str = "linkedin_jobs.csv";

#[derive(Parser)]
#[command(name = "hiresignal")]
#[command(about = "Score job postings against your résumé and draft outreach")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Session file to load and store
    #[arg(long, global = true)]
    pub session: Option<PathBuf>,

    /// Base URL of the job service
    #[arg(long, global = true)]
    pub api_base: Option<String>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Upload and parse a résumé (pdf, doc, docx, txt)
    UploadResume { file: PathBuf },
    /// Upload a job CSV and load its URLs
    UploadCsv { file: PathBuf },
    /// Score every loaded URL one at a time, skipping saved ones
    Process,
    /// Score the loaded URLs in a single server request
    ProcessBatch,
    /// Score one job URL and put it at the top of the list
    ProcessUrl { url: String },
    /// Show the résumé skills
    Resume {
        /// Toggle between the skill preview and the full list
        #[arg(long)]
        toggle_skills: bool,
    },
    /// List analyzed jobs
    Jobs,
    /// Show one analyzed job with its materials
    Show {
        job_id: String,
        /// Show the full description
        #[arg(long)]
        full: bool,
    },
    /// Generate an InMail and cover letter for a job
    Generate { job_id: String },
    /// Replace draft text from files
    Edit {
        job_id: String,
        #[arg(long)]
        inmail: Option<PathBuf>,
        #[arg(long)]
        cover_letter: Option<PathBuf>,
    },
    /// Keep the edited drafts and close the materials panel
    Close { job_id: String },
    /// Reopen a closed materials panel
    Reopen { job_id: String },
    /// Save a job with its current materials
    Save { job_id: String },
    /// List saved applications
    Saved {
        #[arg(long)]
        refresh: bool,
        /// Print the stored InMail and cover letter of one saved application
        #[arg(long, value_name = "SAVED_ID")]
        show: Option<String>,
    },
    /// Download the CSV of saved applications
    Export {
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Extract job cards from saved listing pages into a job CSV
    ScrapeListings {
        #[arg(required = true)]
        html: Vec<PathBuf>,
        #[arg(long, default_value = DEFAULT_LISTINGS_FILE)]
        out: PathBuf,
    },
}

pub async fn handle_command(cli: Cli, config: ClientConfig) -> Result<()> {
    let config = config.with_overrides(cli.api_base, cli.session);

    if let Command::ScrapeListings { html, out } = cli.command {
        return scrape_listings(&html, &out).await;
    }

    let store = SessionStore::new(&config.session_path);
    let state = store.load().await?;
    let service = ServiceClient::new(&config.api_base, config.timeout_seconds)?;
    let mut controller = SessionController::new(service, state);

    let result = run(&mut controller, cli.command, &config).await;

    store
        .save(controller.state())
        .await
        .context("Failed to store session")?;

    if let Some(notice) = controller
        .state()
        .banner
        .notice_at(Utc::now(), config.notice_ttl_ms)
    {
        println!("✓ {}", notice);
    }

    result
}

async fn run<S: JobService>(
    controller: &mut SessionController<S>,
    command: Command,
    config: &ClientConfig,
) -> Result<()> {
    match command {
        Command::UploadResume { file } => {
            controller.upload_resume(&file).await?;
            print_skills(controller.state());
        }

        Command::UploadCsv { file } => {
            controller.upload_csv(&file).await?;
        }

        Command::Process => {
            let outcome = controller
                .process_bulk(|progress| {
                    eprintln!(
                        "Processing {}/{} ({:.0}%)",
                        progress.current,
                        progress.total,
                        progress.fraction() * 100.0
                    );
                })
                .await?;
            if !outcome.skipped.is_empty() {
                println!("Skipped {} already saved URL(s)", outcome.skipped.len());
            }
            print_jobs(controller.state());
        }

        Command::ProcessBatch => {
            controller.process_server_batch().await?;
            print_jobs(controller.state());
        }

        Command::ProcessUrl { url } => {
            let job_id = controller.process_url(&url).await?;
            if let Some(analysis) = controller.state().job(&job_id) {
                println!("{}", job_line(analysis));
            }
        }

        Command::Resume { toggle_skills } => {
            if toggle_skills {
                controller.toggle_skills();
            }
            print_skills(controller.state());
        }

        Command::Jobs => print_jobs(controller.state()),

        Command::Show { job_id, full } => {
            if controller.state().job(&job_id).is_none() {
                anyhow::bail!("No analyzed job with id {}", job_id);
            }
            if full {
                controller.expand_description(&job_id);
            }
            if let Some(analysis) = controller.state().job(&job_id) {
                print!("{}", render_job(controller.state(), analysis));
            }
        }

        Command::Generate { job_id } => {
            controller.generate(&job_id).await?;
            if let Some(entry) = controller.state().materials_for(&job_id) {
                print!("{}", render_materials(entry));
            }
        }

        Command::Edit {
            job_id,
            inmail,
            cover_letter,
        } => {
            if inmail.is_none() && cover_letter.is_none() {
                anyhow::bail!("Nothing to edit: pass --inmail and/or --cover-letter");
            }
            for (field, path) in [
                (MaterialsField::Inmail, inmail),
                (MaterialsField::CoverLetter, cover_letter),
            ] {
                if let Some(path) = path {
                    let text = FsOps::read_file_safe(&path).await?;
                    controller.edit_draft(&job_id, field, &text)?;
                }
            }
            println!("Draft updated for {}", job_id);
        }

        Command::Close { job_id } => {
            controller.save_and_close(&job_id)?;
            println!("Materials saved and closed for {}", job_id);
        }

        Command::Reopen { job_id } => {
            controller.reopen(&job_id)?;
            if let Some(entry) = controller.state().materials_for(&job_id) {
                print!("{}", render_materials(entry));
            }
        }

        Command::Save { job_id } => {
            let record = controller.save(&job_id).await?;
            println!("{}", saved_line(&record));
        }

        Command::Saved { refresh, show } => {
            if refresh {
                controller.open().await;
            }
            let saved = &controller.state().saved;
            match show {
                Some(saved_id) => match saved.iter().find(|record| record.id == saved_id) {
                    Some(record) => print!("{}", render_saved(record)),
                    None => anyhow::bail!("No saved application with id {}", saved_id),
                },
                None => {
                    if saved.is_empty() {
                        println!("No saved applications.");
                    }
                    for record in saved {
                        println!("{}", saved_line(record));
                    }
                }
            }
        }

        Command::Export { out } => {
            let destination = out.unwrap_or_else(|| config.export_path.clone());
            let written = controller.export(&destination).await?;
            println!("Wrote {}", written.display());
        }

        Command::ScrapeListings { html, out } => scrape_listings(&html, &out).await?,
    }

    Ok(())
}

async fn scrape_listings(pages: &[PathBuf], out: &Path) -> Result<()> {
    let scraper = ListingScraper::new();
    let mut accumulator = ListingAccumulator::new();

    for page in pages {
        let html = FsOps::read_file_safe(page).await?;
        let added = accumulator.add_page(scraper.parse_page(&html));
        app_log!(info, "{}: {} new listing cards", page.display(), added);
        println!("{}: {} new job(s)", page.display(), added);
    }

    accumulator.write_csv(out).await?;
    println!("✓ {} job(s) written to {}", accumulator.len(), out.display());
    Ok(())
}

fn print_jobs(state: &SessionState) {
    if state.jobs.is_empty() {
        println!("No analyzed jobs.");
        return;
    }
    println!(
        "{} job(s), average fit {}%",
        state.jobs.len(),
        fit_average(&state.jobs)
    );
    for analysis in &state.jobs {
        println!("{}", job_line(analysis));
    }
}

fn print_skills(state: &SessionState) {
    let Some(resume) = &state.resume else {
        println!("No résumé uploaded.");
        return;
    };
    let (shown, hidden) = skill_preview(&resume.skills, state.skills_expanded);
    let mut line = format!("Skills: {}", shown.join(", "));
    if hidden > 0 {
        line.push_str(&format!(" (+{} more)", hidden));
    }
    println!("{}", line);
}

pub fn job_line(analysis: &JobAnalysis) -> String {
    format!(
        "{:>3}%  {:<20} {} @ {}",
        analysis.fit_score,
        analysis.id(),
        analysis.job.title,
        analysis.job.company
    )
}

pub fn saved_line(record: &SavedRecord) -> String {
    format!(
        "{:>3}%  {:<20} {} @ {}  saved {}{}",
        record.fit_score,
        record.id,
        record.job.title,
        record.job.company,
        record.timestamp,
        if record.materials().is_some() {
            "  [materials]"
        } else {
            ""
        }
    )
}

pub fn render_saved(record: &SavedRecord) -> String {
    let mut out = format!("{}\n", saved_line(record));
    match record.materials() {
        Some(materials) => out.push_str(&format!(
            "--- InMail ---\n{}\n--- Cover letter ---\n{}\n",
            materials.inmail, materials.cover_letter
        )),
        None => out.push_str("No generated materials saved.\n"),
    }
    out
}

pub fn render_job(state: &SessionState, analysis: &JobAnalysis) -> String {
    let job = &analysis.job;
    let mut out = String::new();
    out.push_str(&format!("{} @ {}\n", job.title, job.company));
    out.push_str(&format!("Fit: {}%\n", analysis.fit_score));
    out.push_str(&format!("URL: {}\n", job.url));
    for (label, value) in [
        ("Location", job.location.as_deref()),
        ("Salary", job.salary.as_deref()),
        ("Work type", job.work_type.as_deref()),
        ("Contact", job.contact_person.as_deref()),
        ("Posted", job.posted_at.as_deref()),
        ("Applicants", job.applicant_count.as_deref()),
    ] {
        out.push_str(&format!("{}: {}\n", label, display_or_unavailable(value)));
    }
    out.push_str(&format!("Matched: {}\n", analysis.matched_skills.join(", ")));
    out.push_str(&format!("Missing: {}\n", analysis.missing_skills.join(", ")));

    let description = sanitize_description(&job.description);
    if is_description_collapsible(&description) && !state.is_description_open(analysis.id()) {
        let preview: String = description.chars().take(DESCRIPTION_PREVIEW_CHARS).collect();
        out.push_str(&format!("\n{}... (--full for more)\n", preview));
    } else {
        out.push_str(&format!("\n{}\n", description));
    }

    if let Some(entry) = state.materials_for(analysis.id()) {
        out.push('\n');
        out.push_str(&render_materials(entry));
    }
    out
}

pub fn render_materials(entry: &MaterialsEntry) -> String {
    if !entry.is_open() {
        return "Materials closed (reopen to view)\n".to_string();
    }
    let view = entry.view();
    let heading = if entry.is_editing() { " (draft)" } else { "" };
    format!(
        "--- InMail{} ---\n{}\n--- Cover letter{} ---\n{}\n",
        heading, view.inmail, heading, view.cover_letter
    )
}

use std::fs;
use std::path::PathBuf;

use anyhow::Context;
use calendar_scraper::dom::HtmlDocument;
use calendar_scraper::extract::extract_course;
use calendar_scraper::runner::parse_timetable;
use calendar_scraper::{
    HttpFetcher, JsonFileSink, RunSummary, Scraper, ScraperConfig, SubjectCodes,
};
use clap::{Parser, Subcommand};
use tracing::info;

#[derive(Parser)]
#[command(
    name = "calendar_scraper",
    about = "Western University academic calendar and timetable scraper"
)]
struct Cli {
    /// JSON config file (defaults are used for missing fields)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Subject table (overrides the config)
    #[arg(long, global = true)]
    subjects: Option<PathBuf>,

    /// Output directory (overrides the config)
    #[arg(long, global = true)]
    out: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scrape course information pages
    Courses {
        /// Subject key, e.g. "calculus" (default: every subject)
        #[arg(short, long)]
        subject: Option<String>,
    },
    /// Scrape master timetable offerings
    Offerings {
        /// Subject key, e.g. "calculus" (default: every subject)
        #[arg(short, long)]
        subject: Option<String>,
    },
    /// Regenerate the subject table from the timetable index page
    Subjects {
        /// Where to write the table (default: the configured subject table)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Extract one saved course information page
    ParseCourse {
        #[arg(long)]
        file: PathBuf,
        /// URL the page was saved from
        #[arg(long)]
        link: String,
    },
    /// Extract one saved timetable page
    ParseTimetable {
        #[arg(long)]
        file: PathBuf,
        /// Subject token the page was requested for, e.g. "CALCULUS"
        #[arg(long)]
        subject: String,
    },
}

fn load_config(cli: &Cli) -> anyhow::Result<ScraperConfig> {
    let mut config = match &cli.config {
        Some(path) => ScraperConfig::load_from_file(path)?,
        None => ScraperConfig::default(),
    };
    if let Some(path) = &cli.subjects {
        config.subject_table_path = path.clone();
    }
    if let Some(dir) = &cli.out {
        config.output_dir = dir.clone();
    }
    Ok(config)
}

fn build_scraper(
    config: ScraperConfig,
    subjects: SubjectCodes,
) -> anyhow::Result<Scraper<HttpFetcher, JsonFileSink>> {
    let fetcher = HttpFetcher::new(&config)?;
    let sink = JsonFileSink::new(&config.output_dir);
    Ok(Scraper::new(fetcher, sink, subjects, config)?)
}

fn load_subjects(config: &ScraperConfig) -> anyhow::Result<SubjectCodes> {
    SubjectCodes::load(&config.subject_table_path).with_context(|| {
        format!(
            "could not load the subject table; run `calendar_scraper subjects` to generate {}",
            config.subject_table_path.display()
        )
    })
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let cli = Cli::parse();
    let config = load_config(&cli)?;

    match cli.command {
        Commands::Courses { subject } => {
            let subjects = load_subjects(&config)?;
            let scraper = build_scraper(config, subjects)?;
            let summary = scraper.dump_course_info(subject.as_deref()).await?;
            println!("Course information: {}", summary);
        }
        Commands::Offerings { subject } => {
            let subjects = load_subjects(&config)?;
            let scraper = build_scraper(config, subjects)?;
            let summary = scraper.dump_offerings(subject.as_deref()).await?;
            println!("Offerings: {}", summary);
        }
        Commands::Subjects { output } => {
            let path = output.unwrap_or_else(|| config.subject_table_path.clone());
            let scraper = build_scraper(config, SubjectCodes::default())?;
            let subjects = scraper.generate_subject_table(&path).await?;
            println!("Wrote {} subjects to {}", subjects.len(), path.display());
        }
        Commands::ParseCourse { file, link } => {
            let markup = fs::read_to_string(&file)
                .with_context(|| format!("could not read {}", file.display()))?;
            let record = extract_course(&HtmlDocument::parse(&markup), &link)?;
            println!("{}", serde_json::to_string_pretty(&record)?);
        }
        Commands::ParseTimetable { file, subject } => {
            let markup = fs::read_to_string(&file)
                .with_context(|| format!("could not read {}", file.display()))?;
            let mut summary = RunSummary::default();
            let records = parse_timetable(&markup, &subject, &mut summary);
            info!(%summary, "Parsed timetable");
            println!("{}", serde_json::to_string_pretty(&records)?);
        }
    }

    Ok(())
}

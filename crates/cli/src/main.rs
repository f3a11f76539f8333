//! Jobmatch CLI - Command-line interface for the Jobmatch HTTP API

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use jobmatch_sdk::{Job, JobPayload, JobmatchClient, ListParams, Page};
use std::path::PathBuf;
use tabled::{Table, Tabled};

const DEFAULT_API_URL: &str = "http://127.0.0.1:8080";

#[derive(Parser)]
#[command(name = "jobmatch-cli")]
#[command(about = "Jobmatch job postings CLI", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// API server URL
    #[arg(long, env = "JOBMATCH_API_URL", default_value = DEFAULT_API_URL)]
    api_url: String,
}

#[derive(Args)]
struct Listing {
    /// Filter expression, e.g. "salary >: 1000 and skills : rust"
    #[arg(short, long)]
    filter: Option<String>,

    /// Zero-based page index
    #[arg(short, long)]
    page: Option<u32>,

    /// Page size
    #[arg(short, long)]
    size: Option<u32>,

    /// Sort as field[,asc|desc]
    #[arg(long)]
    sort: Option<String>,
}

impl From<Listing> for ListParams {
    fn from(listing: Listing) -> Self {
        ListParams {
            filter: listing.filter,
            page: listing.page,
            size: listing.size,
            sort: listing.sort,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// List jobs
    List(Listing),

    /// List jobs in a user's recommended cluster
    Recommend {
        /// User ID
        user_id: i64,

        #[command(flatten)]
        listing: Listing,
    },

    /// Show one job
    Get {
        /// Job ID
        id: i64,
    },

    /// Create a job from a JSON file
    Create {
        /// Path to the job JSON ("-" for stdin)
        file: PathBuf,
    },

    /// Update a job from a JSON file (must contain "id")
    Update {
        /// Path to the job JSON ("-" for stdin)
        file: PathBuf,
    },

    /// Delete a job
    Delete {
        /// Job ID
        id: i64,
    },
}

#[derive(Tabled)]
struct JobRow {
    id: i64,
    name: String,
    level: String,
    location: String,
    salary: f64,
    active: bool,
    cluster: String,
    skills: String,
}

impl From<&Job> for JobRow {
    fn from(job: &Job) -> Self {
        Self {
            id: job.id,
            name: job.name.clone(),
            level: job.level.clone(),
            location: job.location.clone(),
            salary: job.salary,
            active: job.active,
            cluster: job
                .cluster
                .map(|c| c.to_string())
                .unwrap_or_else(|| "-".to_string()),
            skills: job.skills.join(", "),
        }
    }
}

fn read_payload(file: &PathBuf) -> Result<JobPayload> {
    let raw = if file.as_os_str() == "-" {
        std::io::read_to_string(std::io::stdin()).context("Failed to read stdin")?
    } else {
        std::fs::read_to_string(file)
            .with_context(|| format!("Failed to read {}", file.display()))?
    };
    serde_json::from_str(&raw).context("Invalid job JSON")
}

fn print_page(page: &Page<Job>) {
    let rows: Vec<JobRow> = page.result.iter().map(JobRow::from).collect();
    if rows.is_empty() {
        println!("{}", "No jobs found".yellow());
    } else {
        println!("{}", Table::new(rows));
    }
    println!(
        "{}",
        format!(
            "page {} of {} ({} total, {} per page)",
            page.meta.page,
            page.meta.pages,
            page.meta.total,
            page.meta.page_size
        )
        .dimmed()
    );
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let client = JobmatchClient::connect(&cli.api_url)?;

    match cli.command {
        Commands::List(listing) => {
            let page = client.list_jobs(&listing.into()).await?;
            print_page(&page);
        }

        Commands::Recommend { user_id, listing } => {
            let page = client.recommended_jobs(user_id, &listing.into()).await?;
            println!(
                "{}",
                format!("Recommended jobs for user {}", user_id).cyan().bold()
            );
            print_page(&page);
        }

        Commands::Get { id } => {
            let job = client.get_job(id).await?;
            println!("{}", Table::new(vec![JobRow::from(&job)]));
            if !job.description.is_empty() {
                println!();
                println!("{}", job.description);
            }
        }

        Commands::Create { file } => {
            let payload = read_payload(&file)?;
            let job = client.create_job(&payload).await?;
            println!("{}", "✓ Job created".green().bold());
            println!("{}", Table::new(vec![JobRow::from(&job)]));
        }

        Commands::Update { file } => {
            let payload = read_payload(&file)?;
            if payload.id.is_none() {
                anyhow::bail!("Update requires an \"id\" field");
            }
            let job = client.update_job(&payload).await?;
            println!("{}", format!("✓ Job {} updated", job.id).green().bold());
        }

        Commands::Delete { id } => {
            client.delete_job(id).await?;
            println!("{}", format!("✓ Job {} deleted", id).green().bold());
        }
    }

    Ok(())
}

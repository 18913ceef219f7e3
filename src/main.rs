use anyhow::{bail, Context, Result};
use clap::Parser;
use mentor_match::config::{LoggingSettings, Settings};
use mentor_match::core::Matcher;
use mentor_match::models::RunSummary;
use mentor_match::services::{self, create_embedder, OutputBatch};
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Debug, Parser)]
#[command(name = "mentor-match")]
#[command(about = "Assign mentees to mentors with capacity-aware optimal matching")]
struct Cli {
    /// Mentee CSV
    #[arg(long, required_unless_present = "print_config")]
    mentees: Option<PathBuf>,

    /// Mentor CSV
    #[arg(long, required_unless_present = "print_config")]
    mentors: Option<PathBuf>,

    /// Where to write the match report
    #[arg(long, default_value = "matches.csv")]
    output: PathBuf,

    /// Also write unmatched mentees to this CSV
    #[arg(long)]
    unmatched_output: Option<PathBuf>,

    /// Write a JSON run summary to this path
    #[arg(long)]
    summary: Option<PathBuf>,

    /// Extra TOML config file, applied after config/default.toml and config/local.toml
    #[arg(long)]
    config: Option<PathBuf>,

    #[arg(long, help = "Print the effective configuration and exit")]
    print_config: bool,

    #[arg(long, help = "Enable verbose output")]
    verbose: bool,
}

fn main() -> Result<()> {
    // Load .env file if present
    dotenv::dotenv().ok();

    let cli = Cli::parse();

    let settings = Settings::load(cli.config.as_deref()).context("failed to load configuration")?;

    if cli.print_config {
        print!("{}", settings.to_toml().context("failed to render configuration")?);
        return Ok(());
    }

    init_logging(&settings.logging, cli.verbose);
    info!("Starting mentor matching run");

    let (Some(mentees_path), Some(mentors_path)) = (cli.mentees.as_ref(), cli.mentors.as_ref()) else {
        bail!("--mentees and --mentors are required");
    };

    let mentees = services::load_mentees(mentees_path)
        .with_context(|| format!("input stage failed: could not load mentees from {}", mentees_path.display()))?;
    let mentors = services::load_mentors(mentors_path)
        .with_context(|| format!("input stage failed: could not load mentors from {}", mentors_path.display()))?;

    let embedder = create_embedder(&settings.embedding.provider, settings.embedding.dimension)
        .context("failed to create embedding provider")?;

    let weights = settings.weights();
    let matcher = Matcher::new(weights).with_sentinel_cost(settings.solver.sentinel_cost);
    info!("Matcher initialized with weights: {:?}", weights);

    let result = matcher
        .find_matches(&mentees, &mentors, embedder.as_ref())
        .context("matching run failed")?;

    if result.rejected > 0 {
        bail!(
            "reconciliation rejected {} solver pairings; mentor capacity bookkeeping is inconsistent",
            result.rejected
        );
    }

    let match_rows = result.match_rows(&mentees, &mentors);
    let unmatched_rows = result.unmatched_rows(&mentees);

    if match_rows.is_empty() {
        info!("No matches could be made.");
    } else {
        info!("{} matches were made.", match_rows.len());
    }

    if !unmatched_rows.is_empty() {
        warn!("The following mentees could not be matched:");
        for row in &unmatched_rows {
            warn!("- {} (ID: {})", row.mentee_name, row.mentee_id);
        }
    }

    let summary = RunSummary {
        run_id: uuid::Uuid::new_v4(),
        generated_at: chrono::Utc::now(),
        embedder: embedder.name().to_string(),
        total_mentees: result.total_mentees,
        total_mentors: mentors.len(),
        total_slots: result.total_slots,
        matched: result.matches.len(),
        unmatched: result.unmatched.len(),
        capacity_rejections: result.rejected,
        total_score: result.total_score(),
        weights,
    };

    info!(
        run_id = %summary.run_id,
        matched = summary.matched,
        unmatched = summary.unmatched,
        total_score = summary.total_score,
        "Matching run complete"
    );

    // Every report is staged first; none is published unless all succeed
    let mut outputs = OutputBatch::new();
    if !match_rows.is_empty() {
        outputs
            .add_matches(&cli.output, &match_rows)
            .with_context(|| format!("failed to write matches to {}", cli.output.display()))?;
    }
    if let Some(path) = &cli.unmatched_output {
        outputs
            .add_unmatched(path, &unmatched_rows)
            .with_context(|| format!("failed to write unmatched mentees to {}", path.display()))?;
    }
    if let Some(path) = &cli.summary {
        outputs
            .add_summary(path, &summary)
            .with_context(|| format!("failed to write summary to {}", path.display()))?;
    }
    outputs.commit().context("failed to publish reports")?;

    if !match_rows.is_empty() {
        info!("Optimal matches have been saved to {}", cli.output.display());
    }

    Ok(())
}

/// Initialize logging; `RUST_LOG` wins over `--verbose`, which wins over config
fn init_logging(settings: &LoggingSettings, verbose: bool) {
    let default_directive = if verbose {
        "mentor_match=debug,info".to_string()
    } else {
        settings.level.clone()
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive));

    let fmt_layer = tracing_subscriber::fmt::layer().with_target(false).with_level(true);

    let registry = tracing_subscriber::registry().with(filter);
    match settings.format.as_str() {
        "json" => registry.with(fmt_layer.json()).init(),
        "pretty" => registry.with(fmt_layer.pretty()).init(),
        _ => registry.with(fmt_layer.compact()).init(),
    }
}

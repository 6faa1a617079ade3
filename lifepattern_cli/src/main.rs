use chrono::{Local, NaiveDate, Utc};
use clap::{Args, Parser, Subcommand};
use lifepattern_core::service::{self, TrendReport};
use lifepattern_core::*;
use std::path::PathBuf;
use std::process::ExitCode;
use uuid::Uuid;

#[derive(Parser)]
#[command(name = "lifepattern")]
#[command(about = "Daily lifestyle log with burnout analysis", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Override data directory
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Subject to act on (defaults to config, then $USER)
    #[arg(long, global = true)]
    subject: Option<String>,

    /// Print JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    /// Enable debug logging on stderr
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Record and manage daily logs
    Log {
        #[command(subcommand)]
        command: LogCommand,
    },

    /// Burnout analysis and trends
    Analysis {
        #[command(subcommand)]
        command: AnalysisCommand,
    },
}

#[derive(Subcommand)]
enum LogCommand {
    /// Record a new daily log
    Add(MetricsArgs),

    /// Replace an existing daily log
    Update {
        id: Uuid,

        #[command(flatten)]
        metrics: MetricsArgs,
    },

    /// List logs, newest first
    List,

    /// Show a single log
    Show { id: Uuid },

    /// Delete a log
    Delete { id: Uuid },
}

#[derive(Subcommand)]
enum AnalysisCommand {
    /// Show the most recent assessment
    Latest,

    /// Score the most recent log and store the assessment
    Regenerate,

    /// Sleep and stress series over a date window
    Trends {
        /// Number of days ending today
        #[arg(long, allow_negative_numbers = true)]
        days: Option<i64>,

        /// Window start (YYYY-MM-DD), used together with --end
        #[arg(long)]
        start: Option<NaiveDate>,

        /// Window end (YYYY-MM-DD), used together with --start
        #[arg(long)]
        end: Option<NaiveDate>,

        /// Also write the series to a CSV file
        #[arg(long)]
        csv: Option<PathBuf>,
    },
}

#[derive(Args)]
struct MetricsArgs {
    /// Day being logged (defaults to today)
    #[arg(long)]
    date: Option<NaiveDate>,

    /// Hours slept
    #[arg(long)]
    sleep: f64,

    /// Hours worked
    #[arg(long)]
    work: f64,

    /// Hours studied
    #[arg(long)]
    study: f64,

    /// Hours of entertainment
    #[arg(long)]
    entertainment: f64,

    /// Energy level, 1-10
    #[arg(long)]
    energy: u8,

    /// Stress level, 1-10
    #[arg(long)]
    stress: u8,

    /// Free-form notes
    #[arg(long)]
    notes: Option<String>,
}

impl MetricsArgs {
    fn into_metrics(self, today: NaiveDate) -> DailyMetrics {
        DailyMetrics {
            date: self.date.unwrap_or(today),
            sleep_hours: self.sleep,
            work_hours: self.work,
            study_hours: self.study,
            entertainment_hours: self.entertainment,
            energy_level: self.energy,
            stress_level: self.stress,
            notes: self.notes,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if cli.verbose {
        lifepattern_core::logging::init_with_level("debug");
    } else {
        lifepattern_core::logging::init();
    }

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            if e.is_client_error() {
                ExitCode::from(2)
            } else {
                ExitCode::FAILURE
            }
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = Config::load()?;
    let data_dir = cli
        .data_dir
        .clone()
        .unwrap_or_else(|| config.data.data_dir.clone());
    let subject = resolve_subject(cli.subject.as_deref(), &config);
    let mut store = FileStore::open(data_dir);

    tracing::debug!("Acting as subject '{}'", subject);

    match cli.command {
        Commands::Log { command } => cmd_log(&store, &subject, command, cli.json),
        Commands::Analysis { command } => match command {
            AnalysisCommand::Latest => {
                let assessment = service::latest_analysis(&store, &subject)?;
                print_assessment(&assessment, cli.json)
            }
            AnalysisCommand::Regenerate => {
                let assessment = service::regenerate_analysis(&mut store, &subject, Utc::now())?;
                print_assessment(&assessment, cli.json)
            }
            AnalysisCommand::Trends {
                days,
                start,
                end,
                csv,
            } => {
                let query = trend_query(days, start, end, &config);
                let report = service::trends(&store, &subject, &query, today())?;
                print_trends(&report, cli.json)?;

                if let Some(path) = csv {
                    let count = lifepattern_core::export::write_trend_csv(&path, &report.points)?;
                    if !cli.json {
                        println!("✓ Exported {} points to {}", count, path.display());
                    }
                }
                Ok(())
            }
        },
    }
}

fn cmd_log(store: &FileStore, subject: &str, command: LogCommand, json: bool) -> Result<()> {
    let logs = store.logs();

    match command {
        LogCommand::Add(args) => {
            let log = service::create_log(logs, subject, args.into_metrics(today()), Utc::now())?;
            if json {
                print_json(&log)
            } else {
                println!("✓ Logged {} ({})", log.date(), log.id);
                Ok(())
            }
        }
        LogCommand::Update { id, metrics } => {
            let log =
                service::update_log(logs, subject, id, metrics.into_metrics(today()), Utc::now())?;
            if json {
                print_json(&log)
            } else {
                println!("✓ Updated {} ({})", log.date(), log.id);
                Ok(())
            }
        }
        LogCommand::List => {
            let entries = service::list_logs(logs, subject)?;
            if json {
                return print_json(&entries);
            }
            if entries.is_empty() {
                println!("No logs yet.");
            }
            for log in &entries {
                println!("{}", log_line(log));
            }
            Ok(())
        }
        LogCommand::Show { id } => {
            let log = service::get_log(logs, subject, id)?;
            if json {
                return print_json(&log);
            }
            println!("{}", log_line(&log));
            println!(
                "  study {:.1}h  entertainment {:.1}h  total {:.1}h",
                log.metrics.study_hours,
                log.metrics.entertainment_hours,
                log.metrics.total_hours()
            );
            if let Some(ref notes) = log.metrics.notes {
                println!("  notes: {}", notes);
            }
            Ok(())
        }
        LogCommand::Delete { id } => {
            let removed = service::delete_log(logs, subject, id)?;
            if json {
                print_json(&removed)
            } else {
                println!("✓ Deleted log {} ({})", removed.id, removed.date());
                Ok(())
            }
        }
    }
}

/// `--subject`, then the configured subject, then the login name
fn resolve_subject(flag: Option<&str>, config: &Config) -> String {
    flag.map(str::to_string)
        .or_else(|| config.identity.subject.clone())
        .or_else(|| std::env::var("USER").ok().filter(|u| !u.is_empty()))
        .unwrap_or_else(|| "default".to_string())
}

/// Fall back to the configured day count only when no range flag was given
fn trend_query(
    days: Option<i64>,
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
    config: &Config,
) -> TrendQuery {
    let days = if days.is_none() && start.is_none() && end.is_none() {
        Some(config.trends.default_days)
    } else {
        days
    };
    TrendQuery { days, start, end }
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

fn log_line(log: &DailyLog) -> String {
    let m = &log.metrics;
    format!(
        "{}  sleep {:.1}h  work {:.1}h  energy {}/10  stress {}/10  {}",
        m.date, m.sleep_hours, m.work_hours, m.energy_level, m.stress_level, log.id
    )
}

fn print_assessment(assessment: &BurnoutAssessment, json: bool) -> Result<()> {
    if json {
        return print_json(assessment);
    }

    println!("\n╭─────────────────────────────────────────╮");
    println!("│  BURNOUT RISK: {}", assessment.risk_tier);
    println!("╰─────────────────────────────────────────╯");
    println!();
    println!("  Score: {}/100", assessment.score);
    println!("  Computed: {}", assessment.computed_at.to_rfc3339());
    println!();
    println!("  {}", assessment.suggestion_text);
    println!();
    Ok(())
}

fn print_trends(report: &TrendReport, json: bool) -> Result<()> {
    if json {
        return print_json(&report.points);
    }

    println!(
        "Trends {} → {} ({} points)",
        report.window.start_date,
        report.window.end_date,
        report.points.len()
    );
    for point in &report.points {
        println!(
            "  {}  sleep {:>4.1}h  stress {:>2}/10",
            point.date, point.sleep_hours, point.stress_level
        );
    }
    Ok(())
}

fn print_json<T: serde::Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

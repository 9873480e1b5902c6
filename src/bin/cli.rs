use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use trading_calendar::{
    CalendarRecord, CalendarRepository, CsvCalendarRepository, CsvHolidaySource, GitPublisher,
    GitSettings, HolidaySource, Settings, TradingWeekConfig, UpdateJob, ViewsJob,
    all_non_trading_days, public_holidays_only, view_commit_message,
};

#[derive(Parser)]
#[command(name = "trading-calendar")]
#[command(about = "Maintain an exchange trading calendar and its holiday views", long_about = None)]
struct Cli {
    #[command(flatten)]
    storage: StorageArgs,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Args)]
struct StorageArgs {
    /// Calendar CSV (Date,IsTradingDay,HolidayName) [default: data/trading_calendar.csv]
    #[arg(long, env = "TRADING_CALENDAR_PATH")]
    calendar: Option<PathBuf>,

    /// Read and write the calendar in this SQLite database instead of the CSV file
    #[cfg(feature = "sqlite")]
    #[arg(long, env = "TRADING_CALENDAR_SQLITE")]
    sqlite: Option<PathBuf>,

    /// Where to fetch the calendar when the local file is missing
    #[arg(long, env = "TRADING_CALENDAR_FALLBACK_URL")]
    fallback_url: Option<String>,

    #[arg(long, env = "TRADING_CALENDAR_HTTP_TIMEOUT_SECS")]
    http_timeout_secs: Option<u64>,

    #[arg(long, env = "TRADING_CALENDAR_PUBLIC_HOLIDAYS_PATH")]
    public_holidays: Option<PathBuf>,

    #[arg(long, env = "TRADING_CALENDAR_NON_TRADING_DAYS_PATH")]
    non_trading_days: Option<PathBuf>,

    /// Weekdays the exchange never trades [default: Fri,Sat]
    #[arg(long, env = "TRADING_CALENDAR_WEEKEND_DAYS", value_parser = parse_weekend)]
    weekend_days: Option<TradingWeekConfig>,
}

#[derive(Args)]
struct GitArgs {
    /// Commit the written files with git
    #[arg(long, env = "TRADING_CALENDAR_GIT_COMMIT")]
    commit: bool,

    /// Push after committing
    #[arg(long, env = "TRADING_CALENDAR_GIT_PUSH", requires = "commit")]
    push: bool,

    #[arg(long, env = "TRADING_CALENDAR_GIT_REMOTE")]
    git_remote: Option<String>,

    #[arg(long, env = "TRADING_CALENDAR_GIT_BRANCH")]
    git_branch: Option<String>,

    #[arg(long, env = "TRADING_CALENDAR_GIT_WORKDIR")]
    git_workdir: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Reconcile weekends and new public holidays into the calendar
    Update {
        /// Holiday listing export (Holiday Date,Holiday Description)
        #[arg(long, env = "TRADING_CALENDAR_OBSERVATIONS_PATH")]
        observations: Option<PathBuf>,

        #[arg(long, env = "TRADING_CALENDAR_PAGE_SIZE")]
        page_size: Option<usize>,

        #[arg(long, env = "TRADING_CALENDAR_EARLIEST_YEAR")]
        earliest_year: Option<i32>,

        /// Run as if today were this date (YYYY-MM-DD)
        #[arg(long, value_parser = parse_date)]
        today: Option<NaiveDate>,

        /// Print the run report as JSON
        #[arg(long)]
        json: bool,

        #[command(flatten)]
        git: GitArgs,
    },

    /// Regenerate the public-holiday and non-trading-day files
    Views {
        #[arg(long)]
        json: bool,

        #[command(flatten)]
        git: GitArgs,
    },

    /// Print calendar records as a table, newest first
    Show {
        #[arg(long, value_enum, default_value_t = ShowWhat::Calendar)]
        what: ShowWhat,

        #[arg(long, default_value_t = 20)]
        limit: usize,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum ShowWhat {
    Calendar,
    PublicHolidays,
    NonTradingDays,
}

fn parse_weekend(input: &str) -> Result<TradingWeekConfig, String> {
    TradingWeekConfig::parse(input).map_err(|err| format!("invalid weekday list '{input}': {err}"))
}

fn parse_date(input: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(input, "%Y-%m-%d").map_err(|err| format!("invalid date '{input}': {err}"))
}

impl StorageArgs {
    /// Flags and environment over `Settings::default()`.
    fn settings(&self) -> Settings {
        let defaults = Settings::default();
        Settings {
            calendar_path: self.calendar.clone().unwrap_or(defaults.calendar_path),
            fallback_url: self.fallback_url.clone(),
            public_holidays_path: self
                .public_holidays
                .clone()
                .unwrap_or(defaults.public_holidays_path),
            non_trading_days_path: self
                .non_trading_days
                .clone()
                .unwrap_or(defaults.non_trading_days_path),
            weekend: self.weekend_days.clone().unwrap_or(defaults.weekend),
            http_timeout_secs: self.http_timeout_secs.unwrap_or(defaults.http_timeout_secs),
            ..defaults
        }
    }

    fn repository(&self, settings: &Settings) -> Result<Box<dyn CalendarRepository>> {
        #[cfg(feature = "sqlite")]
        if let Some(path) = &self.sqlite {
            let repo = trading_calendar::SqliteCalendarRepository::new(path)
                .with_context(|| format!("opening sqlite calendar {}", path.display()))?;
            return Ok(Box::new(repo));
        }
        Ok(Box::new(CsvCalendarRepository::new(settings.calendar_path.clone())))
    }
}

impl GitArgs {
    fn settings(&self) -> GitSettings {
        let defaults = GitSettings::default();
        GitSettings {
            enabled: self.commit,
            push: self.push,
            remote: self.git_remote.clone().unwrap_or(defaults.remote),
            branch: self.git_branch.clone().unwrap_or(defaults.branch),
            workdir: self.git_workdir.clone(),
        }
    }
}

fn render_records_as_text_table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.len()).collect();
    for row in rows {
        for (ci, cell) in row.iter().enumerate() {
            if cell.len() > widths[ci] {
                widths[ci] = cell.len();
            }
        }
    }

    let mut sep = String::from("+");
    for w in &widths {
        sep.push_str(&"-".repeat(*w + 2));
        sep.push('+');
    }

    let render_row = |cells: &[String]| {
        let mut line = String::from("|");
        for (ci, cell) in cells.iter().enumerate() {
            line.push(' ');
            line.push_str(cell);
            line.push_str(&" ".repeat(widths[ci].saturating_sub(cell.len())));
            line.push_str(" |");
        }
        line
    };

    let header: Vec<String> = headers.iter().map(|h| h.to_string()).collect();
    let mut out = Vec::with_capacity(rows.len() + 4);
    out.push(sep.clone());
    out.push(render_row(&header));
    out.push(sep.clone());
    for row in rows {
        out.push(render_row(row));
    }
    out.push(sep);
    out.join("\n")
}

fn calendar_row(record: &CalendarRecord) -> Vec<String> {
    vec![
        record.date.to_string(),
        record.is_trading_day.to_string(),
        record.name().unwrap_or_default().to_string(),
    ]
}

fn commit_if_requested(git: &GitArgs, paths: &[PathBuf], message: &str) -> Result<()> {
    let settings = git.settings();
    if !settings.enabled {
        return Ok(());
    }
    GitPublisher::from_settings(&settings)
        .publish(paths, message)
        .with_context(|| format!("publishing '{message}'"))?;
    println!("Committed: {message}");
    Ok(())
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    // .env is optional.
    let _ = dotenvy::dotenv();
    init_tracing();

    let cli = Cli::parse();
    let mut settings = cli.storage.settings();
    let repository = cli.storage.repository(&settings)?;

    match cli.cmd {
        Commands::Update {
            observations,
            page_size,
            earliest_year,
            today,
            json,
            git,
        } => {
            settings.observations_path = observations;
            settings.page_size = page_size.unwrap_or(settings.page_size);
            settings.earliest_year = earliest_year.unwrap_or(settings.earliest_year);
            settings.git = git.settings();

            let mut source = match &settings.observations_path {
                Some(path) => match CsvHolidaySource::open(path, settings.page_size) {
                    Ok(source) => Some(source),
                    Err(err) => {
                        tracing::warn!(path = %path.display(), error = %err, "holiday listing unavailable, continuing without it");
                        None
                    }
                },
                None => None,
            };

            let today = today.unwrap_or_else(|| chrono::Local::now().date_naive());
            let report = UpdateJob::new(&settings, repository.as_ref())
                .run(today, source.as_mut().map(|s| s as &mut dyn HolidaySource))
                .context("calendar update failed")?;

            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                println!("Calendar updated ({})", report.summary.to_cli_summary());
                println!("Records: {}", report.records);
                println!("Commit message: {}", report.commit_message);
            }

            let written = repository.path().to_path_buf();
            commit_if_requested(&git, &[written], &report.commit_message)?;
        }
        Commands::Views { json, git } => {
            let report = ViewsJob::new(&settings, repository.as_ref())
                .run()
                .context("derived view generation failed")?;

            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                println!("Public holidays: {}", report.public_holidays);
                println!("Non-trading days: {}", report.non_trading_days);
            }

            for path in &report.written {
                commit_if_requested(&git, std::slice::from_ref(path), &view_commit_message(path))?;
            }
        }
        Commands::Show { what, limit } => {
            let store = repository
                .load_calendar()
                .context("loading calendar")?
                .with_context(|| format!("no calendar at {}", repository.describe()))?;

            let table = match what {
                ShowWhat::Calendar => {
                    let rows: Vec<Vec<String>> =
                        store.iter_desc().take(limit).map(calendar_row).collect();
                    render_records_as_text_table(&["Date", "IsTradingDay", "HolidayName"], &rows)
                }
                ShowWhat::PublicHolidays | ShowWhat::NonTradingDays => {
                    let view = match what {
                        ShowWhat::PublicHolidays => public_holidays_only(&store),
                        _ => all_non_trading_days(&store),
                    };
                    let rows: Vec<Vec<String>> = view
                        .rows
                        .iter()
                        .take(limit)
                        .map(|row| vec![row.date.to_string(), row.holiday_name.clone()])
                        .collect();
                    render_records_as_text_table(&["Date", "HolidayName"], &rows)
                }
            };
            println!("{table}");
        }
    }

    Ok(())
}

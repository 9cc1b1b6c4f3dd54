use anyhow::Context;
use chrono::{NaiveDate, Utc};
use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use hms_core::{
    config::{data_dir_from_env_value, local_zone_from_env_value, status_synonyms_from_env_value},
    constants::{DATA_DIR_ENV, STATUS_SYNONYMS_ENV, UTC_OFFSET_ENV},
    presets::{criteria_from_preset, find_preset, load_presets},
    Appointment, CoreConfig, DashboardService, FilterCriteria, Filterable, JsonFileStore,
    MedicalRecord, Notification, RecordFilter, RecordId, RecordKind, RecordStore, SubjectField,
    DEFAULT_DATA_DIR,
};
use hms_wire::{parse_collection, FromRaw};

/// Default preset file name, looked up in the data directory.
const PRESETS_FILENAME: &str = "presets.yaml";

#[derive(Parser)]
#[command(name = "hms")]
#[command(about = "Hospital management dashboard records CLI")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Kind {
    Appointments,
    #[value(alias = "medical_records")]
    MedicalRecords,
    Notifications,
}

impl From<Kind> for RecordKind {
    fn from(kind: Kind) -> Self {
        match kind {
            Kind::Appointments => RecordKind::Appointments,
            Kind::MedicalRecords => RecordKind::MedicalRecords,
            Kind::Notifications => RecordKind::Notifications,
        }
    }
}

#[derive(Args, Debug, Default)]
struct FilterArgs {
    /// Only records for this doctor id
    #[arg(long)]
    doctor: Option<String>,
    /// Only records for this patient id
    #[arg(long)]
    patient: Option<String>,
    /// Only notifications addressed to this user id
    #[arg(long)]
    recipient: Option<String>,
    /// Status to match, ignoring case
    #[arg(long)]
    status: Option<String>,
    /// Calendar day to match (YYYY-MM-DD, local time)
    #[arg(long)]
    date: Option<NaiveDate>,
    /// Text to look for in names, reasons, diagnoses and messages
    #[arg(long)]
    search: Option<String>,
    /// Start from a saved preset; explicit flags override it
    #[arg(long)]
    preset: Option<String>,
    /// Preset file (defaults to presets.yaml in the data directory)
    #[arg(long)]
    presets: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// List records matching the filters, most recent first
    List {
        kind: Kind,
        #[command(flatten)]
        filters: FilterArgs,
        /// Print records and counts as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show status and recency counts for the matching records
    Counts {
        kind: Kind,
        #[command(flatten)]
        filters: FilterArgs,
    },
    /// Normalise a backend JSON payload and add its records to the store
    Import {
        kind: Kind,
        /// Backend response body (array, or object wrapping one)
        file: PathBuf,
    },
    /// Delete a stored record
    Delete {
        kind: Kind,
        /// Record id
        id: String,
    },
}

impl Commands {
    fn kind(&self) -> Kind {
        match self {
            Commands::List { kind, .. }
            | Commands::Counts { kind, .. }
            | Commands::Import { kind, .. }
            | Commands::Delete { kind, .. } => *kind,
        }
    }
}

/// One-line rendering used by `hms list` without `--json`.
trait Summary {
    fn summary(&self) -> String;
}

fn or_dash(value: Option<&str>) -> &str {
    value.filter(|v| !v.is_empty()).unwrap_or("-")
}

impl Summary for Appointment {
    fn summary(&self) -> String {
        format!(
            "{} | {} | {} | doctor {} | patient {} | {}",
            self.id,
            or_dash(self.date_time.as_deref()),
            or_dash(self.status.as_deref()),
            or_dash(self.doctor_name.as_deref().or(Some(self.doctor_id.as_str()))),
            or_dash(self.patient_name.as_deref().or(Some(self.patient_id.as_str()))),
            or_dash(self.reason.as_deref()),
        )
    }
}

impl Summary for MedicalRecord {
    fn summary(&self) -> String {
        format!(
            "{} | {} | patient {} | doctor {} | {}",
            self.id,
            or_dash(self.date.as_deref()),
            or_dash(self.patient_name.as_deref().or(Some(self.patient_id.as_str()))),
            or_dash(self.doctor_name.as_deref().or(Some(self.doctor_id.as_str()))),
            or_dash(self.diagnosis.as_deref()),
        )
    }
}

impl Summary for Notification {
    fn summary(&self) -> String {
        format!(
            "{} | {} | {} | {} | {}",
            self.id,
            or_dash(self.created_at.as_deref()),
            or_dash(self.status.as_deref()),
            or_dash(self.title.as_deref()),
            or_dash(self.message.as_deref()),
        )
    }
}

/// Resolve core configuration from the environment once, at startup.
fn config_from_env() -> anyhow::Result<CoreConfig> {
    let data_dir = data_dir_from_env_value(std::env::var(DATA_DIR_ENV).ok(), DEFAULT_DATA_DIR);
    let local_zone = local_zone_from_env_value(std::env::var(UTC_OFFSET_ENV).ok())
        .with_context(|| format!("invalid {UTC_OFFSET_ENV}"))?;
    let synonyms = status_synonyms_from_env_value(std::env::var(STATUS_SYNONYMS_ENV).ok())
        .with_context(|| format!("invalid {STATUS_SYNONYMS_ENV}"))?;

    Ok(CoreConfig::new(data_dir, local_zone, synonyms)?)
}

/// Build criteria from an optional preset overlaid with explicit flags.
fn criteria_from_args(
    args: &FilterArgs,
    kind: RecordKind,
    data_dir: &Path,
) -> anyhow::Result<FilterCriteria> {
    if args.preset.is_none() && args.presets.is_some() {
        anyhow::bail!("--presets needs --preset NAME");
    }

    let mut criteria = match &args.preset {
        Some(name) => {
            let path = args
                .presets
                .clone()
                .unwrap_or_else(|| data_dir.join(PRESETS_FILENAME));
            let presets = load_presets(&path)
                .with_context(|| format!("failed to load presets from {}", path.display()))?;
            criteria_from_preset(find_preset(&presets, name)?, kind)?
        }
        None => FilterCriteria::new(),
    };

    let subjects = [
        (SubjectField::Doctor, &args.doctor),
        (SubjectField::Patient, &args.patient),
        (SubjectField::Recipient, &args.recipient),
    ];
    for (field, value) in subjects {
        if let Some(value) = value {
            criteria = criteria.with_subject(field, value.as_str());
        }
    }
    if let Some(status) = &args.status {
        criteria = criteria.with_status(status);
    }
    if let Some(date) = args.date {
        criteria = criteria.with_date(date);
    }
    if let Some(search) = &args.search {
        criteria = criteria.with_search(search.clone());
    }

    Ok(criteria)
}

#[derive(Serialize)]
struct ListOutput<'a, T> {
    records: &'a [T],
    counts: &'a hms_core::CategoryCounts,
}

fn run<T>(cfg: &CoreConfig, command: Commands) -> anyhow::Result<()>
where
    T: Filterable + FromRaw + Serialize + Clone + Summary,
{
    let kind = T::KIND;
    let path = cfg.collection_path(kind);
    let store: JsonFileStore<T> = JsonFileStore::new(&path);
    let mut service = DashboardService::new(store, RecordFilter::new(cfg));

    match command {
        Commands::List { filters, json, .. } => {
            service.refresh()?;
            let criteria = criteria_from_args(&filters, kind, cfg.data_dir())?;
            let outcome = service.view(&criteria);

            if json {
                let output = ListOutput {
                    records: &outcome.filtered,
                    counts: &outcome.counts,
                };
                println!("{}", serde_json::to_string_pretty(&output)?);
            } else if outcome.filtered.is_empty() {
                println!("No {kind} found.");
            } else {
                for record in &outcome.filtered {
                    println!("{}", record.summary());
                }
                println!("{} of {} {kind}", outcome.counts.total, service.records().len());
            }
        }
        Commands::Counts { filters, .. } => {
            service.refresh()?;
            let criteria = criteria_from_args(&filters, kind, cfg.data_dir())?;
            let outcome = service.view(&criteria);
            let recency = service.recency(&criteria, Utc::now());

            println!("total: {}", outcome.counts.total);
            for (status, count) in &outcome.counts.by_status {
                println!("{status}: {count}");
            }
            println!(
                "today: {}, upcoming: {}, past: {}, undated: {}",
                recency.today, recency.upcoming, recency.past, recency.undated
            );
        }
        Commands::Import { file, .. } => {
            let text = std::fs::read_to_string(&file)
                .with_context(|| format!("failed to read {}", file.display()))?;
            let records: Vec<T> = parse_collection(&text)?;
            let summary = service.import(records)?;
            println!(
                "Imported {} {kind} into {} ({} skipped)",
                summary.created,
                path.display(),
                summary.skipped.len()
            );
        }
        Commands::Delete { id, .. } => {
            let mut store = service.into_store();
            store.delete(&RecordId::new(id.clone()))?;
            println!("Deleted {kind} record {id}");
        }
    }

    Ok(())
}

/// Entry point for the `hms` command line tool.
///
/// # Environment Variables
/// - `HMS_DATA_DIR`: directory holding the stored collections (default: "hms_data")
/// - `HMS_UTC_OFFSET`: zone for calendar-day matching, `local` or a fixed offset (default: host time zone)
/// - `HMS_STATUS_SYNONYMS`: status aliases such as `Confirmed=Accepted` (default: none)
/// - `RUST_LOG`: log filter; logs go to stderr
fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env().add_directive("hms=info".parse()?))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let Some(command) = cli.command else {
        println!("Use 'hms --help' for commands");
        return Ok(());
    };

    let cfg = config_from_env()?;
    tracing::debug!(data_dir = %cfg.data_dir().display(), "resolved configuration");

    match RecordKind::from(command.kind()) {
        RecordKind::Appointments => run::<Appointment>(&cfg, command),
        RecordKind::MedicalRecords => run::<MedicalRecord>(&cfg, command),
        RecordKind::Notifications => run::<Notification>(&cfg, command),
    }
}

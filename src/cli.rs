// src/cli.rs

use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::PathBuf;
use tracing::{debug, info};

use crate::config::Config;
use crate::domain::{seed, CriterionOp, Dataset};
use crate::errors::GuardError;
use crate::listing::{run_pipeline, Criteria, ListQuery, ListView, Record, SortSpec};
use crate::locale::LocaleStore;
use crate::services::{
    bulk_action, digital_id, efir, AlertKind, AlertPriority, BulkActionKind, BulkActionRequest,
    EfirPriority, EfirTemplate, IdentityRequest,
};
use crate::task::{TaskHandle, TaskState};
use crate::text::{display_width, pad_to_width};

// Widest a plain-table column may grow before its cells are cut.
const MAX_COLUMN_WIDTH: usize = 28;

/// TouristGuard: tourism safety administration console
#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
pub struct Cli {
    /// Optional path to the TouristGuard configuration file
    #[clap(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Suppress TUI auto-launch (e.g., for scripting)
    #[clap(long)]
    pub headless: bool,

    /// Set log level (overrides the config file; RUST_LOG overrides both)
    #[clap(long, value_name = "LEVEL", value_enum)]
    pub log_level: Option<LogLevelCli>,

    #[clap(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the list pipeline over a registry and print one page
    List(ListArgs),

    /// Show the fields a registry exposes for filtering, search and sorting
    Fields {
        dataset: Dataset,
    },

    /// List the supported display languages
    Languages,

    /// Issue a blockchain digital ID for a registered tourist
    IssueId {
        tourist_id: u32,
        #[clap(long)]
        json: bool,
    },

    /// Generate an E-FIR for an incident
    Efir {
        incident_id: String,
        #[clap(long, value_enum, default_value_t = EfirTemplate::Standard)]
        template: EfirTemplate,
        #[clap(long, value_enum, default_value_t = EfirPriority::Medium)]
        priority: EfirPriority,
        #[clap(long)]
        json: bool,
    },

    /// Send a message, alert or emergency broadcast to tourists
    Bulk {
        #[clap(value_enum)]
        kind: BulkActionKind,
        #[clap(required = true)]
        ids: Vec<u32>,
        #[clap(long, short, default_value = "")]
        message: String,
        #[clap(long, value_enum, default_value_t = AlertKind::General)]
        alert_type: AlertKind,
        #[clap(long, value_enum, default_value_t = AlertPriority::Medium)]
        priority: AlertPriority,
        #[clap(long)]
        json: bool,
    },

    /// Print the effective configuration as TOML
    ShowConfig,
}

#[derive(clap::Args, Debug, Default)]
pub struct ListArgs {
    pub dataset: Dataset,

    /// Case-insensitive search over the searchable fields
    #[clap(long, short)]
    pub search: Option<String>,

    /// Exact match, FIELD=VALUE (repeatable)
    #[clap(long = "filter", value_name = "FIELD=VALUE")]
    pub filters: Vec<String>,

    /// Inclusive minimum, FIELD=NUMBER (repeatable)
    #[clap(long = "min", value_name = "FIELD=NUMBER")]
    pub minimums: Vec<String>,

    /// Exclusive upper bound, FIELD=NUMBER (repeatable)
    #[clap(long = "below", value_name = "FIELD=NUMBER")]
    pub below: Vec<String>,

    /// Case-insensitive substring, FIELD=TEXT (repeatable)
    #[clap(long = "contains", value_name = "FIELD=TEXT")]
    pub contains: Vec<String>,

    /// Sort field; defaults to the registry's default ordering
    #[clap(long)]
    pub sort: Option<String>,

    /// Sort descending
    #[clap(long)]
    pub desc: bool,

    /// 1-based page, clamped to the last page
    #[clap(long, default_value_t = 1)]
    pub page: usize,

    /// Overrides the configured page size
    #[clap(long)]
    pub page_size: Option<usize>,

    /// Print JSON instead of a table
    #[clap(long)]
    pub json: bool,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
pub enum LogLevelCli {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevelCli {
    pub fn as_filter(self) -> &'static str {
        match self {
            LogLevelCli::Trace => "trace",
            LogLevelCli::Debug => "debug",
            LogLevelCli::Info => "info",
            LogLevelCli::Warn => "warn",
            LogLevelCli::Error => "error",
        }
    }
}

pub async fn handle_command(command: Commands, config: &Config) -> Result<()> {
    match command {
        Commands::List(args) => handle_list(&args, config),
        Commands::Fields { dataset } => {
            handle_fields(dataset);
            Ok(())
        }
        Commands::Languages => {
            let store = LocaleStore::new(&config.locale.default_language);
            let current = store.current().code;
            for language in store.languages() {
                let marker = if language.code == current { "*" } else { " " };
                println!("{} {:<4}{:<12}{}", marker, language.code, language.name, language.native_name);
            }
            Ok(())
        }
        Commands::IssueId { tourist_id, json } => handle_issue_id(tourist_id, json, config).await,
        Commands::Efir {
            incident_id,
            template,
            priority,
            json,
        } => handle_efir(incident_id, template, priority, json, config).await,
        Commands::Bulk {
            kind,
            ids,
            message,
            alert_type,
            priority,
            json,
        } => {
            let request = BulkActionRequest {
                kind,
                tourist_ids: ids,
                message,
                alert_type,
                priority,
            };
            handle_bulk(request, json, config).await
        }
        Commands::ShowConfig => {
            let rendered = toml::to_string_pretty(config).map_err(GuardError::from)?;
            print!("{}", rendered);
            Ok(())
        }
    }
}

// --- list ---

fn split_pair<'a>(raw: &'a str, flag: &str) -> Result<(&'a str, &'a str), GuardError> {
    raw.split_once('=')
        .map(|(field, value)| (field.trim(), value.trim()))
        .filter(|(field, _)| !field.is_empty())
        .ok_or_else(|| GuardError::InvalidArgument(format!("--{} expects FIELD=VALUE, got '{}'", flag, raw)))
}

/// Turns the list flags into a pipeline query. Unlike the pipeline itself,
/// the command line reports unknown fields instead of ignoring them.
pub fn build_query(args: &ListArgs, config: &Config) -> Result<ListQuery, GuardError> {
    let dataset = args.dataset;
    let mut criteria = Criteria::new();

    let flags = [
        (&args.filters, "filter", CriterionOp::Equals),
        (&args.minimums, "min", CriterionOp::AtLeast),
        (&args.below, "below", CriterionOp::Below),
        (&args.contains, "contains", CriterionOp::Contains),
    ];
    for (values, flag, op) in flags {
        for raw in values {
            let (field, value) = split_pair(raw, flag)?;
            criteria.set(field, dataset.criterion(field, op, value)?);
        }
    }

    let sort = match &args.sort {
        Some(field) => {
            let schema = dataset.field(field)?;
            if !schema.sortable {
                return Err(GuardError::InvalidArgument(format!(
                    "field '{}' of {} is not sortable",
                    field, dataset
                )));
            }
            Some(if args.desc {
                SortSpec::descending(field.as_str())
            } else {
                SortSpec::ascending(field.as_str())
            })
        }
        None => dataset.default_sort(),
    };

    Ok(ListQuery {
        criteria,
        search: args.search.clone().unwrap_or_default(),
        sort,
        page_size: args
            .page_size
            .unwrap_or_else(|| config.listing.page_size_for(dataset))
            .max(1),
        page: args.page,
    })
}

fn handle_list(args: &ListArgs, config: &Config) -> Result<()> {
    let query = build_query(args, config)?;
    debug!("List query for {}: {:?}", args.dataset, query);
    match args.dataset {
        Dataset::Tourists => print_page(args.dataset, &seed::tourists(Utc::now()), &query, args.json),
        Dataset::Zones => print_page(args.dataset, &seed::zones(), &query, args.json),
        Dataset::Incidents => print_page(args.dataset, &seed::incidents(), &query, args.json),
        Dataset::AuditLogs => print_page(args.dataset, &seed::audit_logs(), &query, args.json),
        Dataset::Users => print_page(args.dataset, &seed::operator_accounts(), &query, args.json),
    }
}

#[derive(Serialize)]
struct ListOutput<'a, R> {
    dataset: Dataset,
    #[serde(flatten)]
    view: ListView<'a, R>,
}

fn print_page<R: Record + Serialize>(dataset: Dataset, records: &[R], query: &ListQuery, json: bool) -> Result<()> {
    let view = run_pipeline(records, query);
    if json {
        let output = ListOutput { dataset, view };
        println!("{}", serde_json::to_string_pretty(&output).map_err(GuardError::from)?);
        return Ok(());
    }
    print!("{}", render_plain_table(R::schema(), &view.visible_records));
    println!(
        "Page {}/{} · {} matching of {}",
        view.current_page,
        view.page_count,
        view.total_filtered_count,
        records.len()
    );
    Ok(())
}

/// Space-aligned table of every declared field.
pub fn render_plain_table<R: Record>(schema: &[crate::listing::FieldSchema], rows: &[&R]) -> String {
    let cells: Vec<Vec<String>> = rows
        .iter()
        .map(|record| {
            schema
                .iter()
                .map(|f| record.field(f.name).map(|v| v.to_string()).unwrap_or_else(|| "-".to_string()))
                .collect()
        })
        .collect();

    let widths: Vec<usize> = schema
        .iter()
        .enumerate()
        .map(|(i, f)| {
            cells
                .iter()
                .map(|row| display_width(&row[i]))
                .chain(std::iter::once(display_width(f.label)))
                .max()
                .unwrap_or(0)
                .min(MAX_COLUMN_WIDTH)
        })
        .collect();

    let mut out = String::new();
    let header: Vec<String> = schema
        .iter()
        .zip(&widths)
        .map(|(f, w)| pad_to_width(f.label, *w))
        .collect();
    out.push_str(header.join("  ").trim_end());
    out.push('\n');
    for row in &cells {
        let line: Vec<String> = row.iter().zip(&widths).map(|(c, w)| pad_to_width(c, *w)).collect();
        out.push_str(line.join("  ").trim_end());
        out.push('\n');
    }
    out
}

fn handle_fields(dataset: Dataset) {
    println!("{:<18}{:<8}{:<8}{:<8}{:<8}", "FIELD", "KIND", "FILTER", "SEARCH", "SORT");
    let mark = |b: bool| if b { "yes" } else { "-" };
    for f in dataset.schema() {
        let kind = format!("{:?}", f.kind).to_lowercase();
        println!(
            "{:<18}{:<8}{:<8}{:<8}{:<8}",
            f.name,
            kind,
            mark(f.filterable),
            mark(f.searchable),
            mark(f.sortable)
        );
    }
}

// --- tasks ---

/// Drives a task to its terminal state, echoing each step to stderr. Ctrl-C
/// cancels the task instead of killing the process.
async fn follow<T: Clone + Send + Sync + 'static>(handle: TaskHandle<T>) -> TaskState<T> {
    let mut rx = handle.subscribe();
    let mut last_step = 0;
    loop {
        let state = rx.borrow_and_update().clone();
        if let Some(progress) = state.progress() {
            if progress.step != last_step {
                last_step = progress.step;
                eprintln!(
                    "[{}/{}] {} ({}%)",
                    progress.step, progress.total_steps, progress.label, progress.percent
                );
            }
        }
        if state.is_terminal() {
            return state;
        }
        tokio::select! {
            changed = rx.changed() => {
                if changed.is_err() {
                    return handle.wait().await;
                }
            }
            _ = tokio::signal::ctrl_c() => {
                info!("Interrupt received, cancelling '{}'", handle.name());
                handle.cancel();
            }
        }
    }
}

fn finish<T: Serialize>(state: TaskState<T>, json: bool, describe: impl FnOnce(&T) -> String) -> Result<()> {
    match state {
        TaskState::Succeeded(value) => {
            if json {
                println!("{}", serde_json::to_string_pretty(&value).map_err(GuardError::from)?);
            } else {
                println!("{}", describe(&value));
            }
            Ok(())
        }
        TaskState::Failed(message) => Err(anyhow::anyhow!(message)),
        TaskState::Cancelled => Err(anyhow::anyhow!("task cancelled")),
        TaskState::Pending(_) => Err(anyhow::anyhow!("task ended while still pending")),
    }
}

async fn handle_issue_id(tourist_id: u32, json: bool, config: &Config) -> Result<()> {
    let registry = seed::tourists(Utc::now());
    let tourist = registry
        .iter()
        .find(|t| t.id == tourist_id)
        .with_context(|| format!("No tourist with id {}", tourist_id))?;
    let handle = digital_id::spawn_issuance(IdentityRequest::from(tourist), config.tasks.step_delay());
    let state = follow(handle).await;
    finish(state, json, |id| {
        format!("Digital ID {} issued (hash {})", id.digital_id, id.blockchain_hash)
    })
}

async fn handle_efir(
    incident_id: String,
    template: EfirTemplate,
    priority: EfirPriority,
    json: bool,
    config: &Config,
) -> Result<()> {
    let handle = efir::spawn_generation(
        seed::incidents(),
        incident_id,
        template,
        priority,
        config.tasks.step_delay(),
    );
    let state = follow(handle).await;
    finish(state, json, |report| {
        format!(
            "{} filed for {} using the {}",
            report.efir_number,
            report.incident_id,
            report.template.label()
        )
    })
}

async fn handle_bulk(request: BulkActionRequest, json: bool, config: &Config) -> Result<()> {
    let handle = bulk_action::spawn_dispatch(request, seed::tourists(Utc::now()), config.tasks.step_delay())?;
    let state = follow(handle).await;
    finish(state, json, |receipt| {
        let mut lines = vec![format!(
            "{}: delivered to {} of {} recipients",
            receipt.kind.title(),
            receipt.delivered,
            receipt.recipients.len()
        )];
        for r in receipt.recipients.iter().filter(|r| !r.delivered) {
            lines.push(format!("  undelivered: tourist {} no longer registered", r.tourist_id));
        }
        lines.join("\n")
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Tourist;
    use crate::listing::{Criterion, FieldValue};

    fn args(dataset: Dataset) -> ListArgs {
        ListArgs {
            dataset,
            page: 1,
            ..ListArgs::default()
        }
    }

    #[test]
    fn cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn list_flags_parse_into_a_query() {
        let cli = Cli::try_parse_from([
            "touristguard",
            "list",
            "tourists",
            "--min",
            "safety_score=60",
            "--filter",
            "status=Active",
            "--sort",
            "name",
            "--desc",
            "--page-size",
            "2",
        ])
        .unwrap();
        let Some(Commands::List(list)) = cli.command else {
            panic!("expected the list command");
        };
        let query = build_query(&list, &Config::default()).unwrap();
        assert_eq!(query.criteria.get("safety_score"), Some(&Criterion::AtLeast(60.0)));
        assert_eq!(
            query.criteria.get("status"),
            Some(&Criterion::Equals(FieldValue::text("active")))
        );
        assert_eq!(query.sort, Some(SortSpec::descending("name")));
        assert_eq!(query.page_size, 2);
    }

    #[test]
    fn default_sort_applies_without_a_sort_flag() {
        let query = build_query(&args(Dataset::Tourists), &Config::default()).unwrap();
        assert_eq!(query.sort, Some(SortSpec::descending("last_check_in")));
        let query = build_query(&args(Dataset::Zones), &Config::default()).unwrap();
        assert_eq!(query.sort, None);
    }

    #[test]
    fn unknown_fields_are_reported() {
        let mut list = args(Dataset::Zones);
        list.minimums.push("altitude=3".to_string());
        assert!(matches!(
            build_query(&list, &Config::default()),
            Err(GuardError::UnknownField { .. })
        ));
    }

    #[test]
    fn malformed_pairs_and_numbers_are_rejected() {
        let mut list = args(Dataset::Tourists);
        list.below.push("safety_score".to_string());
        assert!(matches!(build_query(&list, &Config::default()), Err(GuardError::InvalidArgument(_))));

        let mut list = args(Dataset::Tourists);
        list.minimums.push("safety_score=high".to_string());
        assert!(matches!(build_query(&list, &Config::default()), Err(GuardError::InvalidArgument(_))));
    }

    #[test]
    fn non_filterable_fields_cannot_take_criteria() {
        let mut list = args(Dataset::Tourists);
        list.filters.push("document_number=US123456789".to_string());
        assert!(matches!(build_query(&list, &Config::default()), Err(GuardError::InvalidArgument(_))));

        let mut list = args(Dataset::Tourists);
        list.contains.push("name=raj".to_string());
        assert!(matches!(build_query(&list, &Config::default()), Err(GuardError::InvalidArgument(_))));
    }

    #[test]
    fn non_sortable_fields_cannot_be_sort_keys() {
        let mut list = args(Dataset::Tourists);
        list.sort = Some("document_type".to_string());
        assert!(matches!(build_query(&list, &Config::default()), Err(GuardError::InvalidArgument(_))));
    }

    #[test]
    fn plain_table_has_a_header_and_one_line_per_record() {
        let tourists = seed::tourists(Utc::now());
        let rows: Vec<&Tourist> = tourists.iter().take(2).collect();
        let table = render_plain_table(Tourist::schema(), &rows);
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("Digital ID"));
        assert!(lines[1].contains("Sarah Johnson"));
    }
}

use std::io::BufRead;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::builder::BoolishValueParser;
use clap::{ArgAction, ArgGroup, Args, Parser, Subcommand};
use tracing::{info, warn};

use coldcall_crm::config::AppConfig;
use coldcall_crm::file_writer::write_leads_to_file;
use coldcall_crm::logging::{init_logging, OperationTimer};
use coldcall_crm::store::open_store;
use coldcall_crm::transform::load_seed;
use coldcall_crm::utils::parse_day;
use coldcall_crm::validation::InputValidator;
use coldcall_crm::{Event, FilterState, LeadRepository, LeadService, LeadStatus, OutputFormat, SortKey, StartupPolicy};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Configuration file, read on top of the default locations
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Directory of the lead store
    #[arg(long, global = true)]
    store_dir: Option<String>,

    /// JSON file of raw records used when the store is empty
    #[arg(long, global = true)]
    seed: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(flatten)]
    Action(Action),
    /// Interactive session: one startup, many commands read from stdin
    Session,
}

/// Commands available both from the shell and inside a session
#[derive(Subcommand)]
enum Action {
    /// List leads matching the filters
    List {
        #[command(flatten)]
        filters: FilterArgs,
    },
    /// Show dashboard counters
    Stats,
    /// List the cities leads are in
    Cities,
    /// Show one lead
    Show {
        /// Lead id
        id: String,
    },
    /// Record a call outcome
    Status {
        /// Lead id
        id: String,
        /// NotCalled, NoAnswer, CallBack, Refused or MeetingSet
        status: LeadStatus,
    },
    /// Set the call-back day of a lead in CallBack
    #[command(group(ArgGroup::new("when").required(true).args(["date", "in_days", "clear"])))]
    Schedule {
        /// Lead id
        id: String,
        /// Call-back day (YYYY-MM-DD)
        #[arg(long)]
        date: Option<String>,
        /// Call back this many days from today (1, 3, 7, ...)
        #[arg(long)]
        in_days: Option<u64>,
        /// Remove the call-back day
        #[arg(long)]
        clear: bool,
    },
    /// Replace a lead's notes
    Note {
        /// Lead id
        id: String,
        /// Notes text
        #[arg(trailing_var_arg = true, num_args = 0..)]
        text: Vec<String>,
    },
    /// Export matching leads to a file
    Export {
        #[command(flatten)]
        filters: FilterArgs,

        /// Output format (txt, csv or json)
        #[arg(short, long)]
        format: Option<OutputFormat>,

        /// Output file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

/// One-off filter overrides
#[derive(Args, Clone)]
struct FilterArgs {
    /// Text matched against title or city
    #[arg(short, long)]
    search: Option<String>,

    /// Keep only these cities (repeatable)
    #[arg(short, long = "city")]
    cities: Vec<String>,

    /// Keep only this status
    #[arg(long)]
    status: Option<LeadStatus>,

    /// Keep only leads without a website
    #[arg(long)]
    without_website: bool,

    /// Sort key (reviews, score, city, status)
    #[arg(long)]
    sort: Option<SortKey>,
}

impl FilterArgs {
    fn apply_to(&self, base: &FilterState) -> FilterState {
        let mut filters = base.clone();
        if let Some(search) = &self.search {
            filters.search_query.clone_from(search);
        }
        if !self.cities.is_empty() {
            filters.selected_cities.clone_from(&self.cities);
        }
        if self.status.is_some() {
            filters.selected_status = self.status;
        }
        if self.without_website {
            filters.without_website = true;
        }
        if let Some(sort) = self.sort {
            filters.sort_by = sort;
        }
        filters
    }
}

/// A line typed in a session
#[derive(Parser)]
#[command(multicall = true)]
struct SessionLine {
    #[command(subcommand)]
    command: SessionCommand,
}

#[derive(Subcommand)]
enum SessionCommand {
    #[command(flatten)]
    Action(Action),
    /// Set the search text (empty clears it)
    Search {
        query: Vec<String>,
    },
    /// Select or deselect a city
    ToggleCity {
        #[arg(required = true)]
        city: Vec<String>,
    },
    /// Deselect every city
    ClearCities,
    /// Keep only one status (no argument shows all)
    FilterStatus {
        status: Option<LeadStatus>,
    },
    /// Keep only leads without a website (on/off)
    WithoutWebsite {
        #[arg(action = ArgAction::Set, value_parser = BoolishValueParser::new())]
        enabled: bool,
    },
    /// Change the sort key
    Sort {
        key: SortKey,
    },
    /// Leave the session
    #[command(alias = "exit")]
    Quit,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let mut config = AppConfig::load_from(cli.config.as_deref())?;
    if let Some(dir) = &cli.store_dir {
        config.storage.directory.clone_from(dir);
    }
    if let Some(seed) = &cli.seed {
        config.seed.path.clone_from(seed);
    }
    if let Some(level) = &cli.log_level {
        config.logging.level.clone_from(level);
    }
    config.validate()?;

    // Initialize logging
    let _log_guard = init_logging(
        Some(&config.get_log_level()),
        config.log_file().as_deref(),
        &config.logging.format,
    )?;

    info!("Starting coldcall");

    let store = open_store(&config.storage).context("Failed to open lead store")?;
    let repository = LeadRepository::new(store, config.storage.key.clone());
    let seed_path = config.seed_path();
    let mut service = LeadService::start(
        repository,
        || load_seed(&seed_path),
        StartupPolicy::from_reset_flag(config.session.reset_on_startup),
    )
    .context("Failed to start lead session")?;
    service.set_filters(FilterState {
        sort_by: config.sort_key()?,
        ..FilterState::default()
    });

    match cli.command {
        Commands::Action(action) => run_action(&mut service, &config, action)?,
        Commands::Session => run_session(&mut service, &config)?,
    }

    let metrics = service.metrics();
    info!(
        edits = metrics.lead_edits_total,
        writes = metrics.storage_writes_total,
        storage_failures = metrics.storage_failures_total,
        "Done"
    );
    Ok(())
}

/// Run one command against the current state
fn run_action(service: &mut LeadService, config: &AppConfig, action: Action) -> Result<()> {
    match action {
        Action::List { filters } => {
            let filters = filters.apply_to(&service.state().filters);
            let leads = coldcall_crm::view::filter_and_sort(&service.state().leads, &filters);
            render::lead_table(&leads);
        },
        Action::Stats => render::dashboard(&service.state().dashboard()),
        Action::Cities => render::cities(&service.state().cities()),
        Action::Show { id } => {
            InputValidator::validate_lead_id(&id)?;
            let lead = service
                .state()
                .lead(&id)
                .with_context(|| format!("Lead not found: {id}"))?;
            render::lead_card(lead);
        },
        Action::Status { id, status } => {
            service.dispatch(Event::ChangeStatus { id: id.clone(), status })?;
            render::updated(service, &id);
        },
        Action::Schedule {
            id,
            date,
            in_days,
            clear,
        } => {
            let event = match (date, in_days) {
                (Some(date), _) => Event::SetNextCallDate {
                    id: id.clone(),
                    day: Some(parse_day(&date)?),
                },
                (None, Some(days)) => Event::ScheduleIn { id: id.clone(), days },
                (None, None) => {
                    debug_assert!(clear);
                    Event::SetNextCallDate { id: id.clone(), day: None }
                },
            };
            service.dispatch(event)?;
            render::updated(service, &id);
        },
        Action::Note { id, text } => {
            service.dispatch(Event::SetNotes {
                id: id.clone(),
                notes: text.join(" "),
            })?;
            render::updated(service, &id);
        },
        Action::Export {
            filters,
            format,
            output,
        } => {
            let format = match format {
                Some(format) => format,
                None => config.export_format()?,
            };
            let output = output.unwrap_or_else(|| {
                Path::new(&config.export.output_directory).join(format!("leads.{}", format.extension()))
            });
            InputValidator::validate_file_path(&output)?;

            let timer = OperationTimer::new("export");
            let filters = filters.apply_to(&service.state().filters);
            let leads = coldcall_crm::view::filter_and_sort(&service.state().leads, &filters);
            write_leads_to_file(&leads, format, &output)
                .with_context(|| format!("Failed to export leads to {}", output.display()))?;
            let count = leads.len();
            service.metrics_mut().record_export(format, count);
            timer.finish();
            render::exported(count, &output);
        },
    }
    Ok(())
}

/// Read commands from stdin until `quit` or end of input
fn run_session(service: &mut LeadService, config: &AppConfig) -> Result<()> {
    render::dashboard(&service.state().dashboard());
    render::visible_count(service.state().visible().len());

    let stdin = std::io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        render::prompt()?;
        let Some(line) = lines.next() else { break };
        let line = line.context("Failed to read from stdin")?;
        let words: Vec<&str> = line.split_whitespace().collect();
        if words.is_empty() {
            continue;
        }

        let command = match SessionLine::try_parse_from(words.iter().copied()) {
            Ok(parsed) => parsed.command,
            Err(e) => {
                render::clap_error(&e);
                continue;
            },
        };

        let outcome = match command {
            SessionCommand::Quit => break,
            SessionCommand::Action(action) => run_action(service, config, action),
            SessionCommand::Search { query } => service.dispatch(Event::Search(query.join(" "))).map_err(Into::into),
            SessionCommand::ToggleCity { city } => service.dispatch(Event::ToggleCity(city.join(" "))).map_err(Into::into),
            SessionCommand::ClearCities => service.dispatch(Event::ClearCities).map_err(Into::into),
            SessionCommand::FilterStatus { status } => service.dispatch(Event::FilterStatus(status)).map_err(Into::into),
            SessionCommand::WithoutWebsite { enabled } => {
                service.dispatch(Event::WithoutWebsite(enabled)).map_err(Into::into)
            },
            SessionCommand::Sort { key } => service.dispatch(Event::SortBy(key)).map_err(Into::into),
        };

        match outcome {
            Ok(()) => render::visible_count(service.state().visible().len()),
            Err(e) => {
                warn!(error = %e, "Command failed");
                render::failure(&e);
            },
        }
    }

    render::dashboard(&service.state().dashboard());
    Ok(())
}

#[allow(clippy::print_stdout, clippy::print_stderr)]
mod render {
    use std::io::Write;
    use std::path::Path;

    use coldcall_crm::{DashboardStats, Lead, LeadService};

    pub(super) fn lead_table(leads: &[&Lead]) {
        for lead in leads {
            let score = lead.total_score.map_or_else(|| "-".to_string(), |s| format!("{s:.1}"));
            println!(
                "{:<40} {:<10} {:>5} {:>4}  {:<20} {}",
                lead.id,
                lead.status,
                lead.reviews_count,
                score,
                lead.city.as_deref().unwrap_or("-"),
                lead.display_title()
            );
        }
        visible_count(leads.len());
    }

    pub(super) fn lead_card(lead: &Lead) {
        println!("{} [{}]", lead.display_title(), lead.status);
        println!("  id: {}", lead.id);
        let place: Vec<&str> = [lead.city.as_deref(), lead.country_code.as_deref()]
            .into_iter()
            .flatten()
            .collect();
        if !place.is_empty() {
            println!("  {}", place.join(", "));
        }
        match lead.total_score {
            Some(score) => println!("  Rating: {score:.1} ({} reviews)", lead.reviews_count),
            None => println!("  No rating"),
        }
        if let Some(category) = &lead.category_name {
            println!("  Category: {category}");
        }
        if let Some(street) = &lead.street {
            println!("  Address: {street}");
        }
        if let (Some(phone), Some(uri)) = (&lead.phone, lead.dial_uri()) {
            println!("  Call {phone} ({uri})");
        }
        if let Some(website) = lead.website.as_deref().filter(|w| !w.is_empty()) {
            println!("  Website: {website}");
        }
        if let Some(link) = lead.maps_link() {
            println!("  Maps: {link}");
        }
        if let Some(day) = lead.next_call_date {
            println!("  Call back on: {day}");
        }
        if let Some(last) = lead.last_call_date {
            println!("  Last call: {}", last.format("%Y-%m-%d %H:%M UTC"));
        }
        if !lead.notes.is_empty() {
            println!("  Notes: {}", lead.notes);
        }
    }

    pub(super) fn updated(service: &LeadService, id: &str) {
        if let Some(lead) = service.state().lead(id) {
            lead_card(lead);
        }
    }

    pub(super) fn dashboard(stats: &DashboardStats) {
        println!(
            "Total: {}  Calls: {}  Contact rate: {}%  No answer: {}  Call-backs: {}  Meetings: {}",
            stats.total,
            stats.calls_made,
            stats.contact_rate,
            stats.no_answer_count,
            stats.reminders_count,
            stats.meetings_set_count
        );
    }

    pub(super) fn cities(cities: &[String]) {
        for city in cities {
            println!("{city}");
        }
    }

    pub(super) fn visible_count(count: usize) {
        let plural = if count > 1 { "s" } else { "" };
        println!("{count} lead{plural} found");
    }

    pub(super) fn exported(count: usize, path: &Path) {
        println!("Exported {count} leads to {}", path.display());
    }

    pub(super) fn prompt() -> std::io::Result<()> {
        let mut stdout = std::io::stdout();
        write!(stdout, "> ")?;
        stdout.flush()
    }

    pub(super) fn clap_error(error: &clap::Error) {
        eprintln!("{}", error.render());
    }

    pub(super) fn failure(error: &anyhow::Error) {
        eprintln!("Error: {error:#}");
    }
}

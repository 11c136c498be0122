use std::path::PathBuf;
use std::time::Duration as StdDuration;

use anyhow::{anyhow, Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};

use super::context::AppContext;
use super::render;
use crate::models::event::Event;
use crate::models::harptos::{self, HarptosDate};
use crate::models::settings::Settings;
use crate::services::scheduler::AdvanceScheduler;
use crate::services::settings::SettingsService;
use crate::utils::date::{parse_iso_date, today};

#[derive(Parser, Debug)]
#[command(
    name = "harptos",
    author,
    version,
    about = "Harptos Almanac: a private Forgotten Realms calendar",
    long_about = None
)]
pub struct Cli {
    /// Settings file (defaults to the platform config directory).
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Database file, overriding settings and HARPTOS_DB.
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    /// Enable debug logging.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Advance to today and show the current date with its events
    Today {
        /// Show the stored date without advancing it.
        #[arg(long)]
        no_advance: bool,
    },

    /// Apply the days elapsed since the last check
    Advance,

    /// Overwrite the current date
    #[command(after_help = "EXAMPLES:\n    harptos set-date 1492 4 31")]
    SetDate { year: i64, month: i64, day: i64 },

    /// Record an event
    #[command(
        after_help = "EXAMPLES:\n    harptos add --date \"3 Hammer 1492\" --title \"Left Baldur's Gate\"\n    harptos add --date 1492-4-31 --notes \"Greengrass fair\" --real-date 2025-03-14"
    )]
    Add {
        /// Harptos day (`1492-4-31`, `3 Hammer 1492`, `Greengrass 1492`).
        /// Defaults to the current date.
        #[arg(long)]
        date: Option<String>,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        notes: Option<String>,
        /// Real-world session date (YYYY-MM-DD).
        #[arg(long)]
        real_date: Option<String>,
    },

    /// List events for a day (the current date by default)
    List {
        #[arg(long)]
        date: Option<String>,
        /// List the whole month of the selected day.
        #[arg(long, conflicts_with = "all")]
        month: bool,
        /// List every event.
        #[arg(long)]
        all: bool,
        /// Include hidden events (with --all).
        #[arg(long, requires = "all")]
        hidden: bool,
    },

    /// Permanently delete an event
    Delete { id: i64 },

    /// Hide an event without deleting it
    Hide { id: i64 },

    /// Restore a hidden event
    Unhide { id: i64 },

    /// Search event titles and notes
    Search { query: String },

    /// Import a Session Notes file
    Import { file: PathBuf },

    /// Keep the calendar advancing on a timer until Ctrl-C
    Watch,

    /// Show the effective settings
    Config {
        /// Write the default settings file if none exists.
        #[arg(long)]
        init: bool,
    },
}

/// Settings for this invocation: file, then environment, then flags.
pub fn load_settings(cli: &Cli) -> Result<Settings> {
    let service = settings_service(cli);
    let mut settings = service.load()?;
    if let Some(db) = &cli.db {
        settings.database_path = Some(db.clone());
    }
    if cli.verbose {
        settings.log_level = "debug".to_string();
    }
    Ok(settings)
}

fn settings_service(cli: &Cli) -> SettingsService {
    match &cli.config {
        Some(path) => SettingsService::new(path),
        None => SettingsService::from_default_location(),
    }
}

pub fn run(cli: Cli, settings: Settings) -> Result<()> {
    if let Command::Config { init } = cli.command {
        return show_config(&cli, &settings, init);
    }

    let ctx = AppContext::open(settings)?;
    match cli.command {
        Command::Today { no_advance } => show_today(&ctx, no_advance),
        Command::Advance => advance(&ctx),
        Command::SetDate { year, month, day } => set_date(&ctx, year, month, day),
        Command::Add {
            date,
            title,
            notes,
            real_date,
        } => add_event(&ctx, date.as_deref(), title, notes, real_date.as_deref()),
        Command::List {
            date,
            month,
            all,
            hidden,
        } => list_events(&ctx, date.as_deref(), month, all, hidden),
        Command::Delete { id } => {
            ctx.event_service().delete(id)?;
            println!("Deleted event #{}", id);
            Ok(())
        }
        Command::Hide { id } => {
            ctx.event_service().set_hidden(id, true)?;
            println!("Hid event #{}", id);
            Ok(())
        }
        Command::Unhide { id } => {
            ctx.event_service().set_hidden(id, false)?;
            println!("Restored event #{}", id);
            Ok(())
        }
        Command::Search { query } => {
            let events = ctx.event_service().search(&query)?;
            println!("{}", render::event_list(&events, "No matching events."));
            Ok(())
        }
        Command::Import { file } => import_notes(&ctx, &file),
        Command::Watch => watch(&ctx),
        Command::Config { .. } => Ok(()),
    }
}

fn current_date(ctx: &AppContext) -> Result<HarptosDate> {
    Ok(ctx.advance_engine().current_date(ctx.default_date())?)
}

/// Resolve a `--date` argument, or the current date when absent.
fn selected_date(ctx: &AppContext, date: Option<&str>) -> Result<HarptosDate> {
    match date {
        Some(value) => value.parse(),
        None => current_date(ctx),
    }
}

fn show_today(ctx: &AppContext, no_advance: bool) -> Result<()> {
    let date = if no_advance {
        current_date(ctx)?
    } else {
        ctx.advance_engine()
            .advance(ctx.default_date(), today())?
            .current
    };

    println!("{}", render::date_header(date));
    let events = ctx.event_service().list(date.year, date.month, date.day)?;
    println!("{}", render::event_list(&events, "No events recorded for this day."));
    Ok(())
}

fn advance(ctx: &AppContext) -> Result<()> {
    let outcome = ctx.advance_engine().advance(ctx.default_date(), today())?;
    println!("{}", render::outcome_line(&outcome));
    Ok(())
}

fn set_date(ctx: &AppContext, year: i64, month: i64, day: i64) -> Result<()> {
    let date = ctx.advance_engine().set_date(year, month, day, today())?;
    println!("Current date set to {}", date);
    Ok(())
}

fn add_event(
    ctx: &AppContext,
    date: Option<&str>,
    title: Option<String>,
    notes: Option<String>,
    real_date: Option<&str>,
) -> Result<()> {
    let mut builder = match date {
        Some(value) => {
            let (year, month, day) = harptos::parse_components(value)
                .ok_or_else(|| anyhow!("Unrecognized Harptos date '{}'", value))?;
            Event::builder().on(year, month, day)
        }
        None => Event::builder().date(current_date(ctx)?),
    };
    if let Some(title) = title {
        builder = builder.title(title);
    }
    if let Some(notes) = notes {
        builder = builder.notes(notes);
    }
    if let Some(real_date) = real_date {
        builder = builder.real_world_date(parse_real_date(real_date)?);
    }

    let event = ctx.event_service().create(builder.build()?)?;
    println!("Added {}", render::event_line(&event));
    Ok(())
}

fn parse_real_date(value: &str) -> Result<NaiveDate> {
    parse_iso_date(value).ok_or_else(|| anyhow!("Real date must be YYYY-MM-DD, got '{}'", value))
}

fn list_events(
    ctx: &AppContext,
    date: Option<&str>,
    month: bool,
    all: bool,
    hidden: bool,
) -> Result<()> {
    let events = ctx.event_service();
    let listed = if all {
        events.list_all(hidden)?
    } else {
        let date = selected_date(ctx, date)?;
        if month {
            println!("{}, {} DR", date.month_name(), date.year);
            events.list_for_month(date.year, date.month)?
        } else {
            println!("{}", render::date_header(date));
            events.list(date.year, date.month, date.day)?
        }
    };

    println!("{}", render::event_list(&listed, "No events."));
    Ok(())
}

fn import_notes(ctx: &AppContext, file: &std::path::Path) -> Result<()> {
    let report = ctx.session_notes_service().import_file(file)?;

    println!(
        "Imported {} event(s) from {:?} ({} with clamped days)",
        report.imported.len(),
        file,
        report.clamped
    );
    for error in &report.errors {
        eprintln!("Skipped {}", error);
    }
    Ok(())
}

fn watch(ctx: &AppContext) -> Result<()> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to start scheduler runtime")?;

    let mut scheduler =
        AdvanceScheduler::new(ctx.default_date(), ctx.settings().advance_interval_minutes);
    log::info!(
        "Advancing calendar every {} minute(s); press Ctrl-C to stop",
        ctx.settings().advance_interval_minutes
    );

    runtime.block_on(async {
        loop {
            let result = scheduler.tick(ctx.database().connection());
            if let Some(outcome) = &result.outcome {
                if outcome.advanced() || outcome.initialized {
                    println!("{}", render::outcome_line(outcome));
                }
            }

            let wait = result
                .next_due_in
                .unwrap_or_else(|| StdDuration::from_secs(60));
            tokio::select! {
                _ = tokio::time::sleep(wait) => {}
                _ = tokio::signal::ctrl_c() => {
                    log::info!("Stopping advance scheduler");
                    break;
                }
            }
        }
    });

    Ok(())
}

fn show_config(cli: &Cli, settings: &Settings, init: bool) -> Result<()> {
    let service = settings_service(cli);
    if init {
        if service.path().exists() {
            println!("Settings file already exists at {:?}", service.path());
        } else {
            service.save(&Settings::default())?;
            println!("Wrote default settings to {:?}", service.path());
        }
    }

    println!("# settings file: {:?}", service.path());
    println!(
        "# database: {:?}",
        SettingsService::resolve_database_path(settings)
    );
    print!(
        "{}",
        toml::to_string_pretty(settings).context("Failed to serialize settings")?
    );
    Ok(())
}

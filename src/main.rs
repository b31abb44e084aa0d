use std::{
    io::{self, BufRead, Write},
    path::PathBuf,
};

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use monthcal::{
    config::Config,
    core::store::{AddOutcome, EventStore},
    types::{Day, MAX_EVENTS_PER_DAY},
    validate::{EventForm, validate_day},
};

#[derive(Parser)]
#[command(name = "monthcal")]
#[command(about = "Add, edit, and delete events on the days of a single month")]
struct Cli {
    /// Configuration file (defaults to <config dir>/monthcal/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Override the slot location from the configuration
    #[arg(long, global = true)]
    slot: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show stored events
    List {
        /// Only this day
        #[arg(short, long)]
        day: Option<Day>,
    },
    /// Add an event to a day
    Add {
        day: Day,

        #[arg(short, long)]
        name: String,

        /// Time as H:MM AM or H:MM PM
        #[arg(short, long)]
        time: String,

        /// Comma-separated email addresses
        #[arg(short, long)]
        invitees: String,
    },
    /// Edit an event; omitted fields keep their current value
    Edit {
        day: Day,
        index: usize,

        #[arg(short, long)]
        name: Option<String>,

        #[arg(short, long)]
        time: Option<String>,

        #[arg(short, long)]
        invitees: Option<String>,
    },
    /// Delete an event
    Delete {
        day: Day,
        index: usize,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let mut store = open_store(cli.config, cli.slot)?;

    match cli.command {
        Commands::List { day } => list(&store, day),
        Commands::Add {
            day,
            name,
            time,
            invitees,
        } => add(&mut store, day, EventForm { name, time, invitees }),
        Commands::Edit {
            day,
            index,
            name,
            time,
            invitees,
        } => edit(&mut store, day, index, name, time, invitees),
        Commands::Delete { day, index, yes } => delete(&mut store, day, index, yes),
    }
}

fn open_store(config: Option<PathBuf>, slot: Option<PathBuf>) -> Result<EventStore> {
    let config_path = match config {
        Some(path) => path,
        None => Config::default_path()?,
    };
    let config = Config::load(&config_path)?;
    let slot_path = match slot {
        Some(path) => path,
        None => config.slot_path()?,
    };
    let slot = config
        .open_slot(&slot_path)
        .with_context(|| format!("opening calendar slot at {}", slot_path.display()))?;
    Ok(EventStore::open(slot))
}

fn list(store: &EventStore, day: Option<Day>) -> Result<()> {
    let days: Vec<_> = match day {
        Some(day) => vec![(day, store.day(day))],
        None => store.days().collect(),
    };

    if days.iter().all(|(_, events)| events.is_empty()) {
        println!("No events.");
        return Ok(());
    }

    for (day, events) in days {
        if events.is_empty() {
            continue;
        }
        println!("Day {day}");
        for (index, event) in events.iter().enumerate() {
            println!(
                "  [{index}] {:>8}  {}  ({})  {}",
                event.time,
                event.name,
                event.invitees.join(", "),
                event.color
            );
        }
    }
    Ok(())
}

fn add(store: &mut EventStore, day: Day, form: EventForm) -> Result<()> {
    validate_day(day)?;
    if store.is_day_full(day) {
        bail!("Day {day} already has {MAX_EVENTS_PER_DAY} events. Delete one before adding another.");
    }

    match store.add_form(day, &form)? {
        AddOutcome::Added { index, .. } => {
            println!("Added \"{}\" to day {day} at index {index}.", form.name.trim());
        }
        AddOutcome::DayFull => bail!("Day {day} is full."),
    }
    warn_if_unsaved(store);
    Ok(())
}

fn edit(
    store: &mut EventStore,
    day: Day,
    index: usize,
    name: Option<String>,
    time: Option<String>,
    invitees: Option<String>,
) -> Result<()> {
    let current = store
        .get(day, index)
        .with_context(|| format!("no event at index {index} on day {day}"))?;
    let form = EventForm {
        name: name.unwrap_or_else(|| current.name.clone()),
        time: time.unwrap_or_else(|| current.time.clone()),
        invitees: invitees.unwrap_or_else(|| current.invitees.join(",")),
    };

    store.edit_form(day, index, &form)?;
    println!("Updated event {index} on day {day}.");
    warn_if_unsaved(store);
    Ok(())
}

fn delete(store: &mut EventStore, day: Day, index: usize, yes: bool) -> Result<()> {
    if store.get(day, index).is_none() {
        bail!("no event at index {index} on day {day}");
    }
    if !yes && !confirm("Are you sure you want to delete this event?")? {
        println!("Cancelled.");
        return Ok(());
    }

    let removed = store.delete_event(day, index)?;
    println!("Deleted \"{}\" from day {day}.", removed.name);
    warn_if_unsaved(store);
    Ok(())
}

fn confirm(message: &str) -> Result<bool> {
    print!("{message} [y/N] ");
    io::stdout().flush()?;
    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;
    Ok(matches!(answer.trim(), "y" | "Y" | "yes" | "Yes"))
}

fn warn_if_unsaved(store: &EventStore) {
    if !store.is_persisted() {
        eprintln!("warning: change kept for this session but could not be saved");
    }
}

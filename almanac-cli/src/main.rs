use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use almanac_core::{
    CompletionCue, KindId, ParameterValue, RenewPeriod, Task, TaskDataMigrator, TaskEvent,
    TaskManager, TaskOrdering, apply_renewal, builder_for, names,
};

mod state;

use state::Journal;

#[derive(Parser, Debug)]
#[command(name = "almanac", version, about = "Seasonal task journal CLI")]
struct Cli {
    /// Journal file (default: ~/.almanac/journal.json)
    #[arg(long, global = true)]
    file: Option<PathBuf>,

    /// Item/building/NPC tables as JSON (default: built-in sample data)
    #[arg(long, global = true)]
    data: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Add a task through the parameter protocol
    Add {
        /// basic | collect | craft | buy | sell | build | smith | gift
        kind: KindId,

        /// Display name for the journal entry
        #[arg(long)]
        name: String,

        /// Target item id (repeatable for kinds that take a list)
        #[arg(long)]
        item: Vec<String>,

        /// Target building type
        #[arg(long)]
        building: Option<String>,

        /// Target NPC name
        #[arg(long)]
        npc: Option<String>,

        /// Goal count
        #[arg(long)]
        count: Option<i32>,

        /// Minimum item quality
        #[arg(long)]
        quality: Option<i32>,

        /// Header color index
        #[arg(long)]
        color: Option<i32>,

        /// Owning player id (default: 0)
        #[arg(long, default_value_t = 0)]
        owner: i64,

        /// Renewal period: never | weekly | monthly | annually | custom
        #[arg(long)]
        renew: Option<String>,

        /// Interval in days for custom renewal
        #[arg(long, default_value_t = 1)]
        interval: i32,
    },

    /// Print the journal in display order
    List,

    /// Check a task off
    Complete { index: usize },

    /// Reopen a completed task
    Uncomplete { index: usize },

    /// Bring a dormant task back by hand
    Activate { index: usize },

    /// Shelve a task without deleting it
    Deactivate { index: usize },

    /// Remove a task from the journal
    Remove { index: usize },

    /// Add progress toward a task's goal count
    Bump {
        index: usize,

        #[arg(long, default_value_t = 1)]
        by: i32,
    },

    /// Feed a world event to every listening task
    Event {
        #[command(subcommand)]
        event: EventCommand,
    },

    /// Advance the calendar and run the renewal pass
    Day {
        /// Number of days to advance
        #[arg(long, default_value_t = 1)]
        count: u32,
    },

    /// Import tasks from a 1.0.x journal (JSON array of records)
    Migrate {
        path: PathBuf,

        /// Kind for records missing an ID field
        #[arg(long)]
        kind: Option<KindId>,
    },
}

#[derive(Subcommand, Debug)]
enum EventCommand {
    /// An item entered a player's inventory
    Collect {
        #[arg(long)]
        item: String,
        #[arg(long, default_value_t = 1)]
        count: i32,
        #[arg(long, default_value_t = 0)]
        quality: i32,
        #[arg(long)]
        category: Option<String>,
        #[arg(long, default_value_t = 0)]
        player: i64,
    },

    /// A player crafted an item
    Craft {
        #[arg(long)]
        item: String,
        #[arg(long, default_value_t = 1)]
        count: i32,
        #[arg(long, default_value_t = 0)]
        player: i64,
    },

    /// A player bought an item from a shop
    Buy {
        #[arg(long)]
        item: String,
        #[arg(long, default_value_t = 1)]
        count: i32,
        #[arg(long)]
        category: Option<String>,
        #[arg(long, default_value_t = 0)]
        player: i64,
    },

    /// A player shipped or sold an item
    Sell {
        #[arg(long)]
        item: String,
        #[arg(long, default_value_t = 1)]
        count: i32,
        #[arg(long)]
        category: Option<String>,
        #[arg(long, default_value_t = 0)]
        player: i64,
    },

    /// A player gave an NPC a gift
    Gift {
        #[arg(long)]
        npc: String,
        #[arg(long)]
        item: String,
        #[arg(long)]
        category: Option<String>,
        #[arg(long, default_value_t = 0)]
        player: i64,
    },

    /// A building finished construction
    Build {
        #[arg(long)]
        building: String,
        #[arg(long, default_value_t = 0)]
        player: i64,
    },
}

/// Announces completions on stdout; the engine itself never prints.
struct PrintingCue;

impl CompletionCue for PrintingCue {
    fn task_completed(&mut self, task: &Task) {
        println!("Task complete: {}", task.name);
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let path = match cli.file {
        Some(path) => path,
        None => state::journal_path()?,
    };
    let mut journal = state::read_journal(&path)?;

    match cli.command {
        Command::Add {
            kind,
            name,
            item,
            building,
            npc,
            count,
            quality,
            color,
            owner,
            renew,
            interval,
        } => {
            let data = state::read_game_data(cli.data.as_deref())?;
            let mut builder = builder_for(kind);

            if !item.is_empty() {
                let value = match kind {
                    // The smithing target is a single tool, not a list.
                    KindId::Smith => ParameterValue::Text(item[0].clone()),
                    _ => ParameterValue::List(item),
                };
                builder.set_value(names::ITEM, value)?;
            }
            if let Some(building) = building {
                builder.set_value(names::BUILDING, ParameterValue::Text(building))?;
            }
            if let Some(npc) = npc {
                builder.set_value(names::NPC, ParameterValue::Text(npc))?;
            }
            if let Some(count) = count {
                builder.set_value(names::COUNT, ParameterValue::Int(count))?;
            }
            if let Some(quality) = quality {
                builder.set_value(names::QUALITY, ParameterValue::Int(quality))?;
            }
            if let Some(color) = color {
                builder.set_color_index(color);
            }

            if !builder.is_ready(&data) {
                let failing: Vec<&str> = builder
                    .parameters()
                    .iter()
                    .filter(|d| !builder.is_valid(d, &data))
                    .map(|d| d.name)
                    .collect();
                bail!(
                    "invalid parameters for a {kind} task: {}",
                    failing.join(", ")
                );
            }
            let mut task = builder
                .create(&name, owner, &data)
                .context("task parameters did not produce a valid target")?;

            if let Some(renew) = renew {
                let period = parse_renew(&renew)?;
                apply_renewal(&mut task, period, journal.date, interval);
            }

            println!("Added [{}] {}", task.kind().id(), task.name);
            journal.tasks.push(task);
            state::write_journal(&path, &mut journal)?;
        }

        Command::List => {
            print_journal(&journal);
            for task in &mut journal.tasks {
                task.mark_as_viewed();
            }
            state::write_journal(&path, &mut journal)?;
        }

        Command::Complete { index } => {
            let task = task_at(&mut journal, index)?;
            task.mark_as_completed(&mut PrintingCue);
            state::write_journal(&path, &mut journal)?;
        }

        Command::Uncomplete { index } => {
            let task = task_at(&mut journal, index)?;
            task.set_complete(false);
            println!("Reopened: {}", task.name);
            state::write_journal(&path, &mut journal)?;
        }

        Command::Activate { index } => {
            let today = journal.date;
            let task = task_at(&mut journal, index)?;
            task.set_active(true, today);
            println!("Activated: {}", task.name);
            state::write_journal(&path, &mut journal)?;
        }

        Command::Deactivate { index } => {
            let today = journal.date;
            let task = task_at(&mut journal, index)?;
            task.set_active(false, today);
            println!("Deactivated: {}", task.name);
            state::write_journal(&path, &mut journal)?;
        }

        Command::Remove { index } => {
            if index == 0 || index > journal.tasks.len() {
                bail!("no task #{index} (journal has {})", journal.tasks.len());
            }
            let task = journal.tasks.remove(index - 1);
            println!("Removed: {}", task.name);
            state::write_journal(&path, &mut journal)?;
        }

        Command::Bump { index, by } => {
            let task = task_at(&mut journal, index)?;
            task.increment_count(by, true, &mut PrintingCue);
            println!("{}: {}/{}", task.name, task.count(), task.max_count);
            state::write_journal(&path, &mut journal)?;
        }

        Command::Event { event } => {
            let event = build_event(event);
            dispatch(&mut journal, &event);
            state::write_journal(&path, &mut journal)?;
        }

        Command::Day { count } => {
            for _ in 0..count {
                let date = journal.date.add_days(1);
                journal.date = date;
                dispatch(&mut journal, &TaskEvent::DayStarted { date });
            }
            println!("It is now {}", journal.date);
            state::write_journal(&path, &mut journal)?;
        }

        Command::Migrate { path: legacy, kind } => {
            let data = state::read_game_data(cli.data.as_deref())?;
            let text = std::fs::read_to_string(&legacy)
                .with_context(|| format!("read {}", legacy.display()))?;
            let records: serde_json::Value = serde_json::from_str(&text)
                .with_context(|| format!("parse {}", legacy.display()))?;
            let Some(records) = records.as_array() else {
                bail!("{} is not a JSON array of task records", legacy.display());
            };

            let migrator = TaskDataMigrator::new(&data);
            let mut migrated = 0;
            let mut skipped = 0;
            for (i, record) in records.iter().enumerate() {
                let record_kind = record
                    .get("ID")
                    .and_then(serde_json::Value::as_str)
                    .and_then(|s| s.parse().ok())
                    .or(kind);
                let Some(record_kind) = record_kind else {
                    bail!("record {i} has no ID field; pass --kind");
                };

                match migrator
                    .migrate_1_0(record, record_kind)
                    .with_context(|| format!("migrating record {i}"))?
                {
                    Some(task) => {
                        println!("Migrated [{}] {}", task.kind().id(), task.name);
                        journal.tasks.push(task);
                        migrated += 1;
                    }
                    None => {
                        println!("Skipped record {i}: target no longer resolves");
                        skipped += 1;
                    }
                }
            }

            println!("\n{migrated} migrated, {skipped} skipped");
            state::write_journal(&path, &mut journal)?;
        }
    }

    Ok(())
}

fn task_at(journal: &mut Journal, index: usize) -> Result<&mut Task> {
    let len = journal.tasks.len();
    if index == 0 || index > len {
        bail!("no task #{index} (journal has {len})");
    }
    Ok(&mut journal.tasks[index - 1])
}

fn parse_renew(s: &str) -> Result<RenewPeriod> {
    match s.to_lowercase().as_str() {
        "never" => Ok(RenewPeriod::Never),
        "weekly" => Ok(RenewPeriod::Weekly),
        "monthly" => Ok(RenewPeriod::Monthly),
        "annually" => Ok(RenewPeriod::Annually),
        "custom" => Ok(RenewPeriod::Custom),
        other => bail!("unknown renew period: {other}"),
    }
}

fn build_event(command: EventCommand) -> TaskEvent {
    match command {
        EventCommand::Collect {
            item,
            count,
            quality,
            category,
            player,
        } => TaskEvent::ItemCollected {
            player_id: player,
            item_id: item,
            category,
            count,
            quality,
        },
        EventCommand::Craft { item, count, player } => TaskEvent::ItemCrafted {
            player_id: player,
            item_id: item,
            count,
        },
        EventCommand::Buy {
            item,
            count,
            category,
            player,
        } => TaskEvent::ItemPurchased {
            player_id: player,
            item_id: item,
            category,
            count,
        },
        EventCommand::Sell {
            item,
            count,
            category,
            player,
        } => TaskEvent::ItemSold {
            player_id: player,
            item_id: item,
            category,
            count,
        },
        EventCommand::Gift {
            npc,
            item,
            category,
            player,
        } => TaskEvent::ItemGifted {
            player_id: player,
            npc_name: npc,
            item_id: item,
            category,
        },
        EventCommand::Build { building, player } => TaskEvent::BuildingConstructed {
            player_id: player,
            building_type: building,
        },
    }
}

/// Run one event through a throwaway manager, then put the tasks back in
/// their original journal order.
fn dispatch(journal: &mut Journal, event: &TaskEvent) {
    let mut manager = TaskManager::new();
    for task in journal.tasks.drain(..) {
        manager.add_task(task);
    }
    manager.dispatch(event, &mut PrintingCue);
    journal.tasks = manager.into_tasks();
}

fn print_journal(journal: &Journal) {
    println!("{}: {} task(s)\n", journal.date, journal.tasks.len());

    let ordering = TaskOrdering::new(journal.date);
    let mut entries: Vec<(usize, &Task)> = journal.tasks.iter().enumerate().collect();
    entries.sort_by(|(_, a), (_, b)| ordering.compare(a, b));

    for (i, task) in entries {
        let status = if !task.active() {
            'z'
        } else if task.complete() {
            'x'
        } else {
            ' '
        };
        let new = if task.has_been_viewed() { ' ' } else { '*' };

        let mut line = format!("{new}#{:<3} [{status}] [{}] {}", i + 1, task.kind().id(), task.name);
        if task.should_show_progress() {
            line.push_str(&format!("  ({}/{})", task.count(), task.max_count));
        }
        match task.renew_period {
            RenewPeriod::Never => {}
            period if !task.active() => {
                let days = task.days_remaining(journal.date);
                line.push_str(&format!("  [{period:?}: renews in {days} day(s)]"));
            }
            period => line.push_str(&format!("  [{period:?}]")),
        }
        println!("{line}");
    }
}

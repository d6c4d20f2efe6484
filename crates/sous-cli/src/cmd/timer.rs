use crate::output::{format_clock, print_json, print_table, timer_state};
use anyhow::Context;
use clap::Subcommand;
use sous_core::controller::SessionGuide;
use sous_core::ticker::{wait_tick, Ticker};
use sous_core::types::Phase;
use std::path::Path;
use std::time::Duration;

#[derive(Subcommand)]
pub enum TimerSubcommand {
    /// Add a running countdown timer to a session
    Add {
        slug: String,
        #[arg(value_parser = clap::value_parser!(u32).range(1..))]
        seconds: u32,
        /// Label (default: recipe title, plus step number while cooking)
        #[arg(long)]
        label: Option<String>,
    },
    /// List the session's timers
    List { slug: String },
    /// Pause or resume a timer (id may be a unique prefix)
    Toggle { slug: String, id: String },
    /// Restore a timer to its full duration, paused
    Reset { slug: String, id: String },
    /// Delete a timer
    Remove { slug: String, id: String },
    /// Tick all running timers live until none are left running
    Watch { slug: String },
}

pub fn run(root: &Path, subcmd: TimerSubcommand, json: bool) -> anyhow::Result<()> {
    match subcmd {
        TimerSubcommand::Add {
            slug,
            seconds,
            label,
        } => add(root, &slug, seconds, label, json),
        TimerSubcommand::List { slug } => list(root, &slug, json),
        TimerSubcommand::Toggle { slug, id } => toggle(root, &slug, &id, json),
        TimerSubcommand::Reset { slug, id } => reset(root, &slug, &id, json),
        TimerSubcommand::Remove { slug, id } => remove(root, &slug, &id),
        TimerSubcommand::Watch { slug } => watch(root, &slug),
    }
}

fn default_label(guide: &SessionGuide) -> String {
    let session = guide.session();
    match session.phase {
        Phase::Cooking => format!(
            "{} — step {}",
            guide.recipe().title,
            session.current_step + 1
        ),
        Phase::Prep | Phase::Done => guide.recipe().title.clone(),
    }
}

fn add(
    root: &Path,
    slug: &str,
    seconds: u32,
    label: Option<String>,
    json: bool,
) -> anyhow::Result<()> {
    let mut guide = crate::cmd::open_guide(root, slug)?;
    let label = label.unwrap_or_else(|| default_label(&guide));
    let id = guide.add_timer(seconds, label.clone());

    if json {
        let timer = guide.timers().iter().find(|t| t.id == id);
        return print_json(&timer);
    }
    println!(
        "Timer {} started: {} ({})",
        &id.simple().to_string()[..8],
        label,
        format_clock(seconds)
    );
    println!("Watch it: sous timer watch {slug}");
    Ok(())
}

fn list(root: &Path, slug: &str, json: bool) -> anyhow::Result<()> {
    let guide = crate::cmd::open_guide(root, slug)?;

    if json {
        return print_json(&guide.timers());
    }

    if guide.timers().is_empty() {
        println!("No timers. Add one with: sous timer add {slug} <seconds>");
        return Ok(());
    }

    let rows: Vec<Vec<String>> = guide
        .timers()
        .iter()
        .map(|t| {
            vec![
                t.id.simple().to_string()[..8].to_string(),
                t.label.clone(),
                format_clock(t.remaining_seconds),
                format_clock(t.total_seconds),
                timer_state(t).to_string(),
            ]
        })
        .collect();
    print_table(&["ID", "LABEL", "REMAINING", "TOTAL", "STATE"], rows);
    Ok(())
}

fn toggle(root: &Path, slug: &str, id: &str, json: bool) -> anyhow::Result<()> {
    let mut guide = crate::cmd::open_guide(root, slug)?;
    let id = guide.resolve_timer(id)?;
    guide.toggle_timer(id).context("failed to toggle timer")?;

    if json {
        return print_json(&guide.timers().iter().find(|t| t.id == id));
    }
    let t = guide
        .timers()
        .iter()
        .find(|t| t.id == id)
        .expect("timer just toggled");
    let state = if t.running {
        "running"
    } else if t.is_finished() {
        "done (finished timers stay stopped)"
    } else {
        "paused"
    };
    println!("{}: {state}", t.label);
    Ok(())
}

fn reset(root: &Path, slug: &str, id: &str, json: bool) -> anyhow::Result<()> {
    let mut guide = crate::cmd::open_guide(root, slug)?;
    let id = guide.resolve_timer(id)?;
    guide.reset_timer(id).context("failed to reset timer")?;

    if json {
        return print_json(&guide.timers().iter().find(|t| t.id == id));
    }
    let t = guide
        .timers()
        .iter()
        .find(|t| t.id == id)
        .expect("timer just reset");
    println!("{}: reset to {}, paused", t.label, format_clock(t.total_seconds));
    Ok(())
}

fn remove(root: &Path, slug: &str, id: &str) -> anyhow::Result<()> {
    let mut guide = crate::cmd::open_guide(root, slug)?;
    let id = guide.resolve_timer(id)?;
    guide.remove_timer(id).context("failed to remove timer")?;
    println!("Timer removed.");
    Ok(())
}

/// Live countdown loop. The shared ticker runs only while at least one
/// timer is running; it is stopped (not leaked) both when the running
/// count reaches zero and when the loop is torn down early.
fn watch(root: &Path, slug: &str) -> anyhow::Result<()> {
    let mut guide = crate::cmd::open_guide(root, slug)?;

    if guide.running_timers() == 0 {
        println!("No running timers. Add one with: sous timer add {slug} <seconds>");
        return Ok(());
    }

    let (ticker, ticks) = Ticker::start(Duration::from_secs(1));
    while guide.running_timers() > 0 {
        if wait_tick(&ticks, Duration::from_secs(5)).is_none() {
            break;
        }
        let completed = guide.tick();

        for t in guide.timers().iter().filter(|t| t.running) {
            println!(
                "  {}  {}  {}",
                &t.id.simple().to_string()[..8],
                format_clock(t.remaining_seconds),
                t.label
            );
        }
        for id in completed {
            if let Some(t) = guide.timers().iter().find(|t| t.id == id) {
                println!("  ** {} is done **", t.label);
            }
        }
    }
    ticker.stop();

    println!("All timers stopped.");
    Ok(())
}

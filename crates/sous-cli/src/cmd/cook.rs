use crate::output::{format_clock, print_json, timer_state};
use anyhow::Context;
use clap::Subcommand;
use sous_core::controller::SessionGuide;
use sous_core::types::{Phase, StepOutcome};
use std::path::Path;

#[derive(Subcommand)]
pub enum CookSubcommand {
    /// Start (or resume) a cooking session for a recipe
    Start { slug: String },
    /// Show the session: phase, checklist, current step, timers
    Status { slug: String },
    /// Toggle an ingredient line on the mise-en-place checklist
    Check { slug: String, ingredient: String },
    /// Ready to cook: move from prep to the step-by-step walkthrough
    Begin { slug: String },
    /// Advance to the next step (finishes the session on the last step)
    Next { slug: String },
    /// Go back one step
    Back { slug: String },
    /// Cook this recipe again from a clean slate
    Again { slug: String },
    /// Abandon the session and clear its stored state
    Exit { slug: String },
}

pub fn run(root: &Path, subcmd: CookSubcommand, json: bool) -> anyhow::Result<()> {
    match subcmd {
        CookSubcommand::Start { slug } => start(root, &slug, json),
        CookSubcommand::Status { slug } => status(root, &slug, json),
        CookSubcommand::Check { slug, ingredient } => check(root, &slug, &ingredient, json),
        CookSubcommand::Begin { slug } => begin(root, &slug, json),
        CookSubcommand::Next { slug } => next(root, &slug, json),
        CookSubcommand::Back { slug } => back(root, &slug, json),
        CookSubcommand::Again { slug } => again(root, &slug, json),
        CookSubcommand::Exit { slug } => exit(root, &slug),
    }
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

fn print_status(guide: &SessionGuide, json: bool) -> anyhow::Result<()> {
    let session = guide.session();
    let recipe = guide.recipe();

    if json {
        return print_json(&serde_json::json!({
            "recipe": session.recipe,
            "title": recipe.title,
            "phase": session.phase.to_string(),
            "checked_ingredients": session.checked_ingredients,
            "current_step": session.current_step,
            "total_steps": recipe.total_steps(),
            "timers": session.timers,
        }));
    }

    println!("Cooking: {} — {}", session.recipe, recipe.title);
    println!("Phase:   {}", session.phase);

    match session.phase {
        Phase::Prep => {
            let list = guide.checklist();
            let checked = list.iter().filter(|(_, c)| *c).count();
            println!("\nMise en place ({checked}/{} gathered):", list.len());
            for (line, done) in &list {
                println!("  [{}] {line}", if *done { "x" } else { " " });
            }
            if !recipe.equipment.is_empty() {
                println!("\nEquipment:");
                for item in &recipe.equipment {
                    println!("  - {item}");
                }
            }
            println!("\nWhen ready: sous cook begin {}", session.recipe);
        }
        Phase::Cooking => print_current_step(guide),
        Phase::Done => {
            println!("\nAll steps complete. Enjoy!");
            println!("Cook again: sous cook again {}", session.recipe);
        }
    }

    if !guide.timers().is_empty() {
        println!("\nTimers:");
        for t in guide.timers() {
            println!(
                "  {}  {}  {} / {}  [{}]",
                &t.id.simple().to_string()[..8],
                t.label,
                format_clock(t.remaining_seconds),
                format_clock(t.total_seconds),
                timer_state(t),
            );
        }
    }

    Ok(())
}

fn print_current_step(guide: &SessionGuide) {
    let session = guide.session();
    let total = guide.recipe().total_steps();
    let Some(step) = guide.current_step() else {
        return;
    };

    println!("\nStep {}/{total}: {}", session.current_step + 1, step.instruction);
    if let Some(minutes) = step.duration_minutes {
        println!(
            "  ~{minutes} min — timer: sous timer add {} {}",
            session.recipe,
            minutes * 60
        );
    }
    if let Some(ref tip) = step.tip {
        println!("  Tip: {tip}");
    }
}

// ---------------------------------------------------------------------------
// Verbs
// ---------------------------------------------------------------------------

fn start(root: &Path, slug: &str, json: bool) -> anyhow::Result<()> {
    let guide = crate::cmd::open_guide(root, slug)?;
    if !json {
        match guide.session().phase {
            Phase::Prep => println!("Starting a session for '{slug}'.\n"),
            Phase::Cooking | Phase::Done => println!("Resuming your session for '{slug}'.\n"),
        }
    }
    print_status(&guide, json)
}

fn status(root: &Path, slug: &str, json: bool) -> anyhow::Result<()> {
    let guide = crate::cmd::open_guide(root, slug)?;
    print_status(&guide, json)
}

fn check(root: &Path, slug: &str, ingredient: &str, json: bool) -> anyhow::Result<()> {
    let mut guide = crate::cmd::open_guide(root, slug)?;
    let known = guide.recipe().ingredients.iter().any(|i| i == ingredient);
    guide.toggle_ingredient(ingredient);

    if json {
        return print_status(&guide, true);
    }
    let state = if guide.session().is_checked(ingredient) {
        "gathered"
    } else {
        "unchecked"
    };
    println!("{ingredient}: {state}");
    if !known {
        println!("(note: not an ingredient line of this recipe)");
    }
    Ok(())
}

fn begin(root: &Path, slug: &str, json: bool) -> anyhow::Result<()> {
    let mut guide = crate::cmd::open_guide(root, slug)?;
    guide
        .begin_cooking()
        .with_context(|| format!("cannot begin cooking '{slug}'"))?;

    if json {
        return print_status(&guide, true);
    }
    println!("Let's cook.");
    print_current_step(&guide);
    Ok(())
}

fn next(root: &Path, slug: &str, json: bool) -> anyhow::Result<()> {
    let mut guide = crate::cmd::open_guide(root, slug)?;
    let outcome = guide
        .next_step()
        .with_context(|| format!("cannot advance '{slug}'"))?;

    if json {
        return print_status(&guide, true);
    }
    match outcome {
        StepOutcome::Moved(_) => print_current_step(&guide),
        StepOutcome::Finished => {
            println!("That was the last step — you're done. Enjoy!");
            println!("Cook again: sous cook again {slug}");
        }
        StepOutcome::AtBoundary => {}
    }
    Ok(())
}

fn back(root: &Path, slug: &str, json: bool) -> anyhow::Result<()> {
    let mut guide = crate::cmd::open_guide(root, slug)?;
    let outcome = guide
        .prev_step()
        .with_context(|| format!("cannot go back in '{slug}'"))?;

    if json {
        return print_status(&guide, true);
    }
    match outcome {
        StepOutcome::Moved(_) => print_current_step(&guide),
        StepOutcome::AtBoundary => {
            println!("Already on the first step.");
            print_current_step(&guide);
        }
        StepOutcome::Finished => {}
    }
    Ok(())
}

fn again(root: &Path, slug: &str, json: bool) -> anyhow::Result<()> {
    let mut guide = crate::cmd::open_guide(root, slug)?;
    guide
        .cook_again()
        .with_context(|| format!("cannot restart '{slug}'"))?;

    if json {
        return print_status(&guide, true);
    }
    println!("Fresh start for '{slug}'.\n");
    print_status(&guide, false)
}

fn exit(root: &Path, slug: &str) -> anyhow::Result<()> {
    let guide = crate::cmd::open_guide(root, slug)?;
    guide.abandon();
    println!("Session for '{slug}' cleared.");
    Ok(())
}

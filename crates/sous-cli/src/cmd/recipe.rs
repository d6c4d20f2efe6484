use crate::output::{print_json, print_table};
use anyhow::Context;
use clap::Subcommand;
use serde::Deserialize;
use sous_core::recipe::{Recipe, RecipeStep};
use std::path::{Path, PathBuf};

#[derive(Subcommand)]
pub enum RecipeSubcommand {
    /// Import a recipe from a YAML file
    Add {
        file: PathBuf,
        /// Override the slug (default: from the file, or derived from the title)
        #[arg(long)]
        slug: Option<String>,
    },
    /// List all recipes
    List,
    /// Show a recipe
    Show { slug: String },
    /// Remove a recipe
    Remove { slug: String },
}

pub fn run(root: &Path, subcmd: RecipeSubcommand, json: bool) -> anyhow::Result<()> {
    crate::cmd::require_kitchen(root)?;
    match subcmd {
        RecipeSubcommand::Add { file, slug } => add(root, &file, slug, json),
        RecipeSubcommand::List => list(root, json),
        RecipeSubcommand::Show { slug } => show(root, &slug, json),
        RecipeSubcommand::Remove { slug } => remove(root, &slug),
    }
}

// ---------------------------------------------------------------------------
// Import format
// ---------------------------------------------------------------------------

/// The shape of a recipe YAML file handed to `sous recipe add`. Timestamps
/// and the library copy are sous's concern, not the author's.
#[derive(Debug, Deserialize)]
struct RecipeImport {
    #[serde(default)]
    slug: Option<String>,
    title: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    ingredients: Vec<String>,
    #[serde(default)]
    equipment: Vec<String>,
    #[serde(default)]
    steps: Vec<RecipeStep>,
}

fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut last_dash = true;
    for c in title.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
            last_dash = false;
        } else if !last_dash {
            slug.push('-');
            last_dash = true;
        }
    }
    slug.trim_end_matches('-').to_string()
}

fn add(root: &Path, file: &Path, slug: Option<String>, json: bool) -> anyhow::Result<()> {
    let data = std::fs::read_to_string(file)
        .with_context(|| format!("failed to read {}", file.display()))?;
    let import: RecipeImport = serde_yaml::from_str(&data)
        .with_context(|| format!("failed to parse {}", file.display()))?;

    let slug = slug
        .or(import.slug)
        .unwrap_or_else(|| slugify(&import.title));

    let mut recipe = Recipe::new(slug, import.title);
    recipe.description = import.description;
    recipe.ingredients = import.ingredients;
    recipe.equipment = import.equipment;
    recipe.steps = import.steps;

    let recipe = Recipe::create(root, recipe)
        .with_context(|| format!("failed to add recipe from {}", file.display()))?;

    if json {
        print_json(&recipe)?;
    } else {
        println!(
            "Added recipe: {} — {} ({} steps)",
            recipe.slug,
            recipe.title,
            recipe.total_steps()
        );
        println!("Next: sous cook start {}", recipe.slug);
    }
    Ok(())
}

fn list(root: &Path, json: bool) -> anyhow::Result<()> {
    let recipes = Recipe::list(root).context("failed to list recipes")?;

    if json {
        let summaries: Vec<_> = recipes
            .iter()
            .map(|r| {
                serde_json::json!({
                    "slug": r.slug,
                    "title": r.title,
                    "steps": r.total_steps(),
                    "ingredients": r.ingredients.len(),
                })
            })
            .collect();
        print_json(&summaries)?;
        return Ok(());
    }

    if recipes.is_empty() {
        println!("No recipes yet. Import one with: sous recipe add <file.yaml>");
        return Ok(());
    }

    let rows: Vec<Vec<String>> = recipes
        .iter()
        .map(|r| {
            vec![
                r.slug.clone(),
                r.total_steps().to_string(),
                r.title.clone(),
            ]
        })
        .collect();
    print_table(&["SLUG", "STEPS", "TITLE"], rows);
    Ok(())
}

fn show(root: &Path, slug: &str, json: bool) -> anyhow::Result<()> {
    let recipe = Recipe::load(root, slug).with_context(|| format!("recipe '{slug}' not found"))?;

    if json {
        print_json(&recipe)?;
        return Ok(());
    }

    println!("Recipe: {} — {}", recipe.slug, recipe.title);
    if let Some(ref desc) = recipe.description {
        println!("Desc:   {desc}");
    }

    if !recipe.ingredients.is_empty() {
        println!("\nIngredients:");
        for line in &recipe.ingredients {
            println!("  - {line}");
        }
    }

    if !recipe.equipment.is_empty() {
        println!("\nEquipment:");
        for item in &recipe.equipment {
            println!("  - {item}");
        }
    }

    println!("\nSteps:");
    for (i, step) in recipe.steps.iter().enumerate() {
        let duration = step
            .duration_minutes
            .map(|m| format!(" (~{m} min)"))
            .unwrap_or_default();
        println!("  {}. {}{duration}", i + 1, step.instruction);
        if let Some(ref tip) = step.tip {
            println!("     Tip: {tip}");
        }
    }

    Ok(())
}

fn remove(root: &Path, slug: &str) -> anyhow::Result<()> {
    Recipe::remove(root, slug).with_context(|| format!("recipe '{slug}' not found"))?;
    println!("Removed recipe: {slug}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slugify_titles() {
        assert_eq!(slugify("Beef Bourguignon"), "beef-bourguignon");
        assert_eq!(slugify("Pho (Quick!)"), "pho-quick");
        assert_eq!(slugify("  Toast  "), "toast");
    }
}

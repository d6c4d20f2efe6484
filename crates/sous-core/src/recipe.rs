use crate::error::{Result, SousError};
use crate::paths;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;

// ---------------------------------------------------------------------------
// RecipeStep
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecipeStep {
    pub instruction: String,
    /// Suggested duration for this step; used to pre-fill a timer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_minutes: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tip: Option<String>,
}

// ---------------------------------------------------------------------------
// Recipe
// ---------------------------------------------------------------------------

/// A recipe manifest: free-text ingredient lines, an equipment list, and an
/// ordered step list. The session core reads these as-is — no normalization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recipe {
    pub slug: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub ingredients: Vec<String>,
    #[serde(default)]
    pub equipment: Vec<String>,
    #[serde(default)]
    pub steps: Vec<RecipeStep>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Recipe {
    pub fn new(slug: impl Into<String>, title: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            slug: slug.into(),
            title: title.into(),
            description: None,
            ingredients: Vec::new(),
            equipment: Vec::new(),
            steps: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    // ---------------------------------------------------------------------------
    // Persistence
    // ---------------------------------------------------------------------------

    /// Persist a new recipe, rejecting duplicates and invalid slugs.
    pub fn create(root: &Path, recipe: Recipe) -> Result<Recipe> {
        paths::validate_slug(&recipe.slug)?;

        let manifest = paths::recipe_manifest(root, &recipe.slug);
        if manifest.exists() {
            return Err(SousError::RecipeExists(recipe.slug));
        }

        recipe.save(root)?;
        Ok(recipe)
    }

    pub fn load(root: &Path, slug: &str) -> Result<Self> {
        let manifest = paths::recipe_manifest(root, slug);
        if !manifest.exists() {
            return Err(SousError::RecipeNotFound(slug.to_string()));
        }
        let data = std::fs::read_to_string(&manifest)?;
        let recipe: Recipe = serde_yaml::from_str(&data)?;
        Ok(recipe)
    }

    pub fn save(&self, root: &Path) -> Result<()> {
        let manifest = paths::recipe_manifest(root, &self.slug);
        let data = serde_yaml::to_string(self)?;
        crate::io::atomic_write(&manifest, data.as_bytes())
    }

    pub fn remove(root: &Path, slug: &str) -> Result<()> {
        let manifest = paths::recipe_manifest(root, slug);
        if !manifest.exists() {
            return Err(SousError::RecipeNotFound(slug.to_string()));
        }
        std::fs::remove_file(&manifest)?;
        Ok(())
    }

    pub fn list(root: &Path) -> Result<Vec<Self>> {
        let dir = paths::recipes_dir(root);
        if !dir.exists() {
            return Ok(Vec::new());
        }

        let mut recipes = Vec::new();
        for entry in std::fs::read_dir(&dir)? {
            let entry = entry?;
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("yaml") {
                continue;
            }
            let data = std::fs::read_to_string(&path)?;
            match serde_yaml::from_str::<Recipe>(&data) {
                Ok(r) => recipes.push(r),
                // A malformed manifest shouldn't hide the rest of the library
                Err(e) => tracing::warn!("skipping unparseable recipe {}: {e}", path.display()),
            }
        }
        recipes.sort_by(|a, b| a.slug.cmp(&b.slug));
        Ok(recipes)
    }

    // ---------------------------------------------------------------------------
    // Helpers
    // ---------------------------------------------------------------------------

    pub fn total_steps(&self) -> usize {
        self.steps.len()
    }

    pub fn step(&self, index: usize) -> Option<&RecipeStep> {
        self.steps.get(index)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn sample(slug: &str) -> Recipe {
        let mut r = Recipe::new(slug, "Shakshuka");
        r.ingredients = vec![
            "6 eggs".to_string(),
            "1 can crushed tomatoes".to_string(),
            "salt".to_string(),
        ];
        r.equipment = vec!["cast-iron skillet".to_string()];
        r.steps = vec![
            RecipeStep {
                instruction: "Sauté onion and pepper".to_string(),
                duration_minutes: Some(5),
                tip: None,
            },
            RecipeStep {
                instruction: "Simmer tomatoes".to_string(),
                duration_minutes: Some(10),
                tip: Some("Season generously".to_string()),
            },
            RecipeStep {
                instruction: "Crack eggs and cover".to_string(),
                duration_minutes: Some(7),
                tip: None,
            },
        ];
        r
    }

    #[test]
    fn recipe_create_load() {
        let dir = TempDir::new().unwrap();
        let recipe = Recipe::create(dir.path(), sample("shakshuka")).unwrap();
        assert_eq!(recipe.total_steps(), 3);

        let loaded = Recipe::load(dir.path(), "shakshuka").unwrap();
        assert_eq!(loaded.title, "Shakshuka");
        assert_eq!(loaded.ingredients.len(), 3);
        assert_eq!(loaded.steps[1].tip.as_deref(), Some("Season generously"));
    }

    #[test]
    fn recipe_create_duplicate_fails() {
        let dir = TempDir::new().unwrap();
        Recipe::create(dir.path(), sample("pho")).unwrap();
        assert!(matches!(
            Recipe::create(dir.path(), sample("pho")),
            Err(SousError::RecipeExists(_))
        ));
    }

    #[test]
    fn recipe_invalid_slug_rejected() {
        let dir = TempDir::new().unwrap();
        assert!(Recipe::create(dir.path(), sample("Not A Slug")).is_err());
    }

    #[test]
    fn recipe_list_sorted_by_slug() {
        let dir = TempDir::new().unwrap();
        Recipe::create(dir.path(), sample("pho")).unwrap();
        Recipe::create(dir.path(), sample("carbonara")).unwrap();

        let all = Recipe::list(dir.path()).unwrap();
        let slugs: Vec<_> = all.iter().map(|r| r.slug.as_str()).collect();
        assert_eq!(slugs, vec!["carbonara", "pho"]);
    }

    #[test]
    fn recipe_list_skips_unparseable() {
        let dir = TempDir::new().unwrap();
        Recipe::create(dir.path(), sample("pho")).unwrap();
        std::fs::write(
            dir.path().join(".sous/recipes/broken.yaml"),
            "slug: [unterminated",
        )
        .unwrap();

        let all = Recipe::list(dir.path()).unwrap();
        assert_eq!(all.len(), 1);
    }

    #[test]
    fn recipe_remove() {
        let dir = TempDir::new().unwrap();
        Recipe::create(dir.path(), sample("pho")).unwrap();
        Recipe::remove(dir.path(), "pho").unwrap();
        assert!(Recipe::load(dir.path(), "pho").is_err());
    }
}

use crate::error::{HatchError, Result};
use crate::paths;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;

// ---------------------------------------------------------------------------
// IdeaMilestone
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdeaMilestone {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
}

// ---------------------------------------------------------------------------
// Idea
// ---------------------------------------------------------------------------

/// A community idea. The conversion wizard reads ideas and never writes them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Idea {
    pub slug: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    /// Member id of the person championing the idea.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub champion: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub milestones: Vec<IdeaMilestone>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Idea {
    pub fn new(slug: impl Into<String>, title: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            slug: slug.into(),
            title: title.into(),
            description: String::new(),
            tags: Vec::new(),
            champion: None,
            milestones: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    // -----------------------------------------------------------------------
    // Persistence
    // -----------------------------------------------------------------------

    pub fn create(
        root: &Path,
        slug: impl Into<String>,
        title: impl Into<String>,
        description: impl Into<String>,
    ) -> Result<Self> {
        let slug = slug.into();
        paths::validate_slug(&slug)?;

        let dir = paths::idea_dir(root, &slug);
        if dir.exists() {
            return Err(HatchError::IdeaExists(slug));
        }

        let mut idea = Self::new(slug, title);
        idea.description = description.into();
        idea.save(root)?;
        Ok(idea)
    }

    pub fn load(root: &Path, slug: &str) -> Result<Self> {
        paths::validate_slug(slug)?;
        let manifest = paths::idea_manifest(root, slug);
        if !manifest.exists() {
            return Err(HatchError::IdeaNotFound(slug.to_string()));
        }
        let data = std::fs::read_to_string(&manifest)?;
        let idea: Idea = serde_yaml::from_str(&data)?;
        Ok(idea)
    }

    pub fn save(&self, root: &Path) -> Result<()> {
        let manifest = paths::idea_manifest(root, &self.slug);
        let data = serde_yaml::to_string(self)?;
        crate::io::atomic_write(&manifest, data.as_bytes())
    }

    pub fn list(root: &Path) -> Result<Vec<Self>> {
        let ideas_dir = root.join(paths::IDEAS_DIR);
        if !ideas_dir.exists() {
            return Ok(Vec::new());
        }

        let mut ideas = Vec::new();
        for entry in std::fs::read_dir(&ideas_dir)? {
            let entry = entry?;
            if entry.file_type()?.is_dir() {
                let slug = entry.file_name().to_string_lossy().into_owned();
                match Self::load(root, &slug) {
                    Ok(i) => ideas.push(i),
                    Err(HatchError::IdeaNotFound(_)) | Err(HatchError::InvalidSlug(_)) => {}
                    Err(e) => return Err(e),
                }
            }
        }
        ideas.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(ideas)
    }

    // -----------------------------------------------------------------------
    // Mutations (idea editing pages, never the wizard)
    // -----------------------------------------------------------------------

    /// Add a tag. Returns `false` if already present.
    pub fn add_tag(&mut self, tag: impl Into<String>) -> bool {
        let tag = tag.into();
        if self.tags.contains(&tag) {
            return false;
        }
        self.tags.push(tag);
        self.updated_at = Utc::now();
        true
    }

    pub fn add_milestone(&mut self, title: impl Into<String>, date: Option<NaiveDate>) {
        self.milestones.push(IdeaMilestone {
            title: title.into(),
            date,
        });
        self.updated_at = Utc::now();
    }

    pub fn set_champion(&mut self, member_id: Option<String>) {
        self.champion = member_id;
        self.updated_at = Utc::now();
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

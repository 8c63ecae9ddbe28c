use crate::error::{HatchError, Result};
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

// ---------------------------------------------------------------------------
// Directory constants
// ---------------------------------------------------------------------------

pub const HATCH_DIR: &str = ".hatch";
pub const IDEAS_DIR: &str = ".hatch/ideas";
pub const PROJECTS_DIR: &str = ".hatch/projects";

pub const CONFIG_FILE: &str = ".hatch/config.yaml";
pub const MANIFEST_FILE: &str = "manifest.yaml";

// ---------------------------------------------------------------------------
// Path helpers
// ---------------------------------------------------------------------------

pub fn hatch_dir(root: &Path) -> PathBuf {
    root.join(HATCH_DIR)
}

pub fn config_path(root: &Path) -> PathBuf {
    root.join(CONFIG_FILE)
}

pub fn idea_dir(root: &Path, slug: &str) -> PathBuf {
    root.join(IDEAS_DIR).join(slug)
}

pub fn idea_manifest(root: &Path, slug: &str) -> PathBuf {
    idea_dir(root, slug).join(MANIFEST_FILE)
}

pub fn project_dir(root: &Path, id: &str) -> PathBuf {
    root.join(PROJECTS_DIR).join(id)
}

pub fn project_manifest(root: &Path, id: &str) -> PathBuf {
    project_dir(root, id).join(MANIFEST_FILE)
}

// ---------------------------------------------------------------------------
// Slug validation
// ---------------------------------------------------------------------------

const MAX_SLUG_LEN: usize = 64;

static SLUG_RE: OnceLock<Regex> = OnceLock::new();

fn slug_re() -> &'static Regex {
    SLUG_RE.get_or_init(|| Regex::new(r"^[a-z0-9][a-z0-9\-]*[a-z0-9]$|^[a-z0-9]$").unwrap())
}

pub fn validate_slug(slug: &str) -> Result<()> {
    if slug.is_empty() || slug.len() > MAX_SLUG_LEN || !slug_re().is_match(slug) {
        return Err(HatchError::InvalidSlug(slug.to_string()));
    }
    Ok(())
}

/// Derive a slug from free text: lowercase ASCII alphanumerics, every other
/// run of characters collapsed into a single hyphen, trimmed to the slug limit.
/// Returns an empty string when the text has no usable characters.
pub fn slugify(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut pending_dash = false;
    for c in text.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_dash && !out.is_empty() {
                out.push('-');
            }
            pending_dash = false;
            out.push(c.to_ascii_lowercase());
        } else {
            pending_dash = true;
        }
    }
    if out.len() > MAX_SLUG_LEN {
        out.truncate(MAX_SLUG_LEN);
        while out.ends_with('-') {
            out.pop();
        }
    }
    out
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_slugs() {
        for slug in ["community-garden", "a", "idea-123", "x1"] {
            validate_slug(slug).unwrap_or_else(|_| panic!("expected valid: {slug}"));
        }
    }

    #[test]
    fn invalid_slugs() {
        for slug in [
            "",
            "-starts-with-dash",
            "ends-with-dash-",
            "has spaces",
            "UPPER",
            "a_b",
        ] {
            assert!(validate_slug(slug).is_err(), "expected invalid: {slug}");
        }
    }

    #[test]
    fn slugify_collapses_separators() {
        assert_eq!(slugify("X Revamped"), "x-revamped");
        assert_eq!(slugify("  Hello,   World!  "), "hello-world");
        assert_eq!(slugify("Café 2.0"), "caf-2-0");
        assert_eq!(slugify("!!!"), "");
    }

    #[test]
    fn slugify_output_is_a_valid_slug() {
        let long = "word ".repeat(40);
        let slug = slugify(&long);
        assert!(slug.len() <= 64);
        validate_slug(&slug).unwrap();
    }

    #[test]
    fn path_helpers() {
        let root = Path::new("/tmp/platform");
        assert_eq!(
            config_path(root),
            PathBuf::from("/tmp/platform/.hatch/config.yaml")
        );
        assert_eq!(
            idea_manifest(root, "garden"),
            PathBuf::from("/tmp/platform/.hatch/ideas/garden/manifest.yaml")
        );
        assert_eq!(
            project_manifest(root, "garden"),
            PathBuf::from("/tmp/platform/.hatch/projects/garden/manifest.yaml")
        );
    }
}

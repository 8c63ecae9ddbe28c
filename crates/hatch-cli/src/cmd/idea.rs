use crate::output::{print_json, print_table};
use anyhow::Context;
use clap::Subcommand;
use hatch_core::{config::Config, idea::Idea, project::Project, script::parse_date};
use std::path::Path;

#[derive(Subcommand)]
pub enum IdeaSubcommand {
    /// Create a new idea
    Create {
        slug: String,
        /// Idea title
        #[arg(long)]
        title: String,
        /// What the idea is about
        #[arg(long, default_value = "")]
        description: String,
        /// Tags (repeatable: --tag garden --tag outdoors)
        #[arg(long = "tag")]
        tags: Vec<String>,
        /// Member id of the champion
        #[arg(long)]
        champion: Option<String>,
    },
    /// List all ideas
    List,
    /// Show idea details
    Show { slug: String },
    /// Add a tag to an idea
    Tag { slug: String, tag: String },
    /// Append a milestone to an idea
    Milestone {
        slug: String,
        title: String,
        /// Target date (YYYY-MM-DD)
        #[arg(long)]
        date: Option<String>,
    },
    /// Set or clear the champion of an idea
    Champion {
        slug: String,
        /// Member id (omit to clear)
        member: Option<String>,
    },
}

pub fn run(root: &Path, subcmd: IdeaSubcommand, json: bool) -> anyhow::Result<()> {
    match subcmd {
        IdeaSubcommand::Create {
            slug,
            title,
            description,
            tags,
            champion,
        } => create(root, &slug, &title, &description, tags, champion, json),
        IdeaSubcommand::List => list(root, json),
        IdeaSubcommand::Show { slug } => show(root, &slug, json),
        IdeaSubcommand::Tag { slug, tag: tag_name } => tag(root, &slug, &tag_name, json),
        IdeaSubcommand::Milestone { slug, title, date } => {
            milestone(root, &slug, &title, date.as_deref(), json)
        }
        IdeaSubcommand::Champion { slug, member } => champion(root, &slug, member, json),
    }
}

fn create(
    root: &Path,
    slug: &str,
    title: &str,
    description: &str,
    tags: Vec<String>,
    champion: Option<String>,
    json: bool,
) -> anyhow::Result<()> {
    Config::load(root).context("failed to load config")?;
    let mut idea = Idea::create(root, slug, title, description)
        .with_context(|| format!("failed to create idea '{slug}'"))?;

    if !tags.is_empty() || champion.is_some() {
        for t in tags {
            idea.add_tag(t);
        }
        idea.set_champion(champion);
        idea.save(root).context("failed to save idea")?;
    }

    if json {
        print_json(&idea)?;
    } else {
        println!("Created idea '{slug}'.");
    }
    Ok(())
}

fn list(root: &Path, json: bool) -> anyhow::Result<()> {
    let ideas = Idea::list(root).context("failed to list ideas")?;
    let projects = Project::list(root).context("failed to list projects")?;
    let converted = |slug: &str| projects.iter().filter(|p| p.source_idea == slug).count();

    if json {
        let items: Vec<serde_json::Value> = ideas
            .iter()
            .map(|i| {
                serde_json::json!({
                    "slug": i.slug,
                    "title": i.title,
                    "tags": i.tags,
                    "champion": i.champion,
                    "projects": converted(&i.slug),
                })
            })
            .collect();
        print_json(&items)?;
        return Ok(());
    }

    if ideas.is_empty() {
        println!("No ideas.");
        return Ok(());
    }

    let rows: Vec<Vec<String>> = ideas
        .iter()
        .map(|i| {
            vec![
                i.slug.clone(),
                i.title.clone(),
                i.champion.clone().unwrap_or_else(|| "-".to_string()),
                converted(&i.slug).to_string(),
            ]
        })
        .collect();
    print_table(&["SLUG", "TITLE", "CHAMPION", "PROJECTS"], rows);
    Ok(())
}

fn show(root: &Path, slug: &str, json: bool) -> anyhow::Result<()> {
    let idea = Idea::load(root, slug).with_context(|| format!("idea '{slug}' not found"))?;
    let projects = Project::from_idea(root, slug).context("failed to list projects")?;

    if json {
        print_json(&serde_json::json!({
            "idea": idea,
            "projects": projects.iter().map(|p| &p.id).collect::<Vec<_>>(),
        }))?;
        return Ok(());
    }

    println!("Idea:        {} - {}", idea.slug, idea.title);
    println!("Description: {}", idea.description);
    if !idea.tags.is_empty() {
        println!("Tags:        {}", idea.tags.join(", "));
    }
    if let Some(c) = &idea.champion {
        println!("Champion:    {c}");
    }
    println!("Milestones:  {}", idea.milestones.len());
    for m in &idea.milestones {
        match m.date {
            Some(d) => println!("  {} ({d})", m.title),
            None => println!("  {}", m.title),
        }
    }
    if !projects.is_empty() {
        println!("Projects:");
        for p in &projects {
            println!("  {}", p.id);
        }
    }
    Ok(())
}

fn tag(root: &Path, slug: &str, tag: &str, json: bool) -> anyhow::Result<()> {
    let mut idea = Idea::load(root, slug).with_context(|| format!("idea '{slug}' not found"))?;
    let added = idea.add_tag(tag);
    if added {
        idea.save(root).context("failed to save idea")?;
    }

    if json {
        print_json(&serde_json::json!({ "slug": slug, "tag": tag, "added": added }))?;
    } else if added {
        println!("Tagged '{slug}' with '{tag}'.");
    } else {
        println!("'{slug}' already has tag '{tag}'.");
    }
    Ok(())
}

fn milestone(
    root: &Path,
    slug: &str,
    title: &str,
    date: Option<&str>,
    json: bool,
) -> anyhow::Result<()> {
    let date = date.map(parse_date).transpose()?;
    let mut idea = Idea::load(root, slug).with_context(|| format!("idea '{slug}' not found"))?;
    idea.add_milestone(title, date);
    idea.save(root).context("failed to save idea")?;

    if json {
        print_json(&serde_json::json!({ "slug": slug, "milestones": idea.milestones }))?;
    } else {
        println!("Added milestone '{title}' to '{slug}'.");
    }
    Ok(())
}

fn champion(root: &Path, slug: &str, member: Option<String>, json: bool) -> anyhow::Result<()> {
    let mut idea = Idea::load(root, slug).with_context(|| format!("idea '{slug}' not found"))?;
    idea.set_champion(member.clone());
    idea.save(root).context("failed to save idea")?;

    if json {
        print_json(&serde_json::json!({ "slug": slug, "champion": member }))?;
    } else {
        match member {
            Some(m) => println!("Champion of '{slug}' is now '{m}'."),
            None => println!("Cleared champion of '{slug}'."),
        }
    }
    Ok(())
}

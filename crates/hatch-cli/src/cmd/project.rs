use crate::output::{print_json, print_table};
use anyhow::Context;
use clap::Subcommand;
use hatch_core::{config::Config, project::Project};
use std::path::Path;

#[derive(Subcommand)]
pub enum ProjectSubcommand {
    /// List all projects
    List,
    /// Show project details
    Show { id: String },
}

pub fn run(root: &Path, subcmd: ProjectSubcommand, json: bool) -> anyhow::Result<()> {
    match subcmd {
        ProjectSubcommand::List => list(root, json),
        ProjectSubcommand::Show { id } => show(root, &id, json),
    }
}

fn list(root: &Path, json: bool) -> anyhow::Result<()> {
    let projects = Project::list(root).context("failed to list projects")?;

    if json {
        let items: Vec<serde_json::Value> = projects
            .iter()
            .map(|p| {
                serde_json::json!({
                    "id": p.id,
                    "name": p.name,
                    "source_idea": p.source_idea,
                    "board_template": p.workspace.board_template,
                    "created_at": p.created_at,
                })
            })
            .collect();
        print_json(&items)?;
        return Ok(());
    }

    if projects.is_empty() {
        println!("No projects.");
        return Ok(());
    }

    let rows: Vec<Vec<String>> = projects
        .iter()
        .map(|p| {
            vec![
                p.id.clone(),
                p.name.clone(),
                p.source_idea.clone(),
                p.assigned_roles().count().to_string(),
            ]
        })
        .collect();
    print_table(&["ID", "NAME", "FROM IDEA", "ROLES"], rows);
    Ok(())
}

fn show(root: &Path, id: &str, json: bool) -> anyhow::Result<()> {
    let project = Project::load(root, id).with_context(|| format!("project '{id}' not found"))?;

    if json {
        print_json(&project)?;
        return Ok(());
    }

    // Without a readable config, raw member ids are shown.
    let config = Config::load(root).ok();
    let name_of = |user: &str| {
        config
            .as_ref()
            .and_then(|c| c.member(user))
            .map(|m| m.display_name.clone())
            .unwrap_or_else(|| user.to_string())
    };

    println!("Project:     {} - {}", project.id, project.name);
    println!("Description: {}", project.description);
    println!("From idea:   {}", project.source_idea);
    println!(
        "Board:       {} ({})",
        project.workspace.board_template,
        project.workspace.board_columns.join(" | ")
    );
    let spaces: Vec<&str> = project.workspace.enabled.iter().map(|t| t.as_str()).collect();
    println!("Spaces:      {}", spaces.join(", "));
    println!("Roles:");
    for slot in &project.roles {
        let who = slot
            .user_id
            .as_deref()
            .map(name_of)
            .unwrap_or_else(|| "unassigned".to_string());
        println!("  {:<12} {}", slot.role, who);
    }
    if !project.milestones.is_empty() {
        println!("Milestones:");
        for m in &project.milestones {
            match m.date {
                Some(d) => println!("  {} ({d})", m.title),
                None => println!("  {}", m.title),
            }
        }
    }
    Ok(())
}

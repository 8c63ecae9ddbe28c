use anyhow::Context;
use hatch_core::{config::Config, io, paths};
use std::path::Path;

pub fn run(root: &Path, name: Option<&str>, json: bool) -> anyhow::Result<()> {
    let platform_name = name.map(str::to_string).unwrap_or_else(|| {
        root.file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "platform".to_string())
    });

    for dir in [paths::HATCH_DIR, paths::IDEAS_DIR, paths::PROJECTS_DIR] {
        let p = root.join(dir);
        io::ensure_dir(&p).with_context(|| format!("failed to create {}", p.display()))?;
    }

    let created = if paths::config_path(root).exists() {
        false
    } else {
        Config::new(&platform_name)
            .save(root)
            .context("failed to write config.yaml")?;
        true
    };

    if json {
        crate::output::print_json(&serde_json::json!({
            "root": root,
            "config_created": created,
        }))?;
    } else {
        println!("Initialized hatch in: {}", root.display());
        if created {
            println!("  created: {}", paths::CONFIG_FILE);
        } else {
            println!("  exists:  {}", paths::CONFIG_FILE);
        }
    }
    Ok(())
}

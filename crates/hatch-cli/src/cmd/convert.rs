use crate::output::print_json_line;
use anyhow::{bail, Context};
use hatch_core::{
    config::Config,
    idea::Idea,
    present::{CompletionView, StepView, WizardView},
    project::Project,
    script::{self, Outcome, HELP},
    FsCommitService, HatchError, ProjectId, WizardController, WizardEvent,
};
use std::io::{BufRead, IsTerminal, Write};
use std::path::Path;

pub fn run(root: &Path, idea_slug: &str, json: bool) -> anyhow::Result<()> {
    let config = Config::load(root).context("failed to load config")?;
    for w in config.validate() {
        tracing::warn!(level = ?w.level, "{}", w.message);
    }
    let idea =
        Idea::load(root, idea_slug).with_context(|| format!("idea '{idea_slug}' not found"))?;

    let service = FsCommitService::new(root);
    let mut wizard = WizardController::start(idea, &config);
    let interactive = std::io::stdin().is_terminal();

    show(&wizard, json)?;

    let stdin = std::io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        if interactive {
            eprint!("[{}] > ", wizard.step());
            std::io::stderr().flush().ok();
        }
        let Some(line) = lines.next() else { break };
        let line = line.context("failed to read wizard command")?;

        let cmd = match script::parse(&line) {
            Ok(Some(cmd)) => cmd,
            Ok(None) => continue,
            Err(e) => {
                report(&e, json)?;
                continue;
            }
        };

        let result = script::execute(&mut wizard, cmd, &service);
        emit_events(root, &mut wizard, json)?;

        match result {
            Ok(Outcome::Show) => show(&wizard, json)?,
            Ok(Outcome::Help) if !json => println!("{HELP}"),
            Ok(Outcome::SubmitIgnored) if !json => println!("A submit is already in progress."),
            Ok(_) => {}
            // Surfaced through the event stream already.
            Err(HatchError::Validation { .. }) | Err(HatchError::Commit(_)) => {}
            Err(e) => report(&e, json)?,
        }

        if wizard.is_closed() {
            break;
        }
    }

    if !wizard.is_closed() {
        wizard.cancel().context("failed to discard draft")?;
        emit_events(root, &mut wizard, json)?;
        bail!("input ended before the wizard finished; draft discarded");
    }

    if wizard.state().terminal_result.is_some() {
        let id = wizard.acknowledge()?;
        tracing::debug!(project = %id, "conversion acknowledged");
    }
    Ok(())
}

fn show(wizard: &WizardController, json: bool) -> anyhow::Result<()> {
    if json {
        return print_json_line(&WizardView::of(wizard));
    }
    let step = wizard.step();
    let state = wizard.state();
    println!(
        "Step {}/{}: {}",
        state.current_step_index + 1,
        state.step_count,
        step.title()
    );
    let view = StepView::for_step(wizard, step)?;
    print!("{}", view.render());
    if let Some(issue) = wizard.current_step_issue()? {
        println!("  ! {issue}");
    }
    Ok(())
}

fn emit_events(root: &Path, wizard: &mut WizardController, json: bool) -> anyhow::Result<()> {
    let events = wizard.take_events();
    for event in &events {
        if json {
            print_json_line(event)?;
            if let WizardEvent::Committed { project_id } = event {
                print_json_line(&completion(root, project_id))?;
            }
            continue;
        }
        match event {
            WizardEvent::StepChanged { .. } => show(wizard, json)?,
            WizardEvent::ValidationFailed { step, reason, .. } => {
                println!("Cannot leave {step}: {reason}");
            }
            WizardEvent::SubmitStarted { attempt } => {
                println!("Creating project (attempt {attempt})...");
            }
            WizardEvent::CommitFailed { error } => {
                println!("Project was not created: {error}");
                println!("Your draft is unchanged; fix it and submit again.");
            }
            WizardEvent::Committed { project_id } => {
                print!("{}", completion(root, project_id).render());
            }
            WizardEvent::Cancelled => println!("Conversion cancelled; nothing was created."),
        }
    }
    Ok(())
}

fn completion(root: &Path, id: &ProjectId) -> CompletionView {
    match Project::load(root, id.as_str()) {
        Ok(project) => CompletionView::new(&project),
        Err(e) => {
            tracing::warn!(project = %id, error = %e, "committed project could not be reloaded");
            CompletionView::from_id(id)
        }
    }
}

fn report(e: &HatchError, json: bool) -> anyhow::Result<()> {
    if json {
        print_json_line(&serde_json::json!({ "error": e.to_string() }))
    } else {
        eprintln!("error: {e}");
        Ok(())
    }
}

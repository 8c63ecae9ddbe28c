//! Line-oriented wizard commands, as typed at the `hatch convert` prompt.

use crate::commit::{CommitService, ProjectId};
use crate::error::{HatchError, Result};
use crate::staging::StagingPatch;
use crate::types::{BoardTemplate, WorkspaceToggle};
use crate::wizard::{Step, WizardController};
use chrono::NaiveDate;

pub const HELP: &str = "\
commands:
  next | back                      move between steps
  set name <text>                  rename the project
  set description <text>           describe the project
  milestone add <title> [date]     append a milestone (date: YYYY-MM-DD)
  milestone remove <index>         drop a milestone
  assign <role> <user>             assign a member to a role
  unassign <role>                  clear a role
  template <kanban|scrum|simple>   choose the board template
  toggle <name> on|off             enable or disable a workspace space
  include on|off                   import the idea's content
  show                             print the current step
  submit                           create the project (last step only)
  cancel                           discard the draft and quit
  help                             this text";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WizardCommand {
    Next,
    Back,
    Patch(StagingPatch),
    AddMilestone {
        title: String,
        date: Option<NaiveDate>,
    },
    RemoveMilestone(usize),
    Assign {
        role: String,
        user: String,
    },
    Unassign(String),
    Show,
    Submit,
    Cancel,
    Help,
}

fn invalid(msg: impl Into<String>) -> HatchError {
    HatchError::InvalidCommand(msg.into())
}

fn parse_switch(word: Option<&str>) -> Result<bool> {
    match word {
        Some("on") | Some("true") | Some("yes") => Ok(true),
        Some("off") | Some("false") | Some("no") => Ok(false),
        Some(other) => Err(invalid(format!("expected on|off, got '{other}'"))),
        None => Err(invalid("expected on|off")),
    }
}

pub fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|_| HatchError::InvalidDate(s.to_string()))
}

/// Parse one input line. Blank lines and `#` comments yield `None`.
pub fn parse(line: &str) -> Result<Option<WizardCommand>> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }

    let (head, rest) = match line.split_once(char::is_whitespace) {
        Some((h, r)) => (h, r.trim()),
        None => (line, ""),
    };

    let cmd = match head {
        "next" | "advance" => WizardCommand::Next,
        "back" | "retreat" => WizardCommand::Back,
        "show" => WizardCommand::Show,
        "submit" => WizardCommand::Submit,
        "cancel" => WizardCommand::Cancel,
        "help" | "?" => WizardCommand::Help,
        "set" => {
            let (field, value) = rest.split_once(char::is_whitespace).unwrap_or((rest, ""));
            let value = value.trim().to_string();
            match field {
                "name" => WizardCommand::Patch(StagingPatch::name(value)),
                "description" => WizardCommand::Patch(StagingPatch::description(value)),
                "" => return Err(invalid("usage: set name|description <text>")),
                other => return Err(invalid(format!("cannot set '{other}'"))),
            }
        }
        "milestone" => {
            let (action, args) = rest.split_once(char::is_whitespace).unwrap_or((rest, ""));
            let args = args.trim();
            match action {
                "add" => parse_milestone_add(args)?,
                "remove" => {
                    let index = args
                        .parse::<usize>()
                        .map_err(|_| invalid(format!("expected a milestone index, got '{args}'")))?;
                    WizardCommand::RemoveMilestone(index)
                }
                _ => return Err(invalid("usage: milestone add|remove ...")),
            }
        }
        "assign" => {
            let mut words = rest.split_whitespace();
            match (words.next(), words.next(), words.next()) {
                (Some(role), Some(user), None) => WizardCommand::Assign {
                    role: role.to_string(),
                    user: user.to_string(),
                },
                _ => return Err(invalid("usage: assign <role> <user>")),
            }
        }
        "unassign" => {
            if rest.is_empty() || rest.contains(char::is_whitespace) {
                return Err(invalid("usage: unassign <role>"));
            }
            WizardCommand::Unassign(rest.to_string())
        }
        "template" => {
            let template: BoardTemplate = rest.parse()?;
            WizardCommand::Patch(StagingPatch {
                board_template: Some(template),
                ..StagingPatch::default()
            })
        }
        "toggle" => {
            let mut words = rest.split_whitespace();
            let toggle: WorkspaceToggle = words
                .next()
                .ok_or_else(|| invalid("usage: toggle <name> on|off"))?
                .parse()?;
            let on = parse_switch(words.next())?;
            WizardCommand::Patch(StagingPatch::toggle(toggle, on))
        }
        "include" => WizardCommand::Patch(StagingPatch {
            include_source_content: Some(parse_switch(rest.split_whitespace().next())?),
            ..StagingPatch::default()
        }),
        other => return Err(invalid(format!("unknown command '{other}' (try 'help')"))),
    };
    Ok(Some(cmd))
}

fn parse_milestone_add(args: &str) -> Result<WizardCommand> {
    if args.is_empty() {
        return Err(invalid("usage: milestone add <title> [YYYY-MM-DD]"));
    }
    // A trailing token that parses as a date is the milestone date.
    if let Some((title, last)) = args.rsplit_once(char::is_whitespace) {
        if let Ok(date) = parse_date(last) {
            return Ok(WizardCommand::AddMilestone {
                title: title.trim().to_string(),
                date: Some(date),
            });
        }
    }
    Ok(WizardCommand::AddMilestone {
        title: args.to_string(),
        date: None,
    })
}

// ---------------------------------------------------------------------------
// Execution
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The draft or cursor changed (or nothing did); keep reading commands.
    Continue,
    /// Now on this step.
    Moved(Step),
    Show,
    Help,
    /// A submit was already in flight and this one was ignored.
    SubmitIgnored,
    Committed(ProjectId),
    Cancelled,
}

/// Run one command against the wizard.
pub fn execute<S: CommitService + ?Sized>(
    wizard: &mut WizardController,
    cmd: WizardCommand,
    service: &S,
) -> Result<Outcome> {
    match cmd {
        WizardCommand::Next => wizard.advance().map(Outcome::Moved),
        WizardCommand::Back => wizard.retreat().map(Outcome::Moved),
        WizardCommand::Patch(p) => wizard.patch(p).map(|_| Outcome::Continue),
        WizardCommand::AddMilestone { title, date } => wizard
            .add_milestone(&title, date)
            .map(|_| Outcome::Continue),
        WizardCommand::RemoveMilestone(i) => wizard.remove_milestone(i).map(|_| Outcome::Continue),
        WizardCommand::Assign { role, user } => {
            wizard.assign_role(&role, &user).map(|_| Outcome::Continue)
        }
        WizardCommand::Unassign(role) => wizard.clear_role(&role).map(|_| Outcome::Continue),
        WizardCommand::Show => Ok(Outcome::Show),
        WizardCommand::Help => Ok(Outcome::Help),
        WizardCommand::Submit => Ok(match wizard.submit(service)? {
            Some(id) => Outcome::Committed(id),
            None => Outcome::SubmitIgnored,
        }),
        WizardCommand::Cancel => wizard.cancel().map(|_| Outcome::Cancelled),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commit::CommitError;
    use crate::config::Config;
    use crate::idea::Idea;
    use crate::staging::StagingRecord;

    struct AlwaysOk;

    impl CommitService for AlwaysOk {
        fn create(
            &self,
            record: &StagingRecord,
            _source_id: &str,
        ) -> std::result::Result<ProjectId, CommitError> {
            Ok(ProjectId(crate::paths::slugify(&record.name)))
        }
    }

    #[test]
    fn blank_and_comment_lines_are_skipped() {
        assert_eq!(parse("").unwrap(), None);
        assert_eq!(parse("   # step two").unwrap(), None);
    }

    #[test]
    fn parses_set_with_spaces() {
        assert_eq!(
            parse("set name  X Revamped ").unwrap(),
            Some(WizardCommand::Patch(StagingPatch::name("X Revamped")))
        );
        assert_eq!(
            parse("set name").unwrap(),
            Some(WizardCommand::Patch(StagingPatch::name("")))
        );
        assert!(parse("set colour red").is_err());
    }

    #[test]
    fn parses_milestone_with_and_without_date() {
        assert_eq!(
            parse("milestone add First harvest 2027-06-01").unwrap(),
            Some(WizardCommand::AddMilestone {
                title: "First harvest".to_string(),
                date: NaiveDate::from_ymd_opt(2027, 6, 1),
            })
        );
        assert_eq!(
            parse("milestone add Kickoff party").unwrap(),
            Some(WizardCommand::AddMilestone {
                title: "Kickoff party".to_string(),
                date: None,
            })
        );
        assert_eq!(
            parse("milestone remove 2").unwrap(),
            Some(WizardCommand::RemoveMilestone(2))
        );
        assert!(parse("milestone remove two").is_err());
    }

    #[test]
    fn parses_toggles_and_templates() {
        assert_eq!(
            parse("toggle docs_space off").unwrap(),
            Some(WizardCommand::Patch(StagingPatch::toggle(
                WorkspaceToggle::DocsSpace,
                false
            )))
        );
        assert!(matches!(
            parse("toggle forum on"),
            Err(HatchError::UnknownToggle(_))
        ));
        assert!(parse("toggle chat maybe").is_err());
        assert!(matches!(
            parse("template waterfall"),
            Err(HatchError::UnknownBoardTemplate(_))
        ));
    }

    #[test]
    fn assign_requires_exactly_two_words() {
        assert!(parse("assign lead").is_err());
        assert!(parse("assign lead user1 extra").is_err());
        assert_eq!(
            parse("assign lead user1").unwrap(),
            Some(WizardCommand::Assign {
                role: "lead".to_string(),
                user: "user1".to_string()
            })
        );
    }

    #[test]
    fn unknown_command_mentions_help() {
        let err = parse("fly").unwrap_err();
        assert!(err.to_string().contains("try 'help'"));
    }

    #[test]
    fn scripted_session_commits() {
        let mut idea = Idea::new("x", "X");
        idea.description = "Y".to_string();
        let mut w = WizardController::start(idea, &Config::new("t"));
        let script = "next\nset name X Revamped\nnext\nassign lead user1\nnext\ntoggle docs_space off\nsubmit\n";

        let mut last = Outcome::Continue;
        for line in script.lines() {
            if let Some(cmd) = parse(line).unwrap() {
                last = execute(&mut w, cmd, &AlwaysOk).unwrap();
            }
        }
        assert_eq!(last, Outcome::Committed(ProjectId("x-revamped".to_string())));
    }
}

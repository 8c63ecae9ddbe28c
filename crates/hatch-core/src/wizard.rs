//! The idea-to-project conversion wizard.
//!
//! `WizardController` owns the draft and the step cursor. Every command
//! either moves the wizard to a new state or returns a typed error and leaves
//! it untouched:
//!
//! ```text
//! Step_k --advance(valid)--> Step_k+1      Step_k --retreat--> Step_k-1
//! Step_N --submit--> Submitting            Submitting --ok--> Terminal
//! Submitting --err--> Step_N               Step_k --cancel--> Cancelled
//! ```
//!
//! Submitting is split in two so a host can run the commit without holding
//! the controller: [`WizardController::begin_submit`] freezes a snapshot and
//! raises `is_submitting`, [`WizardController::finish_submit`] applies the
//! outcome. While a submit is in flight every other command is refused and a
//! second submit is a no-op.

use crate::commit::{CommitError, CommitService, ProjectId};
use crate::config::{Config, Member};
use crate::error::{HatchError, Result};
use crate::idea::Idea;
use crate::staging::{MilestoneDraft, StagingPatch, StagingRecord, StagingStore};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

pub use crate::validate::Step;
use crate::validate::StepValidators;

// ---------------------------------------------------------------------------
// WizardPhase / WizardState
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WizardPhase {
    Active,
    Submitting,
    Terminal,
    Cancelled,
}

impl fmt::Display for WizardPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            WizardPhase::Active => "active",
            WizardPhase::Submitting => "submitting",
            WizardPhase::Terminal => "terminal",
            WizardPhase::Cancelled => "cancelled",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WizardState {
    pub current_step_index: usize,
    pub step_count: usize,
    pub is_submitting: bool,
    pub terminal_result: Option<ProjectId>,
    pub phase: WizardPhase,
}

impl WizardState {
    fn new() -> Self {
        Self {
            current_step_index: 0,
            step_count: Step::all().len(),
            is_submitting: false,
            terminal_result: None,
            phase: WizardPhase::Active,
        }
    }

    pub fn step(&self) -> Step {
        Step::from_index(self.current_step_index).unwrap_or_else(Step::last)
    }

    pub fn is_last_step(&self) -> bool {
        self.current_step_index + 1 == self.step_count
    }
}

// ---------------------------------------------------------------------------
// WizardEvent
// ---------------------------------------------------------------------------

/// Lifecycle signals for the host, buffered until drained.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum WizardEvent {
    StepChanged { index: usize, step: Step },
    ValidationFailed { index: usize, step: Step, reason: String },
    SubmitStarted { attempt: u32 },
    CommitFailed { error: CommitError },
    Committed { project_id: ProjectId },
    Cancelled,
}

// ---------------------------------------------------------------------------
// CommitTicket
// ---------------------------------------------------------------------------

/// Frozen input for one commit attempt, handed out by `begin_submit`.
#[derive(Debug, Clone)]
pub struct CommitTicket {
    pub record: StagingRecord,
    pub source_id: String,
    pub attempt: u32,
}

// ---------------------------------------------------------------------------
// WizardController
// ---------------------------------------------------------------------------

pub struct WizardController {
    source: Idea,
    store: Option<StagingStore>,
    state: WizardState,
    validators: StepValidators,
    members: Vec<Member>,
    events: Vec<WizardEvent>,
    attempts: u32,
}

impl WizardController {
    /// Open a wizard over `idea` with the default step gates.
    pub fn start(idea: Idea, cfg: &Config) -> Self {
        Self::with_validators(idea, cfg, StepValidators::default())
    }

    pub fn with_validators(idea: Idea, cfg: &Config, validators: StepValidators) -> Self {
        let store = StagingStore::seed(&idea, &cfg.wizard);
        tracing::debug!(idea = %idea.slug, "wizard opened");
        Self {
            source: idea,
            store: Some(store),
            state: WizardState::new(),
            validators,
            members: cfg.members.clone(),
            events: Vec::new(),
            attempts: 0,
        }
    }

    // -----------------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------------

    pub fn state(&self) -> &WizardState {
        &self.state
    }

    pub fn step(&self) -> Step {
        self.state.step()
    }

    pub fn source(&self) -> &Idea {
        &self.source
    }

    pub fn members(&self) -> &[Member] {
        &self.members
    }

    /// The current draft. Gone once the wizard is cancelled or committed.
    pub fn draft(&self) -> Result<&StagingRecord> {
        self.store
            .as_ref()
            .map(StagingStore::get)
            .ok_or_else(|| HatchError::WizardClosed(self.state.phase.to_string()))
    }

    /// Validation outcome for the current step without attempting to move.
    pub fn current_step_issue(&self) -> Result<Option<String>> {
        let draft = self.draft()?;
        Ok(self.validators.check(self.step(), draft))
    }

    pub fn events(&self) -> &[WizardEvent] {
        &self.events
    }

    pub fn take_events(&mut self) -> Vec<WizardEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn is_closed(&self) -> bool {
        matches!(
            self.state.phase,
            WizardPhase::Terminal | WizardPhase::Cancelled
        )
    }

    // -----------------------------------------------------------------------
    // Guards
    // -----------------------------------------------------------------------

    fn ensure_open(&self) -> Result<()> {
        if self.is_closed() {
            return Err(HatchError::WizardClosed(self.state.phase.to_string()));
        }
        Ok(())
    }

    /// Open and not submitting: the state every editing and navigation
    /// command requires.
    fn ensure_idle(&self) -> Result<()> {
        self.ensure_open()?;
        if self.state.is_submitting {
            return Err(HatchError::SubmitInFlight);
        }
        Ok(())
    }

    fn store_mut(&mut self) -> Result<&mut StagingStore> {
        self.ensure_idle()?;
        let phase = self.state.phase;
        self.store
            .as_mut()
            .ok_or_else(|| HatchError::WizardClosed(phase.to_string()))
    }

    // -----------------------------------------------------------------------
    // Draft edits
    // -----------------------------------------------------------------------

    pub fn patch(&mut self, patch: StagingPatch) -> Result<()> {
        let step = self.step();
        let touched = patch.touched();
        self.store_mut()?.patch(patch);
        tracing::debug!(%step, ?touched, "draft patched");
        Ok(())
    }

    pub fn assign_role(&mut self, role: &str, user_id: &str) -> Result<()> {
        self.store_mut()?.roles_mut().assign(role, user_id)?;
        tracing::debug!(role, user_id, "role assigned");
        Ok(())
    }

    pub fn clear_role(&mut self, role: &str) -> Result<()> {
        self.store_mut()?.roles_mut().clear(role)?;
        tracing::debug!(role, "role cleared");
        Ok(())
    }

    pub fn add_milestone(&mut self, title: &str, date: Option<NaiveDate>) -> Result<()> {
        self.store_mut()?.add_milestone(title, date);
        Ok(())
    }

    pub fn remove_milestone(&mut self, index: usize) -> Result<MilestoneDraft> {
        self.store_mut()?.remove_milestone(index)
    }

    // -----------------------------------------------------------------------
    // Navigation
    // -----------------------------------------------------------------------

    /// Move forward one step if the current step's gate passes.
    pub fn advance(&mut self) -> Result<Step> {
        self.ensure_idle()?;
        let step = self.step();
        let index = self.state.current_step_index;

        if let Some(reason) = self.validators.check(step, self.draft()?) {
            tracing::warn!(%step, %reason, "advance blocked by validation");
            self.events.push(WizardEvent::ValidationFailed {
                index,
                step,
                reason: reason.clone(),
            });
            return Err(HatchError::Validation { step, reason });
        }

        if self.state.is_last_step() {
            return Err(HatchError::NoNextStep(step));
        }

        self.state.current_step_index += 1;
        let next = self.step();
        tracing::debug!(from = %step, to = %next, "wizard advanced");
        self.events.push(WizardEvent::StepChanged {
            index: self.state.current_step_index,
            step: next,
        });
        Ok(next)
    }

    /// Move back one step. Never validated; a no-op on the first step.
    pub fn retreat(&mut self) -> Result<Step> {
        self.ensure_idle()?;
        if self.state.current_step_index == 0 {
            return Ok(self.step());
        }
        let from = self.step();
        self.state.current_step_index -= 1;
        let to = self.step();
        tracing::debug!(from = %from, to = %to, "wizard retreated");
        self.events.push(WizardEvent::StepChanged {
            index: self.state.current_step_index,
            step: to,
        });
        Ok(to)
    }

    /// Discard the draft and close the wizard.
    pub fn cancel(&mut self) -> Result<()> {
        self.ensure_idle()?;
        self.store = None;
        self.state.phase = WizardPhase::Cancelled;
        tracing::info!(idea = %self.source.slug, "wizard cancelled");
        self.events.push(WizardEvent::Cancelled);
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Submit
    // -----------------------------------------------------------------------

    /// Freeze the draft for a commit attempt.
    ///
    /// Returns `Ok(None)` when a submit is already in flight; the caller must
    /// not invoke the commit service in that case.
    pub fn begin_submit(&mut self) -> Result<Option<CommitTicket>> {
        self.ensure_open()?;
        if self.state.is_submitting {
            tracing::debug!("submit ignored: already in flight");
            return Ok(None);
        }

        let step = self.step();
        if !self.state.is_last_step() {
            return Err(HatchError::NotOnFinalStep {
                step,
                last: Step::last(),
            });
        }

        let record = self.draft()?.clone();
        if let Some(reason) = self.validators.check(step, &record) {
            self.events.push(WizardEvent::ValidationFailed {
                index: self.state.current_step_index,
                step,
                reason: reason.clone(),
            });
            return Err(HatchError::Validation { step, reason });
        }

        self.attempts += 1;
        self.state.is_submitting = true;
        self.state.phase = WizardPhase::Submitting;
        tracing::info!(idea = %self.source.slug, attempt = self.attempts, "submitting project");
        self.events.push(WizardEvent::SubmitStarted {
            attempt: self.attempts,
        });

        Ok(Some(CommitTicket {
            record,
            source_id: self.source.slug.clone(),
            attempt: self.attempts,
        }))
    }

    /// Apply the outcome of the in-flight commit.
    ///
    /// On failure the wizard returns to the last step with the draft intact
    /// and the commit error is returned for the user to see.
    pub fn finish_submit(
        &mut self,
        outcome: std::result::Result<ProjectId, CommitError>,
    ) -> Result<ProjectId> {
        if !self.state.is_submitting {
            return Err(HatchError::NoSubmitInFlight);
        }
        self.state.is_submitting = false;

        match outcome {
            Ok(id) => {
                self.store = None;
                self.state.phase = WizardPhase::Terminal;
                self.state.terminal_result = Some(id.clone());
                tracing::info!(idea = %self.source.slug, project = %id, "wizard committed");
                self.events.push(WizardEvent::Committed {
                    project_id: id.clone(),
                });
                Ok(id)
            }
            Err(error) => {
                self.state.phase = WizardPhase::Active;
                tracing::warn!(idea = %self.source.slug, %error, "commit failed");
                self.events.push(WizardEvent::CommitFailed {
                    error: error.clone(),
                });
                Err(HatchError::Commit(error))
            }
        }
    }

    /// Submit and commit in one call. `Ok(None)` means a submit was already
    /// in flight and the service was not called.
    pub fn submit<S: CommitService + ?Sized>(&mut self, service: &S) -> Result<Option<ProjectId>> {
        let Some(ticket) = self.begin_submit()? else {
            return Ok(None);
        };
        let outcome = service.create(&ticket.record, &ticket.source_id);
        self.finish_submit(outcome).map(Some)
    }

    /// Close a committed wizard, yielding the new project's id.
    pub fn acknowledge(self) -> Result<ProjectId> {
        match (self.state.phase, self.state.terminal_result) {
            (WizardPhase::Terminal, Some(id)) => Ok(id),
            (phase, _) => Err(HatchError::WizardClosed(format!(
                "cannot acknowledge a wizard that is {phase}"
            ))),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

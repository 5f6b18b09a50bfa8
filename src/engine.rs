//! The fill/submit state machine.
//!
//! One `fill` call walks `Idle → Navigated → (Cancelled | ReadyToFill) →
//! Filling → (Cancelled | ReadyToSubmit) → (Submitted | Aborted)`.
//! Per-field failures (locate timeout, value mismatch) are absorbed: the
//! field is skipped with a warning and the run moves on. Only navigation
//! and the submit control are fatal. The session is closed on every exit
//! path, exactly once.

use std::io::{self, BufRead, Write};
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};

use crate::error::{Error, Result};
use crate::locator;
use crate::mapping::{LocatorMapping, TextEntry};
use crate::session::Session;

/// Bounded wait window for every locate-and-wait operation. A single
/// fixed constant: no backoff, no retry beyond the window.
pub const DEFAULT_FIELD_WAIT: Duration = Duration::from_secs(5);

/// Settle delay after navigation in non-interactive mode, so the page
/// can finish rendering before the first locate.
pub const DEFAULT_SETTLE_DELAY: Duration = Duration::from_millis(500);

/// The two operator-confirmable suspension points in a fill run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Checkpoint {
    BeforeFill,
    BeforeSubmit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Proceed,
    Cancel,
}

/// Pluggable checkpoint policy. Consulted only in interactive mode.
pub trait Confirm: Send + Sync {
    fn confirm(&self, checkpoint: Checkpoint) -> Decision;
}

/// Default policy: every checkpoint proceeds.
pub struct AutoProceed;

impl Confirm for AutoProceed {
    fn confirm(&self, _checkpoint: Checkpoint) -> Decision {
        Decision::Proceed
    }
}

/// Console policy: `<Enter>` proceeds, `q` cancels.
pub struct StdinConfirm;

impl Confirm for StdinConfirm {
    fn confirm(&self, checkpoint: Checkpoint) -> Decision {
        let prompt = match checkpoint {
            Checkpoint::BeforeFill => "Press <Enter> to start filling or q to quit >> ",
            Checkpoint::BeforeSubmit => {
                "Review the form and press <Enter> to submit or q to cancel >> "
            }
        };
        print!("{prompt}");
        let _ = io::stdout().flush();
        let mut line = String::new();
        if io::stdin().lock().read_line(&mut line).is_err() {
            return Decision::Cancel;
        }
        if line.trim() == "q" {
            Decision::Cancel
        } else {
            Decision::Proceed
        }
    }
}

/// Options for one fill run.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FillOptions {
    /// Click the submit control after filling.
    pub submit: bool,
    /// Consult the checkpoint policy instead of auto-proceeding.
    pub interactive: bool,
    /// Present the pre-submit review checkpoint (interactive mode only).
    pub review_before_submit: bool,
    /// Best-effort click of the form's clear control before filling.
    pub clear_first: bool,
    /// Overrides the mapping's URL when set.
    pub url: Option<String>,
}

impl Default for FillOptions {
    fn default() -> Self {
        Self {
            submit: true,
            interactive: false,
            review_before_submit: false,
            clear_first: false,
            url: None,
        }
    }
}

/// What happened to one field attempt.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub enum FieldStatus {
    Applied,
    Skipped(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct FieldOutcome {
    pub locator: String,
    pub status: FieldStatus,
}

/// Per-run report for a run that reached the filling stage.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FillReport {
    /// Measured from the end of the pre-fill checkpoint to the submit
    /// click (or to the end of filling when not submitting).
    pub elapsed: Duration,
    pub submitted: bool,
    /// One outcome per field attempt, in fill order.
    pub fields: Vec<FieldOutcome>,
}

impl FillReport {
    pub fn elapsed_secs(&self) -> f64 {
        self.elapsed.as_secs_f64()
    }

    pub fn skipped(&self) -> usize {
        self.fields
            .iter()
            .filter(|f| matches!(f.status, FieldStatus::Skipped(_)))
            .count()
    }
}

/// Terminal result of one fill run.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub enum FillOutcome {
    Completed(FillReport),
    /// The operator cancelled before filling began, or a session-level
    /// error aborted the run.
    NotCompleted,
}

impl FillOutcome {
    pub fn elapsed_secs(&self) -> Option<f64> {
        match self {
            FillOutcome::Completed(report) => Some(report.elapsed_secs()),
            FillOutcome::NotCompleted => None,
        }
    }
}

/// Drives one session through a fill run. Owns the session; `fill`
/// consumes the engine and releases the session on every path.
pub struct FillEngine {
    session: Box<dyn Session>,
    confirm: Box<dyn Confirm>,
    field_wait: Duration,
    settle_delay: Duration,
}

impl FillEngine {
    pub fn new(session: Box<dyn Session>) -> Self {
        Self {
            session,
            confirm: Box::new(AutoProceed),
            field_wait: DEFAULT_FIELD_WAIT,
            settle_delay: DEFAULT_SETTLE_DELAY,
        }
    }

    /// Replace the checkpoint policy (e.g. [`StdinConfirm`] for console
    /// interactivity).
    pub fn with_confirm(mut self, confirm: Box<dyn Confirm>) -> Self {
        self.confirm = confirm;
        self
    }

    /// Override the per-field wait window.
    pub fn with_field_wait(mut self, wait: Duration) -> Self {
        self.field_wait = wait;
        self
    }

    /// Override the non-interactive settle delay.
    pub fn with_settle_delay(mut self, delay: Duration) -> Self {
        self.settle_delay = delay;
        self
    }

    /// Run the fill sequence against `mapping`. Session-level failures
    /// are logged and reported as [`FillOutcome::NotCompleted`], never
    /// propagated as a crash.
    pub async fn fill(self, mapping: &LocatorMapping, options: &FillOptions) -> FillOutcome {
        let Self {
            session,
            confirm,
            field_wait,
            settle_delay,
        } = self;

        let outcome = match run(
            session.as_ref(),
            confirm.as_ref(),
            field_wait,
            settle_delay,
            mapping,
            options,
        )
        .await
        {
            Ok(outcome) => outcome,
            Err(e) => {
                error!("form fill aborted: {e}");
                FillOutcome::NotCompleted
            }
        };

        if let Err(e) = session.close().await {
            warn!("failed to close session: {e}");
        }
        outcome
    }
}

async fn run(
    session: &dyn Session,
    confirm: &dyn Confirm,
    field_wait: Duration,
    settle_delay: Duration,
    mapping: &LocatorMapping,
    options: &FillOptions,
) -> Result<FillOutcome> {
    let url = options
        .url
        .as_deref()
        .or(mapping.url.as_deref())
        .ok_or_else(|| Error::Navigation("no target URL provided".into()))?;
    if !url.starts_with("https://") {
        return Err(Error::Navigation(format!(
            "insecure or malformed URL: {url}"
        )));
    }

    session.navigate(url).await?;
    info!(url, "navigated to form");

    if options.interactive {
        if confirm.confirm(Checkpoint::BeforeFill) == Decision::Cancel {
            info!("cancelled before filling");
            return Ok(FillOutcome::NotCompleted);
        }
    } else {
        tokio::time::sleep(settle_delay).await;
    }

    let start = Instant::now();
    let mut fields = Vec::new();

    if options.clear_first {
        // Best effort: a missing clear control never aborts the run.
        match session
            .wait_until_clickable(locator::CLEAR_CONTROL, field_wait)
            .await
        {
            Ok(el) => {
                if let Err(e) = el.click().await {
                    warn!("could not clear form: {e}");
                }
            }
            Err(e) => warn!("could not clear form: {e}"),
        }
    }

    for entry in &mapping.text {
        let status = match fill_text(session, field_wait, entry).await {
            Ok(()) => FieldStatus::Applied,
            Err(e) => {
                warn!(locator = %entry.locator, "could not fill field: {e}");
                FieldStatus::Skipped(e.to_string())
            }
        };
        fields.push(FieldOutcome {
            locator: entry.locator.clone(),
            status,
        });
    }

    for expr in &mapping.radio {
        let status = match select_radio(session, field_wait, expr).await {
            Ok(()) => FieldStatus::Applied,
            Err(e) => {
                warn!(locator = %expr, "could not select option: {e}");
                FieldStatus::Skipped(e.to_string())
            }
        };
        fields.push(FieldOutcome {
            locator: expr.clone(),
            status,
        });
    }

    for expr in &mapping.checkbox {
        let status = match toggle_checkbox(session, field_wait, expr).await {
            Ok(()) => FieldStatus::Applied,
            Err(e) => {
                warn!(locator = %expr, "could not tick option: {e}");
                FieldStatus::Skipped(e.to_string())
            }
        };
        fields.push(FieldOutcome {
            locator: expr.clone(),
            status,
        });
    }

    let mut submitted = false;
    if options.submit {
        let cancelled = options.review_before_submit
            && options.interactive
            && confirm.confirm(Checkpoint::BeforeSubmit) == Decision::Cancel;
        if cancelled {
            info!("cancelled before submitting");
        } else {
            // Submit-control failure is fatal, unlike per-field failures.
            let el = session
                .wait_until_clickable(locator::SUBMIT_CONTROL, field_wait)
                .await?;
            el.click().await?;
            submitted = true;
        }
    }

    let elapsed = start.elapsed();
    info!(?elapsed, submitted, "form fill finished");
    Ok(FillOutcome::Completed(FillReport {
        elapsed,
        submitted,
        fields,
    }))
}

/// Wait, clear, type, then verify the value round-tripped exactly.
async fn fill_text(session: &dyn Session, wait: Duration, entry: &TextEntry) -> Result<()> {
    let el = session.wait_until_clickable(&entry.locator, wait).await?;
    el.clear().await?;
    el.type_text(&entry.expected).await?;
    let actual = el.read_value().await?;
    if actual != entry.expected {
        return Err(Error::ValueMismatch {
            expected: entry.expected.clone(),
            actual,
        });
    }
    debug!(locator = %entry.locator, "filled");
    Ok(())
}

async fn select_radio(session: &dyn Session, wait: Duration, expr: &str) -> Result<()> {
    let el = session.wait_until_clickable(expr, wait).await?;
    if !el.is_selected().await? {
        el.click().await?;
    }
    Ok(())
}

/// The label's `for` attribute names the togglable control; its
/// `aria-checked` state decides whether clicking the label is needed.
async fn toggle_checkbox(session: &dyn Session, wait: Duration, expr: &str) -> Result<()> {
    let label = session.wait_until_clickable(expr, wait).await?;
    let target = label
        .read_attribute("for")
        .await?
        .ok_or_else(|| Error::Interaction("option label has no `for` attribute".into()))?;
    let control = session.find_by_id(&target).await?;
    let checked = control.read_attribute("aria-checked").await?;
    if checked.as_deref() == Some("false") {
        label.click().await?;
    }
    Ok(())
}

//! State-machine tests driving the fill engine against a scripted
//! in-memory session.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use formfill::{
    compile, locator, Checkpoint, CheckboxField, Confirm, Decision, ElementHandle, Error,
    FieldStatus, FillEngine, FillOptions, FillOutcome, FormSchema, LocatorMapping, RadioField,
    Result, Session, TextField,
};

const FORM_URL: &str = "https://forms.example/d/e/abc/viewform";

#[derive(Default)]
struct State {
    actions: Vec<String>,
    closed: usize,
}

/// Scripted session: every interaction is recorded, and failures are
/// injected by locator substring.
#[derive(Clone, Default)]
struct MockSession {
    state: Arc<Mutex<State>>,
    fail_navigation: bool,
    /// Locator substrings that never become clickable.
    timeout_on: Vec<String>,
    /// Locator substrings whose typed value reads back garbled.
    mistype_on: Vec<String>,
    /// Substrings of options that are already selected/checked.
    preselected: Vec<String>,
}

impl MockSession {
    fn record(&self, action: String) {
        self.state.lock().unwrap().actions.push(action);
    }

    fn actions(&self) -> Vec<String> {
        self.state.lock().unwrap().actions.clone()
    }

    fn closed(&self) -> usize {
        self.state.lock().unwrap().closed
    }

    fn engine(&self) -> FillEngine {
        FillEngine::new(Box::new(self.clone()))
            .with_field_wait(Duration::from_millis(50))
            .with_settle_delay(Duration::ZERO)
    }
}

#[async_trait]
impl Session for MockSession {
    async fn navigate(&self, url: &str) -> Result<()> {
        if self.fail_navigation {
            return Err(Error::Navigation("target unreachable".into()));
        }
        self.record(format!("navigate {url}"));
        Ok(())
    }

    async fn wait_until_clickable(
        &self,
        loc: &str,
        _timeout: Duration,
    ) -> Result<Box<dyn ElementHandle>> {
        if self.timeout_on.iter().any(|s| loc.contains(s)) {
            return Err(Error::LocateTimeout(loc.to_string()));
        }
        self.record(format!("wait {loc}"));
        Ok(Box::new(MockElement {
            locator: loc.to_string(),
            state: Arc::clone(&self.state),
            typed: Mutex::new(None),
            mistype: self.mistype_on.iter().any(|s| loc.contains(s)),
            selected: self.preselected.iter().any(|s| loc.contains(s)),
            for_id: Some(format!("ctl-{loc}")),
        }))
    }

    async fn find_by_id(&self, id: &str) -> Result<Box<dyn ElementHandle>> {
        self.record(format!("find_by_id {id}"));
        let checked = self.preselected.iter().any(|s| id.contains(s));
        Ok(Box::new(MockElement {
            locator: id.to_string(),
            state: Arc::clone(&self.state),
            typed: Mutex::new(None),
            mistype: false,
            selected: checked,
            for_id: None,
        }))
    }

    async fn close(self: Box<Self>) -> Result<()> {
        self.state.lock().unwrap().closed += 1;
        Ok(())
    }
}

struct MockElement {
    locator: String,
    state: Arc<Mutex<State>>,
    typed: Mutex<Option<String>>,
    mistype: bool,
    selected: bool,
    for_id: Option<String>,
}

impl MockElement {
    fn record(&self, action: String) {
        self.state.lock().unwrap().actions.push(action);
    }
}

#[async_trait]
impl ElementHandle for MockElement {
    async fn click(&self) -> Result<()> {
        self.record(format!("click {}", self.locator));
        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        self.record(format!("clear {}", self.locator));
        *self.typed.lock().unwrap() = None;
        Ok(())
    }

    async fn type_text(&self, value: &str) -> Result<()> {
        self.record(format!("type {}={value}", self.locator));
        *self.typed.lock().unwrap() = Some(value.to_string());
        Ok(())
    }

    async fn read_value(&self) -> Result<String> {
        if self.mistype {
            return Ok("garbled".into());
        }
        Ok(self.typed.lock().unwrap().clone().unwrap_or_default())
    }

    async fn read_attribute(&self, name: &str) -> Result<Option<String>> {
        match name {
            "for" => Ok(self.for_id.clone()),
            "aria-checked" => Ok(Some(if self.selected { "true" } else { "false" }.into())),
            _ => Ok(None),
        }
    }

    async fn is_selected(&self) -> Result<bool> {
        Ok(self.selected)
    }
}

/// Checkpoint policy cancelling at exactly one checkpoint.
struct CancelAt(Checkpoint);

impl Confirm for CancelAt {
    fn confirm(&self, checkpoint: Checkpoint) -> Decision {
        if checkpoint == self.0 {
            Decision::Cancel
        } else {
            Decision::Proceed
        }
    }
}

fn sample_mapping() -> LocatorMapping {
    let schema = FormSchema {
        url: Some(FORM_URL.into()),
        text: vec![
            TextField {
                label: "Email".into(),
                types: vec!["text".into(), "email".into()],
                response: "alex@example.com".into(),
                textarea: None,
            },
            TextField {
                label: "Full Name".into(),
                types: vec!["text".into()],
                response: "Alex Johnson".into(),
                textarea: None,
            },
        ],
        radio: vec![RadioField {
            label: "Solvents".into(),
            choice: "DMSO".into(),
            choice_count: None,
        }],
        checkbox: vec![CheckboxField {
            label: "Experiments".into(),
            choices: vec!["exp-1".into()],
        }],
    };
    compile(&schema, false).unwrap()
}

fn report(outcome: &FillOutcome) -> &formfill::FillReport {
    match outcome {
        FillOutcome::Completed(report) => report,
        FillOutcome::NotCompleted => panic!("run did not complete"),
    }
}

#[tokio::test]
async fn full_run_fills_and_submits() {
    let session = MockSession::default();
    let outcome = session
        .engine()
        .fill(&sample_mapping(), &FillOptions::default())
        .await;

    let report = report(&outcome);
    assert!(report.submitted);
    assert_eq!(report.fields.len(), 4);
    assert!(report
        .fields
        .iter()
        .all(|f| f.status == FieldStatus::Applied));

    let actions = session.actions();
    assert!(actions.iter().any(|a| a.contains("type") && a.contains("alex@example.com")));
    assert!(actions.iter().any(|a| a.contains("type") && a.contains("Alex Johnson")));
    assert!(actions
        .iter()
        .any(|a| a == &format!("click {}", locator::SUBMIT_CONTROL)));
    assert_eq!(session.closed(), 1);
}

#[tokio::test]
async fn cancel_before_fill_returns_sentinel() {
    let session = MockSession::default();
    let engine = session
        .engine()
        .with_confirm(Box::new(CancelAt(Checkpoint::BeforeFill)));
    let options = FillOptions {
        interactive: true,
        ..Default::default()
    };
    let outcome = engine.fill(&sample_mapping(), &options).await;

    assert!(matches!(outcome, FillOutcome::NotCompleted));
    assert_eq!(outcome.elapsed_secs(), None);
    // Navigation happened, nothing was touched afterwards.
    let actions = session.actions();
    assert_eq!(actions.len(), 1);
    assert!(actions[0].starts_with("navigate"));
    assert_eq!(session.closed(), 1);
}

#[tokio::test]
async fn cancel_before_submit_still_reports_elapsed() {
    let session = MockSession::default();
    let engine = session
        .engine()
        .with_confirm(Box::new(CancelAt(Checkpoint::BeforeSubmit)));
    let options = FillOptions {
        interactive: true,
        review_before_submit: true,
        ..Default::default()
    };
    let outcome = engine.fill(&sample_mapping(), &options).await;

    let report = report(&outcome);
    assert!(!report.submitted);
    assert!(outcome.elapsed_secs().is_some());
    assert!(!session
        .actions()
        .iter()
        .any(|a| a == &format!("click {}", locator::SUBMIT_CONTROL)));
    assert_eq!(session.closed(), 1);
}

#[tokio::test]
async fn locate_timeout_skips_field_and_continues() {
    let session = MockSession {
        timeout_on: vec!["Email".into()],
        ..Default::default()
    };
    let outcome = session
        .engine()
        .fill(&sample_mapping(), &FillOptions::default())
        .await;

    let report = report(&outcome);
    assert!(matches!(report.fields[0].status, FieldStatus::Skipped(_)));
    assert_eq!(report.skipped(), 1);
    assert!(report.submitted);

    // Every later field was still attempted.
    let actions = session.actions();
    assert!(actions.iter().any(|a| a.contains("Alex Johnson")));
    assert!(actions.iter().any(|a| a.contains("DMSO")));
    assert!(actions.iter().any(|a| a.contains("exp-1")));
    assert!(actions
        .iter()
        .any(|a| a == &format!("click {}", locator::SUBMIT_CONTROL)));
    assert_eq!(session.closed(), 1);
}

#[tokio::test]
async fn value_mismatch_skips_field_and_continues() {
    let session = MockSession {
        mistype_on: vec!["Email".into()],
        ..Default::default()
    };
    let outcome = session
        .engine()
        .fill(&sample_mapping(), &FillOptions::default())
        .await;

    let report = report(&outcome);
    match &report.fields[0].status {
        FieldStatus::Skipped(reason) => assert!(reason.contains("mismatch"), "{reason}"),
        other => panic!("expected skip, got {other:?}"),
    }
    assert_eq!(report.fields[1].status, FieldStatus::Applied);
    assert!(report.submitted);
    assert_eq!(session.closed(), 1);
}

#[tokio::test]
async fn navigation_error_yields_sentinel_without_fill_attempts() {
    let session = MockSession {
        fail_navigation: true,
        ..Default::default()
    };
    let outcome = session
        .engine()
        .fill(&sample_mapping(), &FillOptions::default())
        .await;

    assert!(matches!(outcome, FillOutcome::NotCompleted));
    assert!(session.actions().is_empty());
    assert_eq!(session.closed(), 1);
}

#[tokio::test]
async fn submit_control_timeout_is_fatal() {
    let session = MockSession {
        timeout_on: vec!["Submit".into()],
        ..Default::default()
    };
    let outcome = session
        .engine()
        .fill(&sample_mapping(), &FillOptions::default())
        .await;

    assert!(matches!(outcome, FillOutcome::NotCompleted));
    // Fields were filled before the fatal submit failure.
    assert!(session.actions().iter().any(|a| a.contains("alex@example.com")));
    assert_eq!(session.closed(), 1);
}

#[tokio::test]
async fn missing_url_aborts() {
    let session = MockSession::default();
    let mut mapping = sample_mapping();
    mapping.url = None;
    let outcome = session
        .engine()
        .fill(&mapping, &FillOptions::default())
        .await;

    assert!(matches!(outcome, FillOutcome::NotCompleted));
    assert!(session.actions().is_empty());
    assert_eq!(session.closed(), 1);
}

#[tokio::test]
async fn insecure_url_aborts_before_navigation() {
    let session = MockSession::default();
    let options = FillOptions {
        url: Some("http://forms.example/d/e/abc/viewform".into()),
        ..Default::default()
    };
    let outcome = session.engine().fill(&sample_mapping(), &options).await;

    assert!(matches!(outcome, FillOutcome::NotCompleted));
    assert!(session.actions().is_empty());
    assert_eq!(session.closed(), 1);
}

#[tokio::test]
async fn options_url_overrides_mapping_url() {
    let session = MockSession::default();
    let options = FillOptions {
        url: Some("https://forms.example/d/e/other/viewform".into()),
        ..Default::default()
    };
    session.engine().fill(&sample_mapping(), &options).await;

    assert_eq!(
        session.actions()[0],
        "navigate https://forms.example/d/e/other/viewform"
    );
}

#[tokio::test]
async fn preselected_options_are_not_clicked_again() {
    let session = MockSession {
        preselected: vec!["DMSO".into(), "exp-1".into()],
        ..Default::default()
    };
    let outcome = session
        .engine()
        .fill(&sample_mapping(), &FillOptions::default())
        .await;

    let report = report(&outcome);
    assert!(report.fields.iter().all(|f| f.status == FieldStatus::Applied));
    assert!(!session
        .actions()
        .iter()
        .any(|a| a.starts_with("click") && (a.contains("DMSO") || a.contains("exp-1"))));
}

#[tokio::test]
async fn clear_is_best_effort() {
    let session = MockSession {
        timeout_on: vec!["Clear form".into()],
        ..Default::default()
    };
    let options = FillOptions {
        clear_first: true,
        ..Default::default()
    };
    let outcome = session.engine().fill(&sample_mapping(), &options).await;

    // A missing clear control does not abort the run.
    let report = report(&outcome);
    assert!(report.submitted);
    assert_eq!(session.closed(), 1);
}

#[tokio::test]
async fn clear_control_is_clicked_when_requested() {
    let session = MockSession::default();
    let options = FillOptions {
        clear_first: true,
        ..Default::default()
    };
    session.engine().fill(&sample_mapping(), &options).await;

    assert!(session
        .actions()
        .iter()
        .any(|a| a == &format!("click {}", locator::CLEAR_CONTROL)));
}

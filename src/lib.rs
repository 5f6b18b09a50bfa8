//! Declarative form filling over a driven browser session.
//!
//! Describe a form's questions and answers as a [`FormSchema`], compile
//! it into XPath locators with [`compile`], then hand the mapping to a
//! [`FillEngine`] bound to a live session:
//!
//! ```no_run
//! use formfill::{compile, CdpSession, FillEngine, FillOptions, FormSchema};
//!
//! # async fn demo(schema: FormSchema) -> formfill::Result<()> {
//! let mapping = compile(&schema, false)?;
//! let engine = CdpSession::builder().headless(true).build_engine().await?;
//! let outcome = engine.fill(&mapping, &FillOptions::default()).await;
//! if let Some(secs) = outcome.elapsed_secs() {
//!     println!("filled in {secs:.2}s");
//! }
//! # Ok(())
//! # }
//! ```
//!
//! Fields that fail to locate or verify are skipped with a warning; the
//! run keeps going and the report says what happened to each field.

pub mod cdp;
pub mod config;
pub mod engine;
pub mod error;
pub mod locator;
pub mod mapping;
pub mod schema;
pub mod session;

pub use cdp::CdpSession;
pub use config::{SessionBuilder, SessionConfig};
pub use engine::{
    AutoProceed, Checkpoint, Confirm, Decision, FieldOutcome, FieldStatus, FillEngine,
    FillOptions, FillOutcome, FillReport, StdinConfirm,
};
pub use error::{Error, Result};
pub use mapping::{compile, LocatorMapping, TextEntry};
pub use schema::{CheckboxField, FormSchema, RadioField, TextField};
pub use session::{ElementHandle, Session};

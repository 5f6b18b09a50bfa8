//! The browser-session capability the fill engine drives.
//!
//! The engine never talks to a browser directly; it talks to these two
//! traits. [`crate::cdp::CdpSession`] is the production implementation,
//! and tests substitute scripted in-memory sessions.

use std::time::Duration;

use async_trait::async_trait;

use crate::error::Result;

/// Handle to a located element. Interactions on a stale or detached
/// element fail with [`crate::Error::Interaction`].
#[async_trait]
pub trait ElementHandle: Send + Sync {
    async fn click(&self) -> Result<()>;

    /// Empty an input-like control's current value.
    async fn clear(&self) -> Result<()>;

    async fn type_text(&self, value: &str) -> Result<()>;

    /// Current text value of an input-like control.
    async fn read_value(&self) -> Result<String>;

    /// Attribute value, or `None` when the attribute is absent.
    async fn read_attribute(&self, name: &str) -> Result<Option<String>>;

    /// Whether a selectable control (radio option) is currently selected.
    async fn is_selected(&self) -> Result<bool>;
}

/// A live browser session with a single page. One engine instance owns
/// the session exclusively for the duration of one fill run.
#[async_trait]
pub trait Session: Send + Sync {
    /// Navigate the page to `url`. Fails with
    /// [`crate::Error::Navigation`] on an unreachable target.
    async fn navigate(&self, url: &str) -> Result<()>;

    /// Resolve `locator` to its first matching clickable element, polling
    /// until `timeout` elapses. Fails with
    /// [`crate::Error::LocateTimeout`] when nothing shows up in time.
    async fn wait_until_clickable(
        &self,
        locator: &str,
        timeout: Duration,
    ) -> Result<Box<dyn ElementHandle>>;

    /// Look up an element by its `id` attribute. Fails with
    /// [`crate::Error::NotFound`].
    async fn find_by_id(&self, id: &str) -> Result<Box<dyn ElementHandle>>;

    /// Terminate the session and release the browser. Called exactly once
    /// on every exit path of a fill run.
    async fn close(self: Box<Self>) -> Result<()>;
}

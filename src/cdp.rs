//! Chromiumoxide-backed implementation of the session facade.

use std::time::Duration;

use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::element::Element;
use chromiumoxide::handler::viewport::Viewport;
use chromiumoxide::page::Page;
use futures::StreamExt;
use tracing::debug;

use crate::config::SessionConfig;
use crate::error::{Error, Result};
use crate::session::{ElementHandle, Session};

/// Chrome flags matching the targeted driver setup: quiet logs, no GPU.
const LAUNCH_ARGS: &[&str] = &["disable-gpu", "log-level=3"];

/// Poll interval for [`Session::wait_until_clickable`].
const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// An element is clickable when it is enabled and takes up space in the
/// layout. Presence in the DOM alone is not enough: hidden controls
/// reject clicks.
const CLICKABLE_CHECK: &str =
    "function() { if (this.disabled) return false; const rect = this.getBoundingClientRect(); return rect.width > 0 && rect.height > 0; }";

/// A launched Chrome instance with a single page.
pub struct CdpSession {
    browser: Browser,
    page: Page,
    handler_task: tokio::task::JoinHandle<()>,
}

impl CdpSession {
    /// Convenience entry point: [`crate::SessionBuilder`].
    pub fn builder() -> crate::config::SessionBuilder {
        crate::config::SessionBuilder::new()
    }

    pub async fn launch(config: SessionConfig) -> Result<Self> {
        let mut builder = BrowserConfig::builder();

        if config.headless {
            builder = builder.new_headless_mode().no_sandbox();
        } else {
            builder = builder.with_head().no_sandbox();
        }

        // chromiumoxide adds the `--` prefix itself
        for arg in LAUNCH_ARGS {
            builder = builder.arg(*arg);
        }

        if let Some(ref path) = config.chrome_path {
            builder = builder.chrome_executable(path);
        }

        builder = builder.viewport(Viewport {
            width: config.viewport_width,
            height: config.viewport_height,
            device_scale_factor: None,
            emulating_mobile: false,
            is_landscape: false,
            has_touch: false,
        });

        let cr_config = builder
            .build()
            .map_err(|e| Error::Launch(e.to_string()))?;

        let (browser, mut handler) = Browser::launch(cr_config)
            .await
            .map_err(|e| Error::Launch(e.to_string()))?;

        let handler_task = tokio::spawn(async move {
            while let Some(_event) = handler.next().await {}
        });

        let page = browser
            .new_page("about:blank")
            .await
            .map_err(|e| Error::Launch(e.to_string()))?;

        Ok(Self {
            browser,
            page,
            handler_task,
        })
    }
}

#[async_trait]
impl Session for CdpSession {
    async fn navigate(&self, url: &str) -> Result<()> {
        self.page
            .goto(url)
            .await
            .map_err(|e| Error::Navigation(e.to_string()))?;
        self.page
            .wait_for_navigation()
            .await
            .map_err(|e| Error::Navigation(e.to_string()))?;
        Ok(())
    }

    async fn wait_until_clickable(
        &self,
        locator: &str,
        timeout: Duration,
    ) -> Result<Box<dyn ElementHandle>> {
        let start = std::time::Instant::now();
        loop {
            if let Ok(el) = self.page.find_xpath(locator).await {
                let handle = CdpElement { inner: el };
                if handle.is_clickable().await.unwrap_or(false) {
                    debug!(locator, "located");
                    return Ok(Box::new(handle));
                }
            }
            if start.elapsed() >= timeout {
                return Err(Error::LocateTimeout(locator.to_string()));
            }
            tokio::time::sleep(POLL_INTERVAL).await;
        }
    }

    async fn find_by_id(&self, id: &str) -> Result<Box<dyn ElementHandle>> {
        let el = self
            .page
            .find_element(format!("[id=\"{id}\"]"))
            .await
            .map_err(|_| Error::NotFound(id.to_string()))?;
        Ok(Box::new(CdpElement { inner: el }))
    }

    async fn close(self: Box<Self>) -> Result<()> {
        let mut this = *self;
        this.browser.close().await?;
        let _ = this.browser.wait().await;
        this.handler_task.abort();
        Ok(())
    }
}

struct CdpElement {
    inner: Element,
}

impl CdpElement {
    async fn eval_on_self(&self, function: &str) -> Result<Option<serde_json::Value>> {
        let ret = self
            .inner
            .call_js_fn(function, false)
            .await
            .map_err(|e| Error::Interaction(e.to_string()))?;
        Ok(ret.result.value)
    }

    async fn is_clickable(&self) -> Result<bool> {
        let value = self.eval_on_self(CLICKABLE_CHECK).await?;
        Ok(value.and_then(|v| v.as_bool()).unwrap_or(false))
    }
}

#[async_trait]
impl ElementHandle for CdpElement {
    async fn click(&self) -> Result<()> {
        self.inner
            .click()
            .await
            .map_err(|e| Error::Interaction(e.to_string()))?;
        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        // No CDP clear primitive; empty the value and fire `input` so the
        // page's listeners see the change.
        self.eval_on_self(
            "function() { this.value = ''; this.dispatchEvent(new Event('input', { bubbles: true })); }",
        )
        .await?;
        Ok(())
    }

    async fn type_text(&self, value: &str) -> Result<()> {
        self.inner
            .click()
            .await
            .map_err(|e| Error::Interaction(e.to_string()))?;
        self.inner
            .type_str(value)
            .await
            .map_err(|e| Error::Interaction(e.to_string()))?;
        Ok(())
    }

    async fn read_value(&self) -> Result<String> {
        let value = self.eval_on_self("function() { return this.value; }").await?;
        Ok(value
            .and_then(|v| v.as_str().map(str::to_owned))
            .unwrap_or_default())
    }

    async fn read_attribute(&self, name: &str) -> Result<Option<String>> {
        self.inner
            .attribute(name)
            .await
            .map_err(|e| Error::Interaction(e.to_string()))
    }

    async fn is_selected(&self) -> Result<bool> {
        let value = self
            .eval_on_self(
                "function() { return this.checked === true || this.getAttribute('aria-checked') === 'true'; }",
            )
            .await?;
        Ok(value.and_then(|v| v.as_bool()).unwrap_or(false))
    }
}

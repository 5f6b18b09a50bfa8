use std::time::Duration;

use crate::cdp::CdpSession;
use crate::error::Result;

pub struct SessionConfig {
    pub headless: bool,
    pub viewport_width: u32,
    pub viewport_height: u32,
    pub chrome_path: Option<String>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            headless: true,
            viewport_width: 1920,
            viewport_height: 1080,
            chrome_path: None,
        }
    }
}

pub struct SessionBuilder {
    config: SessionConfig,
    field_wait: Duration,
}

impl SessionBuilder {
    pub fn new() -> Self {
        Self {
            config: SessionConfig::default(),
            field_wait: crate::engine::DEFAULT_FIELD_WAIT,
        }
    }

    pub fn headless(mut self, headless: bool) -> Self {
        self.config.headless = headless;
        self
    }

    pub fn viewport(mut self, width: u32, height: u32) -> Self {
        self.config.viewport_width = width;
        self.config.viewport_height = height;
        self
    }

    pub fn chrome_path(mut self, path: impl Into<String>) -> Self {
        self.config.chrome_path = Some(path.into());
        self
    }

    /// Wait window applied by the engine built from this session.
    pub fn field_wait(mut self, wait: Duration) -> Self {
        self.field_wait = wait;
        self
    }

    /// Launch Chrome and return a live session.
    pub async fn launch(self) -> Result<CdpSession> {
        CdpSession::launch(self.config).await
    }

    /// Launch Chrome and wrap it in a fill engine with this builder's
    /// wait window.
    pub async fn build_engine(self) -> Result<crate::engine::FillEngine> {
        let field_wait = self.field_wait;
        let session = CdpSession::launch(self.config).await?;
        Ok(crate::engine::FillEngine::new(Box::new(session)).with_field_wait(field_wait))
    }
}

impl Default for SessionBuilder {
    fn default() -> Self {
        Self::new()
    }
}

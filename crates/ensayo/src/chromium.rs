//! Chromium-family driver over the Chrome DevTools Protocol.
//!
//! Real browser control via chromiumoxide. Both [`Backend`] values run
//! through this driver; they differ only in executable discovery. Compiled
//! behind the `browser` feature so the unit suites stay browser-free.

use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::cdp::browser_protocol::browser::{
    SetDownloadBehaviorBehavior, SetDownloadBehaviorParams,
};
use chromiumoxide::cdp::browser_protocol::page::CaptureScreenshotFormat;
use chromiumoxide::page::{Page, ScreenshotParams};
use futures::StreamExt;

use crate::driver::{Driver, DriverConfig, Screenshot};
use crate::locator::Locator;
use crate::result::{EnsayoError, EnsayoResult};
use crate::wait::WaitOptions;

/// Browser driver backed by a CDP connection to Chrome or Chromium
#[derive(Debug)]
pub struct ChromiumDriver {
    browser: Browser,
    page: Page,
    handler: tokio::task::JoinHandle<()>,
    config: DriverConfig,
}

impl ChromiumDriver {
    /// Launch a browser per the supplied configuration and open a blank
    /// page for the session.
    pub async fn launch(config: DriverConfig) -> EnsayoResult<Self> {
        let mut builder = BrowserConfig::builder();

        if !config.headless {
            builder = builder.with_head();
        }
        if !config.sandbox {
            builder = builder.no_sandbox();
        }
        builder = builder.window_size(config.window_width, config.window_height);

        let executable = config
            .executable
            .clone()
            .or_else(|| config.backend.executable().map(String::from));
        if let Some(path) = executable {
            builder = builder.chrome_executable(path);
        }

        builder = builder
            .arg("--disable-gpu")
            .arg("--disable-dev-shm-usage")
            .arg("--disable-infobars")
            .arg(format!("--lang={}", config.lang));
        if config.accept_insecure_certs {
            builder = builder.arg("--ignore-certificate-errors");
        }

        let cdp_config = builder.build().map_err(|e| EnsayoError::BrowserLaunch {
            message: e.to_string(),
        })?;

        let (browser, mut handler) =
            Browser::launch(cdp_config)
                .await
                .map_err(|e| EnsayoError::BrowserLaunch {
                    message: e.to_string(),
                })?;

        // Drive the CDP event stream until the connection drops
        let handle = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if event.is_err() {
                    break;
                }
            }
        });

        let page = browser
            .new_page("about:blank")
            .await
            .map_err(|e| EnsayoError::Page {
                message: e.to_string(),
            })?;

        if let Some(ref dir) = config.download_dir {
            let params = SetDownloadBehaviorParams::builder()
                .behavior(SetDownloadBehaviorBehavior::Allow)
                .download_path(dir.display().to_string())
                .build()
                .map_err(|e| EnsayoError::BrowserLaunch { message: e })?;
            page.execute(params)
                .await
                .map_err(|e| EnsayoError::BrowserLaunch {
                    message: e.to_string(),
                })?;
        }

        Ok(Self {
            browser,
            page,
            handler: handle,
            config,
        })
    }

    /// The configuration this driver was launched with
    #[must_use]
    pub const fn config(&self) -> &DriverConfig {
        &self.config
    }

    async fn eval_value(&self, script: &str) -> EnsayoResult<serde_json::Value> {
        let result = self
            .page
            .evaluate(script)
            .await
            .map_err(|e| EnsayoError::Script {
                message: e.to_string(),
            })?;
        Ok(result.value().cloned().unwrap_or(serde_json::Value::Null))
    }

    async fn eval_bool(&self, script: &str) -> EnsayoResult<bool> {
        Ok(self.eval_value(script).await?.as_bool().unwrap_or(false))
    }
}

#[async_trait]
impl Driver for ChromiumDriver {
    async fn goto(&self, url: &str) -> EnsayoResult<()> {
        self.page
            .goto(url)
            .await
            .map_err(|e| EnsayoError::Navigation {
                url: url.to_string(),
                message: e.to_string(),
            })?;
        self.page
            .wait_for_navigation()
            .await
            .map_err(|e| EnsayoError::Navigation {
                url: url.to_string(),
                message: e.to_string(),
            })?;
        Ok(())
    }

    async fn eval(&self, script: &str) -> EnsayoResult<serde_json::Value> {
        self.eval_value(script).await
    }

    async fn click(&self, locator: &Locator) -> EnsayoResult<()> {
        // CSS targets get a trusted input-pipeline click; XPath targets go
        // through the page's own dispatch, which document.evaluate reaches
        match locator.selector() {
            crate::locator::Selector::Css(css) => {
                let element =
                    self.page
                        .find_element(css.as_str())
                        .await
                        .map_err(|e| EnsayoError::Input {
                            message: format!("{locator}: {e}"),
                        })?;
                element.click().await.map_err(|e| EnsayoError::Input {
                    message: format!("{locator}: {e}"),
                })?;
                Ok(())
            }
            crate::locator::Selector::XPath(_) => {
                let clicked = self.eval_bool(&locator.selector().to_click_script()).await?;
                if clicked {
                    Ok(())
                } else {
                    Err(EnsayoError::Input {
                        message: format!("no element to click for {locator}"),
                    })
                }
            }
        }
    }

    async fn type_text(&self, locator: &Locator, text: &str) -> EnsayoResult<()> {
        match locator.selector() {
            crate::locator::Selector::Css(css) => {
                let element =
                    self.page
                        .find_element(css.as_str())
                        .await
                        .map_err(|e| EnsayoError::Input {
                            message: format!("{locator}: {e}"),
                        })?;
                // Focus via click, then send keystrokes after the caret —
                // existing content is left in place
                element.click().await.map_err(|e| EnsayoError::Input {
                    message: format!("{locator}: {e}"),
                })?;
                element.type_str(text).await.map_err(|e| EnsayoError::Input {
                    message: format!("{locator}: {e}"),
                })?;
                Ok(())
            }
            crate::locator::Selector::XPath(_) => {
                let typed = self
                    .eval_bool(&locator.selector().to_append_value_script(text))
                    .await?;
                if typed {
                    Ok(())
                } else {
                    Err(EnsayoError::Input {
                        message: format!("no element to type into for {locator}"),
                    })
                }
            }
        }
    }

    async fn clear_text(&self, locator: &Locator) -> EnsayoResult<()> {
        let cleared = self
            .eval_bool(&locator.selector().to_clear_value_script())
            .await?;
        if cleared {
            Ok(())
        } else {
            Err(EnsayoError::Input {
                message: format!("no element to clear for {locator}"),
            })
        }
    }

    async fn text_of(&self, locator: &Locator) -> EnsayoResult<String> {
        match self.eval_value(&locator.selector().to_text_query()).await? {
            serde_json::Value::String(text) => Ok(text),
            serde_json::Value::Null => Err(EnsayoError::Page {
                message: format!("no element for {locator}"),
            }),
            other => Ok(other.to_string()),
        }
    }

    async fn count(&self, locator: &Locator) -> EnsayoResult<usize> {
        let value = self
            .eval_value(&locator.selector().to_count_query())
            .await?;
        Ok(value.as_u64().unwrap_or(0) as usize)
    }

    async fn is_visible(&self, locator: &Locator) -> EnsayoResult<bool> {
        self.eval_bool(&locator.selector().to_visible_query()).await
    }

    async fn is_clickable(&self, locator: &Locator) -> EnsayoResult<bool> {
        self.eval_bool(&locator.selector().to_clickable_query())
            .await
    }

    async fn screenshot(&self) -> EnsayoResult<Screenshot> {
        let data = self
            .page
            .screenshot(
                ScreenshotParams::builder()
                    .format(CaptureScreenshotFormat::Png)
                    .build(),
            )
            .await
            .map_err(|e| EnsayoError::Screenshot {
                message: e.to_string(),
            })?;
        Ok(Screenshot::new(data))
    }

    fn wait_options(&self) -> WaitOptions {
        self.config.wait.clone()
    }

    async fn close(&mut self) -> EnsayoResult<()> {
        self.browser
            .close()
            .await
            .map_err(|e| EnsayoError::Session {
                message: format!("browser close failed: {e}"),
            })?;
        self.handler.abort();
        Ok(())
    }
}

use async_trait::async_trait;
use thirtyfour::{By, ChromiumLikeCapabilities, DesiredCapabilities, WebDriver};

use crate::configuration::WebDriverSettings;

use super::{Browser, PageSession};

/// Chrome driven over a running WebDriver server (chromedriver, selenium grid).
pub struct Droid {
    server_url: String,
    headless: bool,
}

pub struct DroidSession {
    driver: WebDriver,
}

impl Droid {
    pub fn new(settings: &WebDriverSettings) -> Self {
        Droid {
            server_url: settings.server_url.clone(),
            headless: settings.headless,
        }
    }
}

/// Every div whose rendered text contains the marker, outer wrappers included.
pub fn card_xpath(marker: &str) -> String {
    format!("//div[contains(., '{}')]", marker)
}

/// Returns `cause`; a failed cleanup after it is only logged.
fn keep_cause(cause: anyhow::Error, cleanup: anyhow::Result<()>) -> anyhow::Error {
    if let Err(e) = cleanup {
        log::error!("Failed to quit session after {:?}: {:?}", cause, e);
    }
    cause
}

#[async_trait]
impl Browser for Droid {
    type Session = DroidSession;

    async fn open_session(&self) -> anyhow::Result<DroidSession> {
        let mut caps = DesiredCapabilities::chrome();
        if self.headless {
            caps.add_arg("--headless=new")?;
        }

        let driver = WebDriver::new(self.server_url.as_str(), caps).await?;
        if let Err(e) = driver.maximize_window().await {
            let quit_result = driver.quit().await.map_err(anyhow::Error::from);
            return Err(keep_cause(e.into(), quit_result));
        }

        Ok(DroidSession { driver })
    }
}

#[async_trait]
impl PageSession for DroidSession {
    async fn goto(&mut self, url: &str) -> anyhow::Result<()> {
        self.driver.goto(url).await?;
        Ok(())
    }

    async fn card_texts(&mut self, marker: &str) -> anyhow::Result<Vec<String>> {
        let cards = self.driver.find_all(By::XPath(card_xpath(marker))).await?;
        let mut texts = Vec::with_capacity(cards.len());

        for card in cards {
            // Cards can be re-rendered between lookup and read
            match card.text().await {
                Ok(text) => texts.push(text),
                Err(e) => log::warn!("Skipping unreadable card: {:?}", e),
            }
        }

        Ok(texts)
    }

    async fn quit(self) -> anyhow::Result<()> {
        self.driver.quit().await?;
        Ok(())
    }
}

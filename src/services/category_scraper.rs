use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use tokio::time::{self, Instant};

use crate::{
    configuration::ScraperSettings,
    domain::product::{extract_products, ProductRecord},
};

/// Starts fresh browser sessions, one per category page.
#[async_trait]
pub trait Browser: Sync {
    type Session: PageSession;

    async fn open_session(&self) -> anyhow::Result<Self::Session>;
}

#[async_trait]
pub trait PageSession: Send + Sized {
    async fn goto(&mut self, url: &str) -> anyhow::Result<()>;

    /// Visible text of every card whose rendered text contains `marker`.
    async fn card_texts(&mut self, marker: &str) -> anyhow::Result<Vec<String>>;

    async fn quit(self) -> anyhow::Result<()>;
}

pub struct CategoryScraper<B> {
    browser: B,
    settings: ScraperSettings,
}

impl<B: Browser> CategoryScraper<B> {
    pub fn new(browser: B, settings: ScraperSettings) -> Self {
        CategoryScraper { browser, settings }
    }

    /// Scrapes every configured category in order. The first browser failure
    /// aborts the whole run.
    pub async fn run(&self) -> anyhow::Result<Vec<ProductRecord>> {
        log::info!(
            "Started category scraper on {} categories",
            self.settings.categories.len()
        );
        let mut all_products = vec![];

        for (index, category_url) in self.settings.categories.iter().enumerate() {
            if index > 0 {
                time::sleep(self.settings.inter_category_pause()).await;
            }

            let products = self.scrape_category(category_url).await?;
            log::info!("{} items from {}", products.len(), category_url);

            all_products.extend(products);
        }

        Ok(all_products)
    }

    pub async fn scrape_category(&self, url: &str) -> anyhow::Result<Vec<ProductRecord>> {
        let mut session = self
            .browser
            .open_session()
            .await
            .with_context(|| format!("Failed to open browser session for {}", url))?;

        let scanned = self.scan_page(&mut session, url).await;
        let quit_result = session.quit().await;

        let blocks = scanned?;
        quit_result.with_context(|| format!("Failed to quit browser session for {}", url))?;

        if blocks.is_empty() {
            log::warn!("Found no product cards on url: {}", url);
        }

        Ok(extract_products(&blocks, url))
    }

    async fn scan_page(&self, session: &mut B::Session, url: &str) -> anyhow::Result<Vec<String>> {
        session
            .goto(url)
            .await
            .with_context(|| format!("Failed to navigate to {}", url))?;

        wait_for_cards(
            session,
            &self.settings.card_marker,
            self.settings.readiness_timeout(),
            self.settings.poll_interval(),
        )
        .await
        .with_context(|| format!("Failed to read product cards on {}", url))
    }
}

/// Polls the page until two consecutive scans agree on a non-zero card count,
/// or `timeout` elapses. On timeout the last scan is returned as-is.
pub async fn wait_for_cards<S: PageSession>(
    session: &mut S,
    marker: &str,
    timeout: Duration,
    poll_interval: Duration,
) -> anyhow::Result<Vec<String>> {
    // Too far out to represent means no deadline
    let deadline = Instant::now().checked_add(timeout);
    let mut previous_count = None;

    loop {
        let blocks = session.card_texts(marker).await?;
        if !blocks.is_empty() && previous_count == Some(blocks.len()) {
            return Ok(blocks);
        }

        let now = Instant::now();
        let wait = match deadline {
            Some(deadline) if now >= deadline => {
                log::debug!("Gave up waiting for cards after {:?}", timeout);
                return Ok(blocks);
            }
            Some(deadline) => poll_interval.min(deadline - now),
            None => poll_interval,
        };

        previous_count = Some(blocks.len());
        time::sleep(wait).await;
    }
}

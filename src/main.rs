use env_logger::Env;
use shelfscan::{
    configuration::get_configuration,
    services::{CategoryScraper, Droid},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let configuration = get_configuration()?;

    let droid = Droid::new(&configuration.webdriver);
    let scraper = CategoryScraper::new(droid, configuration.scraper);

    let products = scraper.run().await?;

    for product in products.iter() {
        log::debug!(
            "{} | {} | {} | {}",
            product.name,
            product.quantity.as_deref().unwrap_or("-"),
            product.price,
            product.source_url
        );
    }
    log::info!("Scraped {} products in total", products.len());

    Ok(())
}

pub mod category_scraper;
pub mod droid;

pub use category_scraper::*;
pub use droid::*;

pub mod relay;
pub mod scrape;

pub mod scrape;
pub mod server;

pub mod extractor;
pub mod normalize;
pub mod router;
pub mod scraper;

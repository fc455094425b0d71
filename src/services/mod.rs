pub mod detail_enricher;
pub mod listing_discoverer;
pub mod result_sink;

pub use detail_enricher::DetailEnricher;
pub use listing_discoverer::{resolve_detail_url, ListingDiscoverer};
pub use result_sink::{ResultSink, CSV_HEADERS};

pub mod company;

pub use company::{CompanyRecord, CompanySummary, EnrichmentStatus, Founder, JOIN_SEPARATOR};

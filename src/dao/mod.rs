/// Country dataset retrieval.
pub mod country_source;
/// Wire models of the upstream country dataset.
pub mod models;

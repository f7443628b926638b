pub mod error;
pub mod rest;

use futures::future::BoxFuture;

use crate::state::game::Country;

pub use self::error::{CountriesError, CountriesResult};

/// Abstraction over where the country dataset comes from.
pub trait CountrySource: Send + Sync {
    /// Fetch and validate the full country list.
    fn fetch_countries(&self) -> BoxFuture<'static, CountriesResult<Vec<Country>>>;
}

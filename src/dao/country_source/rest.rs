use std::sync::Arc;

use futures::future::BoxFuture;
use reqwest::Client;
use tracing::debug;

use crate::{dao::models::CountryRecord, state::game::Country};

use super::{
    CountrySource,
    error::{CountriesError, CountriesResult},
};

/// [`CountrySource`] backed by the REST Countries HTTP API.
#[derive(Clone)]
pub struct RestCountrySource {
    client: Client,
    url: Arc<str>,
}

impl RestCountrySource {
    /// Build a client targeting `url`.
    pub fn new(url: impl Into<String>) -> CountriesResult<Self> {
        let client = Client::builder()
            .build()
            .map_err(|source| CountriesError::ClientBuilder { source })?;

        Ok(Self {
            client,
            url: Arc::from(url.into()),
        })
    }

    async fn fetch(&self) -> CountriesResult<Vec<Country>> {
        let url = self.url.to_string();
        let response = self
            .client
            .get(url.as_str())
            .send()
            .await
            .map_err(|source| CountriesError::RequestSend {
                url: url.clone(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(CountriesError::RequestStatus { url, status });
        }

        let records = response
            .json::<Vec<CountryRecord>>()
            .await
            .map_err(|source| CountriesError::DecodeResponse {
                url: url.clone(),
                source,
            })?;

        debug!(%url, count = records.len(), "fetched country list");
        Ok(records.into_iter().map(Country::from).collect())
    }
}

impl CountrySource for RestCountrySource {
    fn fetch_countries(&self) -> BoxFuture<'static, CountriesResult<Vec<Country>>> {
        let source = self.clone();
        Box::pin(async move { source.fetch().await })
    }
}

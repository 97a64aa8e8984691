//! Country service client over the REST Countries API.
//!
//! The country database itself is an external collaborator; this client
//! only resolves codes and checks that a city/town pair is plausible for
//! a resolvable country.

use std::time::Duration;

use canvass_core::country::{Country, CountryService};
use canvass_core::error::{CanvassError, CanvassResult};
use reqwest::StatusCode;
use serde::Deserialize;

const DEFAULT_BASE_URL: &str = "https://restcountries.com";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Deserialize)]
struct RestCountry {
    name: RestCountryName,
    cca2: String,
}

#[derive(Debug, Deserialize)]
struct RestCountryName {
    common: String,
}

#[derive(Clone)]
pub struct RestCountriesClient {
    client: reqwest::Client,
    base_url: String,
}

impl RestCountriesClient {
    pub fn new() -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .user_agent("canvass/0.1 (+reqwest)")
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            client,
            base_url: DEFAULT_BASE_URL.into(),
        })
    }

    /// Override the API endpoint (test servers).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

impl CountryService for RestCountriesClient {
    async fn resolve(&self, code: &str) -> CanvassResult<Option<Country>> {
        let code = code.trim();
        if code.is_empty() {
            return Ok(None);
        }

        let url = format!("{}/v3.1/alpha/{}", self.base_url, code.to_lowercase());
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| CanvassError::Internal(format!("country lookup failed: {e}")))?;

        match response.status() {
            StatusCode::NOT_FOUND | StatusCode::BAD_REQUEST => Ok(None),
            status if status.is_success() => {
                let countries: Vec<RestCountry> = response
                    .json()
                    .await
                    .map_err(|e| CanvassError::Internal(format!("country decode failed: {e}")))?;
                Ok(countries.into_iter().next().map(|c| Country {
                    code: c.cca2.to_uppercase(),
                    name: c.name.common,
                }))
            }
            status => Err(CanvassError::Internal(format!(
                "country service returned HTTP {status}"
            ))),
        }
    }

    async fn validate_city_town(
        &self,
        country_code: &str,
        city: &str,
        town: &str,
    ) -> CanvassResult<bool> {
        if city.trim().is_empty() || town.trim().is_empty() {
            return Ok(false);
        }
        Ok(self.resolve(country_code).await?.is_some())
    }
}

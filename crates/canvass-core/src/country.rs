//! Country service collaborator contract.
//!
//! The country database itself is external; this trait is the seam the
//! account layer consumes for country resolution and city/town checks.

use crate::error::CanvassResult;

/// Canonical country record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Country {
    /// Alpha-2 code, uppercase.
    pub code: String,
    pub name: String,
}

pub trait CountryService: Send + Sync {
    /// Resolve an alpha-2 or free-text code to a canonical country
    /// record; `None` when unknown.
    fn resolve(&self, code: &str) -> impl Future<Output = CanvassResult<Option<Country>>> + Send;

    /// Validate a city/town pair jointly against a country.
    fn validate_city_town(
        &self,
        country_code: &str,
        city: &str,
        town: &str,
    ) -> impl Future<Output = CanvassResult<bool>> + Send;
}

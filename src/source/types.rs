use crate::error::FetchError;
use crate::models::Property;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_str(self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Listing filter; every field is optional and each present field narrows the query
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Filter {
    pub name: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
    pub owner_name: Option<String>,
    /// Minimum price (COP)
    pub min_price: Option<i64>,
    /// Maximum price (COP)
    pub max_price: Option<i64>,
    pub year: Option<i32>,
    pub page: Option<u32>,
    pub page_size: Option<u32>,
    pub sort_by: Option<String>,
    pub sort_direction: Option<SortDirection>,
}

impl Filter {
    /// Query parameters for the present fields, in declaration order.
    ///
    /// Text is trimmed and blank text dropped; numbers must be positive.
    pub fn query_pairs(&self) -> Result<Vec<(&'static str, String)>, FetchError> {
        let mut pairs = Vec::new();

        push_text(&mut pairs, "name", &self.name);
        push_text(&mut pairs, "address", &self.address);
        push_text(&mut pairs, "city", &self.city);
        push_text(&mut pairs, "state", &self.state);
        push_text(&mut pairs, "country", &self.country);
        push_text(&mut pairs, "ownerName", &self.owner_name);
        push_positive(&mut pairs, "minPrice", self.min_price)?;
        push_positive(&mut pairs, "maxPrice", self.max_price)?;
        push_positive(&mut pairs, "year", self.year.map(i64::from))?;
        push_positive(&mut pairs, "page", self.page.map(i64::from))?;
        push_positive(&mut pairs, "pageSize", self.page_size.map(i64::from))?;
        push_text(&mut pairs, "sortBy", &self.sort_by);
        if let Some(direction) = self.sort_direction {
            pairs.push(("sortDirection", direction.to_string()));
        }

        Ok(pairs)
    }

    /// Local evaluation of the filter, used when serving the sample dataset
    pub fn matches(&self, property: &Property) -> bool {
        let contains = |needle: &Option<String>, haystack: Option<&str>| match clean(needle) {
            None => true,
            Some(needle) => haystack
                .map(|h| h.to_lowercase().contains(&needle.to_lowercase()))
                .unwrap_or(false),
        };

        contains(&self.name, Some(&property.name))
            && contains(&self.address, Some(&property.address))
            && contains(&self.city, property.city.as_deref())
            && contains(&self.state, property.state.as_deref())
            && contains(&self.country, property.country.as_deref())
            && contains(&self.owner_name, Some(&property.owner.name))
            && self.min_price.map_or(true, |min| property.price >= min)
            && self.max_price.map_or(true, |max| property.price <= max)
            && self.year.map_or(true, |year| property.year == Some(year))
    }
}

fn clean(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

fn push_text(pairs: &mut Vec<(&'static str, String)>, key: &'static str, value: &Option<String>) {
    if let Some(value) = clean(value) {
        pairs.push((key, value.to_string()));
    }
}

fn push_positive(
    pairs: &mut Vec<(&'static str, String)>,
    key: &'static str,
    value: Option<i64>,
) -> Result<(), FetchError> {
    match value {
        None => Ok(()),
        Some(v) if v > 0 => {
            pairs.push((key, v.to_string()));
            Ok(())
        }
        Some(v) => Err(FetchError::InvalidFilter(format!("{} must be positive, got {}", key, v))),
    }
}

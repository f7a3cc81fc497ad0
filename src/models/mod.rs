pub mod raw;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Listing image, in display order
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Image {
    pub id: String,
    pub url: String,
    pub enabled: bool,
    pub is_main: bool,
    pub description: String,
}

/// Owner contact information
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Owner {
    pub name: String,
    pub phone: String,
    pub email: String,
    pub photo: Option<String>,
}

impl Default for Owner {
    fn default() -> Self {
        Self {
            name: String::new(),
            phone: String::new(),
            email: String::new(),
            photo: Some(String::new()),
        }
    }
}

/// One entry of a property's transaction history
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Trace {
    /// ISO date as sent by the backend
    pub date: String,
    pub label: String,
    pub value: i64,
    pub tax: i64,
}

impl Trace {
    /// Parse the ISO date, accepting a full timestamp as well
    pub fn parsed_date(&self) -> Option<NaiveDate> {
        let date = self.date.trim();
        let day = date.get(..10).unwrap_or(date);
        NaiveDate::parse_from_str(day, "%Y-%m-%d").ok()
    }
}

/// Canonical property record
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Property {
    pub id: String,
    pub name: String,
    pub address: String,
    pub price: i64,
    pub images: Vec<Image>,
    pub owner: Owner,
    pub traces: Vec<Trace>,
    pub year: Option<i32>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
    pub code_internal: Option<String>,
    pub owner_id: Option<String>,
    pub created_at: Option<String>,
}

impl Property {
    /// Traces ordered by date; undated entries keep their order at the end
    pub fn traces_chronological(&self) -> Vec<&Trace> {
        let mut traces: Vec<&Trace> = self.traces.iter().collect();
        traces.sort_by_key(|t| match t.parsed_date() {
            Some(date) => (0, Some(date)),
            None => (1, None),
        });
        traces
    }
}

/// A page of results with the backend's pagination metadata
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub properties: Vec<T>,
    pub total_count: u64,
    pub page: u32,
    pub page_size: u32,
    pub total_pages: u32,
    pub has_next_page: bool,
    pub has_previous_page: bool,
}

impl<T> Page<T> {
    pub const DEFAULT_PAGE_SIZE: u32 = 10;

    /// The whole, unpaginated result set as a single page
    pub fn from_all(items: Vec<T>) -> Self {
        let len = items.len();
        Self {
            properties: items,
            total_count: len as u64,
            page: 1,
            page_size: len as u32,
            total_pages: 1,
            has_next_page: false,
            has_previous_page: false,
        }
    }

    pub fn empty() -> Self {
        Self {
            properties: Vec::new(),
            total_count: 0,
            page: 1,
            page_size: Self::DEFAULT_PAGE_SIZE,
            total_pages: 0,
            has_next_page: false,
            has_previous_page: false,
        }
    }
}

// Data structures shared between the catalog API client and the controller:
// vehicle records as served by the backend, filter/sort state, and the
// query parameters a list fetch carries.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One image attached to a vehicle listing.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct VehicleImage {
    pub id: String,
    pub filename: String,
    pub url: String,
    #[serde(default)]
    pub is_primary: bool,
}

/// A vehicle record as returned by the catalog API. The controller treats
/// these as opaque beyond `id`/`slug`; the full field set matches what the
/// backend serves so the CLI (and any other consumer) can render details.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Vehicle {
    pub id: String,
    pub brand: String,
    pub model: String,
    pub year: i32,
    pub price: f64,
    pub kilometers: i64,
    pub fuel_type: String,
    pub transmission: String,
    pub color: String,
    pub power_hp: i32,
    pub doors: i32,
    pub seats: i32,
    pub trunk_volume: Option<i32>,
    pub warranty_months: i32,
    pub vehicle_type: String,
    pub status: String,
    pub description: String,
    #[serde(default)]
    pub features: Vec<String>,
    #[serde(default)]
    pub images: Vec<VehicleImage>,
    pub slug: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Sort keys accepted by the catalog API (`sort_by` query parameter).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    CreatedAt,
    Price,
    Year,
    Kilometers,
}

impl SortKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortKey::CreatedAt => "created_at",
            SortKey::Price => "price",
            SortKey::Year => "year",
            SortKey::Kilometers => "kilometers",
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "created_at" => Ok(SortKey::CreatedAt),
            "price" => Ok(SortKey::Price),
            "year" => Ok(SortKey::Year),
            "kilometers" => Ok(SortKey::Kilometers),
            other => Err(format!(
                "unknown sort key '{other}' (expected created_at, price, year or kilometers)"
            )),
        }
    }
}

/// Sort direction (`sort_order` query parameter).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "asc" => Ok(SortOrder::Asc),
            "desc" => Ok(SortOrder::Desc),
            other => Err(format!("unknown sort order '{other}' (expected asc or desc)")),
        }
    }
}

/// The (key, direction) pair determining result ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortSpec {
    pub key: SortKey,
    pub order: SortOrder,
}

impl Default for SortSpec {
    fn default() -> Self {
        SortSpec {
            key: SortKey::CreatedAt,
            order: SortOrder::Desc,
        }
    }
}

/// The active filter values for a catalog query. An empty string means "not
/// applied"; only non-empty entries are ever sent to the API. The same
/// key/value form is what the website round-trips through the address bar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterSet {
    pub brand: String,
    pub min_price: String,
    pub max_price: String,
    pub min_year: String,
    pub max_year: String,
    pub fuel_type: String,
    pub transmission: String,
    pub vehicle_type: String,
    pub status: String,
}

impl Default for FilterSet {
    fn default() -> Self {
        // The public catalog only shows available vehicles unless a caller
        // explicitly clears or overrides the status filter.
        FilterSet {
            brand: String::new(),
            min_price: String::new(),
            max_price: String::new(),
            min_year: String::new(),
            max_year: String::new(),
            fuel_type: String::new(),
            transmission: String::new(),
            vehicle_type: String::new(),
            status: "available".to_string(),
        }
    }
}

impl FilterSet {
    fn entries(&self) -> [(&'static str, &str); 9] {
        [
            ("brand", &self.brand),
            ("min_price", &self.min_price),
            ("max_price", &self.max_price),
            ("min_year", &self.min_year),
            ("max_year", &self.max_year),
            ("fuel_type", &self.fuel_type),
            ("transmission", &self.transmission),
            ("vehicle_type", &self.vehicle_type),
            ("status", &self.status),
        ]
    }

    /// Non-empty entries as query parameters, in declaration order.
    pub fn to_query_pairs(&self) -> Vec<(&'static str, String)> {
        self.entries()
            .into_iter()
            .filter(|(_, value)| !value.is_empty())
            .map(|(key, value)| (key, value.to_string()))
            .collect()
    }

    /// Shallow-merge: only keys present in the patch are overwritten.
    /// `Some("")` clears a filter, `None` leaves it untouched.
    pub fn apply(&mut self, patch: FilterPatch) {
        if let Some(v) = patch.brand {
            self.brand = v;
        }
        if let Some(v) = patch.min_price {
            self.min_price = v;
        }
        if let Some(v) = patch.max_price {
            self.max_price = v;
        }
        if let Some(v) = patch.min_year {
            self.min_year = v;
        }
        if let Some(v) = patch.max_year {
            self.max_year = v;
        }
        if let Some(v) = patch.fuel_type {
            self.fuel_type = v;
        }
        if let Some(v) = patch.transmission {
            self.transmission = v;
        }
        if let Some(v) = patch.vehicle_type {
            self.vehicle_type = v;
        }
        if let Some(v) = patch.status {
            self.status = v;
        }
    }
}

/// A partial filter update. Built from user input (form fields, CLI flags)
/// or from URL query parameters on page load.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterPatch {
    pub brand: Option<String>,
    pub min_price: Option<String>,
    pub max_price: Option<String>,
    pub min_year: Option<String>,
    pub max_year: Option<String>,
    pub fuel_type: Option<String>,
    pub transmission: Option<String>,
    pub vehicle_type: Option<String>,
    pub status: Option<String>,
}

impl FilterPatch {
    pub fn is_empty(&self) -> bool {
        self == &FilterPatch::default()
    }

    /// Builds a patch from `(key, value)` query pairs, e.g. the parsed
    /// address-bar parameters of a shared listing URL. Keys that are not
    /// filter names are ignored.
    pub fn from_query_pairs<'a, I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut patch = FilterPatch::default();
        for (key, value) in pairs {
            let value = Some(value.to_string());
            match key {
                "brand" => patch.brand = value,
                "min_price" => patch.min_price = value,
                "max_price" => patch.max_price = value,
                "min_year" => patch.min_year = value,
                "max_year" => patch.max_year = value,
                "fuel_type" => patch.fuel_type = value,
                "transmission" => patch.transmission = value,
                "vehicle_type" => patch.vehicle_type = value,
                "status" => patch.status = value,
                _ => {}
            }
        }
        patch
    }
}

/// Everything one list fetch sends to the catalog API.
#[derive(Debug, Clone, PartialEq)]
pub struct VehicleQuery {
    pub skip: u32,
    pub limit: u32,
    pub sort: SortSpec,
    pub filters: FilterSet,
}

impl VehicleQuery {
    pub fn to_query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![
            ("skip", self.skip.to_string()),
            ("limit", self.limit.to_string()),
            ("sort_by", self.sort.key.as_str().to_string()),
            ("sort_order", self.sort.order.as_str().to_string()),
        ];
        pairs.extend(self.filters.to_query_pairs());
        pairs
    }
}

//! Purpose: Per-request metadata (search/action) and static scope metadata.
//! Exports: `QueryMetadata`, `SearchMetadata`, `ActionMetadata`, `ScopeMetadata`, `Connectivity`.
//! Role: Values read and written by the caller through JSON and flat-string transports.
//! Invariants: `SearchMetadata` and `ActionMetadata` are `repr(C)` with `QueryMetadata` first,
//!             so a pointer to either may be read as a pointer to `QueryMetadata`.
use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::core::error::{Error, ErrorKind, Result};
use crate::core::variant::{self, Variant, VariantMap};

#[repr(i32)]
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum Connectivity {
    #[default]
    Unknown = 0,
    Disconnected = 1,
    Connected = 2,
}

impl Connectivity {
    pub fn from_code(code: i32) -> Result<Self> {
        match code {
            0 => Ok(Self::Unknown),
            1 => Ok(Self::Disconnected),
            2 => Ok(Self::Connected),
            other => Err(Error::invalid(format!(
                "invalid connectivity status {other}"
            ))),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct QueryMetadata {
    locale: String,
    form_factor: String,
    connectivity: Connectivity,
}

impl QueryMetadata {
    pub fn new(locale: impl Into<String>, form_factor: impl Into<String>) -> Self {
        Self {
            locale: locale.into(),
            form_factor: form_factor.into(),
            connectivity: Connectivity::Unknown,
        }
    }

    pub fn locale(&self) -> &str {
        &self.locale
    }

    pub fn form_factor(&self) -> &str {
        &self.form_factor
    }

    pub fn internet_connectivity(&self) -> Connectivity {
        self.connectivity
    }

    pub fn set_internet_connectivity(&mut self, status: Connectivity) {
        self.connectivity = status;
    }
}

#[repr(C)]
#[derive(Clone, Debug, PartialEq)]
pub struct SearchMetadata {
    base: QueryMetadata,
    cardinality: usize,
    location: Option<VariantMap>,
    aggregated_keywords: BTreeSet<String>,
}

impl SearchMetadata {
    pub fn new(
        cardinality: i32,
        locale: impl Into<String>,
        form_factor: impl Into<String>,
    ) -> Result<Self> {
        let cardinality = usize::try_from(cardinality)
            .map_err(|_| Error::invalid(format!("invalid cardinality {cardinality}")))?;
        Ok(Self {
            base: QueryMetadata::new(locale, form_factor),
            cardinality,
            location: None,
            aggregated_keywords: BTreeSet::new(),
        })
    }

    pub fn base(&self) -> &QueryMetadata {
        &self.base
    }

    pub fn base_mut(&mut self) -> &mut QueryMetadata {
        &mut self.base
    }

    pub fn cardinality(&self) -> usize {
        self.cardinality
    }

    pub fn location(&self) -> Result<&VariantMap> {
        self.location
            .as_ref()
            .ok_or_else(|| Error::new(ErrorKind::NotFound).with_message("location is not set"))
    }

    /// A location needs numeric `latitude` and `longitude`; other fields pass through.
    pub fn set_location(&mut self, location: VariantMap) -> Result<()> {
        for field in ["latitude", "longitude"] {
            if !location.get(field).is_some_and(Value::is_number) {
                return Err(Error::invalid(format!(
                    "location requires a numeric '{field}'"
                )));
            }
        }
        self.location = Some(location);
        Ok(())
    }

    pub fn set_aggregated_keywords(&mut self, keywords: Vec<String>) -> Result<()> {
        if keywords.iter().any(String::is_empty) {
            return Err(Error::invalid("aggregated keywords must not be empty"));
        }
        self.aggregated_keywords = keywords.into_iter().collect();
        Ok(())
    }

    pub fn aggregated_keywords(&self) -> Vec<&str> {
        self.aggregated_keywords.iter().map(String::as_str).collect()
    }

    pub fn is_aggregated(&self) -> bool {
        !self.aggregated_keywords.is_empty()
    }
}

#[repr(C)]
#[derive(Clone, Debug, PartialEq)]
pub struct ActionMetadata {
    base: QueryMetadata,
    scope_data: Variant,
    hints: VariantMap,
}

impl ActionMetadata {
    pub fn new(locale: impl Into<String>, form_factor: impl Into<String>) -> Self {
        Self {
            base: QueryMetadata::new(locale, form_factor),
            scope_data: Variant::Null,
            hints: VariantMap::new(),
        }
    }

    pub fn base(&self) -> &QueryMetadata {
        &self.base
    }

    pub fn base_mut(&mut self) -> &mut QueryMetadata {
        &mut self.base
    }

    pub fn scope_data(&self) -> &Variant {
        &self.scope_data
    }

    pub fn set_scope_data(&mut self, data: Variant) {
        self.scope_data = data;
    }

    pub fn hint(&self, key: &str) -> Result<&Variant> {
        self.hints.get(key).ok_or_else(|| {
            Error::new(ErrorKind::NotFound).with_message(format!("hint '{key}' is not set"))
        })
    }

    pub fn set_hint(&mut self, key: impl Into<String>, value: Variant) -> Result<()> {
        let key = key.into();
        if key.is_empty() {
            return Err(Error::invalid("hint name must not be empty"));
        }
        self.hints.insert(key, value);
        Ok(())
    }

    pub fn hints(&self) -> &VariantMap {
        &self.hints
    }
}

/// Static description of a scope as listed by the registry.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScopeMetadata {
    pub scope_id: String,
    pub display_name: String,
    pub description: String,
    pub author: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub art: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    pub search_hint: String,
    pub hot_key: String,
    pub invisible: bool,
    pub is_aggregator: bool,
    pub location_data_needed: bool,
    pub keywords: Vec<String>,
    pub appearance_attributes: VariantMap,
}

impl ScopeMetadata {
    pub fn from_json(bytes: &[u8]) -> Result<Self> {
        let value = variant::parse(bytes, "scope metadata")?;
        Self::from_value(value)
    }

    pub fn from_value(value: Value) -> Result<Self> {
        let metadata: Self = serde_json::from_value(value).map_err(|err| {
            Error::new(ErrorKind::Conversion)
                .with_message("scope metadata: unexpected shape")
                .with_source(err)
        })?;
        if metadata.scope_id.is_empty() {
            return Err(Error::invalid("scope metadata requires a scope_id"));
        }
        Ok(metadata)
    }

    pub fn serialized(&self) -> Result<String> {
        serde_json::to_string(self).map_err(|err| {
            Error::new(ErrorKind::Internal)
                .with_message("failed to serialize scope metadata")
                .with_source(err)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn connectivity_codes() {
        assert_eq!(Connectivity::from_code(2).unwrap(), Connectivity::Connected);
        assert!(Connectivity::from_code(3).is_err());
    }

    #[test]
    fn negative_cardinality_is_rejected() {
        assert!(SearchMetadata::new(-1, "en_US", "phone").is_err());
        assert_eq!(SearchMetadata::new(20, "en_US", "phone").unwrap().cardinality(), 20);
    }

    #[test]
    fn location_requires_coordinates() {
        let mut meta = SearchMetadata::new(0, "en_US", "desktop").unwrap();
        assert_eq!(meta.location().unwrap_err().kind(), ErrorKind::NotFound);
        let partial = json!({"latitude": 1.5}).as_object().cloned().unwrap();
        assert!(meta.set_location(partial).is_err());
        let full = json!({"latitude": 1.5, "longitude": -3, "city": "Lyon"});
        meta.set_location(full.as_object().cloned().unwrap()).unwrap();
        assert_eq!(meta.location().unwrap()["city"], "Lyon");
    }

    #[test]
    fn keywords_are_a_sorted_set() {
        let mut meta = SearchMetadata::new(0, "en_US", "phone").unwrap();
        assert!(!meta.is_aggregated());
        meta.set_aggregated_keywords(vec!["music".into(), "books".into(), "music".into()])
            .unwrap();
        assert_eq!(meta.aggregated_keywords(), ["books", "music"]);
        assert!(meta.is_aggregated());
        assert!(meta.set_aggregated_keywords(vec![String::new()]).is_err());
    }

    #[test]
    fn hints_are_keyed_json() {
        let mut meta = ActionMetadata::new("en_US", "phone");
        meta.set_hint("rating", json!({"stars": 5})).unwrap();
        assert_eq!(meta.hint("rating").unwrap()["stars"], 5);
        assert_eq!(meta.hint("missing").unwrap_err().kind(), ErrorKind::NotFound);
    }

    #[test]
    fn scope_metadata_requires_an_id() {
        assert!(ScopeMetadata::from_json(br#"{"display_name":"x"}"#).is_err());
        let meta = ScopeMetadata::from_json(br#"{"scope_id":"music","keywords":["a"]}"#).unwrap();
        let reparsed = ScopeMetadata::from_json(meta.serialized().unwrap().as_bytes()).unwrap();
        assert_eq!(reparsed, meta);
    }
}

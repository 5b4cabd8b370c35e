//! Purpose: Search result value with JSON attributes and an optional category.
//! Exports: `ScopeResult`.
//! Role: Built by the caller, copied into replies and activation responses.
//! Invariants: Only categorised results may be pushed into a search reply.
use std::sync::Arc;

use serde_json::{Value, json};

use super::category::Category;
use crate::core::error::{Error, ErrorKind, Result};
use crate::core::variant::{Variant, VariantMap};

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ScopeResult {
    attrs: VariantMap,
    intercept_activation: bool,
    category: Option<Arc<Category>>,
}

impl ScopeResult {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn categorised(category: Arc<Category>) -> Self {
        Self {
            category: Some(category),
            ..Self::default()
        }
    }

    pub fn category(&self) -> Option<&Arc<Category>> {
        self.category.as_ref()
    }

    pub fn attr(&self, key: &str) -> Result<&Variant> {
        self.attrs.get(key).ok_or_else(|| {
            Error::new(ErrorKind::NotFound).with_message(format!("attribute '{key}' is not set"))
        })
    }

    pub fn set_attr(&mut self, key: impl Into<String>, value: Variant) -> Result<()> {
        let key = key.into();
        if key.is_empty() {
            return Err(Error::invalid("attribute name must not be empty"));
        }
        self.attrs.insert(key, value);
        Ok(())
    }

    pub fn attrs(&self) -> &VariantMap {
        &self.attrs
    }

    pub fn set_intercept_activation(&mut self) {
        self.intercept_activation = true;
    }

    pub fn intercept_activation(&self) -> bool {
        self.intercept_activation
    }

    pub fn serialize(&self) -> Value {
        let mut internal = json!({ "intercept_activation": self.intercept_activation });
        if let Some(category) = &self.category {
            internal["cat_id"] = Value::String(category.id().to_string());
        }
        json!({ "attrs": self.attrs, "internal": internal })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn category() -> Arc<Category> {
        Arc::new(Category::new("apps", "Apps", "", VariantMap::new()))
    }

    #[test]
    fn missing_attribute_is_not_found() {
        let result = ScopeResult::new();
        let err = result.attr("uri").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert_eq!(err.to_string(), "NotFound: attribute 'uri' is not set");
    }

    #[test]
    fn attributes_hold_arbitrary_json() {
        let mut result = ScopeResult::categorised(category());
        result.set_attr("uri", json!("app://x")).unwrap();
        result.set_attr("rating", json!({"stars": 4.5})).unwrap();
        assert_eq!(result.attr("rating").unwrap()["stars"], 4.5);
        assert!(result.set_attr("", json!(1)).is_err());
    }

    #[test]
    fn serialize_carries_category_and_flags() {
        let mut result = ScopeResult::categorised(category());
        result.set_intercept_activation();
        let value = result.serialize();
        assert_eq!(value["internal"]["cat_id"], "apps");
        assert_eq!(value["internal"]["intercept_activation"], true);
    }
}

//! Purpose: Preview widget definitions.
//! Exports: `PreviewWidget`, `parse_widgets`.
//! Role: Validate widget JSON before it reaches a reply or an activation response.
//! Invariants: Every widget has a string `id` and `type`; other keys pass through untouched.
use serde_json::Value;

use crate::core::error::{Error, Result};
use crate::core::variant::{self, VariantMap};

/// A preview widget definition; `id` and `type` are required, everything else is passed through.
#[derive(Clone, Debug, PartialEq)]
pub struct PreviewWidget {
    id: String,
    widget_type: String,
    definition: VariantMap,
}

impl PreviewWidget {
    pub fn from_json(text: &str) -> Result<Self> {
        let definition = variant::parse_map(text.as_bytes(), "preview widget")?;
        Self::from_map(definition)
    }

    pub fn from_map(definition: VariantMap) -> Result<Self> {
        let id = required_str(&definition, "id")?;
        let widget_type = required_str(&definition, "type")?;
        Ok(Self {
            id,
            widget_type,
            definition,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn widget_type(&self) -> &str {
        &self.widget_type
    }

    pub fn to_value(&self) -> Value {
        Value::Object(self.definition.clone())
    }
}

fn required_str(definition: &VariantMap, field: &str) -> Result<String> {
    match definition.get(field) {
        Some(Value::String(value)) if !value.is_empty() => Ok(value.clone()),
        _ => Err(Error::invalid(format!(
            "preview widget requires a non-empty string '{field}'"
        ))),
    }
}

/// Parses every entry of a flat widget list.
pub fn parse_widgets(items: &[String]) -> Result<Vec<PreviewWidget>> {
    items.iter().map(|item| PreviewWidget::from_json(item)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_extra_attributes() {
        let widget =
            PreviewWidget::from_json(r#"{"id":"header","type":"header","title":"Hi"}"#).unwrap();
        assert_eq!(widget.id(), "header");
        assert_eq!(widget.widget_type(), "header");
        assert_eq!(widget.to_value()["title"], "Hi");
    }

    #[test]
    fn requires_id_and_type() {
        let err = PreviewWidget::from_json(r#"{"type":"text"}"#).unwrap_err();
        assert_eq!(
            err.to_string(),
            "InvalidArgument: preview widget requires a non-empty string 'id'"
        );
        assert!(PreviewWidget::from_json(r#"{"id":"a","type":""}"#).is_err());
        assert!(PreviewWidget::from_json("[]").is_err());
    }
}

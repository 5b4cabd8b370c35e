//! Purpose: Response to an activation or preview action, telling the shell what to do next.
//! Exports: `ActivationResponse`, `ActivationStatus`.
//! Invariants: Statuses that carry a payload can only be built through their own constructor.
use serde_json::{Value, json};

use super::query::CannedQuery;
use super::result::ScopeResult;
use super::widget::PreviewWidget;
use crate::core::error::{Error, Result};
use crate::core::variant::Variant;

#[repr(i32)]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ActivationStatus {
    NotHandled = 0,
    ShowDash = 1,
    HideDash = 2,
    ShowPreview = 3,
    PerformQuery = 4,
    UpdateResult = 5,
    UpdatePreview = 6,
}

impl ActivationStatus {
    pub fn from_code(code: i32) -> Result<Self> {
        match code {
            0 => Ok(Self::NotHandled),
            1 => Ok(Self::ShowDash),
            2 => Ok(Self::HideDash),
            3 => Ok(Self::ShowPreview),
            4 => Ok(Self::PerformQuery),
            5 => Ok(Self::UpdateResult),
            6 => Ok(Self::UpdatePreview),
            other => Err(Error::invalid(format!("invalid activation status {other}"))),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ActivationResponse {
    status: ActivationStatus,
    query: Option<CannedQuery>,
    result: Option<ScopeResult>,
    widgets: Vec<PreviewWidget>,
    scope_data: Variant,
}

impl ActivationResponse {
    pub fn new(status: ActivationStatus) -> Result<Self> {
        let needs = match status {
            ActivationStatus::PerformQuery => Some("a query"),
            ActivationStatus::UpdateResult => Some("a result"),
            ActivationStatus::UpdatePreview => Some("widgets"),
            _ => None,
        };
        if let Some(payload) = needs {
            return Err(Error::invalid(format!(
                "{status:?} responses must be built with {payload}"
            )));
        }
        Ok(Self::with_status(status))
    }

    fn with_status(status: ActivationStatus) -> Self {
        Self {
            status,
            query: None,
            result: None,
            widgets: Vec::new(),
            scope_data: Variant::Null,
        }
    }

    pub fn for_query(query: CannedQuery) -> Self {
        Self {
            query: Some(query),
            ..Self::with_status(ActivationStatus::PerformQuery)
        }
    }

    pub fn update_result(result: ScopeResult) -> Self {
        Self {
            result: Some(result),
            ..Self::with_status(ActivationStatus::UpdateResult)
        }
    }

    pub fn update_preview(widgets: Vec<PreviewWidget>) -> Result<Self> {
        if widgets.is_empty() {
            return Err(Error::invalid("UpdatePreview responses need at least one widget"));
        }
        Ok(Self {
            widgets,
            ..Self::with_status(ActivationStatus::UpdatePreview)
        })
    }

    pub fn status(&self) -> ActivationStatus {
        self.status
    }

    pub fn query(&self) -> Option<&CannedQuery> {
        self.query.as_ref()
    }

    pub fn scope_data(&self) -> &Variant {
        &self.scope_data
    }

    pub fn set_scope_data(&mut self, data: Variant) {
        self.scope_data = data;
    }

    pub fn serialize(&self) -> Value {
        let mut value = json!({
            "status": self.status as i32,
            "scope_data": self.scope_data,
        });
        if let Some(query) = &self.query {
            value["query"] = Value::String(query.to_uri());
        }
        if let Some(result) = &self.result {
            value["updated_result"] = result.serialize();
        }
        if !self.widgets.is_empty() {
            let widgets: Vec<Value> = self.widgets.iter().map(PreviewWidget::to_value).collect();
            value["updated_widgets"] = Value::Array(widgets);
        }
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payload_statuses_need_their_constructor() {
        for code in 4..=6 {
            let status = ActivationStatus::from_code(code).unwrap();
            assert!(ActivationResponse::new(status).is_err(), "{status:?}");
        }
        assert!(ActivationStatus::from_code(7).is_err());
        let response = ActivationResponse::new(ActivationStatus::ShowDash).unwrap();
        assert!(response.query().is_none());
        assert!(response.scope_data().is_null());
    }

    #[test]
    fn query_response_serializes_the_uri() {
        let response = ActivationResponse::for_query(CannedQuery::new("scope", "q", "dep"));
        let value = response.serialize();
        assert_eq!(value["status"], 4);
        assert_eq!(value["query"], "scope://scope?q=q&dep=dep");
    }

    #[test]
    fn preview_update_requires_widgets() {
        assert!(ActivationResponse::update_preview(Vec::new()).is_err());
        let widget = PreviewWidget::from_json(r#"{"id":"id1","type":"text"}"#).unwrap();
        let mut response = ActivationResponse::update_preview(vec![widget]).unwrap();
        response.set_scope_data(json!(["test1", "test2"]));
        let value = response.serialize();
        assert_eq!(value["updated_widgets"][0]["id"], "id1");
        assert_eq!(value["scope_data"][1], "test2");
    }
}

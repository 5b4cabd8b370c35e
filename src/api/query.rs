//! Purpose: Canned query value (scope id, query text, department, filter state).
//! Exports: `CannedQuery`.
//! Role: Plain value copied into departments, activation responses and URIs.
//! Invariants: URI form is `scope://<id>?q=<q>[&dep=<dep>][&filters=<json>]`, form-urlencoded.
use url::form_urlencoded;

use crate::core::error::{Error, ErrorKind, Result};
use crate::core::variant::{self, VariantMap};

const URI_SCHEME: &str = "scope://";

#[derive(Clone, Debug, Default, PartialEq)]
pub struct CannedQuery {
    scope_id: String,
    query_string: String,
    department_id: String,
    filter_state: VariantMap,
}

impl CannedQuery {
    pub fn new(
        scope_id: impl Into<String>,
        query_string: impl Into<String>,
        department_id: impl Into<String>,
    ) -> Self {
        Self {
            scope_id: scope_id.into(),
            query_string: query_string.into(),
            department_id: department_id.into(),
            filter_state: VariantMap::new(),
        }
    }

    pub fn scope_id(&self) -> &str {
        &self.scope_id
    }

    pub fn query_string(&self) -> &str {
        &self.query_string
    }

    pub fn department_id(&self) -> &str {
        &self.department_id
    }

    pub fn filter_state(&self) -> &VariantMap {
        &self.filter_state
    }

    pub fn set_query_string(&mut self, query_string: impl Into<String>) {
        self.query_string = query_string.into();
    }

    pub fn set_department_id(&mut self, department_id: impl Into<String>) {
        self.department_id = department_id.into();
    }

    pub fn set_filter_state(&mut self, state: VariantMap) {
        self.filter_state = state;
    }

    pub fn to_uri(&self) -> String {
        let scope: String = form_urlencoded::byte_serialize(self.scope_id.as_bytes()).collect();
        let mut params = form_urlencoded::Serializer::new(String::new());
        params.append_pair("q", &self.query_string);
        if !self.department_id.is_empty() {
            params.append_pair("dep", &self.department_id);
        }
        if !self.filter_state.is_empty() {
            let filters = serde_json::Value::Object(self.filter_state.clone()).to_string();
            params.append_pair("filters", &filters);
        }
        format!("{URI_SCHEME}{scope}?{}", params.finish())
    }

    pub fn from_uri(uri: &str) -> Result<Self> {
        let rest = uri
            .strip_prefix(URI_SCHEME)
            .ok_or_else(|| Error::invalid(format!("not a scope uri: {uri}")))?;
        let (scope, params) = rest.split_once('?').unwrap_or((rest, ""));
        let scope_id = form_urlencoded::parse(scope.as_bytes())
            .next()
            .map(|(key, _)| key.into_owned())
            .unwrap_or_default();
        if scope_id.is_empty() {
            return Err(Error::invalid(format!("scope uri has no scope id: {uri}")));
        }

        let mut query = Self::new(scope_id, "", "");
        for (key, value) in form_urlencoded::parse(params.as_bytes()) {
            match key.as_ref() {
                "q" => query.query_string = value.into_owned(),
                "dep" => query.department_id = value.into_owned(),
                "filters" => {
                    query.filter_state = variant::parse_map(value.as_bytes(), "uri filters")?;
                }
                other => {
                    tracing::debug!(param = other, "ignoring unknown scope uri parameter");
                }
            }
        }
        Ok(query)
    }
}

impl std::str::FromStr for CannedQuery {
    type Err = Error;

    fn from_str(uri: &str) -> Result<Self> {
        Self::from_uri(uri).map_err(|err| {
            if err.kind() == ErrorKind::Conversion {
                err
            } else {
                Error::new(ErrorKind::Conversion)
                    .with_message(err.message().unwrap_or("invalid scope uri").to_string())
            }
        })
    }
}

//! Purpose: In-flight search and preview replies shared between the library and the caller.
//! Exports: `SearchReply`, `PreviewReply`, `Completion`.
//! Role: Collect what a query or preview pushes until the session is finished.
//! Invariants: Once finished (normally or with an error) every push fails with `Logic`.
//! Invariants: Pushed values are copied; callers keep ownership of what they passed in.
//! Invariants: A failed push leaves the reply unchanged.
use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde_json::{Value, json};

use super::category::Category;
use super::department::Department;
use super::layout::ColumnLayout;
use super::result::ScopeResult;
use super::widget::PreviewWidget;
use crate::core::error::{Error, Result};
use crate::core::shared::{SharedKind, SharedObject};
use crate::core::variant::{self, Variant, VariantMap};

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Completion {
    Finished,
    Error(String),
}

impl Completion {
    fn to_value(&self) -> Value {
        match self {
            Completion::Finished => json!({ "status": "finished" }),
            Completion::Error(message) => json!({ "status": "error", "message": message }),
        }
    }
}

/// Finish bookkeeping shared by both reply kinds.
#[derive(Debug, Default)]
struct Session {
    completion: Option<Completion>,
}

impl Session {
    fn ensure_open(&self, what: &str, op: &str) -> Result<()> {
        if self.completion.is_some() {
            return Err(Error::logic(format!("{op}: {what} is already finished")));
        }
        Ok(())
    }

    fn finish(&mut self, what: &str, completion: Completion) -> Result<()> {
        self.ensure_open(what, "finish")?;
        self.completion = Some(completion);
        Ok(())
    }

    fn to_value(&self) -> Value {
        self.completion
            .as_ref()
            .map(Completion::to_value)
            .unwrap_or_else(|| json!({ "status": "open" }))
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

#[derive(Debug, Default)]
pub struct SearchReply {
    state: Mutex<SearchState>,
}

#[derive(Debug, Default)]
struct SearchState {
    session: Session,
    categories: Vec<Arc<Category>>,
    departments: Option<Arc<Department>>,
    results: Vec<ScopeResult>,
    filters: Vec<Variant>,
    filter_state: VariantMap,
}

impl SharedObject for SearchReply {
    const KIND: SharedKind = SharedKind::SearchReply;
}

const SEARCH: &str = "search reply";
const PREVIEW: &str = "preview reply";

impl SearchReply {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn finished(&self) -> Result<()> {
        lock(&self.state).session.finish(SEARCH, Completion::Finished)
    }

    pub fn error(&self, message: impl Into<String>) -> Result<()> {
        lock(&self.state)
            .session
            .finish(SEARCH, Completion::Error(message.into()))
    }

    pub fn completion(&self) -> Option<Completion> {
        lock(&self.state).session.completion.clone()
    }

    pub fn is_finished(&self) -> bool {
        lock(&self.state).session.completion.is_some()
    }

    pub fn register_category(
        &self,
        id: &str,
        title: &str,
        icon: &str,
        renderer_template: VariantMap,
    ) -> Result<Arc<Category>> {
        let mut state = lock(&self.state);
        state.session.ensure_open(SEARCH, "register_category")?;
        if id.is_empty() {
            return Err(Error::invalid("category id must not be empty"));
        }
        if state.categories.iter().any(|category| category.id() == id) {
            return Err(Error::invalid(format!(
                "category '{id}' is already registered"
            )));
        }
        let category = Arc::new(Category::new(id, title, icon, renderer_template));
        state.categories.push(category.clone());
        Ok(category)
    }

    pub fn register_departments(&self, root: Arc<Department>) -> Result<()> {
        let mut state = lock(&self.state);
        state.session.ensure_open(SEARCH, "register_departments")?;
        root.validate_tree()?;
        state.departments = Some(root);
        Ok(())
    }

    pub fn push(&self, result: &ScopeResult) -> Result<()> {
        let mut state = lock(&self.state);
        state.session.ensure_open(SEARCH, "push")?;
        let category = result
            .category()
            .ok_or_else(|| Error::invalid("cannot push a result without a category"))?;
        let registered = state
            .categories
            .iter()
            .any(|known| Arc::ptr_eq(known, category));
        if !registered {
            return Err(Error::invalid(format!(
                "category '{}' is not registered on this reply",
                category.id()
            )));
        }
        state.results.push(result.clone());
        Ok(())
    }

    pub fn push_filters(&self, filters: Vec<Variant>, filter_state: VariantMap) -> Result<()> {
        let mut state = lock(&self.state);
        state.session.ensure_open(SEARCH, "push_filters")?;
        validate_filters(&filters)?;
        state.filters = filters;
        state.filter_state = filter_state;
        Ok(())
    }

    pub fn pushed_count(&self) -> usize {
        lock(&self.state).results.len()
    }

    pub fn snapshot(&self) -> Value {
        let state = lock(&self.state);
        let categories: Vec<Value> = state.categories.iter().map(|c| c.serialize()).collect();
        let results: Vec<Value> = state.results.iter().map(ScopeResult::serialize).collect();
        json!({
            "session": state.session.to_value(),
            "categories": categories,
            "departments": state.departments.as_ref().map(|root| root.serialize()),
            "results": results,
            "filters": state.filters,
            "filter_state": state.filter_state,
        })
    }
}

fn validate_filters(filters: &[Variant]) -> Result<()> {
    let mut ids = HashSet::new();
    for (idx, filter) in filters.iter().enumerate() {
        let object = filter.as_object().ok_or_else(|| {
            Error::invalid(format!(
                "filter {idx} must be an object, got {}",
                variant::type_name(filter)
            ))
        })?;
        let id = object.get("id").and_then(Value::as_str).unwrap_or("");
        if id.is_empty() {
            return Err(Error::invalid(format!("filter {idx} has no id")));
        }
        if object.get("filter_type").and_then(Value::as_str).is_none() {
            return Err(Error::invalid(format!("filter '{id}' has no filter_type")));
        }
        if !ids.insert(id) {
            return Err(Error::invalid(format!("duplicate filter id '{id}'")));
        }
    }
    Ok(())
}

#[derive(Debug, Default)]
pub struct PreviewReply {
    state: Mutex<PreviewState>,
}

#[derive(Debug, Default)]
struct PreviewState {
    session: Session,
    layouts: Vec<ColumnLayout>,
    widgets: Vec<PreviewWidget>,
    attrs: VariantMap,
}

impl SharedObject for PreviewReply {
    const KIND: SharedKind = SharedKind::PreviewReply;
}

impl PreviewReply {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn finished(&self) -> Result<()> {
        lock(&self.state).session.finish(PREVIEW, Completion::Finished)
    }

    pub fn error(&self, message: impl Into<String>) -> Result<()> {
        lock(&self.state)
            .session
            .finish(PREVIEW, Completion::Error(message.into()))
    }

    pub fn completion(&self) -> Option<Completion> {
        lock(&self.state).session.completion.clone()
    }

    pub fn register_layout(&self, layouts: Vec<ColumnLayout>) -> Result<()> {
        let mut state = lock(&self.state);
        state.session.ensure_open(PREVIEW, "register_layout")?;
        if !state.layouts.is_empty() {
            return Err(Error::logic("register_layout: layouts are already registered"));
        }
        if !state.widgets.is_empty() {
            return Err(Error::logic(
                "register_layout: must be called before any widgets are pushed",
            ));
        }
        let mut counts = HashSet::new();
        for layout in &layouts {
            if !counts.insert(layout.number_of_columns()) {
                return Err(Error::invalid(format!(
                    "register_layout: duplicate layout for {} columns",
                    layout.number_of_columns()
                )));
            }
        }
        state.layouts = layouts;
        Ok(())
    }

    pub fn push_widgets(&self, widgets: Vec<PreviewWidget>) -> Result<()> {
        let mut state = lock(&self.state);
        state.session.ensure_open(PREVIEW, "push_widgets")?;
        let mut ids: HashSet<&str> = state.widgets.iter().map(PreviewWidget::id).collect();
        for widget in &widgets {
            if !ids.insert(widget.id()) {
                return Err(Error::invalid(format!(
                    "widget '{}' was already pushed",
                    widget.id()
                )));
            }
        }
        state.widgets.extend(widgets);
        Ok(())
    }

    pub fn push_attr(&self, key: &str, value: Variant) -> Result<()> {
        let mut state = lock(&self.state);
        state.session.ensure_open(PREVIEW, "push_attr")?;
        if key.is_empty() {
            return Err(Error::invalid("attribute name must not be empty"));
        }
        state.attrs.insert(key.to_string(), value);
        Ok(())
    }

    pub fn widget_count(&self) -> usize {
        lock(&self.state).widgets.len()
    }

    pub fn snapshot(&self) -> Value {
        let state = lock(&self.state);
        let layouts: Vec<Value> = state.layouts.iter().map(ColumnLayout::serialize).collect();
        let widgets: Vec<Value> = state.widgets.iter().map(PreviewWidget::to_value).collect();
        json!({
            "session": state.session.to_value(),
            "layouts": layouts,
            "widgets": widgets,
            "attrs": state.attrs,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::query::CannedQuery;

    fn registered_result(reply: &SearchReply) -> ScopeResult {
        let category = reply
            .register_category("apps", "Apps", "", VariantMap::new())
            .unwrap();
        let mut result = ScopeResult::categorised(category);
        result.set_attr("uri", json!("app://one")).unwrap();
        result
    }

    #[test]
    fn push_after_finish_is_rejected_without_counting() {
        let reply = SearchReply::new();
        let result = registered_result(&reply);
        reply.push(&result).unwrap();
        reply.finished().unwrap();
        let err = reply.push(&result).unwrap_err();
        assert_eq!(err.to_string(), "Logic: push: search reply is already finished");
        assert_eq!(reply.pushed_count(), 1);
    }

    #[test]
    fn second_finish_is_a_logic_error() {
        let reply = SearchReply::new();
        reply.error("backend unavailable").unwrap();
        assert!(reply.finished().is_err());
        assert_eq!(
            reply.completion(),
            Some(Completion::Error("backend unavailable".to_string()))
        );
    }

    #[test]
    fn duplicate_category_is_rejected() {
        let reply = SearchReply::new();
        reply.register_category("a", "A", "", VariantMap::new()).unwrap();
        assert!(reply.register_category("a", "A", "", VariantMap::new()).is_err());
    }

    #[test]
    fn push_requires_a_category_from_this_reply() {
        let reply = SearchReply::new();
        assert!(reply.push(&ScopeResult::new()).is_err());

        let other = SearchReply::new();
        let foreign = registered_result(&other);
        reply.register_category("apps", "Apps", "", VariantMap::new()).unwrap();
        let err = reply.push(&foreign).unwrap_err();
        assert!(err.to_string().contains("not registered"));
        assert_eq!(reply.pushed_count(), 0);
    }

    #[test]
    fn filters_are_validated() {
        let reply = SearchReply::new();
        let bad = vec![json!({"id": "genre"})];
        assert!(reply.push_filters(bad, VariantMap::new()).is_err());
        let good = vec![json!({"id": "genre", "filter_type": "option_selector"})];
        reply.push_filters(good, VariantMap::new()).unwrap();
        assert_eq!(reply.snapshot()["filters"][0]["id"], "genre");
    }

    #[test]
    fn departments_are_validated_on_registration() {
        let reply = SearchReply::new();
        let query = CannedQuery::new("store", "", "");
        let root = Arc::new(Department::new("", &query, "All").unwrap());
        let child = Arc::new(Department::new("games", &query, "Games").unwrap());
        root.add_subdepartment(child.clone()).unwrap();
        root.add_subdepartment(child).unwrap();
        assert!(reply.register_departments(root).is_err());
    }

    fn widget(id: &str) -> PreviewWidget {
        PreviewWidget::from_json(&format!(r#"{{"id":"{id}","type":"text"}}"#)).unwrap()
    }

    #[test]
    fn layouts_must_come_first_and_be_distinct() {
        let reply = PreviewReply::new();
        let one = ColumnLayout::new(1).unwrap();
        let err = reply
            .register_layout(vec![one.clone(), one.clone()])
            .unwrap_err();
        assert!(err.to_string().contains("duplicate layout"));

        reply.register_layout(vec![one.clone()]).unwrap();
        assert!(reply.register_layout(vec![one]).is_err());

        let late = PreviewReply::new();
        late.push_widgets(vec![widget("a")]).unwrap();
        assert!(late.register_layout(vec![ColumnLayout::new(2).unwrap()]).is_err());
    }

    #[test]
    fn duplicate_widget_ids_are_rejected_atomically() {
        let reply = PreviewReply::new();
        reply.push_widgets(vec![widget("a")]).unwrap();
        assert!(reply.push_widgets(vec![widget("b"), widget("a")]).is_err());
        assert_eq!(reply.widget_count(), 1);
    }
}

//! Purpose: Department tree node, shared between the caller and the reply it is registered on.
//! Exports: `Department`.
//! Role: Mutable after construction (labels, children) through an entity-owned lock.
//! Invariants: Label is non-empty; the node's query always targets the node's own id.
//! Invariants: Children never reach back to their parent, so the `Arc` graph stays acyclic.
//! Invariants: A tree accepted by `validate_tree` has unique non-empty ids.
use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde_json::{Value, json};

use super::query::CannedQuery;
use crate::core::error::{Error, Result};
use crate::core::shared::{SharedKind, SharedObject};

#[derive(Debug)]
pub struct Department {
    id: String,
    label: String,
    query: CannedQuery,
    state: Mutex<DepartmentState>,
}

#[derive(Debug, Default)]
struct DepartmentState {
    alternate_label: String,
    has_subdepartments: bool,
    subdepartments: Vec<Arc<Department>>,
}

impl SharedObject for Department {
    const KIND: SharedKind = SharedKind::Department;
}

impl Department {
    pub fn new(id: impl Into<String>, query: &CannedQuery, label: impl Into<String>) -> Result<Self> {
        let id = id.into();
        let label = label.into();
        if label.is_empty() {
            return Err(Error::invalid(format!(
                "department '{id}' requires a non-empty label"
            )));
        }
        let mut query = query.clone();
        query.set_department_id(id.clone());
        Ok(Self {
            id,
            label,
            query,
            state: Mutex::new(DepartmentState::default()),
        })
    }

    fn state(&self) -> MutexGuard<'_, DepartmentState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn query(&self) -> &CannedQuery {
        &self.query
    }

    pub fn alternate_label(&self) -> String {
        self.state().alternate_label.clone()
    }

    pub fn set_alternate_label(&self, label: impl Into<String>) {
        self.state().alternate_label = label.into();
    }

    pub fn set_has_subdepartments(&self, flag: bool) {
        self.state().has_subdepartments = flag;
    }

    pub fn has_subdepartments(&self) -> bool {
        let state = self.state();
        state.has_subdepartments || !state.subdepartments.is_empty()
    }

    pub fn add_subdepartment(&self, child: Arc<Department>) -> Result<()> {
        self.reject_cycle(&child)?;
        self.state().subdepartments.push(child);
        Ok(())
    }

    pub fn set_subdepartments(&self, children: Vec<Arc<Department>>) -> Result<()> {
        for child in &children {
            self.reject_cycle(child)?;
        }
        self.state().subdepartments = children;
        Ok(())
    }

    pub fn subdepartments(&self) -> Vec<Arc<Department>> {
        self.state().subdepartments.clone()
    }

    fn reject_cycle(&self, child: &Arc<Department>) -> Result<()> {
        if std::ptr::eq(self, Arc::as_ptr(child)) {
            return Err(Error::invalid(format!(
                "department '{}' cannot be its own subdepartment",
                self.id
            )));
        }
        if child.reaches(self, &mut Vec::new()) {
            return Err(Error::invalid(format!(
                "department '{}' is already below '{}'",
                self.id, child.id
            )));
        }
        Ok(())
    }

    fn reaches(&self, target: &Department, visited: &mut Vec<*const Department>) -> bool {
        let me = self as *const Department;
        if std::ptr::eq(me, target) {
            return true;
        }
        if visited.contains(&me) {
            return false;
        }
        visited.push(me);
        self.subdepartments()
            .iter()
            .any(|child| child.reaches(target, visited))
    }

    /// Checks the whole tree below this node before it is handed to a reply.
    pub fn validate_tree(&self) -> Result<()> {
        let mut seen = HashSet::new();
        let mut path = Vec::new();
        self.walk(&mut seen, &mut path)
    }

    fn walk(&self, seen: &mut HashSet<String>, path: &mut Vec<*const Department>) -> Result<()> {
        let me = self as *const Department;
        if path.contains(&me) {
            return Err(Error::invalid(format!(
                "department '{}' contains itself",
                self.id
            )));
        }
        if !self.id.is_empty() && !seen.insert(self.id.clone()) {
            return Err(Error::invalid(format!(
                "duplicate department id '{}'",
                self.id
            )));
        }
        path.push(me);
        for child in self.subdepartments() {
            child.walk(seen, path)?;
        }
        path.pop();
        Ok(())
    }

    pub fn serialize(&self) -> Value {
        let children: Vec<Value> = self
            .subdepartments()
            .iter()
            .map(|child| child.serialize())
            .collect();
        let mut value = json!({
            "department_id": self.id,
            "label": self.label,
            "query": self.query.to_uri(),
            "has_subdepartments": self.has_subdepartments(),
        });
        let alternate = self.alternate_label();
        if !alternate.is_empty() {
            value["alternate_label"] = Value::String(alternate);
        }
        if !children.is_empty() {
            value["departments"] = Value::Array(children);
        }
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dept(id: &str) -> Arc<Department> {
        let query = CannedQuery::new("store", "", "");
        Arc::new(Department::new(id, &query, format!("Label {id}")).unwrap())
    }

    #[test]
    fn query_targets_the_department() {
        let node = dept("games");
        assert_eq!(node.query().department_id(), "games");
        assert_eq!(node.query().scope_id(), "store");
    }

    #[test]
    fn empty_label_is_rejected() {
        let query = CannedQuery::new("store", "", "");
        assert!(Department::new("x", &query, "").is_err());
    }

    #[test]
    fn children_imply_has_subdepartments() {
        let root = dept("");
        assert!(!root.has_subdepartments());
        root.set_has_subdepartments(true);
        assert!(root.has_subdepartments());
        root.set_has_subdepartments(false);
        root.add_subdepartment(dept("games")).unwrap();
        assert!(root.has_subdepartments());
    }

    #[test]
    fn self_child_is_rejected() {
        let root = dept("");
        assert!(root.add_subdepartment(root.clone()).is_err());
        assert!(root.set_subdepartments(vec![root.clone()]).is_err());
    }

    #[test]
    fn duplicate_ids_fail_validation() {
        let root = dept("");
        let games = dept("games");
        games.add_subdepartment(dept("games")).unwrap();
        root.add_subdepartment(games).unwrap();
        let err = root.validate_tree().unwrap_err();
        assert_eq!(err.to_string(), "InvalidArgument: duplicate department id 'games'");
    }

    #[test]
    fn indirect_cycles_are_rejected() {
        let a = dept("a");
        let b = dept("b");
        let c = dept("c");
        a.add_subdepartment(b.clone()).unwrap();
        b.add_subdepartment(c.clone()).unwrap();

        let err = c.add_subdepartment(a.clone()).unwrap_err();
        assert_eq!(err.to_string(), "InvalidArgument: department 'c' is already below 'a'");
        assert!(b.set_subdepartments(vec![dept("d"), a.clone()]).is_err());
        assert_eq!(b.subdepartments().len(), 1);
        assert!(!c.has_subdepartments());
        assert!(a.validate_tree().is_ok());
    }

    #[test]
    fn shared_child_in_two_branches_is_not_a_cycle() {
        let root = dept("");
        let left = dept("left");
        let right = dept("right");
        let leaf = dept("leaf");
        left.add_subdepartment(leaf.clone()).unwrap();
        right.add_subdepartment(leaf).unwrap();
        root.add_subdepartment(left).unwrap();
        root.add_subdepartment(right.clone()).unwrap();
        assert!(right.add_subdepartment(dept("other")).is_ok());
        assert_eq!(
            root.validate_tree().unwrap_err().to_string(),
            "InvalidArgument: duplicate department id 'leaf'"
        );
    }

    #[test]
    fn empty_ids_are_not_checked_for_uniqueness() {
        let root = dept("");
        root.add_subdepartment(dept("")).unwrap();
        root.add_subdepartment(dept("games")).unwrap();
        assert!(root.validate_tree().is_ok());
    }
}

//! Purpose: Result category registered on a search reply.
//! Exports: `Category`.
//! Role: Shared, immutable once registered; results keep an `Arc` to their category.
use serde_json::{Value, json};

use crate::core::shared::{SharedKind, SharedObject};
use crate::core::variant::VariantMap;

#[derive(Debug, PartialEq)]
pub struct Category {
    id: String,
    title: String,
    icon: String,
    renderer_template: VariantMap,
}

impl SharedObject for Category {
    const KIND: SharedKind = SharedKind::Category;
}

impl Category {
    pub(crate) fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        icon: impl Into<String>,
        renderer_template: VariantMap,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            icon: icon.into(),
            renderer_template,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn icon(&self) -> &str {
        &self.icon
    }

    pub fn renderer_template(&self) -> &VariantMap {
        &self.renderer_template
    }

    pub fn serialize(&self) -> Value {
        json!({
            "id": self.id,
            "title": self.title,
            "icon": self.icon,
            "renderer_template": self.renderer_template,
        })
    }
}

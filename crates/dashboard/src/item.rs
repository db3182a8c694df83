use serde::Serialize;
use serde_json::Value as JsonValue;

use crate::error::DashboardError;

/// A self-contained, read-only widget of the dashboard.
pub trait DashboardItem {
    /// Stable identifier (e.g. "most_recent_transactions").
    fn id(&self) -> &'static str;

    fn name(&self) -> &'static str;

    fn description(&self) -> &'static str;

    /// Current content of the item. Must not mutate inventory data.
    fn render(&self) -> Result<JsonValue, DashboardError>;
}

/// Output of one [`DashboardItem::render`] call.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderedItem {
    pub id: &'static str,
    pub name: &'static str,
    pub content: JsonValue,
}

/// Ordered set of dashboard items, unique by id.
#[derive(Default)]
pub struct DashboardRegistry<'a> {
    items: Vec<Box<dyn DashboardItem + 'a>>,
}

impl<'a> DashboardRegistry<'a> {
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Register `item`, replacing any item with the same id.
    pub fn add(&mut self, item: impl DashboardItem + 'a) -> &mut Self {
        if let Some(pos) = self.items.iter().position(|i| i.id() == item.id()) {
            tracing::debug!(item = item.id(), "replacing dashboard item");
            self.items[pos] = Box::new(item);
        } else {
            self.items.push(Box::new(item));
        }
        self
    }

    pub fn ids(&self) -> Vec<&'static str> {
        self.items.iter().map(|i| i.id()).collect()
    }

    pub fn render(&self, id: &str) -> Result<RenderedItem, DashboardError> {
        let item = self
            .items
            .iter()
            .find(|i| i.id() == id)
            .ok_or_else(|| DashboardError::UnknownItem(id.to_string()))?;
        render_one(item.as_ref())
    }

    pub fn render_all(&self) -> Result<Vec<RenderedItem>, DashboardError> {
        self.items.iter().map(|i| render_one(i.as_ref())).collect()
    }
}

fn render_one(item: &dyn DashboardItem) -> Result<RenderedItem, DashboardError> {
    Ok(RenderedItem {
        id: item.id(),
        name: item.name(),
        content: item.render()?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    struct Fixed(&'static str, i64);

    impl DashboardItem for Fixed {
        fn id(&self) -> &'static str {
            self.0
        }

        fn name(&self) -> &'static str {
            "fixed"
        }

        fn description(&self) -> &'static str {
            "always the same"
        }

        fn render(&self) -> Result<JsonValue, DashboardError> {
            Ok(json!(self.1))
        }
    }

    #[test]
    fn items_render_in_registration_order() {
        let mut registry = DashboardRegistry::new();
        registry.add(Fixed("b", 2)).add(Fixed("a", 1));
        assert_eq!(registry.ids(), vec!["b", "a"]);

        let rendered = registry.render_all().unwrap();
        assert_eq!(rendered[0].content, json!(2));
        assert_eq!(rendered[1].content, json!(1));
    }

    #[test]
    fn same_id_replaces_item() {
        let mut registry = DashboardRegistry::new();
        registry.add(Fixed("a", 1)).add(Fixed("a", 3));
        assert_eq!(registry.ids(), vec!["a"]);
        assert_eq!(registry.render("a").unwrap().content, json!(3));
    }

    #[test]
    fn unknown_item_is_an_error() {
        let registry = DashboardRegistry::new();
        assert!(matches!(
            registry.render("nope"),
            Err(DashboardError::UnknownItem(id)) if id == "nope"
        ));
    }
}

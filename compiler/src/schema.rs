use std::collections::BTreeMap;

use serde::Serialize;

use crate::types::{EntityNode, EnumNode};
use crate::views::{build_views, EntityViews};

/// The validated declarations of a document.
///
/// Entities and enums share one namespace. Views are stored beside the
/// entities, keyed by entity name; this is the lookup used by `alter` and
/// route handling.
#[derive(Debug, Default, Clone, PartialEq, Serialize)]
pub struct Schema {
    entities: Vec<EntityNode>,
    enums:    Vec<EnumNode>,
    views:    BTreeMap<String, EntityViews>,
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entity(name).is_some() || self.enum_node(name).is_some()
    }

    /// Adds a validated entity and derives its views. Hands the entity back
    /// when the name is already taken.
    pub fn register_entity(&mut self, entity: EntityNode) -> Result<(), EntityNode> {
        if self.contains(&entity.name) {
            return Err(entity);
        }
        self.views.insert(entity.name.clone(), build_views(&entity));
        self.entities.push(entity);
        Ok(())
    }

    /// Adds a validated enum. Hands it back when the name is already taken.
    pub fn register_enum(&mut self, node: EnumNode) -> Result<(), EnumNode> {
        if self.contains(&node.name) {
            return Err(node);
        }
        self.enums.push(node);
        Ok(())
    }

    pub fn entity(&self, name: &str) -> Option<&EntityNode> {
        self.entities.iter().find(|e| e.name == name)
    }

    pub fn enum_node(&self, name: &str) -> Option<&EnumNode> {
        self.enums.iter().find(|e| e.name == name)
    }

    pub fn views(&self, name: &str) -> Option<&EntityViews> {
        self.views.get(name)
    }

    /// Entities in declaration order.
    pub fn entities(&self) -> &[EntityNode] {
        &self.entities
    }

    /// Enums in declaration order.
    pub fn enums(&self) -> &[EnumNode] {
        &self.enums
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{DataType, Field, FieldKind};

    fn user() -> EntityNode {
        EntityNode {
            name:   "user".into(),
            line:   1,
            column: 1,
            fields: vec![Field::new("name", FieldKind::Primitive(DataType::Text), 1, 1)],
        }
    }

    #[test]
    fn test_register_derives_views() {
        let mut schema = Schema::new();
        schema.register_entity(user()).unwrap();
        let views = schema.views("user").unwrap();
        assert!(views.payload.contains("name"));
        assert!(views.response.contains("name"));
    }

    #[test]
    fn test_names_are_shared_between_entities_and_enums() {
        let mut schema = Schema::new();
        schema.register_entity(user()).unwrap();
        let clash = EnumNode { name: "user".into(), line: 2, column: 1, members: vec![] };
        assert!(schema.register_enum(clash).is_err());
        assert!(schema.register_entity(user()).is_err());
        assert_eq!(schema.entities().len(), 1);
        assert!(schema.enums().is_empty());
    }
}

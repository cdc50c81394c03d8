//! Payload and response projections of an entity.
//!
//! A view is derived from a validated [`EntityNode`] and lives next to it in
//! the [`Schema`](crate::schema::Schema); the node itself is never changed.

use std::collections::HashSet;

use serde::Serialize;

use crate::types::{DataType, EntityNode, Field};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ViewField {
    pub name:      String,
    pub data_type: DataType,
}

/// An ordered set of `(name, data_type)` pairs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EntityObject {
    pub fields: Vec<ViewField>,
}

impl EntityObject {
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.fields.iter().any(|f| f.name == name)
    }

    pub fn names(&self) -> Vec<&str> {
        self.fields.iter().map(|f| f.name.as_str()).collect()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EntityViews {
    /// What a client may send when creating the entity.
    pub payload:  EntityObject,
    /// What the server sends back.
    pub response: EntityObject,
}

/// Projects the fields of `entity` selected by `predicate`, keeping source
/// order. A name is never emitted twice. No match yields an empty view.
pub fn build_view<P>(entity: &EntityNode, predicate: P) -> EntityObject
where
    P: Fn(&Field) -> bool,
{
    let mut seen = HashSet::new();
    let fields = entity
        .fields
        .iter()
        .filter(|f| predicate(f))
        .filter(|f| seen.insert(f.name.as_str()))
        .map(|f| ViewField {
            name:      f.name.clone(),
            data_type: f.data_type(),
        })
        .collect();
    EntityObject { fields }
}

pub fn payload_view(entity: &EntityNode) -> EntityObject {
    build_view(entity, Field::is_payload)
}

pub fn response_view(entity: &EntityNode) -> EntityObject {
    build_view(entity, Field::is_response)
}

pub fn build_views(entity: &EntityNode) -> EntityViews {
    EntityViews {
        payload:  payload_view(entity),
        response: response_view(entity),
    }
}

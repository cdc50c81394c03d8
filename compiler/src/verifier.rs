use std::collections::{HashMap, HashSet};

use crate::{
    attributes::{allowed_for, Attribute},
    diagnostics::{Diagnostic, Severity},
    schema::Schema,
    token::is_keyword,
    types::{DataType, EntityNode, Field, FieldKind},
    utils::{join_names, quote},
};

/// Attributes with a dedicated rule below. They are left out of the generic
/// table check so each problem is reported once.
const RULE_CHECKED: Attribute = Attribute::INCREMENT
    .union(Attribute::HASH)
    .union(Attribute::OVERRIDE);

/// Checks one field's attribute set against its data type and the
/// combination rules. Every violation is reported, not just the first.
pub fn verify_field(field: &Field, file: &str) -> Vec<Diagnostic> {
    let mut out = Vec::new();
    let mut report = |severity: Severity, msg: String| {
        out.push(Diagnostic::new(severity, msg, field.line, field.column, file));
    };

    let attrs = field.attributes;
    let data_type = field.data_type();
    let name = quote(&field.name);

    // 1) Attributes the type does not accept at all
    let invalid = attrs
        .difference(allowed_for(data_type))
        .difference(RULE_CHECKED);
    if !invalid.is_empty() {
        let type_desc = match field.kind {
            FieldKind::Primitive(dt) => format!("type {}", dt),
            _ => format!("{} fields", field.kind.as_str()),
        };
        report(
            Severity::Error,
            format!(
                "invalid attribute(s) {} on field {}: not allowed for {}",
                join_names(invalid.names()),
                name,
                type_desc
            ),
        );
    }

    // 2) Primary implies unique and required
    if attrs.contains(Attribute::PRIMARY) {
        if !attrs.contains(Attribute::UNIQUE) {
            report(Severity::Error, format!("primary key field {} must also be unique", name));
        }
        if !attrs.contains(Attribute::REQUIRED) {
            report(Severity::Error, format!("primary key field {} must also be required", name));
        }
        if attrs.contains(Attribute::UNIQUE) {
            report(
                Severity::Warning,
                format!("field {} is primary and unique; primary already implies unique", name),
            );
        }
    }

    // 3) Increment is an int-only, server generated value
    if attrs.contains(Attribute::INCREMENT) {
        if data_type != DataType::Int {
            report(
                Severity::Error,
                format!("increment is only valid for int fields, field {} is {}", name, data_type),
            );
        }
        if !attrs.contains(Attribute::REQUIRED) {
            report(Severity::Error, format!("increment field {} must also be required", name));
        }
    }

    // 4) Hashing only applies to text
    if attrs.contains(Attribute::HASH) && data_type != DataType::Text {
        report(
            Severity::Error,
            format!("hash is only valid for text fields, field {} is {}", name, data_type),
        );
    }

    if attrs.contains(Attribute::READONLY | Attribute::DEFAULT) {
        report(
            Severity::Error,
            format!("readonly and default attributes conflict on field {}", name),
        );
    }

    if attrs.contains(Attribute::OVERRIDE) && field.is_primitive() {
        report(
            Severity::Warning,
            format!("override on primitive field {} has no effect", name),
        );
    }

    // 5) A default must be one of the listed values
    if let Some(default) = &field.default {
        if !field.enum_values.is_empty() && !field.enum_values.iter().any(|v| default.matches(v)) {
            report(
                Severity::Error,
                format!("default value {} of field {} is not one of its listed values", default, name),
            );
        }
    }

    out
}

/// Whole-entity checks that need sibling context: duplicate names, keyword
/// collisions and repeated enum values.
pub fn cleanup_entity(entity: &EntityNode, file: &str) -> Vec<Diagnostic> {
    let mut out = Vec::new();
    let mut seen: HashSet<&str> = HashSet::new();

    for field in &entity.fields {
        let at = |msg: String| Diagnostic::new(Severity::Error, msg, field.line, field.column, file);

        if !seen.insert(field.name.as_str()) {
            out.push(at(format!(
                "field {} is declared more than once in entity {}",
                quote(&field.name),
                quote(&entity.name)
            )));
        }

        if !field.escaped && is_keyword(&field.name) {
            out.push(at(format!(
                "field name {} is a reserved keyword; write it as *{} to use it anyway",
                quote(&field.name),
                field.name
            )));
        }

        let mut values = Vec::with_capacity(field.enum_values.len());
        for value in &field.enum_values {
            if values.contains(&value) {
                out.push(at(format!(
                    "duplicate enum value {} in field {}",
                    value,
                    quote(&field.name)
                )));
                continue;
            }
            values.push(value);
        }
    }

    out
}

/// Cross-entity checks run once the whole document is parsed.
///
/// References are resolved by name. A missing target is only a warning since
/// the target may be declared in another document. Embedding an entity in
/// itself, directly or through other entities, is an error.
pub fn verify_links(schema: &Schema, file: &str) -> Vec<Diagnostic> {
    let mut out = Vec::new();

    for entity in schema.entities() {
        for field in &entity.fields {
            let at = |severity, msg: String| {
                Diagnostic::new(severity, msg, field.line, field.column, file)
            };
            match &field.kind {
                FieldKind::Reference(target) => match schema.entity(&target.entity) {
                    None => out.push(at(
                        Severity::Warning,
                        format!(
                            "field {} references unknown entity {}",
                            quote(&field.name),
                            quote(&target.entity)
                        ),
                    )),
                    Some(referenced) if referenced.field(&target.field).is_none() => out.push(at(
                        Severity::Warning,
                        format!(
                            "field {} references unknown field {}",
                            quote(&field.name),
                            quote(&target.to_string())
                        ),
                    )),
                    Some(_) => {}
                },
                FieldKind::Embedded(embedded) if schema.entity(embedded).is_none() => out.push(at(
                    Severity::Warning,
                    format!(
                        "entity {} embeds unknown entity {}",
                        quote(&entity.name),
                        quote(embedded)
                    ),
                )),
                _ => {}
            }
        }
    }

    // 0 = unvisited (absent), 1 = on the current path, 2 = done
    let mut state: HashMap<&str, u8> = HashMap::new();
    fn check_recursion<'s>(
        entity: &'s EntityNode,
        schema: &'s Schema,
        state: &mut HashMap<&'s str, u8>,
        file: &str,
        out: &mut Vec<Diagnostic>,
    ) {
        match state.get(entity.name.as_str()) {
            Some(1) => {
                out.push(Diagnostic::new(
                    Severity::Error,
                    format!("recursive embedding of {} is not allowed", quote(&entity.name)),
                    entity.line,
                    entity.column,
                    file,
                ));
                return;
            }
            Some(_) => return,
            None => {}
        }
        state.insert(entity.name.as_str(), 1);
        for field in &entity.fields {
            if let FieldKind::Embedded(name) = &field.kind {
                if let Some(inner) = schema.entity(name) {
                    check_recursion(inner, schema, state, file, out);
                }
            }
        }
        state.insert(entity.name.as_str(), 2);
    }

    for entity in schema.entities() {
        check_recursion(entity, schema, &mut state, file, &mut out);
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{DefaultValue, EnumLiteral, ReferenceTarget};

    fn int_field(attrs: Attribute) -> Field {
        let mut field = Field::new("id", FieldKind::Primitive(DataType::Int), 1, 1);
        field.attributes = attrs;
        field
    }

    fn errors(diags: &[Diagnostic]) -> Vec<&str> {
        diags.iter().filter(|d| d.is_error()).map(|d| d.message.as_str()).collect()
    }

    #[test]
    fn test_valid_identity_column() {
        let diags = verify_field(&int_field(Attribute::INCREMENT | Attribute::REQUIRED), "");
        assert!(diags.is_empty(), "{diags:?}");
    }

    #[test]
    fn test_increment_requires_required() {
        let diags = verify_field(&int_field(Attribute::INCREMENT), "");
        assert_eq!(errors(&diags), vec!["increment field \"id\" must also be required"]);
    }

    #[test]
    fn test_primary_collects_every_missing_implication() {
        let diags = verify_field(&int_field(Attribute::PRIMARY), "");
        assert_eq!(
            errors(&diags),
            vec![
                "primary key field \"id\" must also be unique",
                "primary key field \"id\" must also be required",
            ]
        );
    }

    #[test]
    fn test_primary_and_unique_is_only_a_warning() {
        let diags = verify_field(
            &int_field(Attribute::PRIMARY | Attribute::UNIQUE | Attribute::REQUIRED),
            "",
        );
        assert!(errors(&diags).is_empty());
        assert_eq!(diags.len(), 1);
        assert!(diags[0].is_warning());
    }

    #[test]
    fn test_hash_and_increment_on_wrong_types() {
        let mut field = Field::new("email", FieldKind::Primitive(DataType::Float), 1, 1);
        field.attributes = Attribute::HASH | Attribute::INCREMENT | Attribute::REQUIRED;
        let diags = verify_field(&field, "");
        assert_eq!(errors(&diags).len(), 2);
    }

    #[test]
    fn test_table_rejects_unique_on_bool() {
        let mut field = Field::new("active", FieldKind::Primitive(DataType::Bool), 1, 1);
        field.attributes = Attribute::UNIQUE;
        let diags = verify_field(&field, "");
        assert_eq!(
            errors(&diags),
            vec!["invalid attribute(s) \"unique\" on field \"active\": not allowed for type bool"]
        );
    }

    #[test]
    fn test_readonly_default_conflict() {
        let mut field = Field::new("name", FieldKind::Primitive(DataType::Text), 1, 1);
        field.attributes = Attribute::READONLY | Attribute::DEFAULT;
        field.default = Some(DefaultValue::Str("x".into()));
        assert_eq!(errors(&verify_field(&field, "")).len(), 1);
    }

    #[test]
    fn test_override_on_primitive_warns() {
        let mut field = Field::new("name", FieldKind::Primitive(DataType::Text), 1, 1);
        field.attributes = Attribute::OVERRIDE;
        let diags = verify_field(&field, "");
        assert_eq!(diags.len(), 1);
        assert!(diags[0].is_warning());
    }

    #[test]
    fn test_reference_fields_use_restricted_table() {
        let target = ReferenceTarget { entity: "user".into(), field: "id".into() };
        let mut field = Field::new("owner", FieldKind::Reference(target), 1, 1);
        field.attributes = Attribute::REQUIRED | Attribute::FOREIGN_KEY | Attribute::OVERRIDE;
        assert!(verify_field(&field, "").is_empty());

        field.attributes |= Attribute::UNIQUE;
        assert_eq!(errors(&verify_field(&field, "")).len(), 1);
    }

    #[test]
    fn test_default_must_be_listed_value() {
        let mut field = Field::new("gender", FieldKind::Primitive(DataType::Text), 1, 1);
        field.enum_values = vec![EnumLiteral::Str("male".into()), EnumLiteral::Str("female".into())];
        field.attributes = Attribute::DEFAULT;
        field.default = Some(DefaultValue::Str("other".into()));
        assert_eq!(errors(&verify_field(&field, "")).len(), 1);

        field.default = Some(DefaultValue::Str("female".into()));
        assert!(verify_field(&field, "").is_empty());
    }

    #[test]
    fn test_cleanup_reports_duplicates_and_keywords() {
        let mut gender = Field::new("gender", FieldKind::Primitive(DataType::Text), 2, 1);
        gender.enum_values = vec![
            EnumLiteral::Str("male".into()),
            EnumLiteral::Str("female".into()),
            EnumLiteral::Str("male".into()),
        ];
        let name_a = Field::new("name", FieldKind::Primitive(DataType::Text), 3, 1);
        let name_b = Field::new("name", FieldKind::Primitive(DataType::Text), 4, 1);
        let keyword = Field::new("end", FieldKind::Primitive(DataType::Text), 5, 1);
        let mut escaped = Field::new("text", FieldKind::Primitive(DataType::Text), 6, 1);
        escaped.escaped = true;

        let entity = EntityNode {
            name:   "user".into(),
            line:   1,
            column: 1,
            fields: vec![gender, name_a, name_b, keyword, escaped],
        };
        let diags = cleanup_entity(&entity, "");
        let lines: Vec<usize> = diags.iter().map(|d| d.line).collect();
        assert_eq!(lines, vec![2, 4, 5]);
    }
}

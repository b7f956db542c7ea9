//! Typed validation of untrusted nested documents.
//!
//! Operator-supplied configuration (the join deployment descriptor) enters the
//! system as raw JSON. A [`Schema`] describes the required key shape, walks the
//! document once, fills defaultable keys, and either hands back a document the
//! rest of the system may trust or a [`SchemaViolations`] list naming every
//! problem by structured path.
mod path;
pub use path::KeyPath;

mod violation;
pub use violation::{SchemaViolations, Violation};

use std::collections::BTreeMap;

use serde_json::Value;

/// Required shape of one position in a document.
///
/// - [`Schema::Scalar`] accepts any present value and never constrains it
///   (the control plane does not interpret leaf values).
/// - [`Schema::Mapping`] requires a JSON object and recursively constrains
///   its keys.
#[derive(Debug, Clone)]
pub enum Schema {
    Scalar,
    Mapping(MappingSchema),
}

impl Schema {
    /// A leaf position: the key must exist, its value is not interpreted.
    pub fn scalar() -> Self {
        Schema::Scalar
    }

    /// Validate `doc` against this schema, filling defaultable keys in place.
    ///
    /// On success the document is guaranteed to contain every key the schema
    /// names. On failure the document may be partially filled; callers must
    /// discard it. The walk is idempotent: re-validating a filled document
    /// changes nothing.
    pub fn validate_and_fill(&self, doc: &mut Value) -> Result<(), SchemaViolations> {
        let mut violations = Vec::new();
        self.walk(doc, &KeyPath::root(), &mut violations);
        if violations.is_empty() {
            Ok(())
        } else {
            Err(SchemaViolations::new(violations))
        }
    }

    fn walk(&self, doc: &mut Value, path: &KeyPath, out: &mut Vec<Violation>) {
        match self {
            Schema::Scalar => {}
            Schema::Mapping(mapping) => mapping.walk(doc, path, out),
        }
    }

    /// Whether an entirely absent value at this position can be synthesized
    /// from defaults alone.
    fn is_self_filling(&self) -> bool {
        match self {
            Schema::Scalar => false,
            Schema::Mapping(mapping) => mapping.is_self_filling(),
        }
    }
}

impl From<MappingSchema> for Schema {
    fn from(mapping: MappingSchema) -> Self {
        Schema::Mapping(mapping)
    }
}

/// Schema node requiring a JSON object with a fixed set of keys.
///
/// Keys present in the document but not in the schema are ignored: the
/// validator enforces completeness, not closedness.
#[derive(Debug, Clone, Default)]
pub struct MappingSchema {
    fields: BTreeMap<String, Field>,
}

#[derive(Debug, Clone)]
struct Field {
    schema: Schema,
    default: Option<Value>,
}

impl MappingSchema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a required key.
    pub fn field(mut self, name: impl Into<String>, schema: impl Into<Schema>) -> Self {
        self.fields.insert(
            name.into(),
            Field {
                schema: schema.into(),
                default: None,
            },
        );
        self
    }

    /// Add a defaultable key: absent in the document, `default` is inserted
    /// verbatim.
    pub fn defaulted(
        mut self,
        name: impl Into<String>,
        schema: impl Into<Schema>,
        default: Value,
    ) -> Self {
        self.fields.insert(
            name.into(),
            Field {
                schema: schema.into(),
                default: Some(default),
            },
        );
        self
    }

    fn walk(&self, doc: &mut Value, path: &KeyPath, out: &mut Vec<Violation>) {
        let Some(map) = doc.as_object_mut() else {
            out.push(Violation::ShapeMismatch { path: path.clone() });
            return;
        };

        for (name, field) in &self.fields {
            let child_path = path.child(name);
            match map.get_mut(name) {
                Some(child) => field.schema.walk(child, &child_path, out),
                None => {
                    if let Some(default) = &field.default {
                        map.insert(name.clone(), default.clone());
                    } else if field.schema.is_self_filling() {
                        // Create the intermediate mapping, then let the
                        // recursion fill its defaultable keys.
                        let inserted = map.entry(name.clone()).or_insert(Value::Object(
                            serde_json::Map::new(),
                        ));
                        field.schema.walk(inserted, &child_path, out);
                    } else {
                        out.push(Violation::MissingKey { path: child_path });
                    }
                }
            }
        }
    }

    fn is_self_filling(&self) -> bool {
        self.fields
            .values()
            .all(|f| f.default.is_some() || f.schema.is_self_filling())
    }
}

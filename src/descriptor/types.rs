//! Declarative resource descriptors: the field sets, constraints, and
//! behavior flags that drive the generic CRUD engine.

use serde_json::Value;

use crate::ident::IdStrategy;

#[derive(Clone, Debug, PartialEq)]
pub enum FieldType {
    String,
    Number,
    Boolean,
    Date,
    /// Closed value set; values outside it are rejected.
    Enum(Vec<String>),
    /// Homogeneous array; every element is validated against the element
    /// type (scalars or nested objects alike).
    Array(Box<FieldType>),
    /// Nested sub-document with its own field list.
    Object(Schema),
}

#[derive(Clone, Debug, PartialEq, Default)]
pub struct Schema {
    pub fields: Vec<FieldSpec>,
}

impl Schema {
    pub fn new(fields: Vec<FieldSpec>) -> Self {
        Schema { fields }
    }

    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct FieldSpec {
    pub name: String,
    pub field_type: FieldType,
    pub required: bool,
    /// Populated when the field is absent from input; implies the field
    /// is never missing from a stored record.
    pub default: Option<Value>,
    /// Lower bound for numeric fields.
    pub minimum: Option<f64>,
    /// Regex the (string) value must match.
    pub pattern: Option<String>,
}

impl FieldSpec {
    pub fn required(name: &str, field_type: FieldType) -> Self {
        FieldSpec {
            name: name.to_string(),
            field_type,
            required: true,
            default: None,
            minimum: None,
            pattern: None,
        }
    }

    pub fn optional(name: &str, field_type: FieldType) -> Self {
        FieldSpec {
            required: false,
            ..Self::required(name, field_type)
        }
    }

    pub fn with_default(mut self, default: Value) -> Self {
        self.default = Some(default);
        self.required = false;
        self
    }

    pub fn with_minimum(mut self, minimum: f64) -> Self {
        self.minimum = Some(minimum);
        self
    }

    pub fn with_pattern(mut self, pattern: &str) -> Self {
        self.pattern = Some(pattern.to_string());
        self
    }
}

/// Full replacement is the default everywhere; merge patches exist for
/// the one resource family that historically allowed them.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum UpdateSemantics {
    #[default]
    Replace,
    Merge,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

#[derive(Clone, Debug)]
pub struct ResourceDescriptor {
    /// URL path segment, e.g. "batch-cards".
    pub path: String,
    /// Storage collection name, e.g. "batch_cards".
    pub collection: String,
    /// Name of the engine-assigned identifier field, e.g. "batch_id".
    pub id_field: String,
    pub id_strategy: IdStrategy,
    pub schema: Schema,
    /// Natural keys (beyond the id field) that must be unique per collection.
    pub unique_fields: Vec<String>,
    /// Second lookup key tried after the id field on get/update/delete.
    pub alternate_lookup: Option<String>,
    /// Query parameters recognized as exact-match list filters.
    pub filters: Vec<String>,
    pub sort_field: String,
    pub sort_direction: SortDirection,
    pub requires_auth: bool,
    /// Inject `created_by` from the caller identity on create.
    pub captures_creator: bool,
    pub update: UpdateSemantics,
}

impl ResourceDescriptor {
    pub fn new(
        path: &str,
        collection: &str,
        id_field: &str,
        id_strategy: IdStrategy,
        schema: Schema,
    ) -> Self {
        ResourceDescriptor {
            path: path.to_string(),
            collection: collection.to_string(),
            id_field: id_field.to_string(),
            id_strategy,
            schema,
            unique_fields: Vec::new(),
            alternate_lookup: None,
            filters: Vec::new(),
            sort_field: "created_date".to_string(),
            sort_direction: SortDirection::Descending,
            requires_auth: false,
            captures_creator: false,
            update: UpdateSemantics::Replace,
        }
    }

    pub fn unique(mut self, fields: &[&str]) -> Self {
        self.unique_fields = fields.iter().map(|f| f.to_string()).collect();
        self
    }

    pub fn lookup_also_by(mut self, field: &str) -> Self {
        self.alternate_lookup = Some(field.to_string());
        self
    }

    pub fn filters(mut self, fields: &[&str]) -> Self {
        self.filters = fields.iter().map(|f| f.to_string()).collect();
        self
    }

    pub fn sort_by(mut self, field: &str, direction: SortDirection) -> Self {
        self.sort_field = field.to_string();
        self.sort_direction = direction;
        self
    }

    pub fn authenticated(mut self) -> Self {
        self.requires_auth = true;
        self
    }

    /// Authenticated resource whose records carry `created_by` from the
    /// caller identity.
    pub fn stamped_creator(mut self) -> Self {
        self.requires_auth = true;
        self.captures_creator = true;
        self
    }

    pub fn merge_updates(mut self) -> Self {
        self.update = UpdateSemantics::Merge;
        self
    }

    /// Fields the engine owns: assigned at create, preserved verbatim on
    /// every later mutation no matter what the caller supplies.
    /// `created_by` is engine-owned only where the engine injects it;
    /// elsewhere it is an ordinary schema field.
    pub fn protected_fields(&self) -> Vec<&str> {
        let mut fields = vec![self.id_field.as_str(), "created_date"];
        if self.captures_creator {
            fields.push("created_by");
        }
        fields
    }
}

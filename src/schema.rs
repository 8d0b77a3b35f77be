//! Schema declaration and the compiled schema descriptor.
//!
//! Users declare a tree of [`SchemaNode`]s (groups and primitive leaves with
//! repetition flags), and [`Schema::new`] compiles it into a flat pre-order
//! arena of [`FieldInfo`] entries plus one [`ColumnDescriptor`] per leaf.
//! Repetition and definition level maxima, paths, and ancestor/descendant
//! relationships are all resolved at construction; nothing walks the
//! declaration tree at runtime.

use std::sync::Arc;

use crate::basic::{Compression, ConvertedType, PhysicalType, Repetition};
use crate::error::{ParquetError, Result};
use crate::format::SchemaElement;

/// Declared type of a primitive leaf. Logical types resolve to a backing
/// physical type and, where applicable, a fixed length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogicalType {
    // Physical passthroughs
    Boolean,
    Int32,
    Int64,
    Int96,
    Float,
    Double,
    ByteArray,
    FixedLenByteArray(i32),

    // Annotated types
    Utf8,
    Json,
    Bson,
    Date,
    TimestampMillis,
    TimestampMicros,
    TimeMillis,
    TimeMicros,
    Interval,
    Decimal { precision: u8, scale: u8 },
}

impl LogicalType {
    /// The physical type backing this logical type.
    pub fn physical_type(&self) -> Result<PhysicalType> {
        Ok(match self {
            LogicalType::Boolean => PhysicalType::Boolean,
            LogicalType::Int32 | LogicalType::Date | LogicalType::TimeMillis => {
                PhysicalType::Int32
            }
            LogicalType::Int64
            | LogicalType::TimestampMillis
            | LogicalType::TimestampMicros
            | LogicalType::TimeMicros => PhysicalType::Int64,
            LogicalType::Int96 => PhysicalType::Int96,
            LogicalType::Float => PhysicalType::Float,
            LogicalType::Double => PhysicalType::Double,
            LogicalType::ByteArray | LogicalType::Utf8 | LogicalType::Json | LogicalType::Bson => {
                PhysicalType::ByteArray
            }
            LogicalType::FixedLenByteArray(_) | LogicalType::Interval => {
                PhysicalType::FixedLenByteArray
            }
            LogicalType::Decimal { precision, scale } => {
                if *precision == 0 || *precision > 18 {
                    return Err(ParquetError::schema(format!(
                        "DECIMAL precision {} out of supported range 1..=18",
                        precision
                    )));
                }
                if scale > precision {
                    return Err(ParquetError::schema(format!(
                        "DECIMAL scale {} exceeds precision {}",
                        scale, precision
                    )));
                }
                if *precision <= 9 {
                    PhysicalType::Int32
                } else {
                    PhysicalType::Int64
                }
            }
        })
    }

    /// Byte length for fixed-length physical types.
    pub fn type_length(&self) -> Option<i32> {
        match self {
            LogicalType::FixedLenByteArray(len) => Some(*len),
            LogicalType::Interval => Some(12),
            _ => None,
        }
    }

    /// Annotation recorded in file metadata, if any.
    pub fn converted_type(&self) -> Option<ConvertedType> {
        match self {
            LogicalType::Utf8 => Some(ConvertedType::Utf8),
            LogicalType::Json => Some(ConvertedType::Json),
            LogicalType::Bson => Some(ConvertedType::Bson),
            LogicalType::Date => Some(ConvertedType::Date),
            LogicalType::TimestampMillis => Some(ConvertedType::TimestampMillis),
            LogicalType::TimestampMicros => Some(ConvertedType::TimestampMicros),
            LogicalType::TimeMillis => Some(ConvertedType::TimeMillis),
            LogicalType::TimeMicros => Some(ConvertedType::TimeMicros),
            LogicalType::Interval => Some(ConvertedType::Interval),
            LogicalType::Decimal { .. } => Some(ConvertedType::Decimal),
            _ => None,
        }
    }
}

/// Represents a node in the declared schema tree
#[derive(Debug, Clone, PartialEq)]
pub enum SchemaNode {
    /// A group with named fields
    Group {
        name: String,
        repetition: Repetition,
        fields: Vec<SchemaNode>,
    },
    /// A primitive/leaf type
    Primitive {
        name: String,
        repetition: Repetition,
        logical_type: LogicalType,
        /// Overrides the writer's default compression for this column.
        compression: Option<Compression>,
    },
}

impl SchemaNode {
    /// Get the name of this schema node
    pub fn name(&self) -> &str {
        match self {
            SchemaNode::Group { name, .. } => name,
            SchemaNode::Primitive { name, .. } => name,
        }
    }

    /// Get the declared repetition of this node
    pub fn repetition(&self) -> Repetition {
        match self {
            SchemaNode::Group { repetition, .. } => *repetition,
            SchemaNode::Primitive { repetition, .. } => *repetition,
        }
    }
}

/// Builder for creating schemas
pub struct SchemaBuilder {
    root: Option<SchemaNode>,
}

impl SchemaBuilder {
    pub fn new() -> Self {
        Self { root: None }
    }

    pub fn with_root(mut self, root: SchemaNode) -> Self {
        self.root = Some(root);
        self
    }

    pub fn build(self) -> Result<Schema> {
        match self.root {
            Some(root) => Schema::new(root),
            None => Err(ParquetError::schema("Schema must have a root node")),
        }
    }
}

impl Default for SchemaBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// One entry in the compiled pre-order field arena.
#[derive(Debug, Clone)]
pub struct FieldInfo {
    pub name: Arc<str>,
    pub repetition: Repetition,
    /// Number of REPEATED ancestors, including this node.
    pub rep_level_max: u16,
    /// Number of non-REQUIRED ancestors, including this node.
    pub def_level_max: u16,
    /// Names from root (exclusive) to this node.
    pub path: Vec<Arc<str>>,
    pub kind: FieldKind,
}

#[derive(Debug, Clone)]
pub enum FieldKind {
    /// Indices of child fields in the arena.
    Group { children: Vec<usize> },
    /// Index into [`Schema::columns`].
    Leaf { column: usize },
}

impl FieldInfo {
    pub fn is_group(&self) -> bool {
        matches!(self.kind, FieldKind::Group { .. })
    }
}

/// A leaf column of the schema, in pre-order.
#[derive(Debug, Clone)]
pub struct ColumnDescriptor {
    pub path: Vec<Arc<str>>,
    pub logical_type: LogicalType,
    pub physical_type: PhysicalType,
    pub max_rep_level: u16,
    pub max_def_level: u16,
    pub compression: Option<Compression>,
    pub type_length: Option<i32>,
    /// Index of the leaf's [`FieldInfo`].
    pub field: usize,
    /// Field indices from root child down to the leaf.
    pub branch: Vec<usize>,
}

impl ColumnDescriptor {
    /// Dotted path, the form accepted by projections.
    pub fn path_string(&self) -> String {
        self.path.join(".")
    }
}

/// A compiled schema: the declared tree plus derived levels, paths, and
/// column descriptors. Immutable after construction.
#[derive(Debug, Clone)]
pub struct Schema {
    root_name: Arc<str>,
    pub(crate) fields: Vec<FieldInfo>,
    pub(crate) root_fields: Vec<usize>,
    columns: Vec<ColumnDescriptor>,
}

impl Schema {
    /// Compile a declared tree. The root must be a group.
    pub fn new(root: SchemaNode) -> Result<Self> {
        let SchemaNode::Group {
            name,
            fields: declared,
            ..
        } = root
        else {
            return Err(ParquetError::schema("Root schema node must be a group"));
        };
        if declared.is_empty() {
            return Err(ParquetError::schema("Root group has no fields"));
        }

        let mut schema = Schema {
            root_name: Arc::from(name.as_str()),
            fields: Vec::new(),
            root_fields: Vec::new(),
            columns: Vec::new(),
        };

        check_unique_names(&declared)?;
        let mut branch = Vec::new();
        for node in &declared {
            let idx = schema.compile_node(node, &[], 0, 0, &mut branch)?;
            schema.root_fields.push(idx);
        }
        Ok(schema)
    }

    fn compile_node(
        &mut self,
        node: &SchemaNode,
        parent_path: &[Arc<str>],
        rep: u16,
        def: u16,
        branch: &mut Vec<usize>,
    ) -> Result<usize> {
        let name: Arc<str> = Arc::from(node.name());
        if name.is_empty() {
            return Err(ParquetError::schema("Field name cannot be empty"));
        }
        let repetition = node.repetition();
        let rep_level_max = rep + u16::from(repetition == Repetition::Repeated);
        let def_level_max = def + u16::from(repetition != Repetition::Required);

        let mut path = parent_path.to_vec();
        path.push(name.clone());

        let index = self.fields.len();
        self.fields.push(FieldInfo {
            name,
            repetition,
            rep_level_max,
            def_level_max,
            path: path.clone(),
            kind: FieldKind::Group {
                children: Vec::new(),
            },
        });
        branch.push(index);

        match node {
            SchemaNode::Group { fields, .. } => {
                if fields.is_empty() {
                    return Err(ParquetError::schema(format!(
                        "Group '{}' has no fields",
                        path.join(".")
                    )));
                }
                check_unique_names(fields)?;
                let mut children = Vec::with_capacity(fields.len());
                for child in fields {
                    children.push(self.compile_node(
                        child,
                        &path,
                        rep_level_max,
                        def_level_max,
                        branch,
                    )?);
                }
                self.fields[index].kind = FieldKind::Group { children };
            }
            SchemaNode::Primitive {
                logical_type,
                compression,
                ..
            } => {
                let physical_type = logical_type.physical_type()?;
                if let Some(len) = logical_type.type_length() {
                    if len <= 0 {
                        return Err(ParquetError::schema(format!(
                            "FIXED_LEN_BYTE_ARRAY length must be positive, got {}",
                            len
                        )));
                    }
                }
                let column = self.columns.len();
                self.columns.push(ColumnDescriptor {
                    path,
                    logical_type: *logical_type,
                    physical_type,
                    max_rep_level: rep_level_max,
                    max_def_level: def_level_max,
                    compression: *compression,
                    type_length: logical_type.type_length(),
                    field: index,
                    branch: branch.clone(),
                });
                self.fields[index].kind = FieldKind::Leaf { column };
            }
        }

        branch.pop();
        Ok(index)
    }

    pub fn root_name(&self) -> &str {
        &self.root_name
    }

    /// Leaf columns in schema pre-order.
    pub fn columns(&self) -> &[ColumnDescriptor] {
        &self.columns
    }

    pub fn num_columns(&self) -> usize {
        self.columns.len()
    }

    pub(crate) fn field(&self, index: usize) -> &FieldInfo {
        &self.fields[index]
    }

    /// Top-level field names in declaration order.
    pub fn field_names(&self) -> Vec<Arc<str>> {
        self.root_fields
            .iter()
            .map(|&i| self.fields[i].name.clone())
            .collect()
    }

    /// Look up a field by dotted path.
    pub fn find_field(&self, path: &str) -> Result<&FieldInfo> {
        let mut candidates = self.root_fields.as_slice();
        let mut found = None;
        for part in path.split('.') {
            found = candidates
                .iter()
                .map(|&i| (i, &self.fields[i]))
                .find(|(_, f)| &*f.name == part);
            match found {
                Some((_, info)) => {
                    candidates = match &info.kind {
                        FieldKind::Group { children } => children.as_slice(),
                        FieldKind::Leaf { .. } => &[],
                    };
                }
                None => break,
            }
        }
        found
            .map(|(_, info)| info)
            .ok_or_else(|| ParquetError::schema(format!("No such schema field: {}", path)))
    }

    /// Look up a leaf column by dotted path.
    pub fn find_column(&self, path: &str) -> Result<&ColumnDescriptor> {
        let info = self.find_field(path)?;
        match info.kind {
            FieldKind::Leaf { column } => Ok(&self.columns[column]),
            FieldKind::Group { .. } => Err(ParquetError::schema(format!(
                "Field '{}' is a group, not a column",
                path
            ))),
        }
    }

    /// Flatten to the footer representation: root element first, then the
    /// pre-order arena.
    pub(crate) fn to_schema_elements(&self) -> Vec<SchemaElement> {
        let mut elements = Vec::with_capacity(self.fields.len() + 1);
        elements.push(SchemaElement {
            type_: None,
            type_length: None,
            repetition_type: None,
            name: self.root_name.to_string(),
            num_children: Some(self.root_fields.len() as i32),
            converted_type: None,
            scale: None,
            precision: None,
        });
        for info in &self.fields {
            let mut element = SchemaElement {
                type_: None,
                type_length: None,
                repetition_type: Some(info.repetition.to_i32()),
                name: info.name.to_string(),
                num_children: None,
                converted_type: None,
                scale: None,
                precision: None,
            };
            match &info.kind {
                FieldKind::Group { children } => {
                    element.num_children = Some(children.len() as i32);
                }
                FieldKind::Leaf { column } => {
                    let desc = &self.columns[*column];
                    element.type_ = Some(desc.physical_type.to_i32());
                    element.type_length = desc.type_length;
                    element.converted_type =
                        desc.logical_type.converted_type().map(|c| c.to_i32());
                    if let LogicalType::Decimal { precision, scale } = desc.logical_type {
                        element.precision = Some(precision as i32);
                        element.scale = Some(scale as i32);
                    }
                }
            }
            elements.push(element);
        }
        elements
    }

    /// Rebuild a schema from the flattened footer representation.
    pub(crate) fn from_schema_elements(elements: &[SchemaElement]) -> Result<Self> {
        if elements.is_empty() {
            return Err(ParquetError::format("File metadata contains no schema"));
        }
        let mut pos = 1;
        let num_children = elements[0].num_children.unwrap_or(0);
        let mut fields = Vec::with_capacity(num_children as usize);
        for _ in 0..num_children {
            fields.push(Self::node_from_elements(elements, &mut pos)?);
        }
        if pos != elements.len() {
            return Err(ParquetError::format(
                "Trailing schema elements after root subtree",
            ));
        }
        Schema::new(SchemaNode::Group {
            name: elements[0].name.clone(),
            repetition: Repetition::Required,
            fields,
        })
    }

    fn node_from_elements(elements: &[SchemaElement], pos: &mut usize) -> Result<SchemaNode> {
        let element = elements
            .get(*pos)
            .ok_or_else(|| ParquetError::format("Truncated schema element list"))?;
        *pos += 1;
        let repetition = match element.repetition_type {
            Some(v) => Repetition::from_i32(v)?,
            None => Repetition::Required,
        };
        match element.num_children {
            Some(n) if n > 0 => {
                let mut children = Vec::with_capacity(n as usize);
                for _ in 0..n {
                    children.push(Self::node_from_elements(elements, pos)?);
                }
                Ok(SchemaNode::Group {
                    name: element.name.clone(),
                    repetition,
                    fields: children,
                })
            }
            _ => {
                let physical = PhysicalType::from_i32(element.type_.ok_or_else(|| {
                    ParquetError::format(format!("Leaf '{}' lacks a physical type", element.name))
                })?)?;
                let logical_type = resolve_logical(element, physical)?;
                Ok(SchemaNode::Primitive {
                    name: element.name.clone(),
                    repetition,
                    logical_type,
                    compression: None,
                })
            }
        }
    }
}

fn resolve_logical(element: &SchemaElement, physical: PhysicalType) -> Result<LogicalType> {
    let converted = element.converted_type.and_then(ConvertedType::from_i32);
    Ok(match (converted, physical) {
        (Some(ConvertedType::Utf8), _) => LogicalType::Utf8,
        (Some(ConvertedType::Json), _) => LogicalType::Json,
        (Some(ConvertedType::Bson), _) => LogicalType::Bson,
        (Some(ConvertedType::Date), _) => LogicalType::Date,
        (Some(ConvertedType::TimestampMillis), _) => LogicalType::TimestampMillis,
        (Some(ConvertedType::TimestampMicros), _) => LogicalType::TimestampMicros,
        (Some(ConvertedType::TimeMillis), _) => LogicalType::TimeMillis,
        (Some(ConvertedType::TimeMicros), _) => LogicalType::TimeMicros,
        (Some(ConvertedType::Interval), _) => LogicalType::Interval,
        (Some(ConvertedType::Decimal), _) => {
            let precision = element.precision.unwrap_or(0);
            let scale = element.scale.unwrap_or(0);
            if !(1..=18).contains(&precision) || scale < 0 || scale > precision {
                return Err(ParquetError::format(format!(
                    "Leaf '{}' carries invalid DECIMAL({}, {})",
                    element.name, precision, scale
                )));
            }
            LogicalType::Decimal {
                precision: precision as u8,
                scale: scale as u8,
            }
        }
        (None, PhysicalType::Boolean) => LogicalType::Boolean,
        (None, PhysicalType::Int32) => LogicalType::Int32,
        (None, PhysicalType::Int64) => LogicalType::Int64,
        (None, PhysicalType::Int96) => LogicalType::Int96,
        (None, PhysicalType::Float) => LogicalType::Float,
        (None, PhysicalType::Double) => LogicalType::Double,
        (None, PhysicalType::ByteArray) => LogicalType::ByteArray,
        (None, PhysicalType::FixedLenByteArray) => {
            let len = element.type_length.unwrap_or(0);
            if len <= 0 {
                return Err(ParquetError::format(format!(
                    "Leaf '{}' lacks a FIXED_LEN_BYTE_ARRAY length",
                    element.name
                )));
            }
            LogicalType::FixedLenByteArray(len)
        }
    })
}

fn check_unique_names(fields: &[SchemaNode]) -> Result<()> {
    for (i, a) in fields.iter().enumerate() {
        for b in &fields[i + 1..] {
            if a.name() == b.name() {
                return Err(ParquetError::schema(format!(
                    "Duplicate field name '{}' among siblings",
                    a.name()
                )));
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fruit_schema() -> Schema {
        Schema::new(SchemaNode::Group {
            name: "root".to_string(),
            repetition: Repetition::Required,
            fields: vec![
                SchemaNode::Primitive {
                    name: "name".to_string(),
                    repetition: Repetition::Required,
                    logical_type: LogicalType::Utf8,
                    compression: None,
                },
                SchemaNode::Primitive {
                    name: "quantity".to_string(),
                    repetition: Repetition::Optional,
                    logical_type: LogicalType::Int64,
                    compression: None,
                },
                SchemaNode::Group {
                    name: "stock".to_string(),
                    repetition: Repetition::Repeated,
                    fields: vec![
                        SchemaNode::Primitive {
                            name: "quantity".to_string(),
                            repetition: Repetition::Repeated,
                            logical_type: LogicalType::Int64,
                            compression: None,
                        },
                        SchemaNode::Primitive {
                            name: "warehouse".to_string(),
                            repetition: Repetition::Required,
                            logical_type: LogicalType::Utf8,
                            compression: None,
                        },
                    ],
                },
            ],
        })
        .unwrap()
    }

    #[test]
    fn test_level_maxima() {
        let schema = fruit_schema();

        let name = schema.find_column("name").unwrap();
        assert_eq!(name.max_rep_level, 0);
        assert_eq!(name.max_def_level, 0);

        let quantity = schema.find_column("quantity").unwrap();
        assert_eq!(quantity.max_rep_level, 0);
        assert_eq!(quantity.max_def_level, 1);

        let stock_quantity = schema.find_column("stock.quantity").unwrap();
        assert_eq!(stock_quantity.max_rep_level, 2);
        assert_eq!(stock_quantity.max_def_level, 2);

        let warehouse = schema.find_column("stock.warehouse").unwrap();
        assert_eq!(warehouse.max_rep_level, 1);
        assert_eq!(warehouse.max_def_level, 1);
    }

    #[test]
    fn test_column_order_is_preorder() {
        let schema = fruit_schema();
        let paths: Vec<String> = schema.columns().iter().map(|c| c.path_string()).collect();
        assert_eq!(
            paths,
            vec!["name", "quantity", "stock.quantity", "stock.warehouse"]
        );
    }

    #[test]
    fn test_find_field_errors() {
        let schema = fruit_schema();
        assert!(schema.find_column("nope").is_err());
        assert!(schema.find_column("stock").is_err());
        assert!(schema.find_field("stock").is_ok());
    }

    #[test]
    fn test_decimal_backing_type() {
        let small = LogicalType::Decimal {
            precision: 9,
            scale: 2,
        };
        assert_eq!(small.physical_type().unwrap(), PhysicalType::Int32);

        let wide = LogicalType::Decimal {
            precision: 18,
            scale: 4,
        };
        assert_eq!(wide.physical_type().unwrap(), PhysicalType::Int64);

        let too_wide = LogicalType::Decimal {
            precision: 19,
            scale: 0,
        };
        assert!(too_wide.physical_type().is_err());
    }

    #[test]
    fn test_duplicate_names_rejected() {
        let result = Schema::new(SchemaNode::Group {
            name: "root".to_string(),
            repetition: Repetition::Required,
            fields: vec![
                SchemaNode::Primitive {
                    name: "a".to_string(),
                    repetition: Repetition::Required,
                    logical_type: LogicalType::Int32,
                    compression: None,
                },
                SchemaNode::Primitive {
                    name: "a".to_string(),
                    repetition: Repetition::Required,
                    logical_type: LogicalType::Int64,
                    compression: None,
                },
            ],
        });
        assert!(result.is_err());
    }

    #[test]
    fn test_schema_element_roundtrip() {
        let schema = fruit_schema();
        let elements = schema.to_schema_elements();
        assert_eq!(elements.len(), schema.fields.len() + 1);

        let rebuilt = Schema::from_schema_elements(&elements).unwrap();
        assert_eq!(rebuilt.num_columns(), schema.num_columns());
        for (a, b) in rebuilt.columns().iter().zip(schema.columns()) {
            assert_eq!(a.path, b.path);
            assert_eq!(a.physical_type, b.physical_type);
            assert_eq!(a.max_rep_level, b.max_rep_level);
            assert_eq!(a.max_def_level, b.max_def_level);
        }
    }

    #[test]
    fn test_interval_type_length() {
        assert_eq!(LogicalType::Interval.type_length(), Some(12));
        assert_eq!(
            LogicalType::Interval.physical_type().unwrap(),
            PhysicalType::FixedLenByteArray
        );
    }
}

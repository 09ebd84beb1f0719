//! Document-level types.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// An exportable bulletin or template preview.
///
/// Header, footer and style configuration are carried through untouched;
/// the export pipeline never interprets them.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Document {
    /// Display name, used for artifact file names
    #[serde(default)]
    pub name: String,

    /// Ordered sections
    #[serde(default)]
    pub sections: Vec<Section>,

    /// Opaque header configuration
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub header_config: Option<Value>,

    /// Opaque footer configuration
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub footer_config: Option<Value>,

    /// Opaque style configuration
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style_config: Option<Value>,
}

impl Document {
    /// Create a new empty document.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Parse a document from JSON text.
    pub fn from_json(json: &str) -> crate::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Number of sections.
    pub fn section_count(&self) -> usize {
        self.sections.len()
    }

    /// Get a section by 0-based index.
    pub fn section(&self, index: usize) -> Option<&Section> {
        self.sections.get(index)
    }

    /// Append a section.
    pub fn add_section(&mut self, section: Section) {
        self.sections.push(section);
    }

    /// Check if the document has no sections.
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }
}

/// An ordered content grouping; the unit of pagination.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Section {
    /// Section display name
    #[serde(default)]
    pub name: String,

    /// Ordered blocks
    #[serde(default)]
    pub blocks: Vec<Block>,
}

impl Section {
    /// Create a new empty section.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            blocks: Vec::new(),
        }
    }

    /// Builder-style block append.
    pub fn with_block(mut self, block: Block) -> Self {
        self.blocks.push(block);
        self
    }

    /// Iterate over every field of every block, in document order.
    pub fn fields(&self) -> impl Iterator<Item = &Field> {
        self.blocks.iter().flat_map(|b| b.fields.iter())
    }
}

/// A group of fields inside a section.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Block {
    /// Optional block identifier
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub block_id: Option<String>,

    /// Ordered fields
    #[serde(default)]
    pub fields: Vec<Field>,
}

impl Block {
    /// Create a block holding the given fields.
    pub fn with_fields(fields: Vec<Field>) -> Self {
        Self {
            block_id: None,
            fields,
        }
    }
}

/// Field type discriminator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldType {
    Text,
    TextWithIcon,
    Number,
    Date,
    DateRange,
    Select,
    ClimateData,
    Image,
    List,
    Card,
    /// Any type the exporter has no special handling for
    #[serde(other)]
    Unknown,
}

/// A typed unit of content.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Field {
    /// Optional field identifier
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field_id: Option<String>,

    /// Type discriminator
    #[serde(rename = "type")]
    pub field_type: FieldType,

    /// Type-dependent configuration
    #[serde(default)]
    pub field_config: Value,

    /// Current value
    #[serde(default)]
    pub value: Value,
}

impl Field {
    /// Create a field of the given type with empty config and value.
    pub fn new(field_type: FieldType) -> Self {
        Self {
            field_id: None,
            field_type,
            field_config: Value::Null,
            value: Value::Null,
        }
    }

    /// Create a list field with `items` entries and an optional per-page limit.
    pub fn list(items: usize, max_items_per_page: Option<i64>) -> Self {
        let mut field = Self::new(FieldType::List);
        if let Some(max) = max_items_per_page {
            field.field_config = serde_json::json!({ "max_items_per_page": max });
        }
        field.value = Value::Array((0..items).map(|i| serde_json::json!({ "index": i })).collect());
        field
    }

    /// Create a card field holding `cards` embedded card instances.
    pub fn cards(cards: usize) -> Self {
        let mut field = Self::new(FieldType::Card);
        field.value = Value::Array(
            (0..cards)
                .map(|i| serde_json::json!({ "card_id": i }))
                .collect(),
        );
        field
    }

    /// Configured `max_items_per_page`, if any.
    ///
    /// Editors may store the limit as an integer, a whole-number float
    /// (`5.0`) or a numeric string (`"5"`); all three are accepted.
    pub fn max_items_per_page(&self) -> Option<i64> {
        match self.field_config.get("max_items_per_page")? {
            Value::Number(n) => n
                .as_i64()
                .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64)),
            Value::String(s) => {
                let s = s.trim();
                s.parse::<i64>().ok().or_else(|| {
                    s.parse::<f64>()
                        .ok()
                        .filter(|f| f.is_finite() && f.fract() == 0.0)
                        .map(|f| f as i64)
                })
            }
            _ => None,
        }
    }

    /// Number of items in an array value; anything else counts as zero.
    pub fn item_count(&self) -> usize {
        self.value.as_array().map_or(0, Vec::len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_new() {
        let doc = Document::new("Boletín");
        assert!(doc.is_empty());
        assert_eq!(doc.section_count(), 0);
        assert_eq!(doc.name, "Boletín");
    }

    #[test]
    fn test_document_from_json() {
        let json = r#"{
            "name": "Boletín Agroclimático",
            "header_config": {"logo": "a.png"},
            "sections": [
                {"name": "Portada", "blocks": [
                    {"fields": [
                        {"type": "text", "value": "hola"},
                        {"type": "list", "field_config": {"max_items_per_page": 5}, "value": [1, 2, 3]},
                        {"type": "climate_data_puno", "value": {}}
                    ]}
                ]}
            ]
        }"#;
        let doc = Document::from_json(json).unwrap();
        assert_eq!(doc.section_count(), 1);
        assert!(doc.header_config.is_some());

        let fields: Vec<_> = doc.sections[0].fields().collect();
        assert_eq!(fields.len(), 3);
        assert_eq!(fields[0].field_type, FieldType::Text);
        assert_eq!(fields[1].max_items_per_page(), Some(5));
        assert_eq!(fields[1].item_count(), 3);
        assert_eq!(fields[2].field_type, FieldType::Unknown);
    }

    #[test]
    fn test_item_count_non_array() {
        let mut field = Field::new(FieldType::List);
        field.value = serde_json::json!("not a list");
        assert_eq!(field.item_count(), 0);
        assert_eq!(field.max_items_per_page(), None);
    }

    #[test]
    fn test_max_items_per_page_shapes() {
        let with_max = |max: Value| {
            let mut field = Field::new(FieldType::List);
            field.field_config = serde_json::json!({ "max_items_per_page": max });
            field.max_items_per_page()
        };
        assert_eq!(with_max(serde_json::json!(5)), Some(5));
        assert_eq!(with_max(serde_json::json!(5.0)), Some(5));
        assert_eq!(with_max(serde_json::json!("5")), Some(5));
        assert_eq!(with_max(serde_json::json!(" 4.0 ")), Some(4));
        assert_eq!(with_max(serde_json::json!(2.5)), None);
        assert_eq!(with_max(serde_json::json!("many")), None);
        assert_eq!(with_max(serde_json::json!(true)), None);
    }
}

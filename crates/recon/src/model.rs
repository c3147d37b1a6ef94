use serde::{Deserialize, Deserializer, Serialize, Serializer};

// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

/// One marketplace's taxonomy. Field names follow the catalog JSON schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    #[serde(rename = "marketplace_name")]
    pub name: String,
    #[serde(
        rename = "marketplace_id",
        default,
        deserialize_with = "de_optional_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<String>,
    #[serde(default)]
    pub categories: Vec<Category>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    #[serde(rename = "category_id", deserialize_with = "de_id")]
    pub id: String,
    #[serde(rename = "category_name")]
    pub name: String,
    /// Breadcrumb such as `Electronics/Mobile Phones`.
    #[serde(rename = "category_path")]
    pub path: String,
    #[serde(default)]
    pub attributes: Vec<Attribute>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attribute {
    #[serde(rename = "attribute_id", deserialize_with = "de_id")]
    pub id: String,
    #[serde(rename = "attribute_name")]
    pub name: String,
    pub attribute_type: String,
    pub required: bool,
    #[serde(rename = "list_of_values", default)]
    pub values: Vec<Value>,
}

/// An enumerated option of an attribute (one LOV entry).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Value {
    #[serde(rename = "value")]
    pub literal: String,
    #[serde(rename = "value_id", deserialize_with = "de_id")]
    pub id: String,
}

/// Ids may be JSON strings or numbers; numbers keep their JSON spelling.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Text(String),
    Number(serde_json::Number),
}

impl From<RawId> for String {
    fn from(raw: RawId) -> Self {
        match raw {
            RawId::Text(s) => s,
            RawId::Number(n) => n.to_string(),
        }
    }
}

fn de_id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    RawId::deserialize(deserializer).map(String::from)
}

fn de_optional_id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    Option::<RawId>::deserialize(deserializer).map(|raw| raw.map(String::from))
}

impl Catalog {
    /// First category carrying `id`.
    pub fn category(&self, id: &str) -> Option<&Category> {
        self.categories.iter().find(|c| c.id == id)
    }

    /// First attribute carrying `id`, searching categories in order.
    pub fn attribute(&self, id: &str) -> Option<&Attribute> {
        self.categories
            .iter()
            .flat_map(|c| c.attributes.iter())
            .find(|a| a.id == id)
    }
}

// ---------------------------------------------------------------------------
// Match records
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchKind {
    Category,
    Attribute,
    ListOfValues,
}

impl std::fmt::Display for MatchKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Category => write!(f, "category"),
            Self::Attribute => write!(f, "attribute"),
            Self::ListOfValues => write!(f, "list_of_values"),
        }
    }
}

/// Fields every match record carries, flattened into each variant on output.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredMatch {
    pub source_catalog_name: String,
    pub target_catalog_name: String,
    /// Full precision in memory; rounded to 3 decimals when serialized.
    #[serde(serialize_with = "serialize_rounded")]
    pub similarity_score: f64,
    #[serde(rename = "match_type")]
    pub kind: MatchKind,
}

impl ScoredMatch {
    pub fn rounded_score(&self) -> f64 {
        round_score(self.similarity_score)
    }
}

pub fn round_score(score: f64) -> f64 {
    (score * 1000.0).round() / 1000.0
}

fn serialize_rounded<S: Serializer>(score: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_f64(round_score(*score))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryRef {
    pub id: String,
    pub name: String,
    pub path: String,
}

impl From<&Category> for CategoryRef {
    fn from(c: &Category) -> Self {
        Self {
            id: c.id.clone(),
            name: c.name.clone(),
            path: c.path.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AttributeRef {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub attribute_type: String,
    pub required: bool,
}

impl From<&Attribute> for AttributeRef {
    fn from(a: &Attribute) -> Self {
        Self {
            id: a.id.clone(),
            name: a.name.clone(),
            attribute_type: a.attribute_type.clone(),
            required: a.required,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValueRef {
    pub value: String,
    pub value_id: String,
}

impl From<&Value> for ValueRef {
    fn from(v: &Value) -> Self {
        Self {
            value: v.literal.clone(),
            value_id: v.id.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryMatch {
    #[serde(flatten)]
    pub scored: ScoredMatch,
    pub source_category: CategoryRef,
    pub target_category: CategoryRef,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AttributeMatch {
    #[serde(flatten)]
    pub scored: ScoredMatch,
    pub source_category_name: String,
    pub target_category_name: String,
    pub source_attribute: AttributeRef,
    pub target_attribute: AttributeRef,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValueMatch {
    #[serde(flatten)]
    pub scored: ScoredMatch,
    pub source_category_name: String,
    pub target_category_name: String,
    pub source_attribute_name: String,
    pub target_attribute_name: String,
    pub source_value: ValueRef,
    pub target_value: ValueRef,
}

/// Closed set of match record variants.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum MatchRecord {
    Category(CategoryMatch),
    Attribute(AttributeMatch),
    Value(ValueMatch),
}

impl MatchRecord {
    pub fn scored(&self) -> &ScoredMatch {
        match self {
            Self::Category(m) => &m.scored,
            Self::Attribute(m) => &m.scored,
            Self::Value(m) => &m.scored,
        }
    }

    pub fn kind(&self) -> MatchKind {
        self.scored().kind
    }

    pub fn score(&self) -> f64 {
        self.scored().similarity_score
    }

    pub fn source_catalog_name(&self) -> &str {
        &self.scored().source_catalog_name
    }

    pub fn target_catalog_name(&self) -> &str {
        &self.scored().target_catalog_name
    }
}

// ---------------------------------------------------------------------------
// Summary + Output
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ReconSummary {
    pub total_category_matches: usize,
    pub total_attribute_matches: usize,
    pub total_lov_matches: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReconResult {
    pub category_matches: Vec<CategoryMatch>,
    pub attribute_matches: Vec<AttributeMatch>,
    pub lov_matches: Vec<ValueMatch>,
    pub summary: ReconSummary,
}

impl ReconResult {
    /// All records in stage order: categories, attributes, values.
    pub fn records(&self) -> impl Iterator<Item = MatchRecord> + '_ {
        self.category_matches
            .iter()
            .cloned()
            .map(MatchRecord::Category)
            .chain(self.attribute_matches.iter().cloned().map(MatchRecord::Attribute))
            .chain(self.lov_matches.iter().cloned().map(MatchRecord::Value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scored(kind: MatchKind, score: f64) -> ScoredMatch {
        ScoredMatch {
            source_catalog_name: "Amazon".into(),
            target_catalog_name: "Flipkart".into(),
            similarity_score: score,
            kind,
        }
    }

    #[test]
    fn score_rounded_on_output_only() {
        let m = CategoryMatch {
            scored: scored(MatchKind::Category, 0.930_909_1),
            source_category: CategoryRef {
                id: "a1".into(),
                name: "Mobile Phones".into(),
                path: "E/MP".into(),
            },
            target_category: CategoryRef {
                id: "b1".into(),
                name: "Mobile Phone".into(),
                path: "E/M".into(),
            },
        };
        let json = serde_json::to_value(&m).unwrap();
        assert_eq!(json["similarity_score"], serde_json::json!(0.931));
        assert_eq!(json["match_type"], "category");
        assert_eq!(json["source_category"]["name"], "Mobile Phones");
        assert_eq!(m.scored.similarity_score, 0.930_909_1);
    }

    #[test]
    fn attribute_ref_serializes_type_key() {
        let attr = Attribute {
            id: "attr_1".into(),
            name: "Author".into(),
            attribute_type: "string".into(),
            required: true,
            values: vec![],
        };
        let json = serde_json::to_value(AttributeRef::from(&attr)).unwrap();
        assert_eq!(json["type"], "string");
        assert_eq!(json["required"], true);
    }

    #[test]
    fn catalog_deserializes_schema_names() {
        let input = r#"{
            "marketplace_name": "Shop",
            "categories": [{
                "category_id": "c1",
                "category_name": "Books",
                "category_path": "Media/Books",
                "attributes": [{
                    "attribute_id": "a1",
                    "attribute_name": "Genre",
                    "attribute_type": "enum",
                    "required": false,
                    "list_of_values": [{"value": "Fiction", "value_id": "fic"}]
                }]
            }]
        }"#;
        let catalog: Catalog = serde_json::from_str(input).unwrap();
        assert_eq!(catalog.name, "Shop");
        assert!(catalog.id.is_none());
        assert_eq!(catalog.categories[0].attributes[0].values[0].literal, "Fiction");
        assert_eq!(catalog.attribute("a1").map(|a| a.name.as_str()), Some("Genre"));
        assert!(catalog.category("missing").is_none());
    }

    #[test]
    fn record_accessors() {
        let rec = MatchRecord::Value(ValueMatch {
            scored: scored(MatchKind::ListOfValues, 1.0),
            source_category_name: "Books".into(),
            target_category_name: "Book Store".into(),
            source_attribute_name: "Genre".into(),
            target_attribute_name: "Genres".into(),
            source_value: ValueRef { value: "Fiction".into(), value_id: "f".into() },
            target_value: ValueRef { value: "Fiction".into(), value_id: "fic".into() },
        });
        assert_eq!(rec.kind(), MatchKind::ListOfValues);
        assert_eq!(rec.score(), 1.0);
        assert_eq!(rec.source_catalog_name(), "Amazon");
        assert_eq!(rec.target_catalog_name(), "Flipkart");
        assert_eq!(rec.kind().to_string(), "list_of_values");
    }
}

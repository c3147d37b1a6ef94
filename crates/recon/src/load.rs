//! Catalog JSON loading with per-field error reporting.
//!
//! serde's derive would reject a malformed catalog with a line/column
//! message; this loader walks the document by hand so a missing key names
//! the entity it belongs to (`categories[2].attributes[0]`).

use serde_json::{Map, Value as Json};

use crate::error::ReconError;
use crate::model::{Attribute, Catalog, Category, Value};

/// Parse a catalog document. `label` names the catalog in errors (usually
/// the file name).
pub fn load_catalog(label: &str, json_text: &str) -> Result<Catalog, ReconError> {
    let doc: Json = serde_json::from_str(json_text).map_err(|e| ReconError::CatalogParse {
        catalog: label.into(),
        message: e.to_string(),
    })?;
    load_catalog_value(label, &doc)
}

/// Build a catalog from an already-parsed JSON document.
pub fn load_catalog_value(label: &str, doc: &Json) -> Result<Catalog, ReconError> {
    let reader = Reader { catalog: label };
    let root = doc.as_object().ok_or_else(|| ReconError::CatalogParse {
        catalog: label.into(),
        message: "document root must be an object".into(),
    })?;

    let name = reader.text(root, "catalog", "marketplace_name")?;
    let id = reader.optional_id(root, "catalog", "marketplace_id")?;

    let mut categories = Vec::new();
    for (ci, cat) in reader.list(root, "catalog", "categories")?.iter().enumerate() {
        let entity = format!("categories[{ci}]");
        categories.push(reader.category(cat, &entity)?);
    }

    Ok(Catalog { name, id, categories })
}

struct Reader<'a> {
    catalog: &'a str,
}

impl Reader<'_> {
    fn category(&self, json: &Json, entity: &str) -> Result<Category, ReconError> {
        let obj = self.object(json, entity)?;
        let id = self.id(obj, entity, "category_id")?;
        let name = self.text(obj, entity, "category_name")?;
        let path = self.text(obj, entity, "category_path")?;

        let mut attributes = Vec::new();
        for (ai, attr) in self.list(obj, entity, "attributes")?.iter().enumerate() {
            let attr_entity = format!("{entity}.attributes[{ai}]");
            attributes.push(self.attribute(attr, &attr_entity)?);
        }
        Ok(Category { id, name, path, attributes })
    }

    fn attribute(&self, json: &Json, entity: &str) -> Result<Attribute, ReconError> {
        let obj = self.object(json, entity)?;
        let id = self.id(obj, entity, "attribute_id")?;
        let name = self.text(obj, entity, "attribute_name")?;
        let attribute_type = self.text(obj, entity, "attribute_type")?;
        let required = self.flag(obj, entity, "required")?;

        let mut values = Vec::new();
        for (vi, val) in self.list(obj, entity, "list_of_values")?.iter().enumerate() {
            let val_entity = format!("{entity}.list_of_values[{vi}]");
            let val_obj = self.object(val, &val_entity)?;
            values.push(Value {
                literal: self.text(val_obj, &val_entity, "value")?,
                id: self.id(val_obj, &val_entity, "value_id")?,
            });
        }
        Ok(Attribute { id, name, attribute_type, required, values })
    }

    fn object<'j>(
        &self,
        json: &'j Json,
        entity: &str,
    ) -> Result<&'j Map<String, Json>, ReconError> {
        json.as_object().ok_or_else(|| ReconError::CatalogParse {
            catalog: self.catalog.into(),
            message: format!("{entity} must be an object"),
        })
    }

    fn field<'j>(
        &self,
        obj: &'j Map<String, Json>,
        entity: &str,
        field: &str,
    ) -> Result<&'j Json, ReconError> {
        obj.get(field).ok_or_else(|| ReconError::MissingField {
            catalog: self.catalog.into(),
            entity: entity.into(),
            field: field.into(),
        })
    }

    fn invalid(&self, entity: &str, field: &str, expected: &'static str) -> ReconError {
        ReconError::InvalidField {
            catalog: self.catalog.into(),
            entity: entity.into(),
            field: field.into(),
            expected,
        }
    }

    fn text(
        &self,
        obj: &Map<String, Json>,
        entity: &str,
        field: &str,
    ) -> Result<String, ReconError> {
        match self.field(obj, entity, field)? {
            Json::String(s) => Ok(s.clone()),
            _ => Err(self.invalid(entity, field, "a string")),
        }
    }

    /// Ids may be strings or numbers; numbers keep their JSON spelling.
    fn id(&self, obj: &Map<String, Json>, entity: &str, field: &str) -> Result<String, ReconError> {
        match self.field(obj, entity, field)? {
            Json::String(s) => Ok(s.clone()),
            Json::Number(n) => Ok(n.to_string()),
            _ => Err(self.invalid(entity, field, "a string or number")),
        }
    }

    fn optional_id(
        &self,
        obj: &Map<String, Json>,
        entity: &str,
        field: &str,
    ) -> Result<Option<String>, ReconError> {
        match obj.get(field) {
            None | Some(Json::Null) => Ok(None),
            Some(_) => self.id(obj, entity, field).map(Some),
        }
    }

    fn flag(&self, obj: &Map<String, Json>, entity: &str, field: &str) -> Result<bool, ReconError> {
        self.field(obj, entity, field)?
            .as_bool()
            .ok_or_else(|| self.invalid(entity, field, "a boolean"))
    }

    /// Absent collections are empty.
    fn list<'j>(
        &self,
        obj: &'j Map<String, Json>,
        entity: &str,
        field: &str,
    ) -> Result<&'j [Json], ReconError> {
        match obj.get(field) {
            None => Ok(&[]),
            Some(Json::Array(items)) => Ok(items.as_slice()),
            Some(_) => Err(self.invalid(entity, field, "an array")),
        }
    }
}

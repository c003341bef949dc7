use crate::schema::{FieldKind, FieldSpec, Schema};
use fake::Dummy;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Marks a wire type addressable under a resource path on the backend.
///
/// The collection path defaults to the store-scoped layout used by nested
/// entities; root resources (stores themselves) override it.
pub trait Resource: serde::de::DeserializeOwned {
    /// Payload type accepted by create and update calls.
    type Input: Serialize;

    /// URL path segment for the resource collection.
    fn resource() -> &'static str;

    /// Path to the collection under the given store.
    fn collection_path(store_id: &str) -> String {
        format!("{}/{}", store_id, Self::resource())
    }

    /// Path to a single entity under the given store.
    fn entity_path(store_id: &str, id: &str) -> String {
        format!("{}/{}", Self::collection_path(store_id), id)
    }
}

/// Defines store data structure.
///
#[derive(Clone, Debug, Dummy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Store {
    pub id: String,
    pub name: String,
}

impl Store {
    /// Form values seeding an edit form for this store.
    ///
    pub fn form_values(&self) -> HashMap<String, String> {
        HashMap::from([("name".to_owned(), self.name.clone())])
    }
}

impl Resource for Store {
    type Input = StoreInput;

    fn resource() -> &'static str {
        "stores"
    }

    // Stores are a root resource, not nested under a store id.
    fn collection_path(_store_id: &str) -> String {
        Self::resource().to_owned()
    }
}

/// Defines billboard data structure.
///
#[derive(Clone, Debug, Dummy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Billboard {
    pub id: String,
    pub label: String,
    pub image_url: String,
}

impl Billboard {
    /// Form values seeding an edit form for this billboard.
    ///
    pub fn form_values(&self) -> HashMap<String, String> {
        HashMap::from([
            ("label".to_owned(), self.label.clone()),
            ("imageUrl".to_owned(), self.image_url.clone()),
        ])
    }
}

impl Resource for Billboard {
    type Input = BillboardInput;

    fn resource() -> &'static str {
        "billboards"
    }
}

/// Defines category data structure.
///
#[derive(Clone, Debug, Dummy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: String,
    pub name: String,
    pub billboard_id: String,
}

impl Category {
    /// Form values seeding an edit form for this category.
    ///
    pub fn form_values(&self) -> HashMap<String, String> {
        HashMap::from([
            ("name".to_owned(), self.name.clone()),
            ("billboardId".to_owned(), self.billboard_id.clone()),
        ])
    }
}

impl Resource for Category {
    type Input = CategoryInput;

    fn resource() -> &'static str {
        "categories"
    }
}

/// Create/update payload for a store.
///
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreInput {
    pub name: String,
}

impl StoreInput {
    /// Build the payload from validated form values.
    ///
    pub fn from_values(values: &HashMap<String, String>) -> StoreInput {
        StoreInput {
            name: values.get("name").cloned().unwrap_or_default(),
        }
    }
}

/// Create/update payload for a billboard.
///
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BillboardInput {
    pub label: String,
    pub image_url: String,
}

impl BillboardInput {
    /// Build the payload from validated form values.
    ///
    pub fn from_values(values: &HashMap<String, String>) -> BillboardInput {
        BillboardInput {
            label: values.get("label").cloned().unwrap_or_default(),
            image_url: values.get("imageUrl").cloned().unwrap_or_default(),
        }
    }
}

/// Create/update payload for a category.
///
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryInput {
    pub name: String,
    pub billboard_id: String,
}

impl CategoryInput {
    /// Build the payload from validated form values.
    ///
    pub fn from_values(values: &HashMap<String, String>) -> CategoryInput {
        CategoryInput {
            name: values.get("name").cloned().unwrap_or_default(),
            billboard_id: values.get("billboardId").cloned().unwrap_or_default(),
        }
    }
}

/// Specifying the entity types managed by the admin surface.
///
/// Each variant carries its own resource routing, schema, and notice
/// wording, so a form can only ever address the endpoint belonging to its
/// entity type.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum EntityKind {
    Store,
    Billboard,
    Category,
}

impl EntityKind {
    /// URL path segment for the entity's collection.
    ///
    pub fn resource(&self) -> &'static str {
        match self {
            EntityKind::Store => Store::resource(),
            EntityKind::Billboard => Billboard::resource(),
            EntityKind::Category => Category::resource(),
        }
    }

    /// Human-readable singular label.
    ///
    pub fn label(&self) -> &'static str {
        match self {
            EntityKind::Store => "Store",
            EntityKind::Billboard => "Billboard",
            EntityKind::Category => "Category",
        }
    }

    /// Validation schema for the entity's form.
    ///
    pub fn schema(&self) -> Schema {
        match self {
            EntityKind::Store => Schema::new(vec![FieldSpec {
                name: "name",
                label: "Name",
                kind: FieldKind::Text,
            }]),
            EntityKind::Billboard => Schema::new(vec![
                FieldSpec {
                    name: "label",
                    label: "Label",
                    kind: FieldKind::Text,
                },
                FieldSpec {
                    name: "imageUrl",
                    label: "Background image",
                    kind: FieldKind::Text,
                },
            ]),
            EntityKind::Category => Schema::new(vec![
                FieldSpec {
                    name: "name",
                    label: "Name",
                    kind: FieldKind::Text,
                },
                FieldSpec {
                    name: "billboardId",
                    label: "Billboard",
                    kind: FieldKind::Reference,
                },
            ]),
        }
    }

    /// Notice shown after a successful create.
    ///
    pub fn created_notice(&self) -> String {
        format!("{} created.", self.label())
    }

    /// Notice shown after a successful update.
    ///
    pub fn updated_notice(&self) -> String {
        format!("{} updated.", self.label())
    }

    /// Notice shown after a successful delete.
    ///
    pub fn deleted_notice(&self) -> String {
        format!("{} deleted.", self.label())
    }

    /// Hint shown when the backend refuses a delete because other records
    /// still reference the entity.
    ///
    pub fn delete_constraint_hint(&self) -> &'static str {
        match self {
            EntityKind::Store => "Make sure you removed all products and categories first.",
            EntityKind::Billboard => {
                "Make sure you removed all categories using this billboard first."
            }
            EntityKind::Category => "Make sure you removed all products using this category first.",
        }
    }
}

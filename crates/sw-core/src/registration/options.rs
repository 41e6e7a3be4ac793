use serde::{Deserialize, Serialize};

/// A selectable option: a category (BUYER) or a product type (SELLER).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogOption {
    pub id: i64,
    pub name: String,
}

impl CatalogOption {
    pub fn new(id: i64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

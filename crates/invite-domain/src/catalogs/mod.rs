//! Built-in catalogs, one per product domain.

pub mod wedding;

use crate::catalog::{CatalogError, FieldCatalog};

impl FieldCatalog {
    /// The wedding invitation catalog.
    pub fn wedding() -> Result<Self, CatalogError> {
        wedding::catalog()
    }
}

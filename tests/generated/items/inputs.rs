//! Operation inputs for Items
//!
//! Generated by swaggen 0.1.0. Do not edit.

use serde::{Deserialize, Serialize};
use swaggen::runtime;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GetItemInput {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verbose: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<i64>,
}

impl GetItemInput {
    /// Check declared constraints in field order, stopping at the first violation
    pub fn validate(&self) -> Result<(), runtime::ValidationError> {
        runtime::validation::max_length("id", &self.id, 8)?;
        runtime::validation::pattern("id", &self.id, "^[a-z0-9-]+$")?;
        if let Some(value) = &self.limit {
            runtime::validation::maximum("limit", *value as f64, 50.0, false)?;
        }
        Ok(())
    }

    /// Request path relative to the base path, query string included
    pub fn path(&self) -> String {
        let mut path = String::from("/items/{id}");
        path = runtime::path::substitute(&path, "id", &self.id);
        let mut query = runtime::path::QueryString::new();
        if let Some(value) = &self.verbose { query.push("verbose", value); }
        if let Some(value) = &self.limit { query.push("limit", value); }
        query.finish(&path)
    }
}

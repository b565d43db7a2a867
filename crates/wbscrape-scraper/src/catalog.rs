//! Conversion of the raw category menu into [`CatalogTree`] and flattening
//! of the tree into an ordered list of [`CategoryDescriptor`]s.

use serde_json::{Map, Value};
use wbscrape_core::CategoryDescriptor;

use crate::error::ScraperError;
use crate::types::{CatalogTree, CategoryNode};

impl CatalogTree {
    /// Builds a tree from the raw menu JSON.
    ///
    /// Arrays become [`CatalogTree::Forest`]; objects become a leaf or an
    /// internal node depending on whether `childs` is present and non-null.
    ///
    /// # Errors
    ///
    /// - [`ScraperError::MissingField`] if a node lacks `name` or `url`.
    /// - [`ScraperError::InvalidCatalogNode`] if a node is neither an object
    ///   nor an array, or if `name`/`url`/`shard`/`query` are not strings.
    pub fn from_value(value: &Value) -> Result<Self, ScraperError> {
        Self::from_value_at(value, "$")
    }

    fn from_value_at(value: &Value, path: &str) -> Result<Self, ScraperError> {
        match value {
            Value::Array(items) => items
                .iter()
                .enumerate()
                .map(|(idx, item)| Self::from_value_at(item, &format!("{path}[{idx}]")))
                .collect::<Result<Vec<_>, _>>()
                .map(Self::Forest),
            Value::Object(map) => {
                let node = parse_node(map, path)?;
                match map.get("childs") {
                    None | Some(Value::Null) => Ok(Self::Leaf(node)),
                    Some(children) => {
                        let children = Self::from_value_at(children, &format!("{path}.childs"))?;
                        Ok(Self::Internal {
                            node,
                            children: Box::new(children),
                        })
                    }
                }
            }
            other => Err(ScraperError::InvalidCatalogNode {
                path: path.to_owned(),
                reason: format!("expected an object or array, found {}", json_kind(other)),
            }),
        }
    }

    /// Flattens the tree depth-first, pre-order: every node's descriptor is
    /// emitted before its descendants', siblings in document order.
    #[must_use]
    pub fn flatten(&self) -> Vec<CategoryDescriptor> {
        let mut out = Vec::new();
        self.flatten_into(&mut out);
        out
    }

    fn flatten_into(&self, out: &mut Vec<CategoryDescriptor>) {
        match self {
            Self::Leaf(node) => out.push(descriptor(node)),
            Self::Internal { node, children } => {
                out.push(descriptor(node));
                children.flatten_into(out);
            }
            Self::Forest(siblings) => {
                for sibling in siblings {
                    sibling.flatten_into(out);
                }
            }
        }
    }

    /// Total number of category nodes in the tree.
    #[must_use]
    pub fn node_count(&self) -> usize {
        match self {
            Self::Leaf(_) => 1,
            Self::Internal { children, .. } => 1 + children.node_count(),
            Self::Forest(siblings) => siblings.iter().map(Self::node_count).sum(),
        }
    }
}

/// Parses the raw menu JSON and flattens it in one step.
///
/// # Errors
///
/// Propagates structural errors from [`CatalogTree::from_value`].
pub fn flatten_catalog(value: &Value) -> Result<Vec<CategoryDescriptor>, ScraperError> {
    Ok(CatalogTree::from_value(value)?.flatten())
}

fn descriptor(node: &CategoryNode) -> CategoryDescriptor {
    CategoryDescriptor {
        name: node.name.clone(),
        shard_key: node.shard.clone(),
        url: node.url.clone(),
        query_params: node.query.clone(),
    }
}

fn parse_node(map: &Map<String, Value>, path: &str) -> Result<CategoryNode, ScraperError> {
    Ok(CategoryNode {
        name: required_str(map, "name", path)?,
        url: required_str(map, "url", path)?,
        shard: optional_str(map, "shard", path)?,
        query: optional_str(map, "query", path)?,
    })
}

fn required_str(
    map: &Map<String, Value>,
    field: &'static str,
    path: &str,
) -> Result<String, ScraperError> {
    optional_str(map, field, path)?.ok_or_else(|| ScraperError::MissingField {
        path: path.to_owned(),
        field,
    })
}

fn optional_str(
    map: &Map<String, Value>,
    field: &'static str,
    path: &str,
) -> Result<Option<String>, ScraperError> {
    match map.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(other) => Err(ScraperError::InvalidCatalogNode {
            path: path.to_owned(),
            reason: format!("field \"{field}\" should be a string, found {}", json_kind(other)),
        }),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

use serde::{Deserialize, Serialize};

/// One category of the storefront taxonomy, flattened out of the nested
/// catalog tree.
///
/// `shard_key` and `query_params` together route a listing request to the
/// backend partition that serves this category. Internal navigation nodes
/// often carry neither.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryDescriptor {
    pub name: String,
    pub shard_key: Option<String>,
    /// Site-relative path, e.g. `"/catalog/obuv/zhenskaya"`.
    pub url: String,
    /// Pre-built querystring fragment, e.g. `"cat=8126"`.
    pub query_params: Option<String>,
}

impl CategoryDescriptor {
    /// The shard key to route a listing request with, if the category can be
    /// queried on the listing endpoint at all.
    #[must_use]
    pub fn queryable_shard(&self) -> Option<&str> {
        self.shard_key.as_deref().filter(|s| !s.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn descriptor(shard_key: Option<&str>) -> CategoryDescriptor {
        CategoryDescriptor {
            name: "Shoes".to_owned(),
            shard_key: shard_key.map(str::to_owned),
            url: "/shoes".to_owned(),
            query_params: None,
        }
    }

    #[test]
    fn queryable_shard_requires_non_empty_key() {
        assert_eq!(descriptor(Some("s1")).queryable_shard(), Some("s1"));
        assert_eq!(descriptor(Some("")).queryable_shard(), None);
        assert_eq!(descriptor(None).queryable_shard(), None);
    }
}

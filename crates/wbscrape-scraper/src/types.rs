//! Raw shapes of the two upstream documents: the category menu and a
//! listing page.
//!
//! ## Category menu
//!
//! The menu document is usually a JSON array of top-level nodes, but the
//! `childs` key of a node may hold either an array of nodes or, on a few
//! branches, a single nested node. Nodes look like:
//!
//! ```text
//! { "id": 306, "name": "Обувь", "url": "/catalog/obuv",
//!   "shard": "shoes", "query": "cat=8126", "childs": [ ... ] }
//! ```
//!
//! `name` and `url` are always present. `shard` and `query` only appear on
//! nodes that can be queried on the listing endpoint. Extra keys (`id`,
//! `seo`, `dest`, ...) are ignored.
//!
//! ## Listing page
//!
//! `data.products` is an array of product objects; an empty array means the
//! result stream is exhausted. Prices (`priceU`, `salePriceU`) are
//! kopecks, usually integers but occasionally floats. Every product key may
//! be missing or carry an unexpected type.

/// Routing and display fields carried by every catalog node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryNode {
    pub name: String,
    pub url: String,
    pub shard: Option<String>,
    pub query: Option<String>,
}

/// The category menu as a tree of uniformly-handled shapes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogTree {
    /// A node without `childs`.
    Leaf(CategoryNode),
    /// A node whose `childs` holds a single node or a list of siblings.
    Internal {
        node: CategoryNode,
        children: Box<CatalogTree>,
    },
    /// A bare list of sibling nodes; the top level of the menu document.
    Forest(Vec<CatalogTree>),
}

/// One product entry from a listing page, read leniently: absent keys and
/// values of an unexpected type are both `None`.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct RawProduct {
    pub id: Option<u64>,
    pub name: Option<String>,
    /// List price in kopecks (`priceU`).
    pub price_u: Option<i64>,
    /// Sale price in kopecks (`salePriceU`).
    pub sale_price_u: Option<i64>,
    pub feedback_points: Option<i64>,
    /// Discount percentage.
    pub sale: Option<i64>,
    pub brand: Option<String>,
    pub rating: Option<f64>,
    pub supplier: Option<String>,
    pub supplier_rating: Option<f64>,
    pub feedbacks: Option<i64>,
    pub review_rating: Option<f64>,
    pub promo_text_card: Option<String>,
    /// `promoTextCat`.
    pub promo_text_category: Option<String>,
}

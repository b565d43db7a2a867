//! Mapping of a user-supplied category link to a flattened catalog entry.

use wbscrape_core::CategoryDescriptor;

/// Removes the site origin from `target_url`.
///
/// Everything up to and including the first occurrence of `origin` is
/// dropped. When `origin` does not occur, `target_url` is returned as-is, so
/// site-relative paths pass straight through.
#[must_use]
pub fn strip_origin<'a>(target_url: &'a str, origin: &str) -> &'a str {
    if origin.is_empty() {
        return target_url;
    }
    match target_url.find(origin) {
        Some(idx) => &target_url[idx + origin.len()..],
        None => target_url,
    }
}

/// Finds the catalog entry whose `url` equals `target_url` once `origin` is
/// stripped from it.
///
/// Matching is exact. When several entries share a URL the first one in
/// flatten order wins, so an ancestor shadows a same-URL descendant.
/// Returns `None` when nothing matches; callers must check before reading
/// routing keys.
#[must_use]
pub fn resolve_category<'a>(
    descriptors: &'a [CategoryDescriptor],
    target_url: &str,
    origin: &str,
) -> Option<&'a CategoryDescriptor> {
    let path = strip_origin(target_url, origin);
    let found = descriptors.iter().find(|d| d.url == path);
    match found {
        Some(category) => {
            tracing::info!(category = %category.name, url = path, "matched catalog category");
        }
        None => tracing::debug!(url = path, "no catalog category matches"),
    }
    found
}

#[cfg(test)]
mod tests {
    use super::*;

    const ORIGIN: &str = "https://example.com";

    fn descriptor(name: &str, url: &str) -> CategoryDescriptor {
        CategoryDescriptor {
            name: name.to_owned(),
            shard_key: Some(format!("{name}-shard")),
            url: url.to_owned(),
            query_params: None,
        }
    }

    fn catalog() -> Vec<CategoryDescriptor> {
        vec![
            descriptor("Root", "/root"),
            descriptor("Shoes", "/shoes"),
            descriptor("Boots", "/shoes/boots"),
        ]
    }

    #[test]
    fn strips_origin_from_absolute_url() {
        assert_eq!(strip_origin("https://example.com/shoes", ORIGIN), "/shoes");
    }

    #[test]
    fn keeps_relative_path_unchanged() {
        assert_eq!(strip_origin("/shoes", ORIGIN), "/shoes");
    }

    #[test]
    fn empty_origin_is_a_no_op() {
        assert_eq!(strip_origin("https://example.com/shoes", ""), "https://example.com/shoes");
    }

    #[test]
    fn resolves_absolute_url() {
        let catalog = catalog();
        let found = resolve_category(&catalog, "https://example.com/shoes", ORIGIN).unwrap();
        assert_eq!(found.name, "Shoes");
    }

    #[test]
    fn resolves_relative_path() {
        let catalog = catalog();
        let found = resolve_category(&catalog, "/shoes/boots", ORIGIN).unwrap();
        assert_eq!(found.name, "Boots");
    }

    #[test]
    fn match_is_exact() {
        let catalog = catalog();
        assert!(resolve_category(&catalog, "https://example.com/shoes/", ORIGIN).is_none());
        assert!(resolve_category(&catalog, "https://example.com/shoes?sort=price", ORIGIN).is_none());
        assert!(resolve_category(&catalog, "https://example.com/sho", ORIGIN).is_none());
    }

    #[test]
    fn unknown_url_is_none() {
        let catalog = catalog();
        assert!(resolve_category(&catalog, "https://example.com/hats", ORIGIN).is_none());
    }

    #[test]
    fn first_match_in_flatten_order_wins() {
        let catalog = vec![
            descriptor("Parent", "/dup"),
            descriptor("Child", "/dup"),
        ];
        let found = resolve_category(&catalog, "/dup", ORIGIN).unwrap();
        assert_eq!(found.name, "Parent");
    }

    #[test]
    fn other_origin_is_not_stripped() {
        let catalog = catalog();
        assert!(resolve_category(&catalog, "https://elsewhere.com/shoes", ORIGIN).is_none());
    }
}

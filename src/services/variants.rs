// src/services/variants.rs

//! Alternative fetch URLs for a single Drive-hosted image.
//!
//! A share link such as `https://drive.google.com/file/d/<id>/view` is
//! expanded into every URL form known to serve the same file, then
//! reordered by how reliably each form renders as an image.

use std::collections::HashSet;

use crate::utils::url::{extract_drive_id, is_drive_url};

const CONTENT_HOST: &str = "https://lh3.googleusercontent.com";
const DRIVE_HOST: &str = "https://drive.google.com";

/// Reliability tiers, most reliable first. A variant belongs to the
/// first tier whose marker it contains.
const TIERS: [&str; 4] = [
    "googleusercontent.com",
    "uc?export=view",
    "uc?id=",
    "thumbnail?id=",
];

/// Expand a locator into its deduplicated alternative URLs.
///
/// Non-Drive locators, and Drive links without a usable identifier, come
/// back unchanged as a single-element list. Otherwise the original locator
/// is always the final element.
pub fn variants(locator: &str) -> Vec<String> {
    if !is_drive_url(locator) {
        return vec![locator.to_string()];
    }

    let Some(id) = extract_drive_id(locator) else {
        log::debug!("No Drive file id in {}, using it as-is", locator);
        return vec![locator.to_string()];
    };

    let mut seen = HashSet::new();
    seen.insert(locator.to_string());

    let mut list: Vec<String> = drive_templates(&id)
        .into_iter()
        .filter(|url| seen.insert(url.clone()))
        .collect();
    list.push(locator.to_string());
    list
}

/// Reorder variants by reliability tier, stable within each tier.
///
/// Variants matching no tier keep their relative order after all tiered ones.
pub fn smart_order(variants: &[String]) -> Vec<String> {
    let mut buckets: Vec<Vec<String>> = vec![Vec::new(); TIERS.len() + 1];
    for variant in variants {
        let tier = TIERS
            .iter()
            .position(|marker| variant.contains(marker))
            .unwrap_or(TIERS.len());
        buckets[tier].push(variant.clone());
    }
    buckets.into_iter().flatten().collect()
}

/// Variants of a locator in the order the loader should try them.
pub fn smart_variants(locator: &str) -> Vec<String> {
    smart_order(&variants(locator))
}

fn drive_templates(id: &str) -> Vec<String> {
    vec![
        format!("{CONTENT_HOST}/d/{id}=w1000"),
        format!("{DRIVE_HOST}/uc?export=view&id={id}"),
        format!("{CONTENT_HOST}/d/{id}=w800-h600-c"),
        format!("{DRIVE_HOST}/thumbnail?id={id}&sz=w1000"),
        format!("{DRIVE_HOST}/thumbnail?id={id}&sz=w400"),
        format!("{CONTENT_HOST}/d/{id}"),
        format!("{DRIVE_HOST}/file/d/{id}/preview"),
        format!("{DRIVE_HOST}/uc?id={id}&export=download"),
        format!("{DRIVE_HOST}/uc?id={id}&export=view"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    const ID: &str = "1aX9vQm3Lr7TqKp2WcZ8nBdE4fHjU6yRs";

    fn share_link() -> String {
        format!("https://drive.google.com/file/d/{ID}/view?usp=sharing")
    }

    #[test]
    fn test_non_drive_locator_is_passed_through() {
        let url = "https://images.unsplash.com/photo-1.jpg";
        assert_eq!(variants(url), vec![url.to_string()]);
        assert_eq!(smart_variants(url), vec![url.to_string()]);
    }

    #[test]
    fn test_drive_without_id_degrades() {
        let url = "https://drive.google.com/file/d/short/view";
        assert_eq!(variants(url), vec![url.to_string()]);

        let folder = "https://drive.google.com/drive/my-drive";
        assert_eq!(variants(folder), vec![folder.to_string()]);
    }

    #[test]
    fn test_variants_expand_share_link() {
        let link = share_link();
        let list = variants(&link);

        assert_eq!(list.len(), 10);
        assert_eq!(list[0], format!("https://lh3.googleusercontent.com/d/{ID}=w1000"));
        assert_eq!(list.last(), Some(&link));

        let unique: HashSet<_> = list.iter().collect();
        assert_eq!(unique.len(), list.len());
    }

    #[test]
    fn test_schemeless_share_link_is_expanded() {
        let link = format!("drive.google.com/file/d/{ID}/view");
        let list = variants(&link);

        assert_eq!(list.len(), 10);
        assert_eq!(list[0], format!("https://lh3.googleusercontent.com/d/{ID}=w1000"));
        assert_eq!(list.last(), Some(&link));
    }

    #[test]
    fn test_original_stays_last_when_it_equals_a_template() {
        let link = format!("https://drive.google.com/uc?export=view&id={ID}");
        let list = variants(&link);

        assert_eq!(list.len(), 9);
        assert_eq!(list.last(), Some(&link));
        assert_eq!(list.iter().filter(|u| **u == link).count(), 1);
    }

    #[test]
    fn test_variants_are_deterministic() {
        let link = share_link();
        assert_eq!(variants(&link), variants(&link));
        assert_eq!(smart_variants(&link), smart_variants(&link));
    }

    #[test]
    fn test_smart_order_tiers() {
        let ordered = smart_variants(&share_link());
        let expected = vec![
            format!("https://lh3.googleusercontent.com/d/{ID}=w1000"),
            format!("https://lh3.googleusercontent.com/d/{ID}=w800-h600-c"),
            format!("https://lh3.googleusercontent.com/d/{ID}"),
            format!("https://drive.google.com/uc?export=view&id={ID}"),
            format!("https://drive.google.com/uc?id={ID}&export=download"),
            format!("https://drive.google.com/uc?id={ID}&export=view"),
            format!("https://drive.google.com/thumbnail?id={ID}&sz=w1000"),
            format!("https://drive.google.com/thumbnail?id={ID}&sz=w400"),
            format!("https://drive.google.com/file/d/{ID}/preview"),
            share_link(),
        ];
        assert_eq!(ordered, expected);
    }

    #[test]
    fn test_smart_order_keeps_untiered_order() {
        let input: Vec<String> = ["b.png", "https://drive.google.com/thumbnail?id=x", "a.png"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert_eq!(
            smart_order(&input),
            ["https://drive.google.com/thumbnail?id=x", "b.png", "a.png"]
        );
    }
}

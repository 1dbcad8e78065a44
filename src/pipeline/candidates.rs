//! Candidate list construction for one displayed recipe.

use crate::models::{Candidate, FallbackConfig, ImageOrigin, ImageRequest, VariantList};
use crate::services::{RecipeResolver, smart_variants};

/// Build the ordered candidate list for a request.
///
/// Order: smart-ordered variants of the catalog locator, then of the
/// record's own locator (when it differs), then stock photos, then the
/// last-resort asset.
pub fn build_candidates(
    request: &ImageRequest,
    resolver: &RecipeResolver,
    fallbacks: &FallbackConfig,
) -> VariantList {
    let mapped = resolver.resolve(&request.recipe_name);
    let original = request
        .original_locator
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty());

    let mut candidates = Vec::new();

    if let Some(locator) = mapped {
        candidates.extend(
            smart_variants(locator)
                .into_iter()
                .map(|url| Candidate::new(url, ImageOrigin::Mapped)),
        );
    }

    if let Some(locator) = original.filter(|o| Some(*o) != mapped) {
        candidates.extend(
            smart_variants(locator)
                .into_iter()
                .map(|url| Candidate::new(url, ImageOrigin::Original)),
        );
    }

    candidates.extend(
        fallbacks
            .stock_images
            .iter()
            .map(|url| Candidate::new(url.as_str(), ImageOrigin::Fallback)),
    );

    let list = VariantList::new(candidates, &fallbacks.last_resort);
    log::debug!(
        "Built {} candidates for {:?} (mapped: {}, original: {})",
        list.len(),
        request.recipe_name,
        mapped.is_some(),
        original.is_some()
    );
    list
}

//! Per-entity owner of a fallback loader.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::models::{FallbackConfig, ImageRequest, LoaderConfig};
use crate::pipeline::candidates::build_candidates;
use crate::pipeline::driver::drive;
use crate::pipeline::fallback::{FallbackLoader, LoadReport};
use crate::services::RecipeResolver;
use crate::source::ImageSource;

/// Image slot of one rendered entity (e.g. one demo card).
///
/// The resolver and fallback list are shared read-only; the loader is
/// owned exclusively by this slot.
pub struct ImageSlot {
    resolver: Arc<RecipeResolver>,
    fallbacks: Arc<FallbackConfig>,
    request: ImageRequest,
    loader: FallbackLoader,
}

impl ImageSlot {
    pub fn new(
        resolver: Arc<RecipeResolver>,
        fallbacks: Arc<FallbackConfig>,
        config: LoaderConfig,
        request: ImageRequest,
    ) -> Self {
        let variants = build_candidates(&request, &resolver, &fallbacks);
        Self {
            loader: FallbackLoader::new(config, variants),
            resolver,
            fallbacks,
            request,
        }
    }

    /// Point the slot at a (possibly) different entity.
    ///
    /// Rebuilds the candidate list and restarts the loader only when the
    /// recipe name or original locator changed. Returns whether it did.
    pub fn update(&mut self, request: ImageRequest) -> bool {
        if request == self.request {
            return false;
        }

        log::debug!(
            "Image slot identity changed: {:?} -> {:?}",
            self.request.recipe_name,
            request.recipe_name
        );
        let variants = build_candidates(&request, &self.resolver, &self.fallbacks);
        self.loader.reset(variants);
        self.request = request;
        true
    }

    pub fn request(&self) -> &ImageRequest {
        &self.request
    }

    pub fn loader(&self) -> &FallbackLoader {
        &self.loader
    }

    /// Mutable access for callers driving the state machine from their own event loop.
    pub fn loader_mut(&mut self) -> &mut FallbackLoader {
        &mut self.loader
    }

    /// Drive the loader to completion or cancellation.
    pub async fn load(
        &mut self,
        source: Arc<dyn ImageSource>,
        cancel: &CancellationToken,
    ) -> LoadReport {
        drive(&mut self.loader, source, cancel).await
    }
}

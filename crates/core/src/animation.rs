use futures::stream::{self, StreamExt};
use indexmap::IndexMap;
use pigment_api::{Animation, ApiResult, Collection, TexturePath};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::warn;

/// Loads animation metadata for animated paths.
pub struct AnimationAggregator {
    animations: Arc<dyn Collection<Animation>>,
    max_concurrent: usize,
}

impl AnimationAggregator {
    pub fn new(animations: Arc<dyn Collection<Animation>>, max_concurrent: usize) -> Self {
        Self {
            animations,
            max_concurrent: max_concurrent.max(1),
        }
    }

    /// Metadata keyed by use id, for every path flagged as animated.
    ///
    /// Reads run concurrently, at most `max_concurrent` at a time. An animated path
    /// without stored metadata is skipped with a warning.
    pub async fn for_paths(
        &self,
        paths: &IndexMap<String, TexturePath>,
    ) -> ApiResult<HashMap<String, Animation>> {
        let animated: Vec<(String, String)> = paths
            .iter()
            .filter(|(_, path)| path.is_animated)
            .map(|(use_id, path)| (use_id.clone(), path.id.clone()))
            .collect();

        if animated.is_empty() {
            return Ok(HashMap::new());
        }

        let results: Vec<_> = stream::iter(animated)
            .map(|(use_id, path_id)| {
                let animations = Arc::clone(&self.animations);
                async move {
                    let result = animations.get(&path_id).await;
                    (use_id, path_id, result)
                }
            })
            .buffer_unordered(self.max_concurrent)
            .collect()
            .await;

        let mut by_use = HashMap::with_capacity(results.len());
        for (use_id, path_id, result) in results {
            match result {
                Ok(animation) => {
                    by_use.insert(use_id, animation);
                }
                Err(e) if e.is_not_found() => {
                    warn!("Path {} is animated but has no animation metadata", path_id);
                }
                Err(e) => return Err(e),
            }
        }
        Ok(by_use)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryCollection;

    fn anim(id: &str, frametime: u32) -> Animation {
        Animation {
            id: id.to_string(),
            frametime: Some(frametime),
            interpolate: None,
            frames: None,
        }
    }

    #[tokio::test]
    async fn test_only_animated_paths_are_loaded() {
        let aggregator = AnimationAggregator::new(
            Arc::new(MemoryCollection::with_records(vec![
                anim("p1", 2),
                anim("p2", 8),
            ])),
            2,
        );

        let mut paths = IndexMap::new();
        paths.insert(
            "1a".to_string(),
            TexturePath::new("p1", "1a", "fire.png", ["1.20"]).animated(),
        );
        paths.insert(
            "2a".to_string(),
            TexturePath::new("p2", "2a", "stone.png", ["1.20"]),
        );
        paths.insert(
            "3a".to_string(),
            TexturePath::new("p3", "3a", "water.png", ["1.20"]).animated(),
        );

        let found = aggregator.for_paths(&paths).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found["1a"].frametime, Some(2));
        assert!(!found.contains_key("2a"));
        assert!(!found.contains_key("3a"));
    }
}

use pigment_api::{ApiError, ApiResult, Collection, EditionFilter, Predicate, Use};
use std::sync::Arc;

/// Maps assets to their per-edition uses.
pub struct UseJoinResolver {
    uses: Arc<dyn Collection<Use>>,
}

impl UseJoinResolver {
    pub fn new(uses: Arc<dyn Collection<Use>>) -> Self {
        Self { uses }
    }

    /// Uses of the given assets, in store order.
    pub async fn uses_for_assets(
        &self,
        asset_ids: &[String],
        edition: &EditionFilter,
    ) -> ApiResult<Vec<Use>> {
        if asset_ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut predicates = vec![Predicate::is_in("asset", asset_ids.iter().cloned())];
        if let EditionFilter::Only(edition) = edition {
            predicates.push(Predicate::eq("edition", edition.as_str()));
        }
        self.uses.search(&predicates).await
    }

    pub async fn uses_in_edition(&self, edition: &str) -> ApiResult<Vec<Use>> {
        self.uses
            .search(&[Predicate::eq("edition", edition)])
            .await
    }

    pub async fn uses_of(&self, asset_id: &str) -> ApiResult<Vec<Use>> {
        self.uses
            .search(&[Predicate::eq("asset", asset_id)])
            .await
    }

    /// Id for a new use of `asset_id`: the asset id plus the letter after the highest suffix in use.
    pub async fn next_use_id(&self, asset_id: &str) -> ApiResult<String> {
        let existing = self.uses_of(asset_id).await?;
        let highest = existing.iter().filter_map(Use::suffix).max();

        let next = match highest {
            None => 'a',
            Some('z') => {
                return Err(ApiError::Validation(format!(
                    "asset {} already uses every suffix letter",
                    asset_id
                )));
            }
            Some(c) => (c as u8 + 1) as char,
        };
        Ok(format!("{}{}", asset_id, next))
    }
}

//! Published computation years.
//!
//! The backend publishes, per computation type, the years for which
//! on-demand computations and precomputed results exist. Each catalog is
//! fetched once and cached for the life of the [`YearCatalog`].

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumIter};
use tokio::sync::RwLock;

use crate::RequestError;
use crate::transport::AnalysisTransport;

/// Which year catalog to consult.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display, AsRefStr, EnumIter,
)]
#[strum(serialize_all = "lowercase")]
pub enum CatalogKind {
    /// Years available for on-demand computation.
    Computation,
    /// Years with precomputed results.
    Precomputation,
}

impl CatalogKind {
    /// Catalog path relative to the API base.
    #[must_use]
    pub const fn path(self) -> &'static str {
        match self {
            Self::Computation => "api/computationyears",
            Self::Precomputation => "api/precomputations",
        }
    }
}

/// One catalog entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublishedComputation {
    /// Computation type (e.g. `"lulc"`, `"productivity"`).
    pub computation_type: String,
    /// Years with published data.
    #[serde(default)]
    pub published_years: Vec<i64>,
}

/// Years published for `computation_type`, newest first.
#[must_use]
pub fn filter_years(catalog: &[PublishedComputation], computation_type: &str) -> Option<Vec<i64>> {
    let entry = catalog
        .iter()
        .find(|entry| entry.computation_type == computation_type)?;
    let mut years = entry.published_years.clone();
    years.sort_unstable_by(|a, b| b.cmp(a));
    Some(years)
}

/// Cached year catalogs.
#[derive(Debug, Default)]
pub struct YearCatalog {
    cache: RwLock<BTreeMap<CatalogKind, Vec<PublishedComputation>>>,
}

impl YearCatalog {
    /// Creates an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Years published for `computation_type`, newest first.
    ///
    /// Returns `None` if the type is not in the catalog or the catalog
    /// could not be fetched. Failed fetches are not cached.
    pub async fn years_for(
        &self,
        transport: &dyn AnalysisTransport,
        kind: CatalogKind,
        computation_type: &str,
    ) -> Option<Vec<i64>> {
        if let Some(catalog) = self.cache.read().await.get(&kind) {
            return filter_years(catalog, computation_type);
        }

        let catalog = match fetch(transport, kind).await {
            Ok(catalog) => catalog,
            Err(e) => {
                log::warn!("Failed to fetch {kind} years: {e}");
                return None;
            }
        };

        let years = filter_years(&catalog, computation_type);
        self.cache.write().await.insert(kind, catalog);
        years
    }
}

async fn fetch(
    transport: &dyn AnalysisTransport,
    kind: CatalogKind,
) -> Result<Vec<PublishedComputation>, RequestError> {
    let body = transport.get_json(kind.path()).await?;
    let catalog: Vec<PublishedComputation> = serde_json::from_value(body)?;
    log::debug!("Fetched {kind} catalog with {} entries", catalog.len());
    Ok(catalog)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::orchestrator::tests::MockTransport;
    use serde_json::json;

    fn catalog() -> serde_json::Value {
        json!([
            {"computation_type": "lulc", "published_years": [2001, 2019, 2010]},
            {"computation_type": "soc", "published_years": []}
        ])
    }

    #[test]
    fn filters_and_sorts_descending() {
        let catalog: Vec<PublishedComputation> = serde_json::from_value(catalog()).unwrap();
        assert_eq!(filter_years(&catalog, "lulc"), Some(vec![2019, 2010, 2001]));
        assert_eq!(filter_years(&catalog, "soc"), Some(vec![]));
        assert_eq!(filter_years(&catalog, "cvi"), None);
    }

    #[tokio::test]
    async fn catalog_is_fetched_once() {
        let transport = MockTransport::default();
        transport.respond_get(CatalogKind::Computation.path(), catalog());
        let years = YearCatalog::new();

        let first = years
            .years_for(&transport, CatalogKind::Computation, "lulc")
            .await;
        let second = years
            .years_for(&transport, CatalogKind::Computation, "lulc")
            .await;

        assert_eq!(first, Some(vec![2019, 2010, 2001]));
        assert_eq!(first, second);
        assert_eq!(transport.get_count(), 1);
    }

    #[tokio::test]
    async fn fetch_errors_are_not_cached() {
        let transport = MockTransport::default();
        let years = YearCatalog::new();

        assert_eq!(
            years
                .years_for(&transport, CatalogKind::Precomputation, "lulc")
                .await,
            None
        );

        transport.respond_get(CatalogKind::Precomputation.path(), catalog());
        assert_eq!(
            years
                .years_for(&transport, CatalogKind::Precomputation, "lulc")
                .await,
            Some(vec![2019, 2010, 2001])
        );
        assert_eq!(transport.get_count(), 2);
    }
}

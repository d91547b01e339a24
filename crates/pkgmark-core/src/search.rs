use crate::{
    models::{Package, SearchHit},
    Result,
};
use std::collections::HashSet;

/// Trait for search providers - makes testing easier and keeps things flexible
///
/// npms is the only registry today, but the CLI only ever talks to this trait.
#[cfg_attr(any(test, feature = "mock"), mockall::automock)]
#[async_trait::async_trait]
pub trait SearchProvider: Send + Sync {
    async fn search(&self, query: &str, limit: u32) -> Result<Vec<Package>>;
}

/// Mark which results are already favorites, keeping the registry's order
pub fn annotate(results: Vec<Package>, favorites: &[String]) -> Vec<SearchHit> {
    let favorites: HashSet<&str> = favorites.iter().map(String::as_str).collect();

    results
        .into_iter()
        .map(|package| {
            let is_favorite = favorites.contains(package.name.as_str());
            SearchHit {
                package,
                is_favorite,
            }
        })
        .collect()
}

/// Run a search and annotate it against the current favorites
pub async fn search_with_favorites(
    provider: &dyn SearchProvider,
    query: &str,
    limit: u32,
    favorites: &[String],
) -> Result<Vec<SearchHit>> {
    let results = provider.search(query, limit).await?;
    tracing::info!("Search for {:?} returned {} packages", query, results.len());
    Ok(annotate(results, favorites))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;
    use mockall::predicate::eq;

    #[test]
    fn test_annotate_marks_favorites() {
        let results = vec![
            Package::new("lodash"),
            Package::new("lodash-es"),
            Package::new("underscore"),
        ];
        let favorites = vec!["underscore".to_string(), "lodash".to_string()];

        let hits = annotate(results, &favorites);

        let flags: Vec<(&str, bool)> = hits
            .iter()
            .map(|h| (h.package.name.as_str(), h.is_favorite))
            .collect();
        assert_eq!(
            flags,
            vec![("lodash", true), ("lodash-es", false), ("underscore", true)]
        );
    }

    #[test]
    fn test_annotate_empty_favorites() {
        let hits = annotate(vec![Package::new("react")], &[]);
        assert!(!hits[0].is_favorite);
    }

    #[tokio::test]
    async fn test_search_with_favorites_uses_provider() {
        let mut provider = MockSearchProvider::new();
        provider
            .expect_search()
            .with(eq("http"), eq(10u32))
            .times(1)
            .returning(|_, _| {
                Ok(vec![
                    Package {
                        description: Some("Fast, unopinionated web framework".to_string()),
                        ..Package::new("express")
                    },
                    Package::new("koa"),
                ])
            });

        let favorites = vec!["koa".to_string()];
        let hits = search_with_favorites(&provider, "http", 10, &favorites)
            .await
            .unwrap();

        assert_eq!(hits.len(), 2);
        assert!(!hits[0].is_favorite);
        assert!(hits[1].is_favorite);
    }

    #[tokio::test]
    async fn test_search_with_favorites_propagates_errors() {
        let mut provider = MockSearchProvider::new();
        provider
            .expect_search()
            .returning(|_, _| Err(Error::ConfigError("no registry".to_string())));

        let result = search_with_favorites(&provider, "anything", 5, &[]).await;
        assert!(matches!(result, Err(Error::ConfigError(_))));
    }
}

// npms provider implementation - bridges API client with SearchProvider trait
use async_trait::async_trait;
use pkgmark_api::{NpmsClient, NpmsSearchResult};

use crate::{
    models::{Package, PackageLinks},
    search::SearchProvider,
    Result,
};

/// Wrapper around NpmsClient that implements SearchProvider
pub struct NpmsProvider {
    client: NpmsClient,
}

impl NpmsProvider {
    pub fn new(client: NpmsClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl SearchProvider for NpmsProvider {
    async fn search(&self, query: &str, limit: u32) -> Result<Vec<Package>> {
        let response = self.client.search(query, limit).await?;
        Ok(response.results.into_iter().map(npms_to_package).collect())
    }
}

/// Convert an npms search result to our internal Package model
fn npms_to_package(result: NpmsSearchResult) -> Package {
    let pkg = result.package;

    Package {
        name: pkg.name,
        description: pkg.description.filter(|d| !d.trim().is_empty()),
        version: pkg.version,
        links: PackageLinks {
            npm: pkg.links.npm,
            homepage: pkg.links.homepage,
            repository: pkg.links.repository,
        },
        score: result.score.map(|s| s.final_score),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pkgmark_api::npms::parse_search_response;

    #[test]
    fn test_npms_to_package() {
        let body = r#"{
            "total": 1,
            "results": [{
                "package": {
                    "name": "express",
                    "version": "4.19.2",
                    "description": "Fast, unopinionated, minimalist web framework",
                    "links": { "npm": "https://www.npmjs.com/package/express" }
                },
                "score": { "final": 0.62 }
            }]
        }"#;
        let response = parse_search_response(body).unwrap();
        let pkg = npms_to_package(response.results.into_iter().next().unwrap());

        assert_eq!(pkg.name, "express");
        assert_eq!(pkg.version.as_deref(), Some("4.19.2"));
        assert_eq!(pkg.url(), "https://www.npmjs.com/package/express");
        assert_eq!(pkg.score, Some(0.62));
    }

    #[test]
    fn test_blank_description_dropped() {
        let body = r#"{"results": [{"package": {"name": "x", "description": "  "}}]}"#;
        let response = parse_search_response(body).unwrap();
        let pkg = npms_to_package(response.results.into_iter().next().unwrap());

        assert!(pkg.description.is_none());
        assert!(pkg.score.is_none());
    }
}

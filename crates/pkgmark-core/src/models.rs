use serde::{Deserialize, Serialize};

/// A favorited package joined with its reason, the row the favorites view shows
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Favorite {
    pub name: String,
    /// `None` means no reason record exists, which is not the same as `Some("")`
    pub reason: Option<String>,
}

/// A package as returned by a registry search
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Package {
    pub name: String,
    pub description: Option<String>,
    pub version: Option<String>,
    #[serde(default)]
    pub links: PackageLinks,
    /// Registry's overall ranking in `0.0..=1.0`, when it gives one
    pub score: Option<f64>,
}

impl Package {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            version: None,
            links: PackageLinks::default(),
            score: None,
        }
    }

    /// Best link to show for this package: npm page, then homepage, then repo
    pub fn url(&self) -> String {
        self.links
            .npm
            .clone()
            .or_else(|| self.links.homepage.clone())
            .or_else(|| self.links.repository.clone())
            .unwrap_or_else(|| format!("https://www.npmjs.com/package/{}", self.name))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageLinks {
    pub npm: Option<String>,
    pub homepage: Option<String>,
    pub repository: Option<String>,
}

/// Search result annotated against the current favorites list
#[derive(Debug, Clone, PartialEq)]
pub struct SearchHit {
    pub package: Package,
    pub is_favorite: bool,
}

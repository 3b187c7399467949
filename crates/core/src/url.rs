use pigment_api::{Pack, Repository};

/// `{host}/{org}/{repo}/{version}/{path}` without any escaping.
pub fn build(host: &str, org: &str, repo: &str, version: &str, path: &str) -> String {
    format!(
        "{}/{}/{}/{}/{}",
        host.trim_end_matches('/'),
        org,
        repo,
        version,
        path.trim_start_matches('/')
    )
}

/// Builds raw-file URLs from pack repositories.
#[derive(Debug, Clone)]
pub struct UrlBuilder {
    host: String,
}

impl UrlBuilder {
    pub fn new(host: impl Into<String>) -> Self {
        Self { host: host.into() }
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn build(&self, repository: &Repository, version: &str, path: &str) -> String {
        build(&self.host, &repository.org, &repository.repo, version, path)
    }

    /// Empty when the pack has no repository for `edition`.
    pub fn for_pack(&self, pack: &Pack, edition: &str, version: &str, path: &str) -> String {
        pack.repository(edition)
            .map(|repo| self.build(repo, version, path))
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build() {
        assert_eq!(
            build(
                "https://raw.githubusercontent.com",
                "faithfulteam",
                "faithful-32x",
                "1.17",
                "textures/block/stone.png"
            ),
            "https://raw.githubusercontent.com/faithfulteam/faithful-32x/1.17/textures/block/stone.png"
        );
    }

    #[test]
    fn test_no_doubled_slashes() {
        assert_eq!(
            build("http://host/", "o", "r", "1.0", "/a.png"),
            "http://host/o/r/1.0/a.png"
        );
    }

    #[test]
    fn test_missing_repository_is_empty() {
        let pack = Pack::new("faithful", "Faithful").with_repository("java", "org", "repo");
        let urls = UrlBuilder::new("http://host");
        assert_eq!(
            urls.for_pack(&pack, "java", "1.20", "a.png"),
            "http://host/org/repo/1.20/a.png"
        );
        assert_eq!(urls.for_pack(&pack, "bedrock", "1.20", "a.png"), "");
    }
}

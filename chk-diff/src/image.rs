use serde::Serialize;

/// Structured view of a raw container image reference.
///
/// Parsing is a pure function of the raw string: the same input always
/// produces the same triple, and shapes the grammar does not cover degrade
/// to a best-effort fallback instead of failing.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ContainerImage {
    /// The reference exactly as it appears in the workload spec.
    pub raw: String,

    /// The reference with any recognized internal registry host stripped.
    /// This is the value the diff evaluator compares.
    pub normalized: String,

    /// Registry path up to and including the last `/`, empty on fallback.
    pub registry: String,

    /// Image name between the last `/` and the tag or digest separator.
    /// On fallback this holds the whole raw reference.
    pub repository: String,

    /// Tag or digest, empty on fallback.
    pub version: String,
}

impl ContainerImage {
    pub fn parse(raw: &str) -> Self {
        let normalized = strip_internal_registry(raw);
        match split_reference(raw) {
            Some((registry, repository, version)) => Self {
                raw: raw.to_string(),
                normalized,
                registry,
                repository,
                version,
            },
            None => Self {
                raw: raw.to_string(),
                normalized,
                registry: String::new(),
                repository: raw.to_string(),
                version: String::new(),
            },
        }
    }
}

/// Splits a `path/name:tag` or `path/name@digest` reference.
///
/// Both a path component and a tag or digest are required; bare names,
/// un-pathed `name:tag` references and un-pathed digests return `None` and
/// take the fallback branch in [`ContainerImage::parse`].
fn split_reference(raw: &str) -> Option<(String, String, String)> {
    let slash = raw.rfind('/')?;
    let (path, name) = raw.split_at(slash + 1);
    if let Some((repository, digest)) = name.split_once('@') {
        if repository.is_empty() || digest.is_empty() {
            return None;
        }
        return Some((path.to_string(), repository.to_string(), digest.to_string()));
    }
    let (repository, tag) = name.rsplit_once(':')?;
    if repository.is_empty() || tag.is_empty() {
        return None;
    }
    Some((path.to_string(), repository.to_string(), tag.to_string()))
}

/// Strips a recognized internal registry host (`registry.*.net`) from the
/// front of the reference, leaving every other reference untouched.
fn strip_internal_registry(raw: &str) -> String {
    if let Some((host, rest)) = raw.split_once('/')
        && host.starts_with("registry.")
        && host.ends_with(".net")
        && !rest.is_empty()
    {
        return rest.to_string();
    }
    raw.to_string()
}

#[cfg(test)]
mod tests {
    use super::ContainerImage;

    #[test]
    fn path_and_tag() {
        let image = ContainerImage::parse("registry.internal.net/ns/api:1.2");
        assert_eq!(image.registry, "registry.internal.net/ns/");
        assert_eq!(image.repository, "api");
        assert_eq!(image.version, "1.2");
        assert_eq!(image.normalized, "ns/api:1.2");
    }

    #[test]
    fn path_and_digest() {
        let image = ContainerImage::parse(
            "quay.io/app@sha256:6c3c624b58dbbcd3c0dd82b4c53f04194d1247c6eebdaab7c610cf7d66709b3b",
        );
        assert_eq!(image.registry, "quay.io/");
        assert_eq!(image.repository, "app");
        assert!(image.version.starts_with("sha256:"));
        // not an internal registry, nothing stripped
        assert_eq!(image.normalized, image.raw);
    }

    #[test]
    fn bare_name_falls_back() {
        let image = ContainerImage::parse("pause");
        assert_eq!(image.registry, "");
        assert_eq!(image.repository, "pause");
        assert_eq!(image.version, "");
        assert_eq!(image.normalized, "pause");
    }

    #[test]
    fn unpathed_tag_falls_back() {
        let image = ContainerImage::parse("redis:7");
        assert_eq!(image.registry, "");
        assert_eq!(image.repository, "redis:7");
        assert_eq!(image.version, "");
    }

    #[test]
    fn unpathed_digest_falls_back() {
        let image = ContainerImage::parse("app@sha256:abc123");
        assert_eq!(image.registry, "");
        assert_eq!(image.repository, "app@sha256:abc123");
        assert_eq!(image.version, "");
    }

    #[test]
    fn registry_port_without_tag_falls_back() {
        let image = ContainerImage::parse("registry:5000/app");
        assert_eq!(image.registry, "");
        assert_eq!(image.repository, "registry:5000/app");
    }

    #[test]
    fn external_registry_is_not_stripped() {
        let image = ContainerImage::parse("docker.io/library/nginx:1.25");
        assert_eq!(image.normalized, "docker.io/library/nginx:1.25");
        assert_eq!(image.registry, "docker.io/library/");
        assert_eq!(image.repository, "nginx");
    }

    #[test]
    fn parse_is_deterministic() {
        let raw = "registry.caas.net/kube-system/coredns:1.11.1";
        assert_eq!(ContainerImage::parse(raw), ContainerImage::parse(raw));
    }
}

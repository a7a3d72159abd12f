use std::path::Path;

use serde::Deserialize;

use crate::Result;

/// Allowlist of system component names a comparison is restricted to.
///
/// When active, resources outside the list are dropped from the inventory
/// before the comparison set is built, so the filter must be the same for
/// every cluster in a run.
#[derive(Clone, Debug, Deserialize)]
pub struct AllowedComponents {
    pub components: Vec<String>,
}

impl AllowedComponents {
    pub async fn try_new(path: impl AsRef<Path>) -> Result<Self> {
        let raw = tokio::fs::read_to_string(path).await?;
        let allowed = serde_yaml::from_str(&raw)?;
        Ok(allowed)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.components.iter().any(|c| c == name)
    }
}

#[cfg(test)]
mod tests {
    use super::AllowedComponents;

    #[test]
    fn parses_component_list() {
        let allowed: AllowedComponents = serde_yaml::from_str(
            "components:\n  - coredns\n  - kube-proxy\n",
        )
        .unwrap();
        assert!(allowed.contains("coredns"));
        assert!(!allowed.contains("nginx"));
    }
}

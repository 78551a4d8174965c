//! `--test-get-bindings-version` implementation.

use crate::config::InstallerConfig;
use crate::error::Result;
use crate::ui::UserInterface;
use crate::version::{fetch_latest_compatible_binding_version, BucketLister, S3BucketLister};

use super::dispatcher::{Command, CommandResult};

/// Prints the latest validated bindings version for the local release.
pub struct BindingsVersionCommand {
    config: InstallerConfig,
}

impl BindingsVersionCommand {
    /// Create a new bindings version command.
    pub fn new(config: InstallerConfig) -> Self {
        Self { config }
    }

    /// Resolve the version through `lister`.
    pub fn resolve(&self, lister: &dyn BucketLister) -> Result<String> {
        fetch_latest_compatible_binding_version(&self.config, lister)
    }
}

impl Command for BindingsVersionCommand {
    fn execute(&self, _ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let lister = S3BucketLister::new(&self.config)?;
        let version = self.resolve(&lister)?;
        println!("{}", version);
        Ok(CommandResult::success())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::InstallError;
    use std::collections::HashMap;
    use std::fs;
    use tempfile::TempDir;

    struct Keys(Vec<&'static str>);

    impl BucketLister for Keys {
        fn list_keys(&self, prefix: &str) -> Result<Vec<String>> {
            Ok(self
                .0
                .iter()
                .filter(|k| k.starts_with(prefix))
                .map(|k| k.to_string())
                .collect())
        }

        fn bucket_url(&self) -> String {
            "https://bucket.example".to_string()
        }
    }

    #[test]
    fn resolves_against_local_version() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("VERSION"), "3.1.20210301000000\n").unwrap();
        let config = InstallerConfig::with_env(temp.path(), HashMap::new());

        let lister = Keys(vec![
            "validated-bindings-versions/3.1.20210101000000",
            "validated-bindings-versions/3.1.20210202221642",
            "validated-bindings-versions/3.0.20210303000000",
        ]);

        let version = BindingsVersionCommand::new(config).resolve(&lister).unwrap();
        assert_eq!(version, "3.1.20210202221642");
    }

    #[test]
    fn missing_version_file_is_error() {
        let temp = TempDir::new().unwrap();
        let config = InstallerConfig::with_env(temp.path(), HashMap::new());

        let err = BindingsVersionCommand::new(config)
            .resolve(&Keys(vec![]))
            .unwrap_err();
        assert!(matches!(err, InstallError::VersionFile { .. }));
    }
}

use derive_builder::Builder;

/// Environment variable that overrides [`Settings::repository`]
pub const REPO_ENV: &str = "CREATE_REACT_TEST_REPO";

/// Environment variable that enables `trace!` output
pub const TRACE_ENV: &str = "CREATE_REACT_TEST_TRACE";

/// Everything the tool treats as fixed: where templates live, which file is
/// the manifest, and which names a new project may not take.
#[derive(Builder, Debug, Clone, PartialEq, Eq)]
#[builder(default, setter(into))]
pub struct Settings {
    /// `owner/name` of the template repository
    repository: String,
    archive_host: String,
    clone_host: String,
    manifest: String,
    version: String,
    /// Runtime dependencies of the template. A project named like one of
    /// them would shadow it, so the list is rejected up front.
    reserved: Vec<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            repository: "TangBii/template-test".into(),
            archive_host: "codeload.github.com".into(),
            clone_host: "github.com".into(),
            manifest: "package.json".into(),
            version: "1.0.0".into(),
            reserved: ["react", "react-dom", "react-scripts"]
                .map(String::from)
                .to_vec(),
        }
    }
}

impl Settings {
    /// Create a new [`Settings`] builder
    #[must_use]
    pub fn builder() -> SettingsBuilder {
        SettingsBuilder::create_empty()
    }

    /// Defaults, with the repository taken from `CREATE_REACT_TEST_REPO` when
    /// it is set to something non-blank.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut builder = Self::builder();

        if let Some(repo) = lookup(REPO_ENV)
            .map(|r| r.trim().to_owned())
            .filter(|r| !r.is_empty())
        {
            builder.repository(repo);
        }

        builder.build().unwrap_or_default()
    }

    #[must_use]
    pub fn repository(&self) -> &str {
        &self.repository
    }

    #[must_use]
    pub fn archive_host(&self) -> &str {
        &self.archive_host
    }

    #[must_use]
    pub fn clone_host(&self) -> &str {
        &self.clone_host
    }

    /// File name of the manifest inside a generated project
    #[must_use]
    pub fn manifest(&self) -> &str {
        &self.manifest
    }

    /// Version written into a freshly generated manifest
    #[must_use]
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Reserved names, sorted for display.
    #[must_use]
    pub fn reserved(&self) -> Vec<&str> {
        let mut names = self.reserved.iter().map(String::as_str).collect::<Vec<_>>();
        names.sort_unstable();
        names
    }
}

#[cfg(test)]
mod tests {
    use super::{Settings, REPO_ENV};

    #[test]
    fn defaults_point_at_template_repo() {
        let settings = Settings::default();

        assert_eq!(settings.repository(), "TangBii/template-test");
        assert_eq!(settings.manifest(), "package.json");
        assert_eq!(settings.version(), "1.0.0");
        assert_eq!(
            settings.reserved(),
            vec!["react", "react-dom", "react-scripts"]
        );
    }

    #[test]
    fn builder_fills_missing_fields_from_defaults() {
        let settings = Settings::builder()
            .repository("someone/else")
            .reserved(vec!["zeta".to_owned(), "alpha".to_owned()])
            .build()
            .unwrap();

        assert_eq!(settings.repository(), "someone/else");
        assert_eq!(settings.archive_host(), "codeload.github.com");
        assert_eq!(settings.reserved(), vec!["alpha", "zeta"]);
    }

    #[test]
    fn repository_can_be_overridden() {
        let settings = Settings::from_lookup(|key| {
            (key == REPO_ENV).then(|| " someone/fork \n".to_owned())
        });
        assert_eq!(settings.repository(), "someone/fork");
        assert_eq!(settings.clone_host(), "github.com");

        let settings = Settings::from_lookup(|_| Some("   ".to_owned()));
        assert_eq!(settings, Settings::default());

        assert_eq!(Settings::from_lookup(|_| None), Settings::default());
    }
}

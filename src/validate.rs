//! npm package-name rules and the reserved-name check applied to new
//! projects.

use crate::{config::Settings, error::CreateError};

const MAX_LENGTH: usize = 214;

const BLACKLIST: [&str; 2] = ["node_modules", "favicon.ico"];

const CORE_MODULES: [&str; 42] = [
    "assert",
    "async_hooks",
    "buffer",
    "child_process",
    "cluster",
    "console",
    "constants",
    "crypto",
    "dgram",
    "diagnostics_channel",
    "dns",
    "domain",
    "events",
    "fs",
    "http",
    "http2",
    "https",
    "inspector",
    "module",
    "net",
    "os",
    "path",
    "perf_hooks",
    "process",
    "punycode",
    "querystring",
    "readline",
    "repl",
    "stream",
    "string_decoder",
    "sys",
    "timers",
    "tls",
    "trace_events",
    "tty",
    "url",
    "util",
    "v8",
    "vm",
    "wasi",
    "worker_threads",
    "zlib",
];

#[derive(Debug, Default, PartialEq, Eq)]
pub struct ValidationResult {
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl ValidationResult {
    /// No errors and no warnings.
    #[must_use]
    pub fn valid_for_new_packages(&self) -> bool {
        self.errors.is_empty() && self.warnings.is_empty()
    }

    /// Errors first, then warnings.
    #[must_use]
    pub fn into_problems(self) -> Vec<String> {
        let mut problems = self.errors;
        problems.extend(self.warnings);
        problems
    }
}

/// Characters `encodeURIComponent` leaves untouched.
fn is_url_safe(s: &str) -> bool {
    s.chars()
        .all(|c| c.is_ascii_alphanumeric() || "-_.!~*'()".contains(c))
}

/// `@scope/name`, with both parts non-empty and URL safe.
fn is_safe_scoped(name: &str) -> bool {
    let Some(rest) = name.strip_prefix('@') else {
        return false;
    };

    match rest.split_once('/') {
        Some((scope, pkg)) if !scope.is_empty() && !pkg.is_empty() && !pkg.contains('/') => {
            is_url_safe(scope) && is_url_safe(pkg)
        }
        _ => false,
    }
}

#[must_use]
pub fn validate_package_name(name: &str) -> ValidationResult {
    let mut result = ValidationResult::default();

    if name.is_empty() {
        result
            .errors
            .push("name length must be greater than zero".into());
    }

    if name.starts_with('.') {
        result.errors.push("name cannot start with a period".into());
    }

    if name.starts_with('_') {
        result
            .errors
            .push("name cannot start with an underscore".into());
    }

    if name.trim() != name {
        result
            .errors
            .push("name cannot contain leading or trailing spaces".into());
    }

    let lower = name.to_lowercase();

    for blacklisted in BLACKLIST {
        if lower == blacklisted {
            result
                .errors
                .push(format!("{blacklisted} is a blacklisted name"));
        }
    }

    for module in CORE_MODULES {
        if lower == module {
            result.warnings.push(format!("{module} is a core module name"));
        }
    }

    if name.chars().count() > MAX_LENGTH {
        result.warnings.push(format!(
            "name can no longer contain more than {MAX_LENGTH} characters"
        ));
    }

    if lower != name {
        result
            .warnings
            .push("name can no longer contain capital letters".into());
    }

    let last_segment = name.rsplit('/').next().unwrap_or(name);
    if last_segment.chars().any(|c| "~'!()*".contains(c)) {
        result
            .warnings
            .push("name can no longer contain special characters (\"~'!()*\")".into());
    }

    if !is_url_safe(name) && !is_safe_scoped(name) {
        result
            .errors
            .push("name can only contain URL-friendly characters".into());
    }

    result
}

/// Rejects names npm would not publish and names that collide with the
/// template's own dependencies. Success is silent.
///
/// # Errors
///
/// [`CreateError::InvalidName`] with every reported problem, or
/// [`CreateError::ReservedName`] with the sorted reserved list.
pub fn check_app_name(name: &str, settings: &Settings) -> Result<(), CreateError> {
    let result = validate_package_name(name);

    if !result.valid_for_new_packages() {
        return Err(CreateError::InvalidName {
            name: name.to_owned(),
            problems: result.into_problems(),
        });
    }

    let reserved = settings.reserved();
    if reserved.contains(&name) {
        return Err(CreateError::ReservedName {
            name: name.to_owned(),
            reserved: reserved.into_iter().map(str::to_owned).collect(),
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_names_are_valid() {
        for name in ["my-app", "demo", "some.package", "a_b", "x1", "@scope/pkg"] {
            let result = validate_package_name(name);
            assert!(result.valid_for_new_packages(), "{name}: {result:?}");
        }
    }

    #[test]
    fn structural_errors() {
        assert_eq!(
            validate_package_name("").errors,
            vec!["name length must be greater than zero"]
        );
        assert_eq!(
            validate_package_name(".hidden").errors,
            vec!["name cannot start with a period"]
        );
        assert_eq!(
            validate_package_name("_private").errors,
            vec!["name cannot start with an underscore"]
        );
        assert!(validate_package_name(" padded ")
            .errors
            .contains(&"name cannot contain leading or trailing spaces".to_owned()));
        assert_eq!(
            validate_package_name("node_modules").errors,
            vec!["node_modules is a blacklisted name"]
        );
        assert_eq!(
            validate_package_name("hello world").errors,
            vec!["name can only contain URL-friendly characters"]
        );
    }

    #[test]
    fn legacy_names_only_warn() {
        let result = validate_package_name("MyApp");
        assert!(result.errors.is_empty());
        assert!(!result.valid_for_new_packages());
        assert_eq!(
            result.warnings,
            vec!["name can no longer contain capital letters"]
        );

        let result = validate_package_name("http");
        assert_eq!(result.warnings, vec!["http is a core module name"]);

        let result = validate_package_name("wow!");
        assert_eq!(
            result.warnings,
            vec!["name can no longer contain special characters (\"~'!()*\")"]
        );

        let result = validate_package_name(&"a".repeat(215));
        assert_eq!(
            result.warnings,
            vec!["name can no longer contain more than 214 characters"]
        );
    }

    #[test]
    fn scoped_names_need_both_parts() {
        assert!(validate_package_name("@scope/pkg").valid_for_new_packages());
        for name in ["@/pkg", "@scope/", "@a/b/c"] {
            assert!(!validate_package_name(name).errors.is_empty(), "{name}");
        }
    }

    #[test]
    fn invalid_name_lists_every_problem() {
        let err = check_app_name("_Bad", &Settings::default()).unwrap_err();

        match err {
            CreateError::InvalidName { name, problems } => {
                assert_eq!(name, "_Bad");
                assert_eq!(
                    problems,
                    vec![
                        "name cannot start with an underscore",
                        "name can no longer contain capital letters",
                    ]
                );
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn reserved_names_are_rejected() {
        for name in ["react", "react-dom", "react-scripts"] {
            match check_app_name(name, &Settings::default()) {
                Err(CreateError::ReservedName { reserved, .. }) => {
                    assert_eq!(reserved, vec!["react", "react-dom", "react-scripts"]);
                }
                other => panic!("{name}: unexpected result {other:?}"),
            }
        }

        assert!(check_app_name("react-app", &Settings::default()).is_ok());
    }
}

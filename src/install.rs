use anyhow::{bail, Context, Result};
use std::{
    fmt::{Display, Formatter},
    path::{Path, PathBuf},
    process::{Command, Stdio},
};

use crate::trace;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PackageManager {
    Yarn,
    Npm,
}

impl PackageManager {
    /// Managers in order of preference
    pub const PREFERENCE: [PackageManager; 2] = [PackageManager::Yarn, PackageManager::Npm];

    #[must_use]
    pub fn program(self) -> &'static str {
        match self {
            Self::Yarn => "yarn",
            Self::Npm => "npm",
        }
    }

    /// What to run inside the new project to start it
    #[must_use]
    pub fn start_command(self) -> String {
        format!("{} start", self.program())
    }
}

impl Display for PackageManager {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.program())
    }
}

/// Installs the dependencies of a freshly fetched project.
pub trait Install {
    fn manager(&self) -> PackageManager;

    /// Installs into `dir`, with the child's output going straight to the
    /// terminal.
    ///
    /// # Errors
    ///
    /// The process could not be started or exited unsuccessfully.
    fn install(&self, dir: &Path) -> Result<()>;
}

/// A package manager resolved on the search path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Installer {
    manager: PackageManager,
    program: PathBuf,
}

impl Installer {
    /// Picks the first manager of [`PackageManager::PREFERENCE`] found on
    /// `PATH`. Nothing is executed.
    ///
    /// # Errors
    ///
    /// Neither manager is installed.
    pub fn detect() -> Result<Self> {
        Self::detect_with(|program| which::which(program).ok())
    }

    /// [`Installer::detect`] with a custom executable lookup.
    ///
    /// # Errors
    ///
    /// `lookup` found none of the managers.
    pub fn detect_with(lookup: impl Fn(&str) -> Option<PathBuf>) -> Result<Self> {
        for manager in PackageManager::PREFERENCE {
            if let Some(program) = lookup(manager.program()) {
                trace!("Using {manager} at {}", program.display());
                return Ok(Self { manager, program });
            }
        }

        bail!(
            "No package manager found. Install {} and try again",
            PackageManager::PREFERENCE
                .map(PackageManager::program)
                .join(" or ")
        )
    }

    #[must_use]
    pub fn program(&self) -> &Path {
        &self.program
    }
}

impl Install for Installer {
    fn manager(&self) -> PackageManager {
        self.manager
    }

    fn install(&self, dir: &Path) -> Result<()> {
        trace!("Running {} install in {}", self.program().display(), dir.display());

        let status = Command::new(self.program())
            .arg("install")
            .current_dir(dir)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .with_context(|| format!("Failed to run `{} install`", self.manager))?;

        if !status.success() {
            match status.code() {
                Some(code) => bail!("`{} install` exited with code {code}", self.manager),
                None => bail!("`{} install` was terminated by a signal", self.manager),
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn yarn_is_preferred() {
        let installer =
            Installer::detect_with(|program| Some(PathBuf::from("/usr/bin").join(program)))
                .unwrap();

        assert_eq!(installer.manager(), PackageManager::Yarn);
        assert_eq!(installer.program(), Path::new("/usr/bin/yarn"));
    }

    #[test]
    fn npm_is_the_fallback() {
        let installer = Installer::detect_with(|program| {
            (program == "npm").then(|| PathBuf::from("/usr/local/bin/npm"))
        })
        .unwrap();

        assert_eq!(installer.manager(), PackageManager::Npm);
        assert_eq!(installer.manager().start_command(), "npm start");
    }

    #[test]
    fn nothing_installed() {
        let err = Installer::detect_with(|_| None).unwrap_err();
        assert_eq!(
            err.to_string(),
            "No package manager found. Install yarn or npm and try again"
        );
    }

    #[cfg(unix)]
    #[test]
    fn failing_install_is_an_error() {
        let tmp = tempfile::tempdir().unwrap();
        let installer = Installer {
            manager: PackageManager::Npm,
            program: PathBuf::from("false"),
        };

        let err = installer.install(tmp.path()).unwrap_err();
        assert_eq!(err.to_string(), "`npm install` exited with code 1");
    }

    #[cfg(unix)]
    #[test]
    fn successful_install() {
        let tmp = tempfile::tempdir().unwrap();
        let installer = Installer {
            manager: PackageManager::Npm,
            program: PathBuf::from("true"),
        };

        installer.install(tmp.path()).unwrap();
    }
}

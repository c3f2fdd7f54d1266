//! Retrieval of the remote template into the project directory.

use anyhow::{anyhow, bail, ensure, Context, Result};
use flate2::read::GzDecoder;
use std::{
    io::Read,
    path::{Component, Path, PathBuf},
    process::Command,
};

use crate::{args::Template, config::Settings, trace};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FetchMethod {
    /// Download the branch as a gzipped tarball over HTTPS
    #[default]
    Archive,
    /// Shallow `git clone` of the branch, without the `.git` directory
    Clone,
}

/// Something that can populate a directory with template files.
pub trait Fetch {
    /// Human readable origin, for progress messages
    fn describe(&self) -> String;

    /// Writes the template into `dest`, creating it.
    ///
    /// # Errors
    ///
    /// Any network, process or IO failure. `dest` may be left partially
    /// populated.
    fn fetch(&self, dest: &Path) -> Result<()>;
}

/// A branch of a repository hosted on GitHub.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteTemplate {
    repository: String,
    branch: String,
    method: FetchMethod,
    archive_host: String,
    clone_host: String,
}

impl RemoteTemplate {
    #[must_use]
    pub fn new(settings: &Settings, template: Template, method: FetchMethod) -> Self {
        Self {
            repository: settings.repository().to_owned(),
            branch: template.branch().to_owned(),
            method,
            archive_host: settings.archive_host().to_owned(),
            clone_host: settings.clone_host().to_owned(),
        }
    }

    #[must_use]
    pub fn archive_url(&self) -> String {
        format!(
            "https://{}/{}/tar.gz/refs/heads/{}",
            self.archive_host, self.repository, self.branch
        )
    }

    #[must_use]
    pub fn clone_url(&self) -> String {
        format!("https://{}/{}.git", self.clone_host, self.repository)
    }

    fn download(&self, dest: &Path) -> Result<()> {
        let url = self.archive_url();
        trace!("Downloading {url}");

        let client = reqwest::blocking::Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to build HTTP client")?;

        let response = client
            .get(&url)
            .send()
            .with_context(|| format!("Failed to download {url}"))?
            .error_for_status()
            .map_err(|e| match e.status() {
                Some(status) => anyhow!(
                    "Template branch '{}' of {} is not available ({status})",
                    self.branch,
                    self.repository
                ),
                None => anyhow!(e),
            })?;

        unpack_archive(response, dest)
    }

    fn git_clone(&self, dest: &Path) -> Result<()> {
        let git = which::which("git").context("git is required to clone the template")?;
        let url = self.clone_url();
        trace!("Cloning {url}#{} with {}", self.branch, git.display());

        let output = Command::new(git)
            .args(["clone", "--depth", "1", "--branch", self.branch.as_str(), url.as_str()])
            .arg(dest)
            .output()
            .context("Failed to run git")?;

        if !output.status.success() {
            bail!(
                "git clone of {url}#{} failed: {}",
                self.branch,
                String::from_utf8_lossy(&output.stderr).trim()
            );
        }

        let history = dest.join(".git");
        if history.exists() {
            fs_extra::dir::remove(&history)
                .with_context(|| format!("Failed to remove {}", history.display()))?;
        }

        Ok(())
    }
}

impl Fetch for RemoteTemplate {
    fn describe(&self) -> String {
        format!("{}#{}", self.repository, self.branch)
    }

    fn fetch(&self, dest: &Path) -> Result<()> {
        match self.method {
            FetchMethod::Archive => self.download(dest),
            FetchMethod::Clone => self.git_clone(dest),
        }
    }
}

/// Path of an archive entry below `dest`, with the archive's top-level
/// directory dropped. `None` for the top-level directory itself.
fn stripped_target(dest: &Path, entry: &Path) -> Result<Option<PathBuf>> {
    let mut components = entry.components();
    components.next();

    let mut target = dest.to_path_buf();
    let mut depth = 0;

    for component in components {
        match component {
            Component::Normal(part) => {
                target.push(part);
                depth += 1;
            }
            Component::CurDir => {}
            _ => bail!("Archive entry {} escapes the project", entry.display()),
        }
    }

    Ok((depth > 0).then_some(target))
}

/// Whether a link target stays below the directory holding the link.
fn is_contained_link(link: &Path) -> bool {
    link.components()
        .all(|c| matches!(c, Component::Normal(_) | Component::CurDir))
}

/// Extracts a gzipped tarball into `dest`, dropping the single top-level
/// directory GitHub wraps every archive in.
///
/// # Errors
///
/// Malformed archives, entries or links pointing outside `dest`, and IO
/// failures.
pub fn unpack_archive(reader: impl Read, dest: &Path) -> Result<()> {
    let mut archive = tar::Archive::new(GzDecoder::new(reader));
    std::fs::create_dir_all(dest)
        .with_context(|| format!("Failed to create {}", dest.display()))?;
    let root = dest
        .canonicalize()
        .with_context(|| format!("Failed to resolve {}", dest.display()))?;

    let mut unpacked = 0usize;

    for entry in archive.entries().context("Failed to read template archive")? {
        let mut entry = entry.context("Corrupt template archive")?;
        let path = entry.path()?.into_owned();
        let kind = entry.header().entry_type();

        if kind.is_pax_global_extensions() {
            continue;
        }

        let Some(target) = stripped_target(dest, &path)? else {
            continue;
        };

        if let Some(parent) = target.parent() {
            std::fs::create_dir_all(parent)?;
            ensure!(
                parent.canonicalize()?.starts_with(&root),
                "Archive entry {} escapes the project",
                path.display()
            );
        }

        if kind.is_symlink() || kind.is_hard_link() {
            let link = entry
                .link_name()?
                .ok_or_else(|| anyhow!("Archive link {} has no target", path.display()))?
                .into_owned();
            ensure!(
                is_contained_link(&link),
                "Archive link {} points outside the project",
                path.display()
            );

            // Hard link targets name another entry of the same archive.
            if kind.is_hard_link() {
                let source = stripped_target(dest, &link)?
                    .ok_or_else(|| anyhow!("Archive link {} has no target", path.display()))?;
                std::fs::hard_link(&source, &target)
                    .with_context(|| format!("Failed to extract {}", path.display()))?;
                unpacked += 1;
                continue;
            }
        }

        entry
            .unpack(&target)
            .with_context(|| format!("Failed to extract {}", path.display()))?;
        unpacked += 1;
    }

    ensure!(unpacked > 0, "Template archive is empty");
    trace!("Extracted {unpacked} entries into {}", dest.display());

    Ok(())
}

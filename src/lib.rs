pub mod args;
pub mod config;
pub mod error;
pub mod fetch;
pub mod install;
pub mod log;
pub mod manifest;
pub mod progress;
pub mod validate;

use owo_colors::OwoColorize;
use std::path::{Path, PathBuf};

use crate::{
    args::Request,
    config::Settings,
    error::CreateError,
    fetch::{Fetch, RemoteTemplate},
    install::{Install, Installer, PackageManager},
    progress::Progress,
};

/// Refuses any existing entry at `path`, dangling symlinks included.
///
/// # Errors
///
/// [`CreateError::PathExists`] naming `path`.
pub fn ensure_vacant(path: &Path) -> Result<(), CreateError> {
    if path.symlink_metadata().is_ok() {
        return Err(CreateError::PathExists {
            path: path.to_path_buf(),
        });
    }

    Ok(())
}

/// Creates the project described by `request` from the remote template and
/// installs its dependencies with whichever package manager is on `PATH`.
///
/// Returns the absolute path of the new project.
///
/// # Errors
///
/// See [`scaffold`].
pub fn create_app(
    request: &Request,
    settings: &Settings,
    progress: &Progress,
) -> Result<PathBuf, CreateError> {
    let template = RemoteTemplate::new(settings, request.template, request.method);
    scaffold(request, settings, &template, Installer::detect, progress)
}

/// The whole pipeline with the fetch and install steps supplied by the
/// caller. `detect` runs only once the template is in place.
///
/// # Errors
///
/// The first failing step ends the run. Whatever was already written stays
/// on disk.
pub fn scaffold<F, I>(
    request: &Request,
    settings: &Settings,
    fetcher: &F,
    detect: impl FnOnce() -> anyhow::Result<I>,
    progress: &Progress,
) -> Result<PathBuf, CreateError>
where
    F: Fetch,
    I: Install,
{
    let root = request.absolute_target()?;
    let app_name = request.app_name()?;
    let target = request.target();

    validate::check_app_name(&app_name, settings)?;
    ensure_vacant(target)?;

    crate::trace!("Creating {app_name} at {}", root.display());

    let step = progress.start(format!("Downloading template {}...", fetcher.describe()));
    if let Err(e) = fetcher.fetch(target) {
        let msg = format!("{e:#}");
        step.fail(&msg);
        return Err(CreateError::Fetch(msg));
    }
    step.succeed("Template generated successfully");

    manifest::update_manifest(target, settings.manifest(), &app_name, settings.version())?;
    crate::trace!("Updated {}", target.join(settings.manifest()).display());

    let next = if request.skip_install {
        let manager = detect()
            .map(|i| i.manager())
            .unwrap_or(PackageManager::Npm);
        crate::warn!("Dependencies were not installed");

        format!(
            "cd {} && {} install && {}",
            request.project,
            manager,
            manager.start_command()
        )
    } else {
        let step = progress.start("Installing dependencies. This might take a couple of minutes.");

        let installer = match detect() {
            Ok(installer) => installer,
            Err(e) => {
                let msg = format!("{e:#}");
                step.fail(&msg);
                return Err(CreateError::Install(msg));
            }
        };

        let installed = step.suspend(|| {
            crate::info!("Running `{} install` in {}", installer.manager(), root.display());
            installer.install(target)
        });

        if let Err(e) = installed {
            let msg = format!("{e:#}");
            step.fail(&msg);
            return Err(CreateError::Install(msg));
        }
        step.succeed("Dependencies installed successfully");

        format!(
            "cd {} && {}",
            request.project,
            installer.manager().start_command()
        )
    };

    progress.done(format!(
        "{} Created {} at {}",
        "Success!".if_supports_color(owo_colors::Stream::Stdout, |s| s.green()),
        request.project,
        root.display()
    ));
    println!("\nYou can begin by running:\n");
    println!(
        "    {}\n",
        next.if_supports_color(owo_colors::Stream::Stdout, |s| s.cyan())
    );

    Ok(root)
}

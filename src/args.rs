pub use clap::{CommandFactory, Parser};
use clap::error::{ContextKind, ContextValue, ErrorKind};
use path_absolutize::Absolutize;
use std::{
    ffi::OsString,
    path::{Path, PathBuf},
};

use crate::{error::CreateError, fetch::FetchMethod, trace};

#[derive(Parser, Debug)]
#[command(
    name = "create-react-test",
    version,
    about = "Create a new React or Node project from a template",
    override_usage = "create-react-test <project-directory> [OPTIONS]",
    after_help = "Only <project-directory> is required"
)]
pub struct Args {
    /// Directory to create the project in
    #[arg(value_name = "project-directory")]
    pub project_directory: Option<String>,

    /// Choose a template <react | node>
    #[arg(short, long)]
    pub template: Option<String>,

    /// Clone the template with git instead of downloading an archive
    #[arg(long)]
    pub clone: bool,

    /// Generate the project without installing dependencies
    #[arg(long)]
    pub skip_install: bool,
}

impl Args {
    /// Like [`Parser::parse`], but unknown options are dropped instead of
    /// rejected.
    #[must_use]
    pub fn parse_lenient() -> Self {
        Self::try_parse_lenient_from(std::env::args_os()).unwrap_or_else(|e| e.exit())
    }

    /// Parses `args`, removing every argument clap reports as unknown and
    /// trying again. An unknown `--option` without `=` also drops the
    /// argument after it unless that one starts with `-`.
    ///
    /// # Errors
    ///
    /// Any clap error other than an unknown argument, including the
    /// help and version displays.
    pub fn try_parse_lenient_from<I, T>(args: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString>,
    {
        let mut args = args.into_iter().map(Into::into).collect::<Vec<OsString>>();

        loop {
            let err = match Self::try_parse_from(args.iter()) {
                Ok(parsed) => return Ok(parsed),
                Err(err) if err.kind() == ErrorKind::UnknownArgument => err,
                Err(err) => return Err(err),
            };

            let Some(ContextValue::String(unknown)) = err.get(ContextKind::InvalidArg) else {
                return Err(err);
            };

            let with_value = format!("{unknown}=");
            let Some(at) = args.iter().skip(1).position(|arg| {
                arg.to_str()
                    .is_some_and(|arg| arg == unknown || arg.starts_with(&with_value))
            }) else {
                return Err(err);
            };

            let removed = args.remove(at + 1);
            trace!("Ignoring unknown argument {removed:?}");

            // A bare unknown option takes the next non-option as its value.
            let takes_value = removed.to_str() == Some(unknown.as_str())
                && args
                    .get(at + 1)
                    .and_then(|next| next.to_str())
                    .is_some_and(|next| !next.starts_with('-'));
            if takes_value {
                let value = args.remove(at + 1);
                trace!("Ignoring its value {value:?}");
            }
        }
    }

    /// Turns parsed arguments into a [`Request`].
    ///
    /// # Errors
    ///
    /// Returns [`CreateError::Usage`] if no project directory was given.
    pub fn into_request(self) -> Result<Request, CreateError> {
        let Some(project) = self.project_directory.filter(|p| !p.is_empty()) else {
            return Err(CreateError::Usage {
                bin: Self::command().get_name().to_owned(),
            });
        };

        Ok(Request {
            project,
            template: Template::from_selector(self.template.as_deref()),
            method: if self.clone {
                FetchMethod::Clone
            } else {
                FetchMethod::Archive
            },
            skip_install: self.skip_install,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Template {
    #[default]
    React,
    Node,
}

impl Template {
    /// Anything other than `node` falls back to react.
    #[must_use]
    pub fn from_selector(selector: Option<&str>) -> Self {
        match selector {
            Some("node") => Self::Node,
            _ => Self::React,
        }
    }

    /// Branch of the template repository holding this variant
    #[must_use]
    pub fn branch(self) -> &'static str {
        match self {
            Self::React => "master",
            Self::Node => "node",
        }
    }
}

/// One invocation, resolved from the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    pub project: String,
    pub template: Template,
    pub method: FetchMethod,
    pub skip_install: bool,
}

impl Request {
    #[must_use]
    pub fn new(project: impl Into<String>, template: Template) -> Self {
        Self {
            project: project.into(),
            template,
            method: FetchMethod::default(),
            skip_install: false,
        }
    }

    /// Where the project is created, relative to the current directory
    #[must_use]
    pub fn target(&self) -> &Path {
        Path::new(&self.project)
    }

    /// Absolute form of [`Request::target`] with `.` and `..` resolved.
    ///
    /// # Errors
    ///
    /// Fails if the current directory cannot be read.
    pub fn absolute_target(&self) -> std::io::Result<PathBuf> {
        Ok(self.target().absolutize()?.into_owned())
    }

    /// Name the package gets: the last component of the absolute target.
    ///
    /// # Errors
    ///
    /// Fails if the current directory cannot be read.
    pub fn app_name(&self) -> std::io::Result<String> {
        Ok(self
            .absolute_target()?
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default())
    }
}

use owo_colors::OwoColorize;
use std::path::PathBuf;

/// Every way a run can end early. Nothing below `main` exits the process;
/// each failure travels back as one of these.
#[derive(Debug, thiserror::Error)]
pub enum CreateError {
    #[error("Please specify the project directory")]
    Usage { bin: String },

    #[error("Cannot create a project named {name} because of npm naming restrictions")]
    InvalidName { name: String, problems: Vec<String> },

    #[error("Cannot create a project named \"{name}\" because a dependency with the same name exists")]
    ReservedName { name: String, reserved: Vec<String> },

    #[error("{} already exists. Please change the name", .path.display())]
    PathExists { path: PathBuf },

    #[error("{0}")]
    Fetch(String),

    #[error("Failed to update {}: {reason}", .path.display())]
    Manifest { path: PathBuf, reason: String },

    #[error("{0}")]
    Install(String),

    #[error("Cannot resolve the project path: {0}")]
    Io(#[from] std::io::Error),
}

impl CreateError {
    /// Whether the progress spinner already showed this failure.
    #[must_use]
    pub fn shown_by_progress(&self) -> bool {
        matches!(self, Self::Fetch(_) | Self::Install(_))
    }

    /// Writes the user-facing explanation to stderr. Failures the spinner
    /// already displayed are not repeated.
    pub fn report(&self) {
        if self.shown_by_progress() {
            return;
        }

        match self {
            Self::Usage { bin } => {
                crate::error!(self);
                eprintln!(
                    "  {} {}\n",
                    bin.if_supports_color(owo_colors::Stream::Stderr, |s| s.cyan()),
                    "<project-directory>"
                        .if_supports_color(owo_colors::Stream::Stderr, |s| s.green())
                );
                eprintln!("For example");
                eprintln!(
                    "  {} {}\n",
                    bin.if_supports_color(owo_colors::Stream::Stderr, |s| s.cyan()),
                    "my-app".if_supports_color(owo_colors::Stream::Stderr, |s| s.green())
                );
                eprintln!(
                    "Run {} to see all options",
                    format!("{bin} --help")
                        .if_supports_color(owo_colors::Stream::Stderr, |s| s.cyan())
                );
            }
            Self::InvalidName { problems, .. } => {
                crate::error!("{}:\n", self);
                for problem in problems {
                    eprintln!(
                        "{}",
                        format!("  * {problem}")
                            .if_supports_color(owo_colors::Stream::Stderr, |s| s.red())
                    );
                }
                eprintln!("\nPlease choose a different project name");
            }
            Self::ReservedName { reserved, .. } => {
                crate::error!("{}.", self);
                eprintln!("Due to the way npm works, the following names are not allowed:\n");
                for name in reserved {
                    eprintln!(
                        "  {}",
                        name.if_supports_color(owo_colors::Stream::Stderr, |s| s.cyan())
                    );
                }
                eprintln!("\nPlease choose a different project name.");
            }
            Self::PathExists { .. } | Self::Manifest { .. } | Self::Io(_) => crate::error!(self),
            Self::Fetch(_) | Self::Install(_) => {}
        }
    }
}

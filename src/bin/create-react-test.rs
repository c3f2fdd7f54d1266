use create_react_test::{
    args::Args, config::Settings, create_app, error::CreateError, progress::Progress, trace,
};
use std::process::ExitCode;

fn app(args: Args) -> Result<(), CreateError> {
    let settings = Settings::from_env();
    trace!("Template repository: {}", settings.repository());

    let request = args.into_request()?;
    trace!("Request: {request:?}");

    create_app(&request, &settings, &Progress::default()).map(|_| ())
}

fn main() -> ExitCode {
    let args = Args::parse_lenient();

    match app(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            e.report();
            ExitCode::FAILURE
        }
    }
}

use std::process::ExitCode;

fn main() -> ExitCode {
    env_logger::init();

    if let Err(err) = nook::run() {
        eprintln!("error: {err:#}");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}

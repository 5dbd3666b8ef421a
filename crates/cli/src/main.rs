use std::process::ExitCode;

fn main() -> ExitCode {
    staybook_cli::run()
}

use std::process::ExitCode;

fn main() -> anyhow::Result<ExitCode> {
    uritemplate::cli::run_cli()
}

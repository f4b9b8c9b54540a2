use std::{env, path::PathBuf, process};

use expense_tracker::{cli::run_cli, errors::CliError, init};

fn main() {
    init();

    let home = match parse_args(env::args().skip(1)) {
        Ok(Some(home)) => home,
        Ok(None) => {
            print_usage();
            return;
        }
        Err(err) => {
            eprintln!("Error: {err}");
            print_usage();
            process::exit(2);
        }
    };

    if let Err(err) = run_cli(home) {
        eprintln!("Error: {err}");
        process::exit(1);
    }
}

/// `Ok(None)` means help was requested.
fn parse_args(
    mut args: impl Iterator<Item = String>,
) -> Result<Option<Option<PathBuf>>, CliError> {
    let mut home = None;
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-h" | "--help" => return Ok(None),
            "--home" => {
                let dir = args
                    .next()
                    .ok_or_else(|| CliError::Arguments("--home needs a directory".into()))?;
                home = Some(PathBuf::from(dir));
            }
            other => return Err(CliError::Arguments(format!("unexpected argument `{other}`"))),
        }
    }
    Ok(Some(home))
}

fn print_usage() {
    eprintln!(
        "Usage: expense_tracker_cli [--home <dir>]\n\
         Reads commands from the terminal, or line by line from stdin when piped.\n\
         Settings and data live under <dir> (default ~/.expense_tracker)."
    );
}

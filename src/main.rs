use clap::error::ErrorKind;
use std::process;
use trim_ps2::{
    cli::{Args, Command},
    error::EXIT_USAGE,
};

fn main() {
    let args = match Args::try_parse_args() {
        Ok(args) => args,
        Err(err) => {
            let exit_code = match err.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => 0,
                _ => EXIT_USAGE,
            };
            // Nothing sensible is left to do if stderr is gone
            let _ = err.print();
            process::exit(exit_code);
        }
    };

    let command = Command::from_args(args);
    process::exit(command.run());
}

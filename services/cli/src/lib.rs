mod cli;
mod commands;

use dealflow::error::AppError;

pub fn run() -> Result<(), AppError> {
    cli::run()
}

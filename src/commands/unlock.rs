//! The `unlock` subcommand.

use crate::cli::UnlockArgs;
use crate::error::Result;
use crate::output::OutputFormatter;
use crate::unlock::unlock_pdf;

pub fn run(args: &UnlockArgs, formatter: &OutputFormatter) -> Result<i32> {
    let output = args
        .output
        .clone()
        .unwrap_or_else(|| args.input.with_extension("unlocked.pdf"));

    let result = unlock_pdf(&args.input, &output, &args.password)?;
    if result.was_encrypted {
        formatter.success(&format!("unlocked {}", result.output_path.display()));
    } else {
        formatter.info(&format!(
            "{} was not encrypted; copied to {}",
            args.input.display(),
            result.output_path.display()
        ));
    }
    Ok(0)
}

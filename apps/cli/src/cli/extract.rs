use std::path::PathBuf;

use clap::Args;

use crate::errors::AppError;
use crate::extract::extract_file;

#[derive(Args, Debug)]
pub struct ExtractArgs {
    /// File to read
    pub file: PathBuf,

    /// Declared media type; takes precedence over the extension
    #[arg(long)]
    pub mime: Option<String>,
}

pub fn execute(args: ExtractArgs) -> Result<(), AppError> {
    let text = extract_file(&args.file, args.mime.as_deref())?;
    print!("{text}");
    if !text.ends_with('\n') {
        println!();
    }
    Ok(())
}

//! Check command - validate JSON text.

use anyhow::Result;
use clap::Args;
use hostjson::parse_json_text;
use hostjson_vm::JsString;
use std::path::PathBuf;

#[derive(Args)]
pub struct CheckCommand {
    /// Input file (`-` or omitted reads stdin)
    pub file: Option<PathBuf>,
}

impl CheckCommand {
    pub fn run(&self) -> Result<()> {
        let input = super::read_input(self.file.as_deref())?;
        check(&input)?;
        println!("ok");
        Ok(())
    }
}

/// Validate `input` against the JSON grammar
pub fn check(input: &str) -> Result<()> {
    parse_json_text(&JsString::new(input))?;
    Ok(())
}

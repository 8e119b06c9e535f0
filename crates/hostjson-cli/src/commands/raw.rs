//! Raw command - validate a primitive JSON fragment and echo it verbatim.

use anyhow::Result;
use clap::Args;
use hostjson::{raw_json, stringify};
use hostjson_vm::{NativeContext, Realm, Value};

#[derive(Args)]
pub struct RawCommand {
    /// Primitive JSON text, e.g. `1.50` or `"str"`
    #[arg(allow_hyphen_values = true)]
    pub text: String,
}

impl RawCommand {
    pub fn run(&self) -> Result<()> {
        println!("{}", passthrough(&self.text)?);
        Ok(())
    }
}

/// What `stringify` emits for `rawJSON(text)`
pub fn passthrough(text: &str) -> Result<String> {
    let mut ncx = NativeContext::new(Realm::new());
    let marker = raw_json(&mut ncx, &Value::string(text))?;
    stringify(&mut ncx, &marker, &Value::undefined(), &Value::undefined())?
        .ok_or_else(|| anyhow::anyhow!("Raw JSON marker has no representation"))
}

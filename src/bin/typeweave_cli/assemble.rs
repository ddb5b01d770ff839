use anyhow::{anyhow, Context, Result};
use clap::Parser;
use std::path::PathBuf;

use typeweave::store::paths::atomic_write;
use typeweave::types::{encode_type, encoding::type_from_json, names};

#[derive(Parser, Debug)]
#[command(about = "Encode a JSON type definition into a compiled type file")]
pub struct AssembleCmd {
    /// JSON definition of an outermost type (nested types inline)
    #[arg(id = "json_input", value_name = "JSON")]
    pub json: PathBuf,

    /// Type file to write
    pub out: PathBuf,
}

impl AssembleCmd {
    pub fn execute(&self) -> Result<()> {
        let json = std::fs::read_to_string(&self.json)
            .with_context(|| format!("read {}", self.json.display()))?;
        let ty = type_from_json(&json)?;
        if names::outermost(&ty.name) != ty.name {
            return Err(anyhow!(
                "{} is a nested type; assemble its outermost type instead",
                ty.name
            ));
        }
        atomic_write(&self.out, &encode_type(&ty)?)?;
        println!("Wrote {} to {}", ty.name, self.out.display());
        Ok(())
    }
}

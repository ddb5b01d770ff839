use anyhow::{anyhow, Context, Result};
use clap::Parser;
use std::path::PathBuf;

use typeweave::store::ModuleArchive;
use typeweave::types::{decode_type, encoding::type_to_json_pretty, names, CompiledType};

#[derive(Parser, Debug)]
#[command(about = "Print a compiled type as JSON")]
pub struct InspectCmd {
    /// Type file (`.ctype`) or module archive
    pub path: PathBuf,

    /// Qualified type name to print (archives, or a nested type of a type file)
    #[arg(long = "type", value_name = "NAME")]
    pub type_name: Option<String>,
}

impl InspectCmd {
    pub fn execute(&self) -> Result<()> {
        let is_type_file = self
            .path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e == names::TYPE_FILE_EXTENSION)
            .unwrap_or(false);

        let outer = if is_type_file {
            let bytes = std::fs::read(&self.path)
                .with_context(|| format!("read {}", self.path.display()))?;
            decode_type(&bytes, &self.path.display().to_string())?
        } else {
            let archive = ModuleArchive::read(&self.path)?;
            let Some(name) = &self.type_name else {
                let mut type_names: Vec<String> = archive
                    .entries
                    .iter()
                    .filter_map(|e| names::type_name_from_entry_path(&e.path))
                    .collect();
                type_names.sort();
                println!("{}", serde_json::to_string_pretty(&type_names)?);
                return Ok(());
            };
            let entry_path = names::type_entry_path(name);
            let entry = archive
                .entry(&entry_path)
                .ok_or_else(|| anyhow!("{} not found in {}", name, self.path.display()))?;
            decode_type(&entry.bytes, &entry_path)?
        };

        let ty = select(&outer, self.type_name.as_deref())?;
        println!("{}", type_to_json_pretty(ty)?);
        Ok(())
    }
}

fn select<'t>(outer: &'t CompiledType, name: Option<&str>) -> Result<&'t CompiledType> {
    let Some(name) = name else {
        return Ok(outer);
    };
    if names::outermost(name) != outer.name {
        return Err(anyhow!("{} is not declared in {}", name, outer.name));
    }
    outer
        .find_nested(&names::nesting_chain(name))
        .ok_or_else(|| anyhow!("{} not found", name))
}

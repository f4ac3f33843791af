//! Script model: validated commands plus the shared symbol table.

pub(crate) mod model;
pub(crate) mod symbols;

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use crate::foundation::error::{ReelError, ReelResult};

pub use model::{Arg, Command, MAX_FRAMES, Op, RawCommand};
pub use symbols::{Constants, DEFAULT_MATERIAL, Symbol, SymbolTable};

#[derive(serde::Deserialize)]
#[serde(deny_unknown_fields)]
struct ScriptDoc {
    #[serde(default)]
    symbols: SymbolTable,
    commands: Vec<RawCommand>,
}

/// A loaded script: ordered commands and the symbols they reference.
#[derive(Clone, Debug)]
pub struct Script {
    /// Commands in execution order. Never mutated after loading.
    pub commands: Vec<Command>,
    /// Materials and knobs; knob values are rebound once per animated frame.
    pub symbols: SymbolTable,
}

impl Script {
    /// Assemble a script, declaring every referenced knob and the default material.
    pub fn new(commands: Vec<Command>, mut symbols: SymbolTable) -> Self {
        for cmd in &commands {
            if let Some(knob) = cmd.knob.as_deref() {
                symbols.declare_knob(knob);
            }
        }
        if symbols.get(DEFAULT_MATERIAL).is_none() {
            symbols.insert(DEFAULT_MATERIAL, Symbol::Constants(Constants::default()));
        }
        Self { commands, symbols }
    }

    /// Parse a script from a JSON string.
    pub fn from_json_str(s: &str) -> ReelResult<Self> {
        let doc: ScriptDoc = serde_json::from_str(s)
            .map_err(|e| ReelError::serde(format!("parse script JSON: {e}")))?;
        Self::from_doc(doc)
    }

    /// Parse a script from a JSON reader.
    pub fn from_reader(r: impl Read) -> ReelResult<Self> {
        let doc: ScriptDoc = serde_json::from_reader(r)
            .map_err(|e| ReelError::serde(format!("parse script JSON: {e}")))?;
        Self::from_doc(doc)
    }

    /// Load a script from a JSON file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> ReelResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            ReelError::validation(format!("open script '{}': {e}", path.display()))
        })?;
        Self::from_reader(BufReader::new(f))
    }

    fn from_doc(doc: ScriptDoc) -> ReelResult<Self> {
        let commands = doc
            .commands
            .into_iter()
            .enumerate()
            .map(|(i, raw)| {
                Command::try_from(raw).map_err(|e| match e {
                    ReelError::Validation(msg) => {
                        ReelError::validation(format!("command {i}: {msg}"))
                    }
                    other => other,
                })
            })
            .collect::<ReelResult<Vec<_>>>()?;
        Ok(Self::new(commands, doc.symbols))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/script/script.rs"]
mod tests;

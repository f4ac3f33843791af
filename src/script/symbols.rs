use std::collections::BTreeMap;

use crate::foundation::error::{ReelError, ReelResult};

/// Name of the built-in neutral material used when a shape names none.
pub const DEFAULT_MATERIAL: &str = ".white";

/// Per-channel reflection coefficients, each `[ambient, diffuse, specular]`.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Constants {
    /// Red channel coefficients.
    pub red: [f64; 3],
    /// Green channel coefficients.
    pub green: [f64; 3],
    /// Blue channel coefficients.
    pub blue: [f64; 3],
}

impl Constants {
    /// The same coefficients on every channel.
    pub const fn uniform(ka: f64, kd: f64, ks: f64) -> Self {
        Self {
            red: [ka, kd, ks],
            green: [ka, kd, ks],
            blue: [ka, kd, ks],
        }
    }

    /// Coefficients grouped by term: `[ambient, diffuse, specular]`, each as `[r, g, b]`.
    pub(crate) fn by_term(&self) -> [[f64; 3]; 3] {
        let mut out = [[0.0; 3]; 3];
        for term in 0..3 {
            out[term] = [self.red[term], self.green[term], self.blue[term]];
        }
        out
    }
}

impl Default for Constants {
    fn default() -> Self {
        Self::uniform(0.2, 0.5, 0.5)
    }
}

/// Tagged symbol table entry.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Symbol {
    /// Material reflection coefficients, passed through to the rasterizer.
    Constants(Constants),
    /// Scalar animation parameter.
    Knob {
        /// Current value; overwritten once per animated frame.
        #[serde(default)]
        value: f64,
    },
}

/// Name -> entry mapping shared by every frame of a run.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct SymbolTable {
    entries: BTreeMap<String, Symbol>,
}

impl SymbolTable {
    /// Empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace an entry.
    pub fn insert(&mut self, name: impl Into<String>, symbol: Symbol) {
        self.entries.insert(name.into(), symbol);
    }

    /// Declare a knob with value 0.0 unless `name` is already defined.
    pub fn declare_knob(&mut self, name: &str) {
        if !self.entries.contains_key(name) {
            self.entries
                .insert(name.to_owned(), Symbol::Knob { value: 0.0 });
        }
    }

    /// Borrow an entry by name.
    pub fn get(&self, name: &str) -> Option<&Symbol> {
        self.entries.get(name)
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Return `true` when the table has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Current value of a knob.
    pub fn knob(&self, name: &str) -> ReelResult<f64> {
        match self.entries.get(name) {
            Some(Symbol::Knob { value }) => Ok(*value),
            Some(Symbol::Constants(_)) => Err(ReelError::evaluation(format!(
                "symbol '{name}' is a material, not a knob"
            ))),
            None => Err(ReelError::evaluation(format!("unknown knob '{name}'"))),
        }
    }

    /// Overwrite an existing knob's value.
    ///
    /// Knobs are declared when the script is loaded; binding an undeclared name is a logic error.
    pub fn set_knob(&mut self, name: &str, new_value: f64) -> ReelResult<()> {
        match self.entries.get_mut(name) {
            Some(Symbol::Knob { value }) => {
                *value = new_value;
                Ok(())
            }
            Some(Symbol::Constants(_)) => Err(ReelError::evaluation(format!(
                "cannot bind a value to material '{name}'"
            ))),
            None => Err(ReelError::evaluation(format!(
                "cannot bind undeclared knob '{name}'"
            ))),
        }
    }

    /// Material coefficients by name.
    pub fn constants(&self, name: &str) -> ReelResult<&Constants> {
        match self.entries.get(name) {
            Some(Symbol::Constants(c)) => Ok(c),
            Some(Symbol::Knob { .. }) => Err(ReelError::evaluation(format!(
                "symbol '{name}' is a knob, not a material"
            ))),
            None => Err(ReelError::evaluation(format!("unknown material '{name}'"))),
        }
    }

    /// Iterate entries in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Symbol)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/script/symbols.rs"]
mod tests;

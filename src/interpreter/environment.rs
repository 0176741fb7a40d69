use std::fmt::Debug;

use rustc_hash::FxHashMap;

use super::Value;

/// Variable bindings for one program run.
#[derive(Default)]
pub struct Environment {
    variables: FxHashMap<String, Value>,
}

impl Environment {
    pub fn new() -> Self {
        Self::default()
    }

    /// Unbound names read as `0`.
    pub fn get(&self, name: &str) -> Value {
        self.variables
            .get(name)
            .cloned()
            .unwrap_or(Value::Number(0.0))
    }

    pub fn assign(&mut self, name: &str, value: Value) {
        match self.variables.get_mut(name) {
            Some(slot) => *slot = value,
            None => {
                self.variables.insert(name.to_string(), value);
            }
        }
    }
}

impl Debug for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut names: Vec<&String> = self.variables.keys().collect();
        names.sort();
        let mut map = f.debug_map();
        for name in names {
            map.entry(name, &format_args!("{}", self.variables[name]));
        }
        map.finish()
    }
}

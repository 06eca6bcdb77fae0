// Copyright 2021 Twitter, Inc.
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Posterior traces exported as JSON by the inference pipeline.
//!
//! The file is an object of groups (`posterior`, `posterior_predictive`, ...),
//! each an object of variables. A variable is a nested array whose first two
//! axes are chain and draw.

mod stats;

pub use self::stats::*;

use crate::Error;

use serde_json::Value as JsonValue;

use std::collections::BTreeMap;
use std::path::Path;

pub const POSTERIOR: &str = "posterior";
pub const POSTERIOR_PREDICTIVE: &str = "posterior_predictive";

/// Draws of one variable, stored row-major over `shape`.
#[derive(Clone, Debug, PartialEq)]
pub struct Variable {
    name: String,
    shape: Vec<usize>,
    values: Vec<f64>,
}

impl Variable {
    pub fn new(name: impl AsRef<str>, shape: Vec<usize>, values: Vec<f64>) -> Result<Self, String> {
        if shape.len() < 2 {
            return Err(format!(
                "{}: expected at least chain and draw axes, got {} axes",
                name.as_ref(),
                shape.len()
            ));
        }
        let len: usize = shape.iter().product();
        if len != values.len() {
            return Err(format!(
                "{}: shape {:?} needs {} values, got {}",
                name.as_ref(),
                shape,
                len,
                values.len()
            ));
        }
        Ok(Self {
            name: name.as_ref().to_owned(),
            shape,
            values,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    pub fn chains(&self) -> usize {
        self.shape[0]
    }

    pub fn draws(&self) -> usize {
        self.shape[1]
    }

    /// Number of scalar components per draw.
    pub fn components(&self) -> usize {
        self.shape[2..].iter().product()
    }

    pub fn is_scalar(&self) -> bool {
        self.shape.len() == 2
    }

    /// Draws of one component, one `Vec` per chain.
    pub fn chain_draws(&self, component: usize) -> Vec<Vec<f64>> {
        let components = self.components();
        (0..self.chains())
            .map(|chain| {
                (0..self.draws())
                    .map(|draw| {
                        self.values[(chain * self.draws() + draw) * components + component]
                    })
                    .collect()
            })
            .collect()
    }

    /// Draws of one component with chains concatenated.
    pub fn pooled(&self, component: usize) -> Vec<f64> {
        self.chain_draws(component).into_iter().flatten().collect()
    }

    /// Display name of a component, `name[i]` for vector variables.
    pub fn component_name(&self, component: usize) -> String {
        if self.is_scalar() {
            self.name.clone()
        } else {
            format!("{}[{}]", self.name, component)
        }
    }
}

/// Walks a nested array, returning its shape and flattened values.
fn flatten(value: &JsonValue) -> Result<(Vec<usize>, Vec<f64>), String> {
    fn walk(value: &JsonValue, depth: usize, shape: &mut Vec<usize>, out: &mut Vec<f64>) -> Result<(), String> {
        match value {
            JsonValue::Array(items) => {
                if depth == shape.len() {
                    if !out.is_empty() {
                        return Err("ragged array".to_owned());
                    }
                    shape.push(items.len());
                } else if shape[depth] != items.len() {
                    return Err(format!(
                        "ragged array: axis {} has lengths {} and {}",
                        depth,
                        shape[depth],
                        items.len()
                    ));
                }
                for item in items {
                    walk(item, depth + 1, shape, out)?;
                }
                Ok(())
            }
            JsonValue::Number(n) if depth == shape.len() => {
                out.push(n.as_f64().unwrap_or(f64::NAN));
                Ok(())
            }
            JsonValue::Null if depth == shape.len() => {
                out.push(f64::NAN);
                Ok(())
            }
            JsonValue::Number(_) | JsonValue::Null => Err("ragged array".to_owned()),
            other => Err(format!("unexpected value: {}", other)),
        }
    }

    let mut shape = Vec::new();
    let mut values = Vec::new();
    walk(value, 0, &mut shape, &mut values)?;
    Ok((shape, values))
}

/// A loaded inference trace.
#[derive(Clone, Debug, Default)]
pub struct InferenceTrace {
    groups: BTreeMap<String, Vec<Variable>>,
}

impl InferenceTrace {
    pub fn load(path: &Path) -> Result<Self, Error> {
        let bytes = std::fs::read(path).map_err(|e| Error::io(path, e))?;
        Self::from_slice(path, &bytes)
    }

    pub fn from_slice(path: &Path, bytes: &[u8]) -> Result<Self, Error> {
        let malformed = |reason: String| Error::MalformedTrace {
            path: path.to_owned(),
            reason,
        };

        let root: BTreeMap<String, JsonValue> =
            serde_json::from_slice(bytes).map_err(|e| malformed(e.to_string()))?;

        let mut groups = BTreeMap::new();
        for (group, content) in root {
            if group.ends_with("_attrs") {
                continue;
            }
            let content = match content {
                JsonValue::Object(content) => content,
                _ => {
                    debug!("ignoring non-group entry {} in {}", group, path.display());
                    continue;
                }
            };

            let mut variables = Vec::with_capacity(content.len());
            for (name, value) in content {
                let (shape, values) =
                    flatten(&value).map_err(|e| malformed(format!("{}.{}: {}", group, name, e)))?;
                variables.push(Variable::new(&name, shape, values).map_err(malformed)?);
            }
            groups.insert(group, variables);
        }

        if !groups.contains_key(POSTERIOR) {
            return Err(malformed(format!("missing '{}' group", POSTERIOR)));
        }

        Ok(Self { groups })
    }

    pub fn groups(&self) -> impl Iterator<Item = &str> {
        self.groups.keys().map(|g| g.as_str())
    }

    pub fn variables(&self, group: &str) -> &[Variable] {
        self.groups.get(group).map(|v| v.as_slice()).unwrap_or(&[])
    }

    pub fn posterior(&self) -> &[Variable] {
        self.variables(POSTERIOR)
    }

    pub fn variable(&self, group: &str, name: &str) -> Option<&Variable> {
        self.variables(group).iter().find(|v| v.name() == name)
    }

    /// Looks `name` up in the posterior predictive group, then the posterior.
    pub fn prediction(&self, name: &str) -> Option<&Variable> {
        self.variable(POSTERIOR_PREDICTIVE, name)
            .or_else(|| self.variable(POSTERIOR, name))
    }
}

//! Variable store and `$name` substitution.
//!
//! SDC files commonly parameterize values with TCL variables:
//!
//! ```text
//! set period 10.0
//! create_clock -period $period [get_ports clk]
//! ```
//!
//! The [`VariableStore`] is a flat name to value table. Values are stored
//! raw, so a value may itself reference other variables; [`substitute`]
//! resolves references repeatedly until nothing changes or a fixed pass
//! limit is reached. The pass limit bounds cyclic definitions such as
//! `set a $b; set b $a` without treating them as an error.
//!
//! [`substitute`]: VariableStore::substitute

use std::collections::HashMap;

use indexmap::IndexSet;
use log::debug;

/// Maximum number of substitution passes over one value.
const MAX_PASSES: usize = 10;

/// The result of substituting variables into a value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Substituted {
    /// The value with every bound reference replaced.
    pub value: String,
    /// Distinct unbound variable names, in order of first appearance.
    pub undefined: Vec<String>,
}

impl Substituted {
    /// Returns `true` if the value still contains unresolved references.
    pub fn is_complete(&self) -> bool {
        self.undefined.is_empty()
    }
}

/// Name to value table for one file check.
///
/// The last `set` of a name wins. There is no scoping.
#[derive(Debug, Clone, Default)]
pub struct VariableStore {
    values: HashMap<String, String>,
}

impl VariableStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.values.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    pub fn exists(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// Remove a variable, returning its previous value.
    pub fn unset(&mut self, name: &str) -> Option<String> {
        self.values.remove(name)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Replace `$name` and `${name}` references in `input`.
    ///
    /// A backslash-escaped `\$` is left as is. Unbound references are kept
    /// verbatim and reported in [`Substituted::undefined`].
    pub fn substitute(&self, input: &str) -> Substituted {
        if !input.contains('$') {
            return Substituted {
                value: input.to_string(),
                undefined: Vec::new(),
            };
        }

        let mut undefined = IndexSet::new();
        let mut current = input.to_string();
        let mut converged = false;

        for _ in 0..MAX_PASSES {
            let (next, changed) = self.substitute_once(&current, &mut undefined);
            current = next;
            if !changed {
                converged = true;
                break;
            }
        }

        if !converged {
            debug!(
                input = input,
                passes = MAX_PASSES;
                "Variable substitution pass limit reached"
            );
        }

        // A name reported on an early pass may have been bound after all.
        // Keep only names that are genuinely unbound.
        let undefined = undefined
            .into_iter()
            .filter(|name| !self.exists(name))
            .collect();

        Substituted {
            value: current,
            undefined,
        }
    }

    /// One left-to-right substitution pass.
    fn substitute_once(&self, input: &str, undefined: &mut IndexSet<String>) -> (String, bool) {
        let mut output = String::with_capacity(input.len());
        let mut changed = false;
        let mut rest = input;

        while let Some(index) = rest.find(['$', '\\']) {
            output.push_str(&rest[..index]);
            rest = &rest[index..];

            if let Some(escaped) = rest.strip_prefix("\\$") {
                output.push_str("\\$");
                rest = escaped;
                continue;
            }
            if let Some(after) = rest.strip_prefix('\\') {
                output.push('\\');
                rest = after;
                continue;
            }

            match variable_reference(rest) {
                Some((name, consumed)) => {
                    match self.get(name) {
                        Some(value) => {
                            output.push_str(value);
                            changed = true;
                        }
                        None => {
                            undefined.insert(name.to_string());
                            output.push_str(&rest[..consumed]);
                        }
                    }
                    rest = &rest[consumed..];
                }
                None => {
                    output.push('$');
                    rest = &rest[1..];
                }
            }
        }
        output.push_str(rest);

        (output, changed)
    }
}

/// Parse a variable reference at the start of `text`, which begins with `$`.
///
/// Returns the name and the number of bytes the reference spans.
fn variable_reference(text: &str) -> Option<(&str, usize)> {
    let body = text.strip_prefix('$')?;

    if let Some(braced) = body.strip_prefix('{') {
        let close = braced.find('}')?;
        let name = &braced[..close];
        return (!name.is_empty()).then_some((name, close + 3));
    }

    let len = body
        .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
        .unwrap_or(body.len());
    (len > 0).then(|| (&body[..len], len + 1))
}

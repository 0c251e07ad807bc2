//! The pass registry.
//!
//! Hosts look passes up by name at startup; broken registrations surface as
//! construction-time errors, never during a walk. The default registry
//! carries the two stock passes, `canonicalise` and `print`.

use bibql_parser::Node;
use indexmap::IndexMap;
use thiserror::Error;

use crate::canonical::canonicalise_with;
use crate::fields::LegacyFieldMap;
use crate::printer::print;

/// What a pass produced: a rewritten tree or rendered text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PassOutput {
    Tree(Node),
    Text(String),
}

/// A named, reusable tree pass. `run` builds fresh walk state per call, so
/// one registered pass may serve many threads.
pub trait WalkerPass: Send + Sync {
    fn name(&self) -> &'static str;
    fn run(&self, tree: &Node) -> PassOutput;
}

/// A registration the registry refuses.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("a walker pass named `{0}` is already registered")]
    Duplicate(String),
    #[error("walker pass names cannot be empty")]
    EmptyName,
}

/// Named walker passes in registration order.
#[derive(Default)]
pub struct WalkerRegistry {
    passes: IndexMap<&'static str, Box<dyn WalkerPass>>,
}

impl WalkerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry with the stock `canonicalise` and `print` passes.
    pub fn with_default_passes() -> Result<Self, RegistryError> {
        let mut registry = Self::new();
        registry.register(Box::new(CanonicalisePass::default()))?;
        registry.register(Box::new(PrintPass))?;
        Ok(registry)
    }

    pub fn register(&mut self, pass: Box<dyn WalkerPass>) -> Result<(), RegistryError> {
        let name = pass.name();
        if name.is_empty() {
            return Err(RegistryError::EmptyName);
        }
        if self.passes.contains_key(name) {
            return Err(RegistryError::Duplicate(name.to_string()));
        }
        self.passes.insert(name, pass);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&dyn WalkerPass> {
        self.passes.get(name).map(Box::as_ref)
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.passes.keys().copied()
    }
}

/// The stock canonicalisation pass; owns its field-alias table.
#[derive(Debug, Clone, Default)]
pub struct CanonicalisePass {
    fields: LegacyFieldMap,
}

impl CanonicalisePass {
    pub fn new(fields: LegacyFieldMap) -> Self {
        Self { fields }
    }
}

impl WalkerPass for CanonicalisePass {
    fn name(&self) -> &'static str {
        "canonicalise"
    }

    fn run(&self, tree: &Node) -> PassOutput {
        PassOutput::Tree(canonicalise_with(&self.fields, tree))
    }
}

/// The stock printer pass.
#[derive(Debug, Clone, Copy)]
pub struct PrintPass;

impl WalkerPass for PrintPass {
    fn name(&self) -> &'static str {
        "print"
    }

    fn run(&self, tree: &Node) -> PassOutput {
        PassOutput::Text(print(tree))
    }
}

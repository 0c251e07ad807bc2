#![doc = include_str!("../README.md")]

pub mod canonical;
pub mod fields;
pub mod fold;
pub mod printer;
pub mod registry;

pub use crate::canonical::{canonicalise, canonicalise_with, Canonicaliser};
pub use crate::fields::LegacyFieldMap;
pub use crate::fold::{fold, Fold};
pub use crate::printer::{print, Printer};
pub use crate::registry::{
    CanonicalisePass, PassOutput, PrintPass, RegistryError, WalkerPass, WalkerRegistry,
};

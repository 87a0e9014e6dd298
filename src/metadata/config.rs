//! Reification configuration
//!
//! This module provides the options that control how generic signatures are turned into types:
//! what happens to a type argument that cannot be resolved, and how deep nested signatures and
//! substitutions may go.

use crate::metadata::signatures::MAX_RECURSION_DEPTH;

/// How the reifier treats a type argument that fails to resolve
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ArgumentPolicy {
    /// Log the failure and substitute `java.lang.Object` for the argument
    #[default]
    Lenient,
    /// Propagate the failure to the caller
    Strict,
}

/// Configuration for signature reification and type resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReificationConfig {
    /// What to do with type arguments that cannot be reified (default: lenient)
    pub argument_policy: ArgumentPolicy,

    /// Maximum nesting depth for signature parsing and type substitution (default: 50)
    pub max_recursion_depth: usize,
}

impl Default for ReificationConfig {
    fn default() -> Self {
        Self {
            argument_policy: ArgumentPolicy::Lenient,
            max_recursion_depth: MAX_RECURSION_DEPTH,
        }
    }
}

impl ReificationConfig {
    /// Creates the lenient configuration, identical to [`ReificationConfig::default`]
    ///
    /// Unresolvable type arguments degrade to `java.lang.Object`, which keeps incomplete class
    /// paths usable at the price of less precise types.
    #[must_use]
    pub fn lenient() -> Self {
        Self::default()
    }

    /// Creates a strict configuration
    ///
    /// Any type argument that cannot be reified fails the whole signature.
    #[must_use]
    pub fn strict() -> Self {
        Self {
            argument_policy: ArgumentPolicy::Strict,
            max_recursion_depth: MAX_RECURSION_DEPTH,
        }
    }

    /// Returns `true` if argument failures propagate
    #[must_use]
    pub fn is_strict(&self) -> bool {
        self.argument_policy == ArgumentPolicy::Strict
    }
}

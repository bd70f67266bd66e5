//! Directive registry.

use crate::config::{ConfigError, DirectivesConfig};
use crate::error::DirectiveError;
use crate::fence::StartFence;
use crate::header::HeaderOptions;
use crate::kind::{Directive, DirectiveContext, DirectiveKind};
use crate::kinds::{self, BUILTIN_NAMES};
use crate::options::Options;
use crate::tracker::SharedTracker;

/// Directive kinds recognized by one engine, by name.
///
/// # Example
///
/// ```
/// use rw_directives::{DirectivesConfig, Registry};
///
/// let config = DirectivesConfig::with_enabled(["note", "tab"]);
/// let registry = Registry::from_config(&config).unwrap();
///
/// assert_eq!(registry.names(), vec!["note", "tab"]);
/// assert!(!registry.contains("details"));
/// ```
#[derive(Default)]
pub struct Registry {
    kinds: Vec<Box<dyn DirectiveKind>>,
}

impl Registry {
    /// A registry without any kinds.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// All built-in kinds.
    #[must_use]
    pub fn builtin() -> Self {
        BUILTIN_NAMES
            .iter()
            .filter_map(|name| kinds::builtin(name))
            .fold(Self::empty(), Self::with_kind)
    }

    /// Built-in kinds enabled by `config`, in the configured order.
    pub fn from_config(config: &DirectivesConfig) -> Result<Self, ConfigError> {
        let mut registry = Self::empty();
        for name in config.enabled() {
            let kind = kinds::builtin(name).ok_or_else(|| ConfigError::UnknownDirective(name.to_owned()))?;
            registry = registry.with_kind(kind);
        }
        Ok(registry)
    }

    /// Add a kind, replacing any kind registered under the same name.
    #[must_use]
    pub fn with_kind(mut self, kind: Box<dyn DirectiveKind>) -> Self {
        let name = kind.spec().name;
        if let Some(slot) = self.kinds.iter_mut().find(|k| k.spec().name == name) {
            *slot = kind;
        } else {
            self.kinds.push(kind);
        }
        self
    }

    /// Look up a kind by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&dyn DirectiveKind> {
        self.kinds.iter().find(|k| k.spec().name == name).map(|kind| &**kind)
    }

    /// Check whether a kind is registered.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Registered names in registration order.
    #[must_use]
    pub fn names(&self) -> Vec<&'static str> {
        self.kinds.iter().map(|k| k.spec().name).collect()
    }

    /// Validate a start fence and header and build the directive instance.
    pub fn parse_config(
        &self,
        fence: &StartFence,
        header: &HeaderOptions,
        tracker: SharedTracker,
    ) -> Result<Box<dyn Directive>, DirectiveError> {
        let kind = self
            .get(&fence.name)
            .ok_or_else(|| DirectiveError::UnknownDirective(fence.name.clone()))?;
        let spec = kind.spec();
        if fence.length < spec.min_length {
            return Err(DirectiveError::FenceTooShort {
                name: fence.name.clone(),
                length: fence.length,
                min: spec.min_length,
            });
        }

        let arguments = spec.arguments.parse(&fence.arguments)?;
        let options = Options::parse(spec.options, header)?;
        kind.build(DirectiveContext {
            length: fence.length,
            arguments,
            options,
            tracker,
        })
    }
}

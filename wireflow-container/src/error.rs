//! Error types for container operations.
//!
//! Two families matter to callers:
//! - [`ValidationError`]: a binding, name or stored record is malformed
//! - [`LookupError`]: the requested interface or name is not bound
//!
//! Errors returned by user factories are carried unchanged in
//! [`ContainerError::Factory`].

use std::fmt;

use wireflow_support::NameError;

use crate::key::InterfaceKey;

/// Boxed error produced by a user factory.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Main error type for all container operations.
#[derive(Debug, thiserror::Error)]
pub enum ContainerError {
    /// A binding or lookup failed validation.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The requested interface or name has no binding.
    #[error("{}", .0)]
    Lookup(LookupError),

    /// A factory failed while materializing a binding.
    #[error(transparent)]
    Factory(BoxError),
}

impl ContainerError {
    /// Returns `true` for [`ContainerError::Validation`].
    pub fn is_validation(&self) -> bool {
        matches!(self, ContainerError::Validation(_))
    }

    /// Returns `true` for [`ContainerError::Lookup`].
    pub fn is_lookup(&self) -> bool {
        matches!(self, ContainerError::Lookup(_))
    }

    /// Returns `true` for [`ContainerError::Factory`].
    pub fn is_factory(&self) -> bool {
        matches!(self, ContainerError::Factory(_))
    }
}

impl From<LookupError> for ContainerError {
    fn from(err: LookupError) -> Self {
        ContainerError::Lookup(err)
    }
}

/// A binding, name or stored record is malformed.
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    /// Neither an instance nor a factory was supplied.
    #[error("binding for {interface} needs an instance or a factory")]
    MissingSource { interface: InterfaceKey },

    /// The binding name does not have an identifier shape.
    #[error("invalid binding name: {0}")]
    InvalidName(#[from] NameError),

    /// The name is already bound and overriding names is disabled.
    #[error("binding name {name:?} is already registered for {interface}")]
    NameTaken { name: String, interface: InterfaceKey },

    /// A factory produced no value.
    #[error("factory for {interface} returned an empty result")]
    EmptyFactoryResult { interface: InterfaceKey },

    /// The named binding belongs to another interface.
    #[error("binding {name:?} is registered for {registered}, not {requested}")]
    InterfaceMismatch {
        name: String,
        requested: InterfaceKey,
        registered: InterfaceKey,
    },

    /// A stored record does not hold a value of its interface.
    #[error("record stored under {interface} does not hold a {interface} value")]
    MalformedRecord { interface: InterfaceKey },

    /// A name was given for a field that collects every binding.
    #[error("binding name {name:?} cannot select a collection of {interface}")]
    NamedCollection { name: String, interface: InterfaceKey },
}

/// Error when an interface or name has no binding.
///
/// Carries "did you mean" suggestions taken from what is registered.
#[derive(Debug)]
pub struct LookupError {
    /// The interface that was requested.
    pub requested: InterfaceKey,
    /// The binding name that was requested, if any.
    pub name: Option<String>,
    /// Registered interfaces or names that look similar.
    pub suggestions: Vec<String>,
}

impl fmt::Display for LookupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name {
            Some(ref name) => write!(
                f,
                "No binding named {name:?} for {}",
                self.requested.short_name()
            )?,
            None => write!(f, "Dependency not registered: {}", self.requested)?,
        }

        if !self.suggestions.is_empty() {
            write!(f, "\n  Did you mean one of:")?;
            for suggestion in &self.suggestions {
                write!(f, "\n    - {suggestion}")?;
            }
        }

        write!(
            f,
            "\n  Hint: Did you forget to call .provide::<{}>()?",
            self.requested.short_name()
        )
    }
}

/// Convenient Result type for container operations.
pub type Result<T> = std::result::Result<T, ContainerError>;

#[cfg(test)]
mod tests {
    use super::*;

    trait Mailer: Send + Sync {}

    #[test]
    fn lookup_error_display() {
        let err = ContainerError::from(LookupError {
            requested: InterfaceKey::of::<dyn Mailer>(),
            name: None,
            suggestions: vec!["dyn app::Mail".to_string()],
        });

        let msg = format!("{err}");
        assert!(msg.contains("not registered"));
        assert!(msg.contains("Mailer"));
        assert!(msg.contains("Did you mean"));
        assert!(err.is_lookup());
    }

    #[test]
    fn named_lookup_error_display() {
        let err = LookupError {
            requested: InterfaceKey::of::<dyn Mailer>(),
            name: Some("smtp".into()),
            suggestions: vec![],
        };

        let msg = err.to_string();
        assert!(msg.contains("\"smtp\""));
        assert!(msg.contains("dyn Mailer"));
        assert!(!msg.contains("Did you mean"));
    }

    #[test]
    fn mismatch_error_display() {
        let err = ContainerError::from(ValidationError::InterfaceMismatch {
            name: "primary".into(),
            requested: InterfaceKey::of::<dyn Mailer>(),
            registered: InterfaceKey::of::<String>(),
        });

        let msg = format!("{err}");
        assert!(msg.contains("primary"));
        assert!(msg.contains("String"));
        assert!(err.is_validation());
    }

    #[test]
    fn factory_error_is_transparent() {
        let source: BoxError = "disk on fire".into();
        let err = ContainerError::Factory(source);
        assert_eq!(err.to_string(), "disk on fire");
        assert!(err.is_factory());
    }

    #[test]
    fn name_error_converts() {
        let err = ValidationError::from(NameError::Empty);
        assert!(err.to_string().contains("must not be empty"));
    }
}

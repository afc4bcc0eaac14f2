//! Binding-name validation.
//!
//! Names index a binding across the whole container, so they are kept to a
//! conservative identifier shape: an ASCII letter or `_`, followed by ASCII
//! letters, digits or `_`.

/// Why a binding name was rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NameError {
    /// The name is the empty string.
    #[error("binding name must not be empty")]
    Empty,

    /// The first character is not a letter or underscore.
    #[error("binding name {name:?} must start with an ASCII letter or '_', found {found:?}")]
    BadStart { name: String, found: char },

    /// A later character is outside `[A-Za-z0-9_]`.
    #[error("binding name {name:?} contains {found:?} at byte {position}")]
    BadChar {
        name: String,
        found: char,
        position: usize,
    },
}

/// Checks that `name` has the identifier shape accepted for named bindings.
///
/// # Examples
/// ```
/// use wireflow_support::naming::validate_name;
///
/// assert!(validate_name("primary_db").is_ok());
/// assert!(validate_name("TestImplementation1").is_ok());
/// assert!(validate_name("-1").is_err());
/// ```
pub fn validate_name(name: &str) -> Result<(), NameError> {
    let mut chars = name.char_indices();

    let Some((_, first)) = chars.next() else {
        return Err(NameError::Empty);
    };
    if !(first.is_ascii_alphabetic() || first == '_') {
        return Err(NameError::BadStart {
            name: name.to_string(),
            found: first,
        });
    }

    for (position, ch) in chars {
        if !(ch.is_ascii_alphanumeric() || ch == '_') {
            return Err(NameError::BadChar {
                name: name.to_string(),
                found: ch,
                position,
            });
        }
    }

    Ok(())
}

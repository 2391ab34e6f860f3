//! Wrapper types that keep secrets (signing keys, merchant credentials)
//! out of `Debug` output and logs.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A wrapper for sensitive values. The inner value is only reachable
/// through [`PeekInterface::peek`] or [`ExposeInterface::expose`], and
/// the `Debug` representation is always redacted.
#[derive(Clone, Default, Deserialize, Eq, Hash, PartialEq)]
#[serde(transparent)]
pub struct Secret<T> {
    inner: T,
}

impl<T> Secret<T> {
    pub fn new(value: T) -> Self {
        Self { inner: value }
    }
}

impl<T> From<T> for Secret<T> {
    fn from(value: T) -> Self {
        Self::new(value)
    }
}

impl<T> fmt::Debug for Secret<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "*** {} ***", std::any::type_name::<T>())
    }
}

// Secrets serialize to their inner value so that signed request bodies
// can carry them on the wire; rendering to logs goes through Debug.
impl<T: Serialize> Serialize for Secret<T> {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.inner.serialize(serializer)
    }
}

/// Borrow the inner value of a secret.
pub trait PeekInterface<T> {
    fn peek(&self) -> &T;
}

/// Consume a secret and take ownership of the inner value.
pub trait ExposeInterface<T> {
    fn expose(self) -> T;
}

impl<T> PeekInterface<T> for Secret<T> {
    fn peek(&self) -> &T {
        &self.inner
    }
}

impl<T> ExposeInterface<T> for Secret<T> {
    fn expose(self) -> T {
        self.inner
    }
}

/// A value that may or may not need masking when rendered, used for
/// request headers.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Maskable<T> {
    Masked(Secret<T>),
    Normal(T),
}

impl<T: Clone> Maskable<T> {
    pub fn new_masked(value: Secret<T>) -> Self {
        Self::Masked(value)
    }

    pub fn new_normal(value: T) -> Self {
        Self::Normal(value)
    }

    pub fn into_inner(self) -> T {
        match self {
            Self::Masked(secret) => secret.expose(),
            Self::Normal(value) => value,
        }
    }

    pub fn is_masked(&self) -> bool {
        matches!(self, Self::Masked(_))
    }
}

impl<T> From<T> for Maskable<T> {
    fn from(value: T) -> Self {
        Self::Normal(value)
    }
}

impl<T> From<Secret<T>> for Maskable<T> {
    fn from(value: Secret<T>) -> Self {
        Self::Masked(value)
    }
}

/// Conversion into a masked [`Maskable`] value.
pub trait Mask {
    type Output;

    fn into_masked(self) -> Self::Output;
}

impl Mask for String {
    type Output = Maskable<String>;

    fn into_masked(self) -> Self::Output {
        Maskable::new_masked(Secret::new(self))
    }
}

impl Mask for Secret<String> {
    type Output = Maskable<String>;

    fn into_masked(self) -> Self::Output {
        Maskable::new_masked(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_output_is_redacted() {
        let secret = Secret::new("salt_k3y".to_string());
        let rendered = format!("{secret:?}");
        assert!(!rendered.contains("salt_k3y"));
    }

    #[test]
    fn peek_and_expose_return_inner() {
        let secret = Secret::new("value".to_string());
        assert_eq!(secret.peek(), "value");
        assert_eq!(secret.expose(), "value");
    }
}

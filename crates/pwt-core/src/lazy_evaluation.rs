//! Lazy evaluation allows options to be wired together before their values are known.
//!
//! The main driving trait that allows for this is [`Provider`](Provider). Objects that
//! implement this trait can try to provide a value of that type.
//!
//! Properties
//! ---
//!
//! `Prop<T>` - A property that can be set to a specific value, or to another provider. A property
//! can also be given a *convention*, a fallback provider that is only consulted when no value
//! was set. Convention values are computed on first read and then remembered.
//!
//! ```
//! # use pwt_core::lazy_evaluation::{Prop, Provider};
//! let mut optimize = Prop::<u8>::new("optimize");
//! optimize.set_convention(|| 9).unwrap();
//! assert_eq!(optimize.get(), 9);
//! optimize.set(4).unwrap();
//! assert_eq!(optimize.get(), 4);
//! ```
//!
//! `VecProp<T>` - A property made of a list of values.

pub mod prop;

pub use prop::*;
use std::fmt::{Debug, Formatter};
use std::marker::PhantomData;

/// The provider trait represents an object that can continuously produce a value. Provider values
/// can be chained together using the [`ProviderExt`][0] trait.
///
/// For convenience, functions implement this trait.
/// - `for<F, T> F : Provider<T> where F : Fn() -> T`
///
/// [0]: ProviderExt
pub trait Provider<T: Clone + Send + Sync>: Send + Sync {
    /// The missing message for this provider
    fn missing_message(&self) -> String {
        String::from("Provider has no value set")
    }

    /// Get a value from the provider.
    ///
    /// # Panic
    /// This method will panic if there is no value available.
    ///
    /// # Example
    /// ```
    /// # use pwt_core::lazy_evaluation::Provider;
    /// let prop = || 10;
    /// assert_eq!(prop.get(), 10);
    /// ```
    fn get(&self) -> T {
        self.try_get().expect(&self.missing_message())
    }

    /// Try to get a value from the provider.
    ///
    /// Will return `Some(v)` if value `v` is available, otherwise `None` is returned.
    fn try_get(&self) -> Option<T>;

    /// Tries to get a value from this provider, returning an error if not available.
    ///
    /// The error's message is usually specified by the `missing_message()` method.
    fn fallible_get(&self) -> Result<T, ProviderError> {
        self.try_get()
            .ok_or_else(|| ProviderError::new(self.missing_message()))
    }
}

assert_obj_safe!(Provider<()>);

impl<F, T> Provider<T> for F
where
    F: Fn() -> T + Send + Sync,
    T: Clone + Send + Sync,
{
    fn try_get(&self) -> Option<T> {
        Some(self())
    }
}

/// Provides extensions that are not object safe to the Provider trait.
pub trait ProviderExt<T: Clone + Send + Sync>: Provider<T> + Sized {
    /// Creates a provider that can map the output of one provider into some other value.
    ///
    /// `transform`: `fn(T) -> R`
    fn map<R, F>(self, transform: F) -> Mapped<T, R, F, Self>
    where
        R: Send + Sync + Clone,
        F: Fn(T) -> R + Send + Sync,
        Self: 'static,
    {
        Mapped {
            source: self,
            transform,
            _types: PhantomData,
        }
    }
}

impl<P, T> ProviderExt<T> for P
where
    T: Clone + Send + Sync,
    P: Provider<T> + Send + Sync + 'static,
{
}

/// Represents that a type can be represented as a provider. All Providers implement this trait.
pub trait IntoProvider<T: Send + Sync + Clone> {
    type Provider: Provider<T>;

    fn into_provider(self) -> Self::Provider;
}

impl<P, T> IntoProvider<T> for P
where
    T: Clone + Send + Sync,
    P: Provider<T> + Send + Sync,
{
    type Provider = Self;

    fn into_provider(self) -> Self::Provider {
        self
    }
}

/// A provider of one fixed value
#[derive(Clone)]
pub(crate) struct Fixed<T: Clone + Send + Sync>(pub(crate) T);

impl<T: Clone + Send + Sync> Provider<T> for Fixed<T> {
    fn try_get(&self) -> Option<T> {
        Some(self.0.clone())
    }
}

/// The values of `P` passed through a function, see [`ProviderExt::map`](ProviderExt::map)
#[derive(Clone)]
pub struct Mapped<T, R, F, P> {
    source: P,
    transform: F,
    _types: PhantomData<fn(T) -> R>,
}

impl<T, R, F, P: Debug> Debug for Mapped<T, R, F, P> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Mapped").field(&self.source).finish()
    }
}

impl<T, R, F, P> Provider<R> for Mapped<T, R, F, P>
where
    T: Clone + Send + Sync,
    R: Clone + Send + Sync,
    F: Fn(T) -> R + Send + Sync,
    P: Provider<T>,
{
    fn missing_message(&self) -> String {
        self.source.missing_message()
    }

    fn try_get(&self) -> Option<R> {
        self.source.try_get().map(&self.transform)
    }
}

/// A value could not be provided
#[derive(Debug, thiserror::Error)]
#[error("{}", message)]
pub struct ProviderError {
    message: String,
}

impl ProviderError {
    pub fn new(message: String) -> Self {
        Self { message }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn map() {
        let mut provider = Prop::<i32>::new("side");
        provider.set(5).unwrap();
        let mapped = provider.clone().map(|v| v * v);
        assert_eq!(mapped.get(), 25);
        provider.set(10).unwrap();
        assert_eq!(mapped.get(), 100);
    }

    #[test]
    fn mapped_reports_source_missing() {
        let missing = Prop::<i32>::new("workers").map(|v| v + 1);
        assert!(missing.try_get().is_none());
        assert_eq!(
            missing.fallible_get().unwrap_err().to_string(),
            "\"workers\" has no value"
        );
    }
}

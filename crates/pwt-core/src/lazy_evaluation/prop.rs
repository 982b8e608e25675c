use std::fmt::{Debug, Formatter};
use std::path::PathBuf;
use std::sync::{Arc, PoisonError, RwLock};

use once_cell::sync::OnceCell;

use crate::lazy_evaluation::{Fixed, IntoProvider, Provider, ProviderError, ProviderExt};

assert_impl_all!(Prop<PathBuf>: Send, Sync, Clone, Debug);

/// A typed property.
///
/// Clones of a property share the same underlying value, so a property handed out to another
/// object still observes changes made after the fact.
pub struct Prop<T: 'static + Send + Sync + Clone> {
    id: String,
    inner: Arc<RwLock<PropInner<T>>>,
}

impl<T: 'static + Send + Sync + Clone> Default for Prop<T> {
    fn default() -> Self {
        Self::new("")
    }
}

/// Formatting never resolves a convention, so printing a property doesn't fix its value.
impl<T: 'static + Send + Sync + Clone + Debug> Debug for Prop<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let mut debug = f.debug_struct("Prop");
        debug.field("id", &self.id);
        match self.inner.read() {
            Ok(inner) => match inner.value.as_ref().and_then(|p| p.try_get()) {
                Some(value) => debug.field("value", &value),
                None => match inner.convention.as_ref().map(|c| c.memo.get()) {
                    Some(Some(value)) => debug.field("convention", value),
                    Some(None) => debug.field("convention", &format_args!("<unresolved>")),
                    None => &mut debug,
                },
            },
            Err(_) => debug.field("value", &format_args!("<poisoned>")),
        };
        debug.finish()
    }
}

impl<T: 'static + Send + Sync + Clone> Provider<T> for Prop<T> {
    fn missing_message(&self) -> String {
        match self.inner.read() {
            Ok(inner) => match &inner.value {
                Some(p) if inner.convention.is_none() => p.missing_message(),
                _ => format!("{:?} has no value", self.id),
            },
            Err(_) => format!("{:?} is poisoned", self.id),
        }
    }

    fn try_get(&self) -> Option<T> {
        Self::fallible_get(self).ok()
    }
}

impl<T: 'static + Send + Sync + Clone> Prop<T> {
    /// Creates a new, empty property
    pub fn new<S: AsRef<str>>(id: S) -> Self {
        Self {
            id: id.as_ref().to_string(),
            inner: Arc::new(RwLock::new(PropInner::default())),
        }
    }

    /// Creates a new property that falls back to `convention` until a value is set
    pub fn with_convention<S, P>(id: S, convention: P) -> Self
    where
        S: AsRef<str>,
        P: IntoProvider<T>,
        <P as IntoProvider<T>>::Provider: 'static,
    {
        let output = Self::new(id);
        output.write_inner(|inner| {
            inner.convention = Some(Convention::new(convention.into_provider()))
        });
        output
    }

    /// Sets this property to be provided by some other provider
    pub fn set_with<P: IntoProvider<T>>(&mut self, val: P) -> Result<(), Error>
    where
        <P as IntoProvider<T>>::Provider: 'static,
    {
        let mut inner = self.inner.write()?;
        inner.value = Some(Box::new(val.into_provider()));
        Ok(())
    }

    /// Sets this property to a value
    pub fn set<P>(&mut self, val: P) -> Result<(), Error>
    where
        P: Into<T>,
    {
        self.set_with(Fixed(val.into()))
    }

    /// Sets the convention of this property. The convention is only used when this property
    /// has no value of its own. It is evaluated at most once.
    pub fn set_convention<P: IntoProvider<T>>(&mut self, val: P) -> Result<(), Error>
    where
        <P as IntoProvider<T>>::Provider: 'static,
    {
        let mut inner = self.inner.write()?;
        inner.convention = Some(Convention::new(val.into_provider()));
        Ok(())
    }

    /// Whether a value can currently be produced by this property
    pub fn is_present(&self) -> bool {
        self.fallible_get().is_ok()
    }

    /// Gets the value of this property, returning an error if it has no value.
    pub fn fallible_get(&self) -> Result<T, Error> {
        let inner = self.inner.read()?;
        if let Some(value) = inner.value.as_ref().and_then(|p| p.try_get()) {
            return Ok(value);
        }
        match &inner.convention {
            Some(convention) => convention
                .resolve()
                .ok_or_else(|| Error::PropertyNotSet(self.id.clone())),
            None => Err(Error::PropertyNotSet(self.id.clone())),
        }
    }

    fn write_inner<F: FnOnce(&mut PropInner<T>)>(&self, func: F) {
        let mut inner = self
            .inner
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        func(&mut inner)
    }
}

impl<T: 'static + Send + Sync + Clone> Clone for Prop<T> {
    fn clone(&self) -> Self {
        Self {
            id: self.id.clone(),
            inner: self.inner.clone(),
        }
    }
}

struct PropInner<T: Send + Sync + Clone> {
    value: Option<Box<dyn Provider<T>>>,
    convention: Option<Convention<T>>,
}

impl<T: Send + Sync + Clone> Default for PropInner<T> {
    fn default() -> Self {
        Self {
            value: None,
            convention: None,
        }
    }
}

/// A fallback provider whose value is remembered after the first successful read
struct Convention<T: Send + Sync + Clone> {
    provider: Box<dyn Provider<T>>,
    memo: OnceCell<T>,
}

impl<T: Send + Sync + Clone> Convention<T> {
    fn new<P: 'static + Provider<T>>(provider: P) -> Self {
        Self {
            provider: Box::new(provider),
            memo: OnceCell::new(),
        }
    }

    fn resolve(&self) -> Option<T> {
        self.memo
            .get_or_try_init(|| self.provider.try_get().ok_or(()))
            .ok()
            .cloned()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Property's lock was poisoned")]
    LockPoisonError,
    #[error("Property {0:?} has no value set")]
    PropertyNotSet(String),
}

impl<T> From<PoisonError<T>> for Error {
    fn from(_: PoisonError<T>) -> Self {
        Self::LockPoisonError
    }
}

/// A vec prop is a special property that uses a list
#[derive(Clone)]
pub struct VecProp<T: Send + Sync + Clone> {
    id: String,
    prop: Arc<RwLock<VecPropInner<T>>>,
}

/// Each pushed provider contributes a run of values
type Segment<T> = Box<dyn Provider<Vec<T>>>;

struct VecPropInner<T: Send + Sync + Clone> {
    values: Vec<Segment<T>>,
    convention: Option<Convention<Vec<T>>>,
}

assert_impl_all!(VecProp<PathBuf>: Provider<Vec<PathBuf>>);
assert_impl_all!(VecProp<String>: Provider<Vec<String>>);

impl<T: 'static + Send + Sync + Clone> Default for VecProp<T> {
    fn default() -> Self {
        Self::new("")
    }
}

impl<T: 'static + Send + Sync + Clone + Debug> Debug for VecProp<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let read = match self.prop.read() {
            Ok(read) => read,
            Err(_) => return write!(f, "VecProp {{ id: {:?}, <poisoned> }}", self.id),
        };
        let mut debug = f.debug_struct("VecProp");
        debug.field("id", &self.id);
        if !read.values.is_empty() {
            let values: Option<Vec<Vec<T>>> = read.values.iter().map(|p| p.try_get()).collect();
            match values {
                Some(values) => debug.field("values", &values.concat()),
                None => debug.field("values", &format_args!("<missing>")),
            };
        } else if let Some(convention) = &read.convention {
            match convention.memo.get() {
                Some(values) => debug.field("convention", values),
                None => debug.field("convention", &format_args!("<unresolved>")),
            };
        }
        debug.finish()
    }
}

impl<T: 'static + Send + Sync + Clone> Provider<Vec<T>> for VecProp<T> {
    fn missing_message(&self) -> String {
        let read = match self.prop.read() {
            Ok(read) => read,
            Err(_) => return format!("{:?} is poisoned", self.id),
        };
        let first_missing = read
            .values
            .iter()
            .filter(|p| p.try_get().is_none())
            .map(|prop| prop.missing_message())
            .next();
        match first_missing {
            None => {
                format!("{} missing unknown value", self.id)
            }
            Some(msg) => format!("{} vector missing value > {}", self.id, msg),
        }
    }

    fn try_get(&self) -> Option<Vec<T>> {
        self.fallible_get().ok()
    }

    fn fallible_get(&self) -> Result<Vec<T>, ProviderError> {
        let read = self
            .prop
            .read()
            .map_err(|_| ProviderError::new(format!("{:?} is poisoned", self.id)))?;
        if read.values.is_empty() {
            if let Some(convention) = &read.convention {
                return convention
                    .resolve()
                    .ok_or_else(|| ProviderError::new(format!("{:?} has no value", self.id)));
            }
        }
        read.values
            .iter()
            .map(|p| p.fallible_get())
            .collect::<Result<Vec<Vec<T>>, _>>()
            .map(|v| v.into_iter().flatten().collect())
    }
}

impl<T: 'static + Send + Sync + Clone> VecProp<T> {
    /// create a new vec prop with a given id
    pub fn new<S: AsRef<str>>(id: S) -> Self {
        Self {
            id: id.as_ref().to_string(),
            prop: Arc::new(RwLock::new(VecPropInner {
                values: vec![],
                convention: None,
            })),
        }
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, VecPropInner<T>> {
        self.prop.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Sets the values used while nothing was pushed to this vector.
    pub fn set_convention<P, I>(&mut self, values: P)
    where
        I: IntoIterator<Item = T> + Clone + Send + Sync + 'static,
        P: IntoProvider<I>,
        P::Provider: 'static,
    {
        let mut write = self.write();
        write.convention = Some(Convention::new(
            values
                .into_provider()
                .map(|v| v.into_iter().collect::<Vec<_>>()),
        ));
    }

    /// Push a value to the vector
    pub fn push_with<P>(&mut self, value: P)
    where
        P: IntoProvider<T>,
        P::Provider: 'static,
    {
        self.write()
            .values
            .push(Box::new(value.into_provider().map(|v| vec![v])));
    }

    /// Push a value to the vector
    pub fn push<V>(&mut self, value: V)
    where
        V: Into<T>,
    {
        let value = value.into();
        self.push_with(Fixed(value))
    }

    /// Push every value to the vector
    pub fn push_all<V, I: IntoIterator<Item = V>>(&mut self, value: I)
    where
        V: Into<T>,
    {
        for x in value {
            self.push(x);
        }
    }

    /// Clears the contents of the vector
    pub fn clear(&mut self) {
        self.write().values.clear();
    }

}

#[cfg(test)]
mod tests {
    use crate::lazy_evaluation::{Prop, Provider, ProviderExt, VecProp};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn create_property() {
        let mut prop = Prop::<i32>::new("value");
        let cloned = prop.clone();
        prop.set_with(|| 15).unwrap();
        assert_eq!(prop.get(), 15i32);
        assert_eq!(cloned.get(), 15i32);
    }

    #[test]
    fn unset_property_errors() {
        let prop = Prop::<i32>::new("value");
        assert!(!prop.is_present());
        assert!(prop.fallible_get().is_err());
        assert_eq!(prop.missing_message(), "\"value\" has no value");
    }

    #[test]
    fn convention_used_when_unset() {
        let mut prop = Prop::<String>::new("style");
        prop.set_convention(|| "OBFUSCATED".to_string()).unwrap();
        assert_eq!(prop.get(), "OBFUSCATED");
        prop.set("PRETTY").unwrap();
        assert_eq!(prop.get(), "PRETTY");
    }

    #[test]
    fn convention_evaluated_once() {
        let counter = Arc::new(AtomicUsize::new(0));
        let mut prop = Prop::<usize>::new("workers");
        let inner_counter = counter.clone();
        prop.set_convention(move || inner_counter.fetch_add(1, Ordering::SeqCst) + 4)
            .unwrap();
        assert_eq!(prop.get(), 4);
        assert_eq!(prop.get(), 4);
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn convention_follows_other_property() {
        let mut source = Prop::<i32>::new("source");
        let mut target = Prop::<i32>::new("target");
        target.set_convention(source.clone()).unwrap();
        assert!(!target.is_present());
        source.set(3).unwrap();
        assert_eq!(target.get(), 3);
    }

    #[test]
    fn list_properties_shared() {
        let mut prop = VecProp::<i32>::default();
        let other_prop = prop.clone();
        prop.push_with(|| 1);
        prop.push_all([2, 3]);
        assert_eq!(other_prop.get(), vec![1, 2, 3]);
    }

    #[test]
    fn list_convention_replaced_by_pushes() {
        let mut prop = VecProp::<String>::new("modules");
        prop.set_convention(|| vec!["com.example.App".to_string()]);
        assert_eq!(prop.get(), vec!["com.example.App".to_string()]);
        prop.push("com.example.Other");
        assert_eq!(prop.get(), vec!["com.example.Other".to_string()]);
    }

    #[test]
    fn vec_prop_missing() {
        let mut vec_prop = VecProp::<i32>::new("test");
        let mut prop1 = Prop::new("prop1");
        vec_prop.push_with(prop1.clone());
        vec_prop.push_all([1, 2]);
        assert!(vec_prop.try_get().is_none());
        prop1.set(0).unwrap();
        assert_eq!(vec_prop.get(), vec![0, 1, 2]);
    }

    #[test]
    fn debug_does_not_resolve_convention() {
        let mut source = Prop::<i32>::new("source");
        let mut target = Prop::<i32>::new("target");
        target.set_convention(source.clone()).unwrap();
        source.set(1).unwrap();
        assert_eq!(
            format!("{:?}", target),
            "Prop { id: \"target\", convention: <unresolved> }"
        );
        source.set(2).unwrap();
        assert_eq!(target.get(), 2);
        assert_eq!(
            format!("{:?}", target),
            "Prop { id: \"target\", convention: 2 }"
        );

        let mut modules = VecProp::<i32>::new("modules");
        modules.set_convention(source.clone().map(|v| vec![v]));
        assert!(format!("{:?}", modules).contains("<unresolved>"));
        source.set(3).unwrap();
        assert_eq!(modules.get(), vec![3]);
    }
}

//! Immutable, type-keyed metadata bags.
//!
//! [`Attributes`] carries opaque affinity data from a caller to the routing
//! logic of a transport. A bag is built once through a [`Builder`] and never
//! changes afterwards; [`Attributes::set`] returns a new bag.
//!
//! # Example
//!
//! ```
//! use callopts_core::{Attributes, Key};
//!
//! let shard: Key<u32> = Key::of("shard");
//! let attrs = Attributes::builder().set(&shard, 7).build();
//!
//! assert_eq!(attrs.get(&shard), Some(&7));
//! assert_eq!(attrs.to_string(), "{shard=7}");
//! assert_eq!(Attributes::EMPTY.to_string(), "{}");
//! ```

use std::any::{Any, TypeId};
use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

/// A typed key into an [`Attributes`] bag.
///
/// Two keys address the same entry when both the name and the value type match.
pub struct Key<T> {
    name: Cow<'static, str>,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Key<T> {
    /// A key with a static name.
    pub const fn of(name: &'static str) -> Self {
        Self {
            name: Cow::Borrowed(name),
            _marker: PhantomData,
        }
    }

    /// A key with a runtime name.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Cow::Owned(name.into()),
            _marker: PhantomData,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl<T: 'static> Key<T> {
    fn id(&self) -> KeyId {
        KeyId {
            name: self.name.clone(),
            type_id: TypeId::of::<T>(),
        }
    }
}

impl<T> Clone for Key<T> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            _marker: PhantomData,
        }
    }
}

impl<T> fmt::Debug for Key<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Key").field(&self.name).finish()
    }
}

impl<T> fmt::Display for Key<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
struct KeyId {
    name: Cow<'static, str>,
    type_id: TypeId,
}

/// Values stored in a bag: comparable, printable and shareable across threads.
trait AttributeValue: Send + Sync {
    fn as_any(&self) -> &dyn Any;
    fn eq_value(&self, other: &dyn AttributeValue) -> bool;
    fn fmt_value(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result;
}

impl<T> AttributeValue for T
where
    T: Any + Send + Sync + PartialEq + fmt::Display,
{
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn eq_value(&self, other: &dyn AttributeValue) -> bool {
        other.as_any().downcast_ref::<T>() == Some(self)
    }

    fn fmt_value(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

type Entries = BTreeMap<KeyId, Arc<dyn AttributeValue>>;

/// An immutable mapping from typed [`Key`]s to values.
///
/// Cloning is cheap: entries are shared, never copied, and never mutated.
#[derive(Clone, Default)]
pub struct Attributes {
    entries: Option<Arc<Entries>>,
}

impl Attributes {
    /// The shared empty bag.
    pub const EMPTY: Attributes = Attributes { entries: None };

    pub fn builder() -> Builder {
        Builder::default()
    }

    /// A builder seeded with this bag's entries.
    pub fn to_builder(&self) -> Builder {
        Builder {
            entries: self.entries.as_deref().cloned().unwrap_or_default(),
        }
    }

    /// A new bag with `key` set to `value`; `self` is unchanged.
    pub fn set<T>(&self, key: &Key<T>, value: T) -> Attributes
    where
        T: Any + Send + Sync + PartialEq + fmt::Display,
    {
        self.to_builder().set(key, value).build()
    }

    pub fn get<T: 'static>(&self, key: &Key<T>) -> Option<&T> {
        self.entries
            .as_ref()?
            .get(&key.id())
            .and_then(|value| value.as_any().downcast_ref::<T>())
    }

    /// Names of the keys in this bag, in sorted order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries
            .iter()
            .flat_map(|entries| entries.keys())
            .map(|id| &*id.name)
    }

    pub fn len(&self) -> usize {
        self.entries.as_ref().map_or(0, |entries| entries.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn iter(&self) -> impl Iterator<Item = (&KeyId, &Arc<dyn AttributeValue>)> {
        self.entries.iter().flat_map(|entries| entries.iter())
    }
}

impl PartialEq for Attributes {
    fn eq(&self, other: &Self) -> bool {
        match (&self.entries, &other.entries) {
            (Some(a), Some(b)) if Arc::ptr_eq(a, b) => true,
            _ => {
                self.len() == other.len()
                    && self.iter().zip(other.iter()).all(|((ka, va), (kb, vb))| {
                        ka == kb && va.eq_value(&**vb)
                    })
            }
        }
    }
}

impl fmt::Display for Attributes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, (key, value)) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}=", key.name)?;
            value.fmt_value(f)?;
        }
        f.write_str("}")
    }
}

impl fmt::Debug for Attributes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Attributes({self})")
    }
}

/// Accumulates entries for a new [`Attributes`] bag.
#[derive(Default)]
pub struct Builder {
    entries: Entries,
}

impl Builder {
    /// Set `key` to `value`, replacing any previous value for the same key.
    pub fn set<T>(mut self, key: &Key<T>, value: T) -> Self
    where
        T: Any + Send + Sync + PartialEq + fmt::Display,
    {
        self.entries.insert(key.id(), Arc::new(value));
        self
    }

    /// Copy every entry of `other` into this builder.
    pub fn set_all(mut self, other: &Attributes) -> Self {
        for (key, value) in other.iter() {
            self.entries.insert(key.clone(), Arc::clone(value));
        }
        self
    }

    pub fn build(self) -> Attributes {
        if self.entries.is_empty() {
            Attributes::EMPTY
        } else {
            Attributes {
                entries: Some(Arc::new(self.entries)),
            }
        }
    }
}

impl fmt::Debug for Builder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Builder")
            .field("len", &self.entries.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: Key<String> = Key::of("sample");

    #[test]
    fn test_empty() {
        assert!(Attributes::EMPTY.is_empty());
        assert_eq!(Attributes::EMPTY, Attributes::default());
        assert_eq!(Attributes::builder().build(), Attributes::EMPTY);
        assert_eq!(Attributes::EMPTY.get(&SAMPLE), None);
    }

    #[test]
    fn test_set_returns_new_bag() {
        let original = Attributes::builder().set(&SAMPLE, "blah".to_string()).build();
        let updated = original.set(&SAMPLE, "other".to_string());

        assert_eq!(original.get(&SAMPLE).map(String::as_str), Some("blah"));
        assert_eq!(updated.get(&SAMPLE).map(String::as_str), Some("other"));
        assert_ne!(original, updated);
    }

    #[test]
    fn test_keys_distinguished_by_type() {
        let as_string: Key<String> = Key::of("id");
        let as_int: Key<u64> = Key::of("id");
        let attrs = Attributes::builder()
            .set(&as_string, "abc".to_string())
            .set(&as_int, 9)
            .build();

        assert_eq!(attrs.len(), 2);
        assert_eq!(attrs.get(&as_int), Some(&9));
        assert_eq!(attrs.get(&as_string).map(String::as_str), Some("abc"));
    }

    #[test]
    fn test_runtime_named_key_matches_static_key() {
        let dynamic: Key<String> = Key::named(String::from("sample"));
        let attrs = Attributes::builder().set(&SAMPLE, "blah".to_string()).build();
        assert_eq!(attrs.get(&dynamic).map(String::as_str), Some("blah"));
    }

    #[test]
    fn test_equality_ignores_insertion_order() {
        let a: Key<i32> = Key::of("a");
        let b: Key<i32> = Key::of("b");
        let first = Attributes::builder().set(&a, 1).set(&b, 2).build();
        let second = Attributes::builder().set(&b, 2).set(&a, 1).build();
        assert_eq!(first, second);
        assert_eq!(first.to_string(), "{a=1, b=2}");
        assert_eq!(first.keys().collect::<Vec<_>>(), vec!["a", "b"]);
    }

    #[test]
    fn test_set_all_and_to_builder() {
        let a: Key<i32> = Key::of("a");
        let b: Key<i32> = Key::of("b");
        let base = Attributes::builder().set(&a, 1).build();
        let merged = Attributes::builder().set(&b, 2).set_all(&base).build();
        assert_eq!(merged.len(), 2);

        let extended = base.to_builder().set(&b, 3).build();
        assert_eq!(extended.get(&b), Some(&3));
        assert_eq!(base.len(), 1);
    }

    #[test]
    fn test_display() {
        let attrs = Attributes::builder().set(&SAMPLE, "blah".to_string()).build();
        assert_eq!(attrs.to_string(), "{sample=blah}");
        assert_eq!(format!("{attrs:?}"), "Attributes({sample=blah})");
    }
}

//! Settable attributes.
//!
//! [`Attribute`] adds writes on top of [`CachingAttr`]. Reads serve the
//! instance's stored value first and only compute on a miss; writes run the
//! field's write hook and store the result.

use crate::caching::CachingAttr;
use crate::context::AccessContext;
use crate::error::Result;
use crate::field::WriteFn;
use crate::storage::Storage;
use std::fmt;

/// Result of reading a settable attribute.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolved<V> {
    Value(V),
    /// The instance has no attribute storage, so the attribute cannot hold a
    /// value yet.
    Uninitialized,
}

impl<V> Resolved<V> {
    pub fn is_uninitialized(&self) -> bool {
        matches!(self, Resolved::Uninitialized)
    }

    pub fn value(&self) -> Option<&V> {
        match self {
            Resolved::Value(value) => Some(value),
            Resolved::Uninitialized => None,
        }
    }

    pub fn into_option(self) -> Option<V> {
        match self {
            Resolved::Value(value) => Some(value),
            Resolved::Uninitialized => None,
        }
    }
}

pub struct Attribute<O, V> {
    caching: CachingAttr<O, V>,
    on_write: Option<WriteFn<O, V>>,
}

impl<O, V> Attribute<O, V> {
    pub(crate) fn new(caching: CachingAttr<O, V>, on_write: Option<WriteFn<O, V>>) -> Self {
        Self { caching, on_write }
    }

    pub fn name(&self) -> &str {
        self.caching.name()
    }

    pub fn caching(&self) -> &CachingAttr<O, V> {
        &self.caching
    }
}

impl<O: Storage, V: Clone + 'static> Attribute<O, V> {
    /// Stored value if present, otherwise compute (and cache when allowed).
    pub fn read(&self, instance: &O) -> Result<Resolved<V>> {
        let Some(slots) = instance.slots() else {
            return Ok(Resolved::Uninitialized);
        };
        if let Some(value) = slots.get::<V>(self.name())? {
            return Ok(Resolved::Value(value));
        }
        self.caching.read(Some(instance)).map(Resolved::Value)
    }

    /// Like [`read`](Self::read), but hands `f` a borrow of the stored value
    /// instead of returning a copy.
    ///
    /// On a miss the value is computed (and cached when allowed) first.
    pub fn with<R>(&self, instance: &O, f: impl FnOnce(&V) -> R) -> Result<Resolved<R>> {
        let Some(slots) = instance.slots() else {
            return Ok(Resolved::Uninitialized);
        };
        if !slots.contains(self.name()) {
            let value = self.caching.read(Some(instance))?;
            if !slots.contains(self.name()) {
                return Ok(Resolved::Value(f(&value)));
            }
        }
        Ok(slots
            .with(self.name(), f)?
            .map_or(Resolved::Uninitialized, Resolved::Value))
    }

    /// Read through the owning type. Nothing is stored.
    pub fn read_owner(&self) -> Result<V> {
        self.caching.read(None)
    }

    /// Run the write hook on `value` and store the outcome.
    pub fn write(&self, instance: &O, value: V) -> Result<()> {
        let value = self.apply_write_hook(Some(instance), value)?;
        self.caching.store(instance, value)
    }

    /// Run the write hook with an `OwnerWrite` context and return what would
    /// be stored. There is no instance, so nothing is.
    pub fn write_owner(&self, value: V) -> Result<V> {
        self.apply_write_hook(None, value)
    }

    /// Forget the stored value. The next read computes again.
    pub fn reset(&self, instance: &O) -> bool {
        self.caching.invalidate(instance)
    }

    fn apply_write_hook(&self, instance: Option<&O>, value: V) -> Result<V> {
        let Some(hook) = &self.on_write else {
            return Ok(value);
        };
        let outcome = {
            let cx = AccessContext::for_write(self.name(), instance.is_some(), &value);
            hook(instance, &cx)?
        };
        Ok(outcome.into_value(value))
    }
}

impl<O, V> Clone for Attribute<O, V> {
    fn clone(&self) -> Self {
        Self {
            caching: self.caching.clone(),
            on_write: self.on_write.clone(),
        }
    }
}

impl<O, V> fmt::Debug for Attribute<O, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Attribute")
            .field("name", &self.name())
            .field("cache_enabled", &self.caching.cache_enabled())
            .field("has_write_hook", &self.on_write.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::{Access, Computed, WriteOutcome};
    use crate::error::PropsError;
    use crate::field::Field;
    use crate::lazy::LazyAttr;
    use crate::storage::Slots;
    use std::cell::Cell;

    #[derive(Default)]
    struct Host {
        slots: Slots,
        computed: Cell<u32>,
    }

    impl Storage for Host {
        fn slots(&self) -> Option<&Slots> {
            Some(&self.slots)
        }
    }

    struct Bare;

    impl Storage for Bare {
        fn slots(&self) -> Option<&Slots> {
            None
        }
    }

    fn build<O: 'static>(field: Field<O, String>) -> Attribute<O, String> {
        let bound = field.bind("Host", "title").unwrap();
        let lazy = LazyAttr::new(&bound.name, bound.compute);
        Attribute::new(
            CachingAttr::new(lazy, bound.cache.unwrap_or(true)),
            bound.on_write,
        )
    }

    fn counted_title() -> Attribute<Host, String> {
        build(Field::new(|host: Option<&Host>, _| {
            if let Some(host) = host {
                host.computed.set(host.computed.get() + 1);
            }
            Computed::Plain("untitled".to_string())
        }))
    }

    #[test]
    fn read_computes_on_miss_and_caches() {
        let attr = counted_title();
        let host = Host::default();
        assert_eq!(
            attr.read(&host).unwrap(),
            Resolved::Value("untitled".to_string())
        );
        attr.read(&host).unwrap();
        assert_eq!(host.computed.get(), 1);
    }

    #[test]
    fn write_round_trip() {
        let attr = counted_title();
        let host = Host::default();
        attr.write(&host, "Notes".to_string()).unwrap();
        assert_eq!(
            attr.read(&host).unwrap().into_option(),
            Some("Notes".to_string())
        );
        assert_eq!(host.computed.get(), 0);
    }

    #[test]
    fn stored_value_beats_uncached_compute() {
        let attr = build(
            Field::configure()
                .cache(false)
                .compute(|_: Option<&Host>, _| Computed::Plain("computed".to_string())),
        );
        let host = Host::default();
        attr.write(&host, "stored".to_string()).unwrap();
        assert_eq!(
            attr.read(&host).unwrap().value(),
            Some(&"stored".to_string())
        );
    }

    #[test]
    fn write_hook_can_replace_value() {
        let attr = build(
            Field::new(|_: Option<&Host>, _| Computed::Plain(String::new())).on_write(
                |_, cx| {
                    let raw = cx.value().map(|v| v.trim().to_string()).unwrap_or_default();
                    Ok(WriteOutcome::Replace(raw))
                },
            ),
        );
        let host = Host::default();
        attr.write(&host, "  padded  ".to_string()).unwrap();
        assert_eq!(
            attr.read(&host).unwrap().into_option(),
            Some("padded".to_string())
        );
    }

    #[test]
    fn write_hook_can_keep_raw_value() {
        let attr = build(
            Field::new(|_: Option<&Host>, _| Computed::Plain(String::new()))
                .on_write(|_, _| Ok(WriteOutcome::Unchanged)),
        );
        let host = Host::default();
        attr.write(&host, "raw".to_string()).unwrap();
        assert_eq!(host.slots.get::<String>("title").unwrap(), Some("raw".into()));
    }

    #[test]
    fn write_hook_sees_instance_write_context() {
        let attr = build(
            Field::new(|_: Option<&Host>, _| Computed::Plain(String::new())).on_write(
                |_, cx| {
                    assert_eq!(cx.kind(), Access::InstanceWrite);
                    assert_eq!(cx.name(), "title");
                    Ok(WriteOutcome::Unchanged)
                },
            ),
        );
        attr.write(&Host::default(), "x".to_string()).unwrap();
    }

    #[test]
    fn write_hook_rejection_propagates() {
        let attr = build(
            Field::new(|_: Option<&Host>, _| Computed::Plain(String::new())).on_write(
                |_, cx| match cx.value() {
                    Some(v) if v.is_empty() => Err(PropsError::rejected(cx.name(), "empty")),
                    _ => Ok(WriteOutcome::Unchanged),
                },
            ),
        );
        let host = Host::default();
        let err = attr.write(&host, String::new()).unwrap_err();
        assert!(matches!(err, PropsError::Rejected { .. }));
        assert!(!host.slots.contains("title"));
    }

    #[test]
    fn owner_write_stores_nothing() {
        let attr = build(
            Field::new(|_: Option<&Host>, _| Computed::Plain(String::new())).on_write(
                |host, cx| {
                    assert!(host.is_none());
                    assert_eq!(cx.kind(), Access::OwnerWrite);
                    Ok(WriteOutcome::Replace("owner".to_string()))
                },
            ),
        );
        assert_eq!(attr.write_owner("x".to_string()).unwrap(), "owner");
    }

    #[test]
    fn with_serves_stored_value_by_reference() {
        let attr = counted_title();
        let host = Host::default();
        attr.write(&host, "Notes".to_string()).unwrap();
        assert_eq!(
            attr.with(&host, |title| title.len()).unwrap(),
            Resolved::Value(5)
        );
        assert_eq!(host.computed.get(), 0);
    }

    #[test]
    fn with_computes_on_miss() {
        let attr = counted_title();
        let host = Host::default();
        assert_eq!(
            attr.with(&host, |title| title.to_uppercase()).unwrap(),
            Resolved::Value("UNTITLED".to_string())
        );
        assert!(host.slots.contains("title"));
        attr.with(&host, |_| ()).unwrap();
        assert_eq!(host.computed.get(), 1);

        let uncached = build(
            Field::configure()
                .cache(false)
                .compute(|_: Option<&Host>, _| Computed::Plain("fresh".to_string())),
        );
        let fresh = Host::default();
        assert_eq!(
            uncached.with(&fresh, |title| title.clone()).unwrap().into_option(),
            Some("fresh".to_string())
        );
        assert!(!fresh.slots.contains("title"));
    }

    #[test]
    fn with_on_missing_storage_is_uninitialized() {
        let attr: Attribute<Bare, String> =
            build(Field::new(|_, _| Computed::Plain("never".to_string())));
        assert!(attr.with(&Bare, |_| ()).unwrap().is_uninitialized());
    }

    #[test]
    fn owner_read_computes_without_storing() {
        let attr = counted_title();
        assert_eq!(attr.read_owner().unwrap(), "untitled");
    }

    #[test]
    fn missing_storage_reads_as_uninitialized() {
        let attr: Attribute<Bare, String> =
            build(Field::new(|_, _| Computed::Plain("never".to_string())));
        assert!(attr.read(&Bare).unwrap().is_uninitialized());
    }

    #[test]
    fn missing_storage_write_fails() {
        let attr: Attribute<Bare, String> =
            build(Field::new(|_, _| Computed::Plain("never".to_string())));
        let err = attr.write(&Bare, "x".to_string()).unwrap_err();
        assert!(matches!(err, PropsError::NoStorage { .. }));
    }

    #[test]
    fn reset_forgets_written_value() {
        let attr = counted_title();
        let host = Host::default();
        attr.write(&host, "Notes".to_string()).unwrap();
        assert!(attr.reset(&host));
        assert_eq!(
            attr.read(&host).unwrap().into_option(),
            Some("untitled".to_string())
        );
    }
}

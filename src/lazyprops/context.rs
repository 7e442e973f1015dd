//! Access contexts and compute results.
//!
//! Every read or write of an attribute hands the compute function an
//! [`AccessContext`] describing who is asking: the owning type itself
//! (no instance) or a concrete instance, and whether it is a read or a write.
//! Compute functions answer with a [`Computed`] value, which may override the
//! descriptor's cache flag for that single evaluation. Write hooks answer with
//! a [`WriteOutcome`].

/// The four ways an attribute can be accessed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Access {
    /// Read through the owning type, with no instance.
    OwnerRead,
    /// Read through a concrete instance.
    InstanceRead,
    /// Write through the owning type, with no instance.
    OwnerWrite,
    /// Write through a concrete instance.
    InstanceWrite,
}

impl Access {
    pub fn read(has_instance: bool) -> Self {
        if has_instance {
            Access::InstanceRead
        } else {
            Access::OwnerRead
        }
    }

    pub fn write(has_instance: bool) -> Self {
        if has_instance {
            Access::InstanceWrite
        } else {
            Access::OwnerWrite
        }
    }

    pub fn is_read(self) -> bool {
        matches!(self, Access::OwnerRead | Access::InstanceRead)
    }

    pub fn is_write(self) -> bool {
        !self.is_read()
    }

    pub fn is_owner(self) -> bool {
        matches!(self, Access::OwnerRead | Access::OwnerWrite)
    }
}

/// Describes a single access. Built fresh for each read or write.
#[derive(Debug)]
pub struct AccessContext<'a, V> {
    kind: Access,
    name: &'a str,
    value: Option<&'a V>,
}

impl<'a, V> AccessContext<'a, V> {
    pub(crate) fn for_read(name: &'a str, has_instance: bool) -> Self {
        Self {
            kind: Access::read(has_instance),
            name,
            value: None,
        }
    }

    pub(crate) fn for_write(name: &'a str, has_instance: bool, value: &'a V) -> Self {
        Self {
            kind: Access::write(has_instance),
            name,
            value: Some(value),
        }
    }

    pub fn kind(&self) -> Access {
        self.kind
    }

    /// Name of the attribute being accessed.
    pub fn name(&self) -> &'a str {
        self.name
    }

    /// The raw incoming value. Only present for write contexts.
    pub fn value(&self) -> Option<&'a V> {
        self.value
    }
}

/// What a compute function returns.
///
/// `Plain` values are cached according to the descriptor's flag. `Overridden`
/// values carry their own cache decision; `cache: None` falls back to the
/// descriptor's flag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Computed<V> {
    Plain(V),
    Overridden { cache: Option<bool>, value: V },
}

impl<V> Computed<V> {
    /// A value that must be recomputed on every read.
    pub fn uncached(value: V) -> Self {
        Computed::Overridden {
            cache: Some(false),
            value,
        }
    }

    /// A value that is cached even if the descriptor disables caching.
    pub fn cached(value: V) -> Self {
        Computed::Overridden {
            cache: Some(true),
            value,
        }
    }

    /// Resolve the effective `(cache, value)` pair against the descriptor default.
    pub fn resolve(self, default_cache: bool) -> (bool, V) {
        match self {
            Computed::Plain(value) => (default_cache, value),
            Computed::Overridden { cache, value } => (cache.unwrap_or(default_cache), value),
        }
    }

    pub fn into_value(self) -> V {
        match self {
            Computed::Plain(value) | Computed::Overridden { value, .. } => value,
        }
    }
}

impl<V> From<V> for Computed<V> {
    fn from(value: V) -> Self {
        Computed::Plain(value)
    }
}

/// What a write hook returns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteOutcome<V> {
    /// Store the raw incoming value as-is.
    Unchanged,
    /// Store this value instead.
    Replace(V),
}

impl<V> WriteOutcome<V> {
    pub fn into_value(self, raw: V) -> V {
        match self {
            WriteOutcome::Unchanged => raw,
            WriteOutcome::Replace(value) => value,
        }
    }
}

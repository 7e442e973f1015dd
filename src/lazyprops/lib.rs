//! # Lazyprops Architecture
//!
//! Lazyprops provides **computed attributes** for Rust types, and builds
//! model-valued collection attributes on top of them. A type declares its
//! attributes once in a schema. Each attribute is a plain value that reads and
//! writes through an instance's slot storage.
//!
//! ## The Attribute Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Model Attributes (model_attribute.rs)                      │
//! │  - CollectionAttribute: raw input → merged KeyedCollection  │
//! │  - ModelAttribute: raw input → single model                 │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Attribute (attribute.rs)                                   │
//! │  - Stored value first, compute on a miss                    │
//! │  - Writes go through an optional validate/transform hook    │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CachingAttr (caching.rs)                                   │
//! │  - Stores computed values in the instance's Slots           │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  LazyAttr (lazy.rs)                                         │
//! │  - Calls the compute function with an AccessContext         │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Access Kinds
//!
//! Every call into a compute function or write hook receives an
//! [`AccessContext`] naming the attribute and one of four [`Access`] kinds:
//! reads and writes, each either through an instance or through the owning
//! type. Owner reads compute without caching. Owner writes run the hook and
//! return what would have been stored.
//!
//! ## Collection Merging
//!
//! Writing a collection attribute runs the pipeline in [`merge`]: entries are
//! turned into models by a [`ModelFactory`], keyed by each model's own key,
//! and then layered over the defaults entry (`"_/_"` unless configured
//! otherwise).
//!
//! ## Module Overview
//!
//! - [`schema`]: Declaring attributes for an owning type
//! - [`field`]: Unbound field definitions
//! - [`context`]: Access kinds, compute results and write outcomes
//! - [`storage`]: Per-instance slot storage
//! - [`lazy`], [`caching`], [`attribute`]: The attribute layers
//! - [`model`]: The model contract and the JSON-backed `ConfigModel`
//! - [`input`]: Raw collection input and its JSON shapes
//! - [`collection`]: Ordered keyed collections
//! - [`merge`]: Assembly and defaults merging
//! - [`model_attribute`]: Collection and single-model attributes
//! - [`config`]: Configuration management
//! - [`error`]: Error types
//! - `cli`: The `lazyprops` binary (not part of the lib API)

pub mod attribute;
pub mod caching;
pub mod collection;
pub mod config;
pub mod context;
pub mod error;
pub mod field;
pub mod input;
pub mod lazy;
pub mod merge;
pub mod model;
pub mod model_attribute;
pub mod schema;
pub mod storage;

pub use attribute::{Attribute, Resolved};
pub use caching::CachingAttr;
pub use collection::KeyedCollection;
pub use config::{CollisionPolicy, PropsConfig};
pub use context::{Access, AccessContext, Computed, WriteOutcome};
pub use error::{PropsError, Result};
pub use field::Field;
pub use input::{CollectionInput, RawEntry};
pub use lazy::LazyAttr;
pub use merge::MergeOptions;
pub use model::{ConfigFactory, ConfigModel, Model, ModelFactory, ModelKind, Raw};
pub use model_attribute::{CollectionAttribute, ModelAttribute};
pub use schema::{Schema, SchemaBuilder};
pub use storage::{Slots, Storage};

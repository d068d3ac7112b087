//! Context tree construction from flat environment-style variables.
//!
//! This module turns a flat mapping such as the process environment into the
//! nested structure templates are rendered against. Keys are split along
//! underscores and camelCase boundaries (see [`canonical_segments`]) and every
//! segment becomes one level of nesting.
//!
//! # Example
//!
//! ```text
//! DATABASE_ONE_URL=mysql:3306
//! DATABASE_ONE_NAME=one
//! databaseTwoUrl=mysql2:3306
//! AUTH_LDAP=true
//! AUTH_LDAP_USERNAME=app
//! ```
//!
//! becomes
//!
//! ```json
//! {
//!   "database": {
//!     "one": { "url": "mysql:3306", "name": "one" },
//!     "two": { "url": "mysql2:3306" }
//!   },
//!   "auth": { "ldap": { "_": "true", "username": "app" } }
//! }
//! ```
//!
//! # Demotion
//!
//! When a longer key needs to pass through a location that already holds a
//! scalar, the scalar moves under the reserved [`SELF_KEY`] (`_`) of a new
//! branch at that location. `AUTH_LDAP` above is addressable in templates as
//! `auth.ldap._`.
//!
//! # Collisions
//!
//! Two keys that canonicalize to the same full path, or a second value for an
//! occupied `_` slot, abort the whole build with [`ContextError::DuplicateKey`].
//! The error names the raw key being processed when the conflict was found.
//! Entries are processed in the order the iterator yields them.

mod key;

pub use key::{SELF_KEY, canonical_key, canonical_segments};

use serde::Serialize;
use std::collections::BTreeMap;
use std::collections::btree_map::Entry;
use std::fmt;
use thiserror::Error;

/// Errors raised while building a [`ContextTree`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ContextError {
    /// Two raw keys resolve to the same location in the tree.
    #[error("{key} is defined multiple times (conflicts at '{path}')")]
    DuplicateKey {
        /// Raw key that triggered detection
        key: String,
        /// Dotted canonical location of the conflict
        path: String,
    },
}

/// A raw variable value. Values are never interpreted, only carried.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Scalar {
    String(String),
    Bool(bool),
    Integer(i64),
    Float(f64),
}

impl Default for Scalar {
    fn default() -> Self {
        Self::String(String::new())
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String(s) => f.write_str(s),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Integer(i) => write!(f, "{i}"),
            Self::Float(x) => write!(f, "{x}"),
        }
    }
}

impl From<String> for Scalar {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<&str> for Scalar {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<&String> for Scalar {
    fn from(value: &String) -> Self {
        Self::String(value.clone())
    }
}

impl From<bool> for Scalar {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for Scalar {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<i32> for Scalar {
    fn from(value: i32) -> Self {
        Self::Integer(i64::from(value))
    }
}

impl From<f64> for Scalar {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

/// A node of the context tree: either a leaf value or a nested tree.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ContextNode {
    Scalar(Scalar),
    Branch(ContextTree),
}

impl ContextNode {
    /// Returns the scalar held by this node, if it is a leaf.
    pub fn as_scalar(&self) -> Option<&Scalar> {
        match self {
            Self::Scalar(value) => Some(value),
            Self::Branch(_) => None,
        }
    }

    /// Returns the nested tree held by this node, if it is a branch.
    pub fn as_branch(&self) -> Option<&ContextTree> {
        match self {
            Self::Branch(tree) => Some(tree),
            Self::Scalar(_) => None,
        }
    }

    /// Turns a leaf into a branch holding the old value under `_`, then
    /// returns the branch.
    fn demote(&mut self) -> &mut ContextTree {
        match self {
            Self::Branch(tree) => tree,
            Self::Scalar(value) => {
                let value = std::mem::take(value);
                tracing::trace!("Demoting scalar into '{}' slot", SELF_KEY);
                *self = Self::Branch(ContextTree::with_self_value(value));
                self.demote()
            }
        }
    }
}

/// Nested variables available to templates.
///
/// Built once per render from the raw variables and never mutated afterwards.
/// Serializes as a plain nested object.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ContextTree {
    entries: BTreeMap<String, ContextNode>,
}

impl ContextTree {
    /// Builds a tree from flat key/value pairs.
    ///
    /// Entries are processed in iteration order. Any conflict aborts the build
    /// and no partial tree is returned.
    ///
    /// # Errors
    ///
    /// Returns [`ContextError::DuplicateKey`] when two keys resolve to the same
    /// path or the same demoted `_` slot.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use envtmpl_cli::context::ContextTree;
    ///
    /// let tree = ContextTree::build([("AUTH_LDAP", "true"), ("AUTH_LDAP_USERNAME", "app")])?;
    /// assert_eq!(tree.lookup("auth.ldap._").and_then(|n| n.as_scalar()).map(|s| s.to_string()),
    ///            Some("true".to_string()));
    /// # Ok::<(), envtmpl_cli::context::ContextError>(())
    /// ```
    pub fn build<I, K, V>(entries: I) -> Result<Self, ContextError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<Scalar>,
    {
        let mut tree = Self::default();
        let mut count = 0usize;

        for (key, value) in entries {
            let key = key.as_ref();
            let segments = canonical_segments(key);
            tree.insert(key, &segments, value.into())?;
            count += 1;
        }

        tracing::debug!("Built context tree from {} variable(s)", count);
        Ok(tree)
    }

    fn with_self_value(value: Scalar) -> Self {
        let mut tree = Self::default();
        tree.entries.insert(SELF_KEY.to_string(), ContextNode::Scalar(value));
        tree
    }

    fn insert(&mut self, raw_key: &str, segments: &[String], value: Scalar) -> Result<(), ContextError> {
        let Some((last, parents)) = segments.split_last() else {
            tracing::debug!("Skipping variable '{}' with no name segments", raw_key);
            return Ok(());
        };

        let mut level = self;
        for segment in parents {
            level = level
                .entries
                .entry(segment.clone())
                .or_insert_with(|| ContextNode::Branch(Self::default()))
                .demote();
        }

        let duplicate = || ContextError::DuplicateKey {
            key: raw_key.to_string(),
            path: segments.join("."),
        };

        match level.entries.entry(last.clone()) {
            Entry::Vacant(slot) => {
                slot.insert(ContextNode::Scalar(value));
            }
            Entry::Occupied(mut occupied) => match occupied.get_mut() {
                ContextNode::Branch(branch) => match branch.entries.entry(SELF_KEY.to_string()) {
                    Entry::Vacant(slot) => {
                        slot.insert(ContextNode::Scalar(value));
                    }
                    Entry::Occupied(_) => return Err(duplicate()),
                },
                ContextNode::Scalar(_) => return Err(duplicate()),
            },
        }

        Ok(())
    }

    /// Returns the node stored directly under `segment`.
    pub fn get(&self, segment: &str) -> Option<&ContextNode> {
        self.entries.get(segment)
    }

    /// Looks up a dotted path such as `database.one.url` or `auth.ldap._`.
    pub fn lookup(&self, path: &str) -> Option<&ContextNode> {
        let mut segments = path.split('.');
        let mut node = self.entries.get(segments.next()?)?;
        for segment in segments {
            node = node.as_branch()?.entries.get(segment)?;
        }
        Some(node)
    }

    /// Number of top-level entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over top-level entries in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ContextNode)> {
        self.entries.iter().map(|(key, node)| (key.as_str(), node))
    }

    /// Dotted paths of every leaf value, in sorted order.
    pub fn paths(&self) -> Vec<String> {
        let mut paths = Vec::new();
        self.collect_paths("", &mut paths);
        paths
    }

    fn collect_paths(&self, prefix: &str, paths: &mut Vec<String>) {
        for (key, node) in &self.entries {
            let path = if prefix.is_empty() {
                key.clone()
            } else {
                format!("{prefix}.{key}")
            };
            match node {
                ContextNode::Scalar(_) => paths.push(path),
                ContextNode::Branch(branch) => branch.collect_paths(&path, paths),
            }
        }
    }

    /// Converts the tree into a template engine value.
    ///
    /// The value is reference counted, so cloning it for each render is cheap.
    pub fn to_template_context(&self) -> minijinja::Value {
        minijinja::Value::from_serialize(self)
    }
}

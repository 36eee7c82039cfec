//! Pattern and predicate selection over the registry.

use super::dispatcher::read_attribute;
use crate::naming::ObjectName;
use crate::query::{AttributeSource, QueryError, QueryExpr};
use crate::registry::{
    domain::{ManagedObjectDescriptor, ObjectInstance},
    ports::ObjectRegistry,
};
use serde_json::Value;
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::debug;

/// Selects registered objects by name pattern and attribute predicate.
///
/// Each query works from a single registry snapshot. A candidate whose
/// predicate cannot be evaluated is left out of the result rather than
/// failing the query.
pub struct QueryEngine<R>
where
    R: ObjectRegistry,
{
    registry: Arc<R>,
}

impl<R> QueryEngine<R>
where
    R: ObjectRegistry,
{
    /// Creates a query engine over `registry`.
    #[must_use]
    pub const fn new(registry: Arc<R>) -> Self {
        Self { registry }
    }

    /// Returns the names selected by `pattern` and `predicate`.
    ///
    /// A missing pattern selects every name; a missing predicate accepts
    /// every structurally matching name.
    #[must_use]
    pub fn query_names(
        &self,
        pattern: Option<&ObjectName>,
        predicate: Option<&QueryExpr>,
    ) -> BTreeSet<ObjectName> {
        self.select(pattern, predicate)
            .map(|descriptor| descriptor.name().clone())
            .collect()
    }

    /// Returns name and class pairs with the same selection as
    /// [`query_names`](Self::query_names).
    #[must_use]
    pub fn query_objects(
        &self,
        pattern: Option<&ObjectName>,
        predicate: Option<&QueryExpr>,
    ) -> Vec<ObjectInstance> {
        self.select(pattern, predicate)
            .map(|descriptor| descriptor.instance())
            .collect()
    }

    fn select<'a>(
        &self,
        pattern: Option<&'a ObjectName>,
        predicate: Option<&'a QueryExpr>,
    ) -> impl Iterator<Item = Arc<ManagedObjectDescriptor>> + 'a {
        let snapshot = self.registry.snapshot();
        let candidates: Vec<Arc<ManagedObjectDescriptor>> = snapshot
            .iter()
            .filter(|(name, _)| pattern.is_none_or(|selector| selector.matches(name)))
            .map(|(_, descriptor)| Arc::clone(descriptor))
            .collect();
        candidates
            .into_iter()
            .filter(move |descriptor| predicate.is_none_or(|expr| accepts(descriptor, expr)))
    }
}

impl<R> Clone for QueryEngine<R>
where
    R: ObjectRegistry,
{
    fn clone(&self) -> Self {
        Self {
            registry: Arc::clone(&self.registry),
        }
    }
}

fn accepts(descriptor: &ManagedObjectDescriptor, predicate: &QueryExpr) -> bool {
    match predicate.evaluate(&DescriptorSource(descriptor)) {
        Ok(selected) => selected,
        Err(err) => {
            debug!(name = %descriptor.name(), error = %err, "query predicate rejected candidate");
            false
        }
    }
}

/// Reads predicate attributes through the dispatcher's read path.
struct DescriptorSource<'a>(&'a ManagedObjectDescriptor);

impl AttributeSource for DescriptorSource<'_> {
    fn attribute(&self, name: &str) -> Result<Value, QueryError> {
        read_attribute(self.0, name).map_err(|err| QueryError::AttributeUnavailable {
            attribute: name.to_owned(),
            reason: err.to_string(),
        })
    }
}

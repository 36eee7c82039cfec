//! Uniform management facade over the registry, dispatcher and listener
//! ledger.

use super::{ConfigError, FacadeConfig};
use crate::error::{ManagementError, ManagementResult};
use crate::listener::{
    adapters::memory::InMemoryListenerRegistry,
    domain::{ListenerHandle, NotificationFilter, Subscription, SubscriptionId},
    ports::ListenerRegistry,
};
use crate::naming::ObjectName;
use crate::query::QueryExpr;
use crate::registry::{
    adapters::memory::InMemoryObjectRegistry,
    domain::{
        Attribute, AttributeList, DescriptorError, ManagedObjectDescriptor, ManagedObjectInfo,
        ObjectInstance, ValueType,
    },
    ports::{ManagedObject, ObjectRegistry},
    services::{Dispatcher, Introspector, QueryEngine},
};
use mockable::{Clock, DefaultClock};
use serde_json::Value;
use std::collections::BTreeSet;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::info;

/// Facade backed by the in-memory registry and listener ledger.
pub type InMemoryManagementFacade =
    ManagementFacade<InMemoryObjectRegistry, InMemoryListenerRegistry, DefaultClock>;

/// Single entry point for clients and hosting collaborators.
///
/// Client operations take parsed [`ObjectName`]s; every failure is a
/// [`ManagementError`]. The facade is cheap to clone and safe to share
/// across threads.
pub struct ManagementFacade<R, L, C>
where
    R: ObjectRegistry,
    L: ListenerRegistry + 'static,
    C: Clock + Send + Sync,
{
    config: Arc<FacadeConfig>,
    registry: Arc<R>,
    listeners: Arc<L>,
    clock: Arc<C>,
    membership: Arc<Mutex<()>>,
    queries: QueryEngine<R>,
    introspector: Introspector<R>,
    dispatcher: Dispatcher<R>,
}

impl InMemoryManagementFacade {
    /// Creates a facade over fresh in-memory stores and the system clock.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when `config` fails validation.
    pub fn in_memory(config: FacadeConfig) -> Result<Self, ConfigError> {
        Self::new(
            config,
            Arc::new(InMemoryObjectRegistry::new()),
            Arc::new(InMemoryListenerRegistry::new()),
            Arc::new(DefaultClock),
        )
    }
}

impl<R, L, C> ManagementFacade<R, L, C>
where
    R: ObjectRegistry,
    L: ListenerRegistry + 'static,
    C: Clock + Send + Sync,
{
    /// Creates a facade over the given stores.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when `config` fails validation.
    pub fn new(
        config: FacadeConfig,
        registry: Arc<R>,
        listeners: Arc<L>,
        clock: Arc<C>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            queries: QueryEngine::new(Arc::clone(&registry)),
            introspector: Introspector::new(
                Arc::clone(&registry),
                config.refresh_info_on_describe,
            ),
            dispatcher: Dispatcher::new(Arc::clone(&registry)),
            config: Arc::new(config),
            registry,
            listeners,
            clock,
            membership: Arc::new(Mutex::new(())),
        })
    }

    /// Serialises listener additions against unregistration so no
    /// subscription outlives the purge of its name.
    fn membership(&self) -> MutexGuard<'_, ()> {
        self.membership
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Returns the active configuration.
    #[must_use]
    pub fn config(&self) -> &FacadeConfig {
        &self.config
    }

    /// Returns the default domain.
    #[must_use]
    pub fn default_domain(&self) -> &str {
        &self.config.default_domain
    }

    /// Returns the names selected by `pattern` and `predicate`.
    ///
    /// Candidates whose predicate cannot be evaluated are left out.
    #[must_use]
    pub fn query_names(
        &self,
        pattern: Option<&ObjectName>,
        predicate: Option<&QueryExpr>,
    ) -> BTreeSet<ObjectName> {
        self.queries.query_names(pattern, predicate)
    }

    /// Returns name and class pairs selected by `pattern` and `predicate`.
    #[must_use]
    pub fn query_objects(
        &self,
        pattern: Option<&ObjectName>,
        predicate: Option<&QueryExpr>,
    ) -> Vec<ObjectInstance> {
        self.queries.query_objects(pattern, predicate)
    }

    /// Returns whether an object is registered as `name`.
    #[must_use]
    pub fn is_registered(&self, name: &ObjectName) -> bool {
        self.registry.is_registered(name)
    }

    /// Returns the number of registered objects.
    #[must_use]
    pub fn managed_object_count(&self) -> usize {
        self.registry.count()
    }

    /// Describes the object registered as `name`.
    ///
    /// # Errors
    ///
    /// See [`Introspector::describe`].
    pub fn describe(&self, name: &ObjectName) -> ManagementResult<Arc<ManagedObjectInfo>> {
        self.introspector.describe(name)
    }

    /// Reads one attribute.
    ///
    /// # Errors
    ///
    /// See [`Dispatcher::get_attribute`].
    pub fn get_attribute(&self, name: &ObjectName, attribute: &str) -> ManagementResult<Value> {
        self.dispatcher.get_attribute(name, attribute)
    }

    /// Reads several attributes, omitting those that cannot be read.
    ///
    /// # Errors
    ///
    /// See [`Dispatcher::get_attributes`].
    pub fn get_attributes<S>(
        &self,
        name: &ObjectName,
        attributes: &[S],
    ) -> ManagementResult<AttributeList>
    where
        S: AsRef<str>,
    {
        self.dispatcher.get_attributes(name, attributes)
    }

    /// Writes one attribute.
    ///
    /// # Errors
    ///
    /// See [`Dispatcher::set_attribute`].
    pub fn set_attribute(&self, name: &ObjectName, attribute: &Attribute) -> ManagementResult<()> {
        self.dispatcher.set_attribute(name, attribute)
    }

    /// Writes several attributes and returns those applied.
    ///
    /// # Errors
    ///
    /// See [`Dispatcher::set_attributes`].
    pub fn set_attributes(
        &self,
        name: &ObjectName,
        attributes: AttributeList,
    ) -> ManagementResult<AttributeList> {
        self.dispatcher.set_attributes(name, attributes)
    }

    /// Invokes an operation.
    ///
    /// # Errors
    ///
    /// See [`Dispatcher::invoke`].
    pub fn invoke(
        &self,
        name: &ObjectName,
        operation: &str,
        params: &[Value],
        signature: &[ValueType],
    ) -> ManagementResult<Value> {
        self.dispatcher.invoke(name, operation, params, signature)
    }

    /// Returns the listener ledger.
    #[must_use]
    pub fn listener_registry(&self) -> Arc<dyn ListenerRegistry> {
        Arc::<L>::clone(&self.listeners)
    }

    /// Subscribes `listener` to notifications from the object registered as
    /// `name`.
    ///
    /// # Errors
    ///
    /// Returns [`ManagementError::MalformedName`] for a pattern and
    /// [`ManagementError::InstanceNotFound`] for an unbound name.
    pub fn add_listener(
        &self,
        name: &ObjectName,
        listener: ListenerHandle,
        filter: Option<NotificationFilter>,
        handback: Option<Value>,
    ) -> ManagementResult<SubscriptionId> {
        name.ensure_concrete()?;
        let _membership = self.membership();
        if !self.registry.is_registered(name) {
            return Err(ManagementError::InstanceNotFound(name.clone()));
        }

        let mut subscription = Subscription::new(name.clone(), listener, &*self.clock);
        if let Some(enabled) = filter {
            subscription = subscription.with_filter(enabled);
        }
        if let Some(value) = handback {
            subscription = subscription.with_handback(value);
        }
        let id = self.listeners.add_listener(subscription);
        info!(name = %name, subscription = %id, "listener added");
        Ok(id)
    }

    /// Removes one subscription.
    ///
    /// # Errors
    ///
    /// Returns [`ManagementError::ListenerNotFound`] when the subscription is
    /// not recorded for `name`.
    pub fn remove_listener(&self, name: &ObjectName, id: SubscriptionId) -> ManagementResult<()> {
        self.listeners.remove_listener(name, id)?;
        info!(name = %name, subscription = %id, "listener removed");
        Ok(())
    }

    /// Removes every subscription recorded for `name` and returns how many
    /// were removed.
    pub fn remove_listeners(&self, name: &ObjectName) -> usize {
        let removed = self.listeners.remove_listeners(name);
        if removed > 0 {
            info!(name = %name, removed, "listeners removed");
        }
        removed
    }

    /// Registers `object` as `name` with a snapshot of its metadata.
    ///
    /// # Errors
    ///
    /// Returns [`ManagementError::MalformedName`] for a pattern,
    /// [`ManagementError::Introspection`] or [`ManagementError::Reflection`]
    /// when the object cannot describe itself validly, and
    /// [`ManagementError::DuplicateName`] when the name is bound. The
    /// registry is unchanged on failure.
    pub fn register(
        &self,
        name: ObjectName,
        object: Arc<dyn ManagedObject>,
    ) -> ManagementResult<ObjectInstance> {
        name.ensure_concrete()?;
        let info = object
            .describe()
            .map_err(|fault| ManagementError::from_describe_fault(&name, fault))?;
        let descriptor = ManagedObjectDescriptor::new(name.clone(), info, object, &*self.clock)
            .map_err(|err| match err {
                DescriptorError::Name(malformed) => ManagementError::MalformedName(malformed),
                DescriptorError::Info(invalid) => ManagementError::Introspection {
                    name: name.clone(),
                    reason: invalid.to_string(),
                },
            })?;

        let registered = self.registry.register(descriptor)?;
        let instance = registered.instance();
        info!(name = %instance.name, class = %instance.class_name, "registered managed object");
        Ok(instance)
    }

    /// Unregisters the object bound to `name` and drops its subscriptions.
    ///
    /// # Errors
    ///
    /// Returns [`ManagementError::InstanceNotFound`] for an unbound name.
    pub fn unregister(&self, name: &ObjectName) -> ManagementResult<()> {
        let _membership = self.membership();
        self.registry.unregister(name)?;
        let purged = self.listeners.remove_listeners(name);
        info!(name = %name, purged, "unregistered managed object");
        Ok(())
    }
}

impl<R, L, C> Clone for ManagementFacade<R, L, C>
where
    R: ObjectRegistry,
    L: ListenerRegistry + 'static,
    C: Clock + Send + Sync,
{
    fn clone(&self) -> Self {
        Self {
            config: Arc::clone(&self.config),
            registry: Arc::clone(&self.registry),
            listeners: Arc::clone(&self.listeners),
            clock: Arc::clone(&self.clock),
            membership: Arc::clone(&self.membership),
            queries: self.queries.clone(),
            introspector: self.introspector.clone(),
            dispatcher: self.dispatcher.clone(),
        }
    }
}

impl<R, L, C> fmt::Debug for ManagementFacade<R, L, C>
where
    R: ObjectRegistry,
    L: ListenerRegistry + 'static,
    C: Clock + Send + Sync,
{
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("ManagementFacade")
            .field("config", &self.config)
            .field("managed_objects", &self.registry.count())
            .finish_non_exhaustive()
    }
}

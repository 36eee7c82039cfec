//! Domain model for managed-object metadata and registry entries.
//!
//! Metadata is an explicit capability table: every attribute and operation a
//! client may reach is declared up front with its type, so dispatch never
//! has to guess what an object supports.

mod attribute;
mod descriptor;
mod error;
mod info;
mod snapshot;
mod value_type;

pub use attribute::{Attribute, AttributeList};
pub use descriptor::{ManagedObjectDescriptor, ObjectInstance};
pub use error::{DescriptorError, InfoValidationError, ParseValueTypeError, ValueRejection};
pub use info::{
    AttributeInfo, Impact, ManagedObjectInfo, NotificationInfo, OperationInfo, ParameterInfo,
};
pub use snapshot::RegistrySnapshot;
pub use value_type::ValueType;
pub(crate) use value_type::format_signature;

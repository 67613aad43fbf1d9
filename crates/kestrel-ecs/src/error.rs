use kestrel_core::EntityId;

/// Errors that can occur in the ECS runtime.
///
/// Both variants mark a programming error at the call site, not a runtime
/// data condition: absent entities and components are reported as `None` or
/// `false` by the lookup operations, never as an error.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EcsError {
    #[error("query requested with zero component kinds")]
    InvalidQuery,

    #[error("entity {0} is not live")]
    UnknownEntity(EntityId),
}

//! Remote store contract
//!
//! The editor only cares whether a mutation was accepted or rejected; how the
//! store resolves row-level conflicts is its own business.

use crate::command::{Mutation, Query, QueryResponse};
use crate::model::EntityKind;
use async_trait::async_trait;
use uuid::Uuid;

/// Reasons the store refuses a request
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Rejection {
    /// The targeted entity does not exist (e.g. deleted by a collaborator)
    #[error("{kind} {id} not found")]
    NotFound { kind: EntityKind, id: Uuid },

    /// The entity exists but changed underneath the request
    #[error("conflict: {0}")]
    Conflict(String),

    /// The request itself is malformed
    #[error("invalid request: {0}")]
    Invalid(String),

    /// Transport or storage failure unrelated to the request's content
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

impl Rejection {
    /// Whether the rejection stems from another writer touching the same rows
    pub fn is_conflict(&self) -> bool {
        matches!(self, Rejection::NotFound { .. } | Rejection::Conflict(_))
    }
}

/// Authoritative store the editor mutates and reads from
#[async_trait]
pub trait RemoteStore: Send + Sync {
    /// Apply a mutation; resolves once the store has accepted or refused it
    async fn mutate(&self, mutation: Mutation) -> Result<(), Rejection>;

    /// Read a collection of rows
    async fn query(&self, query: Query) -> Result<QueryResponse, Rejection>;
}

// Sync Backend
//
// The authoritative side of the editor: entity rows, the closed set of
// mutations and queries the editor may send, and an in-process store that
// applies them. Remote transports implement `RemoteStore` against the same types.

pub mod command;
pub mod memory;
pub mod model;
pub mod store;
pub mod tables;

// Re-export commonly used types
pub use command::{
    ClipMutation, ClipPatch, EffectMutation, EffectPatch, Mutation, Query, QueryResponse,
    TrackMutation, TrackPatch,
};
pub use memory::MemoryStore;
pub use model::{
    Clip, EffectKind, EntityKind, FilterMode, Project, Samples, Track, TrackEffect,
    DEFAULT_SAMPLE_RATE,
};
pub use store::{Rejection, RemoteStore};
pub use tables::EntityTables;

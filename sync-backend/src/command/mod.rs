pub mod types;

pub use types::{
    ClipMutation, ClipPatch, EffectMutation, EffectPatch, Mutation, Query, QueryResponse,
    TrackMutation, TrackPatch,
};

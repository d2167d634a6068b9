// src/models/mod.rs
pub mod player;

pub use player::{
    ApiResponse,
    Player,
    PlayerProfile,
    RedemptionOutcome,
    RedemptionReport,
    RosterEvent,
    ViewSnapshot,
};

//! Shared wire and domain types for Brainrot Dex
//!
//! - `api`: request and response bodies exchanged with the generative service
//! - `common`: domain types shared by every layer (concepts, rarity tiers)

pub mod api;
pub mod common;

pub use common::{Concept, ParseRarityError, Rarity};

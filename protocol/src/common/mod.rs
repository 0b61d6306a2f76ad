pub mod concept;
pub mod rarity;

pub use concept::*;
pub use rarity::*;

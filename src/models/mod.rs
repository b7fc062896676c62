//! Domain types shared by the store and the HTTP layer

mod item;

pub use item::{Item, ItemData, ItemId};

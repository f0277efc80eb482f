//! Pure data structures returned by the item API and handed to listeners.

pub mod item;
pub mod photo;
pub mod rating;
pub mod review;

pub use item::*;
pub use photo::*;
pub use rating::*;
pub use review::*;

//! # Sub-Resources
//!
//! The four [`SubResource`](crate::framework::SubResource) variants backing the
//! item detail screen.
//!
//! ## Structure
//!
//! - [`ItemResource`] - the item itself, with warm start from cached data
//! - [`RatingResource`] - rating statistics
//! - [`PhotoListResource`] / [`ReviewListResource`] - paginated lists built on
//!   the generic [`ListResource`]

pub mod item;
pub mod list;
pub mod photo_list;
pub mod rating;
pub mod review_list;

pub use item::*;
pub use list::*;
pub use photo_list::*;
pub use rating::*;
pub use review_list::*;

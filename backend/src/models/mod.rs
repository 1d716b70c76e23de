//! Domain model: articles, the per-session collection, map locations and
//! popularity ranges.

pub mod collection;
pub mod item;
pub mod location;
pub mod macros;
pub mod view_range;

pub use collection::*;
pub use item::*;
pub use location::*;
pub use view_range::*;

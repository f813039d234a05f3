// Catalog data model — items as delivered by the feed backend, plus the
// price bucketizer used as a preference facet.

pub mod bucket;
pub mod item;

pub use bucket::{bucketize, PriceBucket};
pub use item::Item;

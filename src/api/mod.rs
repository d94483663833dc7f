//! Endpoint wrappers for simPRO resources.
//!
//! Each resource family is a thin `impl SimproClient` block binding a
//! fixed path and its filter parameters to the core request executor and
//! pagination machinery; none of them carries independent logic.
//!
//! Collection endpoints come in pairs: `*_page` fetches one page, and
//! `*_pages` returns a lazy [`PageStream`](crate::clients::PageStream)
//! over the whole collection.

mod catalogs;
mod invoices;
mod leads;
mod prebuilds;
mod quotes;
mod sites;

pub use prebuilds::{NewStandardPrice, StandardPriceUpdate};

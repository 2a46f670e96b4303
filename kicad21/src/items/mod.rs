//!
//! # KiCad Records
//!
//! Typed records shared among, or owned by, the top-level documents.
//!

pub mod common;
pub mod gritems;
pub mod fpitems;
pub mod zones;
pub mod brditems;
pub mod dimensions;
pub mod schitems;
pub mod syitems;

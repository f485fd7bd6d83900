//! The two fixture generators. They share nothing but the certificate helper.

pub mod chain;
pub mod path_building;

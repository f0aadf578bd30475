//! Shared test utilities
#![allow(dead_code)]

pub mod catalog_db;

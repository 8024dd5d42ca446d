//! End-to-end portal scenarios against an in-process gateway

mod navigation_tests;
mod support;
mod wishlist_tests;

//! HTTP-level integration tests over an in-memory listing store.

mod helpers;
mod listing_test;
mod review_test;

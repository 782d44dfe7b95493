//! Integration test suite.
//!
//! Drives the full router in-process against a live Postgres named by
//! `AGORA_TEST_DATABASE_URL`. When that variable is unset every test
//! returns early, so the suite passes without a database.

mod helpers;

mod notification_test;
mod points_test;
mod ws_test;

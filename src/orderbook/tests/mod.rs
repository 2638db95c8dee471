//! In-crate tests with access to the book's internals.

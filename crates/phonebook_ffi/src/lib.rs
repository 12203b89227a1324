//! Flutter-facing bridge for the phonebook core.

pub mod api;

//! Phonebook domain model.
//!
//! # Responsibility
//! - Define canonical data structures used by core business logic.
//!
//! # Invariants
//! - Every contact is identified by a stable `ContactId`.
//! - Deletion removes the record from the list; there are no tombstones.

pub mod contact;

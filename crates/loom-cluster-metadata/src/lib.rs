// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Replicated cluster metadata primitives for Loom.
//!
//! This crate provides the pieces the artificial system tables are built on:
//!
//! - [`Datum`]: the tagged query value rows are expressed in
//! - [`DatumObjectConverter`]: field-by-field extraction from object datums
//! - [`HomeContext`]: a single owner thread that serializes access to shared state
//! - [`Semilattice`], [`Versioned`] and [`SemilatticeView`]: mergeable metadata
//!   and the handle used to read and join it
//! - [`AuthKey`] and [`AuthMetadata`]: the cluster authentication secret

pub mod auth;
pub mod converter;
pub mod datum;
pub mod error;
pub mod home;
pub mod semilattice;
pub mod view;

pub use auth::{AuthKey, AuthMetadata};
pub use converter::DatumObjectConverter;
pub use datum::{Datum, DatumObjectBuilder, DatumType};
pub use error::{AuthKeyError, ConvertError, HomeError};
pub use home::{HomeContext, HomeId};
pub use semilattice::{Semilattice, Versioned};
pub use view::{InMemoryView, SemilatticeView};

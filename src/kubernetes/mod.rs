// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Client construction, manifest resolution and apply/delete orchestration.

pub mod apply;
pub mod client;
pub mod environment;
pub mod manifest;

pub use apply::check_aligned;
pub use client::{ClientSet, DynamicClient};
pub use environment::{detect, resolve, Connection, Environment, HostEnvironment, Placement};
pub use manifest::{decode_documents, group_version_kind};

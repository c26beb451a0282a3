// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Handles produced by manifest resolution.

pub mod endpoint;

pub use endpoint::ResourceEndpoint;

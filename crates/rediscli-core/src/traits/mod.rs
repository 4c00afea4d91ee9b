// SPDX-FileCopyrightText: 2026 Rediscli Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Trait seams between the shell and its collaborators.

pub mod store;

pub use store::KeyValueStore;

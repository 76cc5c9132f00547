// SPDX-FileCopyrightText: 2026 Pairup Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Storage adapter trait for persistence backends (SQLite, etc.).

use async_trait::async_trait;

use crate::error::PairupError;
use crate::traits::adapter::PluginAdapter;
use crate::traits::repository::Repository;

/// Adapter for storage and persistence backends.
///
/// Storage adapters manage the lifecycle of database connections and expose
/// the participant, meeting, and topic repositories.
#[async_trait]
pub trait StorageAdapter: PluginAdapter + Repository {
    /// Initializes the storage backend (migrations, connection, etc.).
    async fn initialize(&self) -> Result<(), PairupError>;

    /// Closes the storage backend, flushing pending writes and releasing connections.
    async fn close(&self) -> Result<(), PairupError>;
}

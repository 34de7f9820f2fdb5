//! Bounded leaf retrieval.
//!
//! The service serves leaves by explicit index. No single lookup names more
//! than [`MAX_LEAVES_PER_REQUEST`] indexes, and every index is clamped to the
//! tree size observed just before the lookup.
//!
//! The tree size read and the leaf lookup are two separate round-trips. The
//! log only grows, so indexes computed from an older size stay valid, but the
//! result may miss leaves integrated in between.

use tracing::debug;
use trellis_types::{LeafBatch, LogLeaf, MAX_LEAVES_PER_REQUEST};

use crate::connection::LogConnection;
use crate::error::ClientError;

impl LogConnection {
    /// Fetch leaves with indexes in `[start, end)`, sorted ascending by index.
    ///
    /// At most [`MAX_LEAVES_PER_REQUEST`] leaves are returned: the window is
    /// truncated to `[start, start + 1024)` and to the current tree size.
    /// Callers page through larger ranges by advancing `start`.
    pub async fn get_leaves(&self, start: u64, end: u64) -> Result<Vec<LogLeaf>, ClientError> {
        Ok(self.get_leaves_with_root(start, end).await?.leaves)
    }

    /// Same as [`get_leaves`](Self::get_leaves), keeping the signed root the
    /// service returned alongside the leaves.
    pub async fn get_leaves_with_root(
        &self,
        start: u64,
        end: u64,
    ) -> Result<LeafBatch, ClientError> {
        if start >= end {
            return Err(ClientError::InvalidArgument(format!(
                "start ({start}) must be less than end ({end})"
            )));
        }

        let tree_size = self.get_tree_size().await?;
        if start >= tree_size {
            return Err(ClientError::InvalidArgument(format!(
                "start ({start}) must be less than tree size ({tree_size})"
            )));
        }

        let end = end
            .min(start.saturating_add(MAX_LEAVES_PER_REQUEST))
            .min(tree_size);
        let indexes: Vec<u64> = (start..end).collect();
        if indexes.is_empty() {
            return Ok(LeafBatch::default());
        }

        let mut batch = self.fetch_by_index(&indexes).await?;
        batch.leaves.sort_by_key(|leaf| leaf.leaf_index);
        Ok(batch)
    }

    /// Fetch `count` leaves starting at `start_index`, under the same bounds
    /// as [`get_leaves`](Self::get_leaves).
    pub async fn get_leaves_by_range(
        &self,
        start_index: u64,
        count: u64,
    ) -> Result<Vec<LogLeaf>, ClientError> {
        self.get_leaves(start_index, start_index.saturating_add(count))
            .await
    }

    /// Fetch up to `n` of the most recently integrated leaves.
    ///
    /// Indexes are requested newest first, counting down from
    /// `tree_size - 1`. The countdown stops above index 0, so the oldest leaf
    /// of the log is never part of the result. Large requests are split into
    /// lookups of at most [`MAX_LEAVES_PER_REQUEST`] indexes; leaves are
    /// returned in the order the service sends them, batch by batch.
    pub async fn get_recent_leaves(&self, n: u64) -> Result<Vec<LogLeaf>, ClientError> {
        let tree_size = self.get_tree_size().await?;
        let Some(newest) = tree_size.checked_sub(1) else {
            return Ok(Vec::new());
        };

        // Exclusive lower bound.
        let floor = newest.saturating_sub(n);
        let mut leaves = Vec::new();
        let mut high = newest;
        while high > floor {
            let low = high.saturating_sub(MAX_LEAVES_PER_REQUEST).max(floor);
            let batch: Vec<u64> = (low + 1..=high).rev().collect();
            leaves.extend(self.fetch_by_index(&batch).await?.leaves);
            high = low;
        }
        Ok(leaves)
    }

    async fn fetch_by_index(&self, indexes: &[u64]) -> Result<LeafBatch, ClientError> {
        debug!(
            log_id = %self.log_id,
            count = indexes.len(),
            first = ?indexes.first(),
            last = ?indexes.last(),
            "requesting leaves by index"
        );
        let batch = self
            .retry
            .run("GetLeavesByIndex", || {
                self.rpc.get_leaves_by_index(self.log_id, indexes)
            })
            .await?;
        Ok(batch)
    }
}

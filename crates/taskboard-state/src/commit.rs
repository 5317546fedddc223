//! Optimistic commit: the one rollback contract shared by every mutating
//! board operation.
//!
//! 1. capture the touched columns (and the archive, when it is touched)
//! 2. apply the mutation in memory and write the cache
//! 3. await the remote request, if there is one
//! 4. on any failure put the snapshot back and rewrite the cache

use std::future::Future;
use taskboard_core::BoardResult;
use taskboard_domain::{ArchivedTask, Board, BoardSnapshot, TaskStatus};

use crate::store::BoardStore;

impl BoardStore {
    /// Steps 1 and 2. A failed cache write reverts the mutation.
    pub(crate) fn apply_local<F>(
        &mut self,
        touched: &[TaskStatus],
        with_archive: bool,
        mutate: F,
    ) -> BoardResult<BoardSnapshot>
    where
        F: FnOnce(&mut Board, &mut Vec<ArchivedTask>),
    {
        let snapshot = self.capture(touched, with_archive);
        mutate(&mut self.board, &mut self.archive);

        if let Err(e) = self.write_cache(with_archive) {
            snapshot.restore(&mut self.board, &mut self.archive);
            self.resync_cache(with_archive);
            return Err(self.surface(e));
        }
        Ok(snapshot)
    }

    /// All four steps. `request` is not polled until the local mutation
    /// and cache write have succeeded.
    pub(crate) async fn commit_optimistic<T, F, Fut>(
        &mut self,
        touched: &[TaskStatus],
        with_archive: bool,
        mutate: F,
        request: Fut,
    ) -> BoardResult<T>
    where
        F: FnOnce(&mut Board, &mut Vec<ArchivedTask>),
        Fut: Future<Output = BoardResult<T>>,
    {
        let snapshot = self.apply_local(touched, with_archive, mutate)?;

        match request.await {
            Ok(value) => Ok(value),
            Err(e) => {
                tracing::warn!(
                    "Remote rejected change, rolling back {:?}",
                    snapshot.statuses().collect::<Vec<_>>()
                );
                snapshot.restore(&mut self.board, &mut self.archive);
                self.resync_cache(with_archive);
                Err(self.surface(e))
            }
        }
    }

    fn capture(&self, touched: &[TaskStatus], with_archive: bool) -> BoardSnapshot {
        let snapshot = BoardSnapshot::capture(&self.board, touched);
        if with_archive {
            snapshot.with_archive(&self.archive)
        } else {
            snapshot
        }
    }

    fn write_cache(&self, with_archive: bool) -> BoardResult<()> {
        self.cache.save_board(&self.board)?;
        if with_archive {
            self.cache
                .save_archive(&self.session.user_id, &self.archive)?;
        }
        Ok(())
    }

    fn resync_cache(&self, with_archive: bool) {
        if let Err(e) = self.write_cache(with_archive) {
            tracing::warn!("Cache left out of sync after rollback: {}", e);
        }
    }
}

use crate::api::{ApiError, ApiResult};
use crate::cache::{EntityCache, Snapshot};
use crate::error::TransitionError;
use std::collections::BTreeSet;

/// Ticket for one optimistic removal, handed back to [`DeleteController::settle`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct PendingDelete {
    pub id: String,
    pub index: usize,
    generation: u64,
}

/// Optimistic deletes for the rows of one page (notebooks on the list page,
/// notes on a notebook page).
///
/// The row disappears as soon as the delete starts. On failure the cache is
/// restored from the snapshot taken before the first outstanding removal and
/// every other removal that is still pending or already confirmed is applied
/// again, so only the failed row comes back, at its original position.
#[derive(Clone, Debug, Default)]
pub(crate) struct DeleteController {
    base: Option<(u64, Snapshot)>,
    pending: BTreeSet<String>,
    confirmed: BTreeSet<String>,
}

impl DeleteController {
    pub fn is_pending(&self, id: &str) -> bool {
        self.pending.contains(id)
    }

    pub fn begin(
        &mut self,
        cache: &mut EntityCache,
        id: &str,
    ) -> Result<PendingDelete, TransitionError> {
        if self.pending.contains(id) {
            return Err(TransitionError::AlreadyDeleting(id.to_string()));
        }

        let generation = cache.generation();
        let base_is_current = matches!(&self.base, Some((g, _)) if *g == generation);
        if !base_is_current {
            let snapshot = cache
                .snapshot()
                .ok_or_else(|| TransitionError::NotLoaded(id.to_string()))?;
            self.base = Some((generation, snapshot));
            self.confirmed.clear();
        }

        let index = cache
            .remove_from_list(id)
            .ok_or_else(|| TransitionError::NotLoaded(id.to_string()))?;
        self.pending.insert(id.to_string());

        tracing::debug!(id, index, "optimistic delete applied");
        Ok(PendingDelete {
            id: id.to_string(),
            index,
            generation,
        })
    }

    /// Finalizes a removal with the server's answer. On error the row is
    /// restored and the error is returned for display.
    pub fn settle(
        &mut self,
        cache: &mut EntityCache,
        pending: PendingDelete,
        result: ApiResult<()>,
    ) -> Result<(), ApiError> {
        self.pending.remove(&pending.id);

        let err = match result {
            Ok(()) => {
                if cache.generation() != pending.generation {
                    // A fetch issued before the delete landed may still list the row.
                    cache.remove_from_list(&pending.id);
                }
                self.confirmed.insert(pending.id);
                return Ok(());
            }
            Err(e) => e,
        };

        tracing::warn!(id = %pending.id, error = %err, "delete failed, rolling back");

        if cache.generation() != pending.generation {
            // A newer fetch already replaced the cache; it is the truth now.
            return Err(err);
        }

        if let Some((_, base)) = &self.base {
            cache.rollback(base.clone());
            for id in self.pending.iter().chain(self.confirmed.iter()) {
                cache.remove_from_list(id);
            }
        }

        Err(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::memory::{note, notebook, MemoryStore};
    use crate::api::{ApiErrorKind, RemoteStore};
    use futures::executor::block_on;

    fn ids(cache: &EntityCache) -> Vec<String> {
        cache.notebooks().iter().map(|n| n.id.clone()).collect()
    }

    fn loaded(store: &MemoryStore) -> EntityCache {
        let mut cache = EntityCache::default();
        let list = block_on(store.list_notebooks()).expect("list");
        cache.replace(Snapshot::List(list));
        cache
    }

    fn store() -> MemoryStore {
        MemoryStore::with_notebooks(vec![
            notebook("a", "A", vec![]),
            notebook("b", "B", vec![]),
            notebook("c", "C", vec![]),
        ])
    }

    #[test]
    fn test_delete_removes_row_immediately_and_stays_removed_on_success() {
        let store = store();
        let mut cache = loaded(&store);
        let mut ctl = DeleteController::default();

        let p = ctl.begin(&mut cache, "b").expect("begin");
        assert_eq!(ids(&cache), ["a", "c"]);
        assert!(ctl.is_pending("b"));

        let result = block_on(store.delete_notebook(&p.id));
        ctl.settle(&mut cache, p, result).expect("confirmed");
        assert_eq!(ids(&cache), ["a", "c"]);
        assert!(!ctl.is_pending("b"));
        assert_eq!(store.notebooks().len(), 2);
    }

    #[test]
    fn test_failed_delete_restores_original_position() {
        let store = store();
        let mut cache = loaded(&store);
        let mut ctl = DeleteController::default();

        let p = ctl.begin(&mut cache, "b").expect("begin");
        store.fail_next(ApiError::http(500, r#"{"detail": "db down"}"#));
        let result = block_on(store.delete_notebook(&p.id));

        let err = ctl.settle(&mut cache, p, result).expect_err("rolled back");
        assert_eq!(err.message, "db down");
        assert_eq!(ids(&cache), ["a", "b", "c"]);
        assert!(!ctl.is_pending("b"));
    }

    #[test]
    fn test_second_click_while_pending_is_rejected() {
        let store = store();
        let mut cache = loaded(&store);
        let mut ctl = DeleteController::default();

        let _p = ctl.begin(&mut cache, "a").expect("begin");
        assert_eq!(
            ctl.begin(&mut cache, "a"),
            Err(TransitionError::AlreadyDeleting("a".to_string()))
        );
        assert!(ctl.is_pending("a"));
    }

    #[test]
    fn test_rollback_does_not_resurrect_confirmed_or_pending_rows() {
        let store = store();
        let mut cache = loaded(&store);
        let mut ctl = DeleteController::default();

        let pa = ctl.begin(&mut cache, "a").expect("begin a");
        let pb = ctl.begin(&mut cache, "b").expect("begin b");
        let pc = ctl.begin(&mut cache, "c").expect("begin c");
        assert!(cache.notebooks().is_empty());

        // a confirmed, b fails, c still in flight.
        ctl.settle(&mut cache, pa, Ok(())).expect("a ok");
        let err = ApiError::timeout(10_000);
        assert!(ctl.settle(&mut cache, pb, Err(err)).is_err());
        assert_eq!(ids(&cache), ["b"]);

        // c fails too: both failures visible, in original order.
        assert!(ctl
            .settle(&mut cache, pc, Err(ApiError::timeout(10_000)))
            .is_err());
        assert_eq!(ids(&cache), ["b", "c"]);
    }

    #[test]
    fn test_failure_after_newer_fetch_keeps_fetched_state() {
        let store = store();
        let mut cache = loaded(&store);
        let mut ctl = DeleteController::default();

        let p = ctl.begin(&mut cache, "b").expect("begin");
        let fresh = block_on(store.list_notebooks()).expect("list");
        cache.replace(Snapshot::List(fresh[..1].to_vec()));

        let err = ctl
            .settle(&mut cache, p, Err(ApiError::timeout(1000)))
            .expect_err("error still surfaced");
        assert_eq!(err.kind, ApiErrorKind::Timeout);
        assert_eq!(ids(&cache), ["a"]);
    }

    #[test]
    fn test_success_after_stale_fetch_still_hides_the_row() {
        let store = store();
        let mut cache = loaded(&store);
        let mut ctl = DeleteController::default();

        let p = ctl.begin(&mut cache, "b").expect("begin");
        // A refresh fetched before the DELETE reached the server lands first.
        let stale = block_on(store.list_notebooks()).expect("list");
        cache.replace(Snapshot::List(stale));
        assert_eq!(ids(&cache), ["a", "b", "c"]);

        let result = block_on(store.delete_notebook(&p.id));
        ctl.settle(&mut cache, p, result).expect("confirmed");
        assert_eq!(ids(&cache), ["a", "c"]);
        assert_eq!(store.notebooks().len(), 2);
    }

    #[test]
    fn test_note_delete_with_invalid_reference_rolls_back() {
        let store = MemoryStore::with_notebooks(vec![notebook(
            "nb",
            "NB",
            vec![note("n1", "x", "", &[]), note("n2", "y", "", &[])],
        )]);
        let mut cache = EntityCache::default();
        cache.replace(Snapshot::Notebook(block_on(store.get_notebook("nb")).expect("get")));
        let mut ctl = DeleteController::default();

        let p = ctl.begin(&mut cache, "n1").expect("begin");
        assert!(cache.note("n1").is_none());

        let result = block_on(store.delete_note("undefined", &p.id));
        let err = ctl.settle(&mut cache, p, result).expect_err("guarded");
        assert_eq!(err.kind, ApiErrorKind::InvalidReference);
        assert!(cache.note("n1").is_some());
        assert_eq!(cache.notebook().map(|n| n.notes[0].id.as_str()), Some("n1"));
    }

    #[test]
    fn test_begin_on_unknown_row_is_rejected_without_side_effects() {
        let store = store();
        let mut cache = loaded(&store);
        let mut ctl = DeleteController::default();
        assert_eq!(
            ctl.begin(&mut cache, "zzz"),
            Err(TransitionError::NotLoaded("zzz".to_string()))
        );
        assert!(!ctl.is_pending("zzz"));
        assert_eq!(ids(&cache).len(), 3);
    }
}

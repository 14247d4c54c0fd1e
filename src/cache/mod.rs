use crate::models::{Note, Notebook, NotebookSummary};

/// What a page has loaded from the server.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum Snapshot {
    List(Vec<NotebookSummary>),
    Notebook(Notebook),
}

/// In-memory copy of the server state a page is showing.
///
/// Contents only change wholesale (`replace`/`rollback`) or by the optimistic
/// row removal used for deletes; nested notes are never edited in place.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct EntityCache {
    current: Option<Snapshot>,
    /// Bumped on every `replace`, so late rollbacks can tell a newer fetch landed.
    generation: u64,
}

impl EntityCache {
    pub fn replace(&mut self, snapshot: Snapshot) {
        self.current = Some(snapshot);
        self.generation = self.generation.wrapping_add(1);
    }

    pub fn rollback(&mut self, previous: Snapshot) {
        self.current = Some(previous);
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn snapshot(&self) -> Option<Snapshot> {
        self.current.clone()
    }

    pub fn notebooks(&self) -> &[NotebookSummary] {
        match &self.current {
            Some(Snapshot::List(list)) => list,
            _ => &[],
        }
    }

    pub fn notebook(&self) -> Option<&Notebook> {
        match &self.current {
            Some(Snapshot::Notebook(nb)) => Some(nb),
            _ => None,
        }
    }

    pub fn note(&self, note_id: &str) -> Option<&Note> {
        self.notebook().and_then(|nb| nb.note(note_id))
    }

    /// Removes a row locally: a notebook from the list, or a note from the
    /// loaded notebook. Returns the index it occupied.
    pub fn remove_from_list(&mut self, id: &str) -> Option<usize> {
        match self.current.as_mut()? {
            Snapshot::List(list) => {
                let idx = list.iter().position(|n| n.id == id)?;
                list.remove(idx);
                Some(idx)
            }
            Snapshot::Notebook(nb) => {
                let idx = nb.notes.iter().position(|n| n.id == id)?;
                nb.notes.remove(idx);
                Some(idx)
            }
        }
    }

    /// True when the loaded snapshot has nothing to list.
    pub fn is_empty(&self) -> bool {
        match &self.current {
            Some(Snapshot::List(list)) => list.is_empty(),
            Some(Snapshot::Notebook(nb)) => nb.notes.is_empty(),
            None => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::memory::{note, notebook};

    fn list(ids: &[&str]) -> Snapshot {
        Snapshot::List(
            ids.iter()
                .map(|id| notebook(id, &format!("Notebook {id}"), vec![]).summary())
                .collect(),
        )
    }

    #[test]
    fn test_replace_bumps_generation() {
        let mut c = EntityCache::default();
        assert!(c.snapshot().is_none());
        c.replace(list(&["a"]));
        c.replace(list(&["a", "b"]));
        assert_eq!(c.generation(), 2);
        assert_eq!(c.notebooks().len(), 2);
        assert!(c.notebook().is_none());
    }

    #[test]
    fn test_remove_from_list_and_rollback_restores_position() {
        let mut c = EntityCache::default();
        c.replace(list(&["a", "b", "c"]));
        let before = c.snapshot().expect("loaded");

        assert_eq!(c.remove_from_list("b"), Some(1));
        let ids: Vec<_> = c.notebooks().iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, ["a", "c"]);

        c.rollback(before.clone());
        assert_eq!(c.snapshot(), Some(before));
        // Rollback is not a fetch.
        assert_eq!(c.generation(), 1);
    }

    #[test]
    fn test_remove_note_from_loaded_notebook() {
        let mut c = EntityCache::default();
        c.replace(Snapshot::Notebook(notebook(
            "nb",
            "NB",
            vec![note("n1", "a", "", &[]), note("n2", "b", "", &[])],
        )));
        assert_eq!(c.remove_from_list("n2"), Some(1));
        assert!(c.note("n2").is_none());
        assert!(c.note("n1").is_some());
        assert_eq!(c.remove_from_list("missing"), None);
    }

    #[test]
    fn test_is_empty_for_each_variant() {
        let mut c = EntityCache::default();
        assert!(c.is_empty());
        c.replace(Snapshot::Notebook(notebook("nb", "NB", vec![])));
        assert!(c.is_empty());
        c.replace(list(&["a"]));
        assert!(!c.is_empty());
    }
}

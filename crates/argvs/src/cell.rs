use crate::store::ArgStore;

/// Get-or-create holder for a single [`ArgStore`].
///
/// Owned by whichever call site wants one shared store (usually `main`)
/// and handed down explicitly; there is no global instance.
#[derive(Debug, Default)]
pub struct StoreCell {
    store: Option<ArgStore>,
}

impl StoreCell {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the held store, creating it on first access.
    ///
    /// Supplying both `tokens` and `expected` resets and reparses the store,
    /// whether or not it existed already. With either one missing, an
    /// existing store is returned untouched and a new one starts empty with
    /// default options; `strip_leading_dashes` only applies when parsing.
    pub fn get_instance(
        &mut self,
        tokens: Option<&[String]>,
        expected: Option<usize>,
        strip_leading_dashes: bool,
    ) -> &mut ArgStore {
        match (tokens, expected) {
            (Some(tokens), Some(expected)) => {
                let store = self.store.get_or_insert_with(ArgStore::default);
                store.reset(tokens, Some(expected), strip_leading_dashes);
                store
            }
            _ => self.store.get_or_insert_with(ArgStore::default),
        }
    }

    pub fn get(&self) -> Option<&ArgStore> {
        self.store.as_ref()
    }

    pub fn take(&mut self) -> Option<ArgStore> {
        self.store.take()
    }
}

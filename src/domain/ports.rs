/// Keyed storage capability the repository is built on.
///
/// Implementations only store values; every cross-table invariant and all
/// locking live in the repository above. `list` must return entries in a
/// stable order.
pub trait Table<V>: Send + Sync + 'static {
    fn get(&self, key: &str) -> Option<&V>;
    fn get_mut(&mut self, key: &str) -> Option<&mut V>;
    /// Inserts or overwrites, returning the previous value.
    fn set(&mut self, key: &str, value: V) -> Option<V>;
    fn list(&self) -> Vec<(&str, &V)>;

    fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }
}

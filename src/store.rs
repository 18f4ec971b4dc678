use std::{
    collections::BTreeMap,
    sync::{Mutex, MutexGuard, PoisonError},
};

use crate::models::Movie;

const FIRST_ID: i64 = 1;

/// In-memory movie collection. The map and the id sequence share one lock so
/// id assignment and insertion happen as a single step.
#[derive(Debug)]
pub struct MovieStore {
    inner: Mutex<Inner>,
}

#[derive(Debug)]
struct Inner {
    movies: BTreeMap<i64, Movie>,
    next_id: i64,
}

impl MovieStore {
    pub fn new() -> Self {
        Self { inner: Mutex::new(Inner { movies: BTreeMap::new(), next_id: FIRST_ID }) }
    }

    pub fn add(&self, title: &str, year: i32) -> Movie {
        let mut inner = self.lock();
        let id = inner.next_id;
        inner.next_id += 1;

        let movie = Movie { id, title: title.to_string(), year };
        inner.movies.insert(id, movie.clone());
        movie
    }

    pub fn get_all(&self) -> Vec<Movie> {
        self.lock().movies.values().cloned().collect()
    }

    pub fn get_by_id(&self, id: i64) -> Option<Movie> {
        self.lock().movies.get(&id).cloned()
    }

    pub fn get_by_year(&self, year: i32) -> Vec<Movie> {
        self.lock().movies.values().filter(|m| m.year == year).cloned().collect()
    }

    /// Removes the movie if present. Unknown ids are a no-op and yield `None`.
    pub fn delete_by_id(&self, id: i64) -> Option<Movie> {
        self.lock().movies.remove(&id)
    }

    /// Drops every record and restarts the id sequence.
    #[cfg_attr(not(test), allow(dead_code))]
    pub fn clear(&self) {
        let mut inner = self.lock();
        inner.movies.clear();
        inner.next_id = FIRST_ID;
    }

    // Every critical section leaves `Inner` consistent, so a poisoned lock is
    // still safe to reuse.
    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use std::{sync::Arc, thread};

    use super::*;

    #[test]
    fn ids_start_at_one_and_increase() {
        let store = MovieStore::new();
        let a = store.add("Alien", 1979);
        let b = store.add("Aliens", 1986);
        let c = store.add("Alien 3", 1992);
        assert_eq!((a.id, b.id, c.id), (1, 2, 3));
    }

    #[test]
    fn ids_are_not_reused_after_delete() {
        let store = MovieStore::new();
        store.add("Heat", 1995);
        let second = store.add("Ronin", 1998);
        store.delete_by_id(second.id);

        let third = store.add("Collateral", 2004);
        assert_eq!(third.id, 3);
    }

    #[test]
    fn lookup_by_id() {
        let store = MovieStore::new();
        let movie = store.add("Solaris", 1972);
        assert_eq!(store.get_by_id(movie.id), Some(movie));
        assert_eq!(store.get_by_id(42), None);
    }

    #[test]
    fn filter_by_year_returns_empty_when_nothing_matches() {
        let store = MovieStore::new();
        store.add("Stalker", 1979);
        store.add("Alien", 1979);
        store.add("Mirror", 1975);

        let titles: Vec<_> = store.get_by_year(1979).into_iter().map(|m| m.title).collect();
        assert_eq!(titles, ["Stalker", "Alien"]);
        assert!(store.get_by_year(2001).is_empty());
    }

    #[test]
    fn delete_is_a_noop_for_unknown_ids() {
        let store = MovieStore::new();
        let movie = store.add("Tenet", 2020);

        assert_eq!(store.delete_by_id(movie.id), Some(movie.clone()));
        assert_eq!(store.delete_by_id(movie.id), None);
        assert!(store.get_all().is_empty());
    }

    #[test]
    fn clear_resets_sequence() {
        let store = MovieStore::new();
        store.add("Up", 2009);
        store.add("Coco", 2017);
        store.clear();

        assert!(store.get_all().is_empty());
        assert_eq!(store.add("Soul", 2020).id, 1);
    }

    #[test]
    fn concurrent_adds_get_unique_ids() {
        let store = Arc::new(MovieStore::new());
        let handles: Vec<_> = (0..8)
            .map(|t| {
                let store = Arc::clone(&store);
                thread::spawn(move || {
                    (0..50).map(|i| store.add(&format!("movie {t}-{i}"), 2000).id).collect::<Vec<_>>()
                })
            })
            .collect();

        let mut ids: Vec<i64> = handles.into_iter().flat_map(|h| h.join().unwrap()).collect();
        ids.sort_unstable();
        assert_eq!(ids, (1..=400).collect::<Vec<_>>());
    }
}

use nudge_domain::{Entity, ID};
use std::sync::Mutex;

/// Useful functions for creating inmemory repositories

pub fn insert<T: Clone>(val: &T, collection: &Mutex<Vec<T>>) {
    let mut collection = collection.lock().unwrap();
    collection.push(val.clone());
}

pub fn save<T: Clone + Entity>(val: &T, collection: &Mutex<Vec<T>>) {
    let mut collection = collection.lock().unwrap();
    for item in collection.iter_mut() {
        if item.id() == val.id() {
            *item = val.clone();
        }
    }
}

pub fn find<T: Clone + Entity>(val_id: &ID, collection: &Mutex<Vec<T>>) -> Option<T> {
    let collection = collection.lock().unwrap();
    collection.iter().find(|item| item.id() == val_id).cloned()
}

pub fn find_by<T: Clone, F: FnMut(&T) -> bool>(
    collection: &Mutex<Vec<T>>,
    mut compare: F,
) -> Vec<T> {
    let collection = collection.lock().unwrap();
    let mut items = Vec::new();
    for item in collection.iter() {
        if compare(item) {
            items.push(item.clone());
        }
    }
    items
}

pub fn find_one_by<T: Clone, F: FnMut(&T) -> bool>(
    collection: &Mutex<Vec<T>>,
    mut compare: F,
) -> Option<T> {
    let collection = collection.lock().unwrap();
    collection.iter().find(|item| compare(item)).cloned()
}

/// Replaces the first value matched by `compare`, or inserts when there is
/// no match. This is the in-memory equivalent of an upsert with a
/// composite conflict target.
pub fn upsert_by<T: Clone, F: Fn(&T) -> bool>(
    val: &T,
    collection: &Mutex<Vec<T>>,
    compare: F,
) {
    let mut collection = collection.lock().unwrap();
    for item in collection.iter_mut() {
        if compare(item) {
            *item = val.clone();
            return;
        }
    }
    collection.push(val.clone());
}

pub fn find_and_delete_by<T: Clone, F: Fn(&T) -> bool>(
    collection: &Mutex<Vec<T>>,
    compare: F,
) -> Vec<T> {
    let mut collection = collection.lock().unwrap();
    let mut deleted_items = Vec::new();

    for i in (0..collection.len()).rev() {
        if compare(&collection[i]) {
            deleted_items.push(collection.remove(i));
        }
    }

    deleted_items
}

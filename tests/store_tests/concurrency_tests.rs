//! Concurrency tests for FileStore
//!
//! These tests verify:
//! - Concurrent inserts get unique, gap-free ids and each lands exactly once
//! - Concurrent updates and deletes never hit the wrong line
//! - Readers running alongside writers never see an error

#[path = "../common/mod.rs"]
mod common;

use std::collections::HashSet;
use std::sync::Arc;
use std::thread;

use common::{invoice, temp_file_path};
use invoicestore::{FileStore, InvoiceStorage};
use tempfile::TempDir;

// =============================================================================
// Helper Functions
// =============================================================================

fn setup_shared_store() -> (TempDir, Arc<FileStore>) {
    let (temp_dir, path) = temp_file_path();
    let store = Arc::new(FileStore::open_path(&path).unwrap());
    (temp_dir, store)
}

// =============================================================================
// Writer Tests
// =============================================================================

#[test]
fn test_concurrent_inserts_get_unique_ids() {
    let (_temp, store) = setup_shared_store();
    let threads = 8;
    let per_thread = 25;

    let handles: Vec<_> = (0..threads)
        .map(|t| {
            let store = Arc::clone(&store);
            thread::spawn(move || {
                (0..per_thread)
                    .map(|n| {
                        store
                            .save(invoice(&format!("T{}-{}", t, n)))
                            .unwrap()
                            .id
                            .unwrap()
                    })
                    .collect::<Vec<u64>>()
            })
        })
        .collect();

    let mut ids = HashSet::new();
    for handle in handles {
        let thread_ids = handle.join().unwrap();
        // Ids seen by one thread are strictly increasing
        assert!(thread_ids.windows(2).all(|w| w[0] < w[1]));
        for id in thread_ids {
            assert!(ids.insert(id), "duplicate id {}", id);
        }
    }

    let total = (threads * per_thread) as u64;
    assert_eq!(ids.len() as u64, total);
    assert_eq!(ids.iter().copied().max(), Some(total));
    assert_eq!(store.count().unwrap(), total);
    assert_eq!(store.skipped_lines(), 0);
}

#[test]
fn test_concurrent_updates_and_deletes_hit_right_records() {
    let (_temp, store) = setup_shared_store();
    for n in 0..40 {
        store.save(invoice(&format!("N{}", n))).unwrap();
    }

    // Even ids get updated, odd ids get deleted, from different threads
    let updater = {
        let store = Arc::clone(&store);
        thread::spawn(move || {
            for id in (2..=40).step_by(2) {
                let mut current = store.get_by_id(id).unwrap().unwrap();
                current.number = format!("U{}", id);
                store.save(current).unwrap();
            }
        })
    };
    let deleter = {
        let store = Arc::clone(&store);
        thread::spawn(move || {
            for id in (1..=39).step_by(2) {
                store.delete(id).unwrap();
            }
        })
    };

    updater.join().unwrap();
    deleter.join().unwrap();

    let remaining = store.get_all().unwrap();
    assert_eq!(remaining.len(), 20);
    for inv in remaining {
        let id = inv.id.unwrap();
        assert_eq!(id % 2, 0);
        assert_eq!(inv.number, format!("U{}", id));
    }
}

// =============================================================================
// Reader/Writer Tests
// =============================================================================

#[test]
fn test_readers_alongside_writers_never_error() {
    let (_temp, store) = setup_shared_store();
    for n in 0..10 {
        store.save(invoice(&format!("Seed{}", n))).unwrap();
    }

    let writer = {
        let store = Arc::clone(&store);
        thread::spawn(move || {
            for n in 0..50 {
                let saved = store.save(invoice(&format!("W{}", n))).unwrap();
                if n % 3 == 0 {
                    store.delete(saved.id.unwrap()).unwrap();
                }
            }
        })
    };

    let readers: Vec<_> = (0..4)
        .map(|_| {
            let store = Arc::clone(&store);
            thread::spawn(move || {
                for _ in 0..50 {
                    store.get_all().unwrap();
                    store.count().unwrap();
                    assert!(store.exists(1).unwrap());
                }
            })
        })
        .collect();

    writer.join().unwrap();
    for reader in readers {
        reader.join().unwrap();
    }

    // 10 seeds + 50 writes - 17 deletes (n = 0, 3, ..., 48)
    assert_eq!(store.count().unwrap(), 43);
}

//! Property test: any sequence of create/update/delete operations leaves the
//! per-user index and the item records consistent — every indexed id has a
//! live record owned by the user, every record appears in the index exactly
//! once, and insertion order is preserved.

use proptest::prelude::*;
use std::sync::Arc;

use tally_core::item::{NewTodo, TodoPatch};
use tally_core::keys;
use tally_store::kv::get_json;
use tally_store::{KvStore, MemoryKv, TodoStore};

#[derive(Debug, Clone)]
enum Op {
    Create(String),
    Toggle(usize),
    Delete(usize),
}

fn arb_op() -> impl Strategy<Value = Op> {
    prop_oneof![
        "[a-z]{1,12}".prop_map(Op::Create),
        any::<usize>().prop_map(Op::Toggle),
        any::<usize>().prop_map(Op::Delete),
    ]
}

async fn check_invariant(kv: &MemoryKv, user: &str, live: &[String]) {
    let index: Vec<String> = get_json(kv, &keys::index_key(user))
        .await
        .expect("index readable")
        .unwrap_or_default();

    // The index mirrors the live ids, in insertion order, without duplicates.
    assert_eq!(index, live, "index diverged from live items");

    // The item namespace holds exactly the indexed records.
    let item_keys = kv
        .keys(&keys::item_prefix(user))
        .await
        .expect("keys readable");
    let mut stored: Vec<String> = item_keys
        .iter()
        .filter_map(|key| keys::item_id_from_key(user, key))
        .map(str::to_string)
        .collect();
    stored.sort();
    let mut indexed = index.clone();
    indexed.sort();
    assert_eq!(stored, indexed, "item records diverged from index");
}

proptest! {
    #![proptest_config(proptest::test_runner::Config::with_cases(64))]

    #[test]
    fn index_and_items_stay_consistent(ops in proptest::collection::vec(arb_op(), 1..24)) {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .expect("runtime");
        rt.block_on(async move {
            let kv = Arc::new(MemoryKv::new());
            let todos = TodoStore::new(kv.clone());
            let user = "alice";
            let mut live: Vec<String> = Vec::new();

            for op in ops {
                match op {
                    Op::Create(title) => {
                        let todo = todos
                            .create(user, NewTodo::titled(title))
                            .await
                            .expect("create");
                        live.push(todo.id);
                    }
                    Op::Toggle(n) if !live.is_empty() => {
                        let id = live[n % live.len()].clone();
                        todos
                            .update(user, &id, TodoPatch::completed(true))
                            .await
                            .expect("update");
                    }
                    Op::Delete(n) if !live.is_empty() => {
                        let id = live.remove(n % live.len());
                        todos.delete(user, &id).await.expect("delete");
                    }
                    // Toggle/Delete against an empty collection: nothing to do.
                    Op::Toggle(_) | Op::Delete(_) => {}
                }

                check_invariant(&kv, user, &live).await;
            }

            // rebuild_index over a consistent store is a no-op on the ids
            // apart from re-deriving creation order.
            let mut rebuilt = todos.rebuild_index(user).await.expect("rebuild");
            rebuilt.sort();
            let mut expected = live.clone();
            expected.sort();
            assert_eq!(rebuilt, expected);
        });
    }
}

//! # Integration Test Flows
//!
//! Tests that the model, store, Hub session and reconciler work together
//! over a bootstrapped session.
//!
//! ## Flows Tested:
//!
//! 1. **Model → Store → Hub**: optimistic edits become signed commits
//! 2. **Hub → Reconciler → Model**: commit logs fold back into items
//! 3. **Multiple devices**: last writer wins in server order
//! 4. **Paging**: request counts and aborts across page boundaries

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use parking_lot::Mutex;

    use hub_todo_sync::domain::{invariant_unique_object_ids, ItemOperation};
    use hub_todo_sync::{
        HubError, HubRequest, InMemoryHub, ItemState, Operation, TodoItem, TodoModel,
        TodoStoreApi,
    };

    use crate::integration::World;

    // =============================================================================
    // TEST FIXTURES
    // =============================================================================

    /// Operations of every commit written to the Hub, in order.
    fn written_operations(world: &World) -> Vec<Operation> {
        world
            .hub
            .requests()
            .into_iter()
            .filter_map(|request| match request {
                HubRequest::Write { commit } => Some(commit.decode().unwrap().operation()),
                _ => None,
            })
            .collect()
    }

    /// Requests sent after bootstrap (the probe is request #0).
    fn requests_after_probe(world: &World, kind: &str) -> usize {
        let probe = usize::from(kind == "object-query");
        world.hub.request_count(kind) - probe
    }

    // =============================================================================
    // INTEGRATION TESTS: MODEL → STORE → HUB
    // =============================================================================

    /// "buy milk": create, toggle and delete, each visible to a fresh read.
    #[tokio::test]
    async fn test_buy_milk_lifecycle() {
        let world = World::new();
        let store = world.device().await.unwrap();
        let model = TodoModel::new(store.clone());
        model.load().await.unwrap();
        assert!(model.todos().is_empty());

        let local_id = model.add_todo("buy milk").await.unwrap();
        let object_id = model.get(local_id).unwrap().object_id;
        assert_eq!(
            store.fetch_todos().await.unwrap(),
            vec![TodoItem::settled(object_id.clone(), "buy milk", false)]
        );

        model.toggle_todo(local_id).await.unwrap();
        assert_eq!(
            store.fetch_todos().await.unwrap(),
            vec![TodoItem::settled(object_id, "buy milk", true)]
        );

        model.delete_todo(local_id).await.unwrap();
        assert!(store.fetch_todos().await.unwrap().is_empty());
        assert!(model.todos().is_empty());

        assert_eq!(
            written_operations(&world),
            vec![Operation::Create, Operation::Update, Operation::Delete]
        );
    }

    /// Listeners see the pending item before the Hub acknowledges it.
    #[tokio::test]
    async fn test_listeners_see_optimistic_state() {
        let world = World::new();
        let model = TodoModel::new(world.device().await.unwrap());
        model.load().await.unwrap();

        let seen: Arc<Mutex<Vec<Vec<TodoItem>>>> = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let subscription = model.subscribe(move |items| sink.lock().push(items.to_vec()));

        model.add_todo("buy milk").await.unwrap();
        subscription.unsubscribe();

        let seen = seen.lock();
        assert_eq!(seen.len(), 2);
        assert!(seen[0][0].updating);
        assert!(seen[0][0].object_id.is_empty());
        assert!(!seen[1][0].updating);
        assert!(!seen[1][0].object_id.is_empty());
    }

    /// A Hub outage during a toggle reverts the item; retry applies it.
    #[tokio::test]
    async fn test_toggle_outage_and_retry() {
        let world = World::new();
        let store = world.device().await.unwrap();
        let model = TodoModel::new(store.clone());
        let local_id = model.add_todo("buy milk").await.unwrap();

        world.hub.set_offline(true);
        let err = model.toggle_todo(local_id).await.unwrap_err();
        assert!(err.is_retryable());

        let item = model.get(local_id).unwrap();
        assert!(!item.done);
        assert!(matches!(
            item.state,
            ItemState::Failed { operation: ItemOperation::Update, .. }
        ));

        world.hub.set_offline(false);
        model.retry(local_id).await.unwrap();
        assert!(store.fetch_todos().await.unwrap()[0].done);
    }

    /// Blank text never reaches the Hub.
    #[tokio::test]
    async fn test_blank_text_is_local_error() {
        let world = World::new();
        let model = TodoModel::new(world.device().await.unwrap());

        assert_eq!(model.add_todo("").await, Err(HubError::EmptyTodoText));
        assert_eq!(world.hub.request_count("write"), 0);
    }

    // =============================================================================
    // INTEGRATION TESTS: MULTIPLE DEVICES
    // =============================================================================

    /// Two devices editing the same item: the later commit wins on reload.
    #[tokio::test]
    async fn test_two_devices_last_writer_wins() {
        let world = World::new();
        let phone = TodoModel::new(world.device().await.unwrap());
        let laptop_store = world.device().await.unwrap();

        let local_id = phone.add_todo("buy milk").await.unwrap();
        let object_id = phone.get(local_id).unwrap().object_id;

        laptop_store.update_todo(&object_id, "buy oat milk", true).await.unwrap();

        phone.load().await.unwrap();
        let todos = phone.todos();
        assert_eq!(todos.len(), 1);
        assert_eq!(todos[0].text, "buy oat milk");
        assert!(todos[0].done);
    }

    /// Concurrent adds from two devices produce distinct objects.
    #[tokio::test]
    async fn test_concurrent_devices_distinct_objects() {
        let world = World::new();
        let a = TodoModel::new(world.device().await.unwrap());
        let b = TodoModel::new(world.device().await.unwrap());

        let (first, second) = futures::join!(a.add_todo("eggs"), b.add_todo("bread"));
        first.unwrap();
        second.unwrap();

        a.load().await.unwrap();
        let todos = a.todos();
        assert_eq!(todos.len(), 2);
        assert!(invariant_unique_object_ids(&todos));
    }

    // =============================================================================
    // INTEGRATION TESTS: READ PATH
    // =============================================================================

    /// An empty collection costs one object query and no commit query.
    #[tokio::test]
    async fn test_empty_collection_sends_no_commit_query() {
        let world = World::new();
        let store = world.device().await.unwrap();

        assert!(store.fetch_todos().await.unwrap().is_empty());
        assert_eq!(requests_after_probe(&world, "object-query"), 1);
        assert_eq!(requests_after_probe(&world, "commit-query"), 0);
    }

    /// N pages of objects and M pages of commits cost exactly N + M requests.
    #[tokio::test]
    async fn test_request_count_matches_page_count() {
        let world = World::with_hub(InMemoryHub::new(
            crate::integration::HUB_DID,
            crate::integration::HUB_ENDPOINT,
        )
        .with_page_size(3));
        let store = world.device().await.unwrap();
        for n in 0..7 {
            store.create_todo(&format!("item {n}")).await.unwrap();
        }

        let todos = store.fetch_todos().await.unwrap();

        assert_eq!(todos.len(), 7);
        // 7 objects and 7 commits at 3 per page.
        assert_eq!(requests_after_probe(&world, "object-query"), 3);
        assert_eq!(requests_after_probe(&world, "commit-query"), 3);
    }

    /// A failing page aborts the whole read and the model keeps its list.
    #[tokio::test]
    async fn test_page_failure_keeps_model_list() {
        let world = World::with_hub(InMemoryHub::new(
            crate::integration::HUB_DID,
            crate::integration::HUB_ENDPOINT,
        )
        .with_page_size(1));
        let store = world.device().await.unwrap();
        let model = TodoModel::new(store.clone());
        model.add_todo("a").await.unwrap();
        model.add_todo("b").await.unwrap();
        let before = model.todos();

        // Probe, two writes, then the second object page of the reload.
        world.hub.fail_request_at(4);

        assert!(model.load().await.is_err());
        assert_eq!(model.todos(), before);
        assert!(!model.is_loading());
    }

    /// Reading twice without writes yields the same list.
    #[tokio::test]
    async fn test_fetch_is_idempotent() {
        let world = World::new();
        let store = world.device().await.unwrap();
        store.create_todo("a").await.unwrap();
        let id = store.create_todo("b").await.unwrap();
        store.update_todo(&id, "b", true).await.unwrap();

        let first = store.fetch_todos().await.unwrap();
        let second = store.fetch_todos().await.unwrap();
        assert_eq!(first, second);
        assert_eq!(world.hub.commit_count(), 3);
    }
}

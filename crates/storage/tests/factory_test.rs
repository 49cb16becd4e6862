use cinegraph_core::config::StorageConfig;
use cinegraph_storage::{
    create_and_initialize_graph_store, create_graph_store, GraphStore, UserStore,
};

#[tokio::test]
async fn test_factory_with_mock_provider() {
    let config = StorageConfig {
        provider: "mock".to_string(),
        ..Default::default()
    };

    let store = create_graph_store(&config).await.unwrap();

    // Mock store should always initialize
    assert!(store.initialize().await.is_ok());
    assert!(store
        .find_user_by_email("nobody@example.com")
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn test_factory_rejects_unknown_provider() {
    let config = StorageConfig {
        provider: "sqlite".to_string(),
        ..Default::default()
    };

    let result = create_graph_store(&config).await;
    assert!(result.is_err());
    assert!(result
        .err()
        .unwrap()
        .to_string()
        .contains("Unknown storage provider"));
}

#[tokio::test]
async fn test_factory_returns_shared_trait_object() {
    let config = StorageConfig {
        provider: "mock".to_string(),
        ..Default::default()
    };

    let store = create_and_initialize_graph_store(&config).await.unwrap();
    let clone = std::sync::Arc::clone(&store);

    let user = store.create_user("a@example.com", "hash", "A").await.unwrap();
    let found = clone
        .find_user_by_email("a@example.com")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(found.user_id, user.user_id);
}

// ==========================================
// Concurrent import tests
// ==========================================
// Target: two imports into the same table on separate connections
//         receive disjoint identifier blocks
// ==========================================


use asset_import::domain::AssetCategory;
use asset_import::importer::AssetImporter;
use asset_import::logging;
use asset_import::repository::{AssetStore, SqliteAssetStore};
use std::collections::HashSet;
use std::sync::Arc;
use test_helpers::*;

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_concurrent_imports_get_disjoint_ids() {
    logging::init_test();
    let (_temp_file, db_path) = create_test_db().expect("Failed to create test db");

    let importer_a = Arc::new(create_test_importer(&db_path));
    let importer_b = Arc::new(create_test_importer(&db_path));

    let rows_a: Vec<Vec<&str>> = (0..5).map(|_| vec!["Andamio"]).collect();
    let rows_b: Vec<Vec<&str>> = (0..5).map(|_| vec!["Hormigonera"]).collect();
    let bytes_a = workbook_bytes(&["Nombre"], &rows_a);
    let bytes_b = workbook_bytes(&["Nombre"], &rows_b);

    let task_a = {
        let importer = importer_a.clone();
        tokio::spawn(async move {
            importer
                .import_bytes(AssetCategory::Machinery, &bytes_a)
                .await
        })
    };
    let task_b = {
        let importer = importer_b.clone();
        tokio::spawn(async move {
            importer
                .import_bytes(AssetCategory::Machinery, &bytes_b)
                .await
        })
    };

    let outcome_a = task_a.await.unwrap().expect("import A should succeed");
    let outcome_b = task_b.await.unwrap().expect("import B should succeed");
    assert_eq!(outcome_a.inserted + outcome_b.inserted, 10);

    let ids = internal_ids(&db_path, "machinery");
    let unique: HashSet<&String> = ids.iter().collect();
    assert_eq!(ids.len(), 10);
    assert_eq!(unique.len(), 10);

    let mut sorted = ids.clone();
    sorted.sort();
    let expected: Vec<String> = (1..=10).map(|n| format!("MAQ-{:03}", n)).collect();
    assert_eq!(sorted, expected);
}

#[tokio::test]
async fn test_reservations_on_two_connections_do_not_overlap() {
    let (_temp_file, db_path) = create_test_db().expect("Failed to create test db");
    let store_a = SqliteAssetStore::new(&db_path).unwrap();
    let store_b = SqliteAssetStore::new(&db_path).unwrap();

    let a = store_a.reserve_sequence("vehicles", "ROD", 3, 0).await.unwrap();
    let b = store_b.reserve_sequence("vehicles", "ROD", 2, 0).await.unwrap();
    let c = store_a.reserve_sequence("vehicles", "ROD", 1, 0).await.unwrap();

    assert_eq!(a, 0); // ROD-001..003
    assert_eq!(b, 3); // ROD-004..005
    assert_eq!(c, 5); // ROD-006
}

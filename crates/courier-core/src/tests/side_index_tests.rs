use super::{temp_path, ADDR_A, ADDR_B};
use crate::ids::{ConversationId, WalletAddress};
use crate::side_index::AddressSideIndex;
use courier_storage::LocalStore;
use std::sync::Arc;
use tokio::sync::Mutex;

fn open_index(path: &str) -> AddressSideIndex {
    let store = LocalStore::open_or_create(path, "test").expect("store");
    AddressSideIndex::new(Arc::new(Mutex::new(store)))
}

fn addr(value: &str) -> WalletAddress {
    WalletAddress::parse(value).expect("address")
}

#[tokio::test]
async fn entries_survive_a_store_reopen() {
    let path = temp_path("index-reopen");
    let conv = ConversationId::new("conv-1");
    {
        let index = open_index(&path);
        index.set(&conv, &addr(ADDR_A)).await.unwrap();
    }
    let index = open_index(&path);
    assert_eq!(index.get(&conv).await.as_deref(), Some(ADDR_A));
}

#[tokio::test]
async fn set_stores_lowercased_addresses() {
    let index = open_index(&temp_path("index-lower"));
    let conv = ConversationId::new("conv-1");
    index
        .set(&conv, &addr("0x00000000000000000000000000000000000000AA"))
        .await
        .unwrap();
    assert_eq!(index.get(&conv).await.as_deref(), Some(ADDR_A));
}

#[tokio::test]
async fn set_overwrites_existing_entry() {
    let index = open_index(&temp_path("index-overwrite"));
    let conv = ConversationId::new("conv-1");
    index.set(&conv, &addr(ADDR_A)).await.unwrap();
    index.set(&conv, &addr(ADDR_B)).await.unwrap();
    assert_eq!(index.get(&conv).await.as_deref(), Some(ADDR_B));
    assert_eq!(index.all().await.len(), 1);
}

#[tokio::test]
async fn clear_removes_every_entry() {
    let index = open_index(&temp_path("index-clear"));
    index
        .set(&ConversationId::new("conv-1"), &addr(ADDR_A))
        .await
        .unwrap();
    index
        .set(&ConversationId::new("conv-2"), &addr(ADDR_B))
        .await
        .unwrap();
    assert_eq!(index.all().await.len(), 2);
    index.clear().await.unwrap();
    assert!(index.all().await.is_empty());
    assert!(index.get(&ConversationId::new("conv-1")).await.is_none());
}

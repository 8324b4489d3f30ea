//! Tests for the folder and rating-list services.

use std::sync::Arc;

use chrono::{TimeZone, Utc};
use rstest::{fixture, rstest};

use super::*;
use crate::domain::ErrorCode;
use crate::outbound::persistence::InMemoryDocumentStore;
use crate::test_support::SteppingClock;

fn clock() -> Arc<SteppingClock> {
    let start = Utc
        .with_ymd_and_hms(2024, 5, 6, 7, 0, 0)
        .single()
        .expect("valid timestamp");
    Arc::new(SteppingClock::new(start))
}

#[fixture]
fn folders() -> FolderService {
    FolderService::new(Arc::new(InMemoryDocumentStore::new(clock())))
}

#[fixture]
fn owner() -> DocId {
    DocId::random()
}

#[rstest]
#[tokio::test]
async fn add_then_remove_updates_contents(folders: FolderService, owner: DocId) {
    let (b1, b2) = (DocId::random(), DocId::random());
    let created = folders
        .add_new_folder(owner, "toread")
        .await
        .expect("create");
    assert_eq!(created.msg, "Folder successfully created!");
    assert!(created.folder.fields.items.is_empty());

    let msg = folders
        .add_to_folder(owner, "toread", &[b1, b2])
        .await
        .expect("add");
    assert_eq!(msg.msg, "Added item to folder!");
    let contents = folders
        .get_user_folder_contents(owner, "toread")
        .await
        .expect("contents");
    assert_eq!(contents.as_slice(), &[b1, b2]);

    folders
        .remove_from_folder(owner, "toread", &[b1])
        .await
        .expect("remove");
    let contents = folders
        .get_user_folder_contents(owner, "toread")
        .await
        .expect("contents");
    assert_eq!(contents.as_slice(), &[b2]);
}

#[rstest]
#[tokio::test]
async fn add_then_remove_round_trips(folders: FolderService, owner: DocId) {
    let original = [DocId::random(), DocId::random()];
    let added = [DocId::random(), DocId::random(), DocId::random()];
    folders.add_new_folder(owner, "shelf").await.expect("create");
    folders
        .add_to_folder(owner, "shelf", &original)
        .await
        .expect("seed");

    folders
        .add_to_folder(owner, "shelf", &added)
        .await
        .expect("add");
    folders
        .remove_from_folder(owner, "shelf", &added)
        .await
        .expect("remove");

    let contents = folders
        .get_user_folder_contents(owner, "shelf")
        .await
        .expect("contents");
    assert_eq!(contents.as_slice(), &original);
}

#[rstest]
#[tokio::test]
async fn repeated_adds_do_not_duplicate(folders: FolderService, owner: DocId) {
    let book = DocId::random();
    folders.add_new_folder(owner, "fav").await.expect("create");
    for _ in 0..3 {
        folders
            .add_to_folder(owner, "fav", &[book, book])
            .await
            .expect("add");
    }
    let contents = folders
        .get_user_folder_contents(owner, "fav")
        .await
        .expect("contents");
    assert_eq!(contents.len(), 1);
}

#[rstest]
#[tokio::test]
async fn mutations_on_missing_folder_are_not_found(folders: FolderService, owner: DocId) {
    let err = folders
        .add_to_folder(owner, "nope", &[DocId::random()])
        .await
        .expect_err("missing");
    assert_eq!(err.code(), ErrorCode::NotFound);
    let err = folders
        .remove_from_folder(owner, "nope", &[])
        .await
        .expect_err("missing");
    assert_eq!(err.code(), ErrorCode::NotFound);
    let err = folders
        .delete_folder(owner, "nope")
        .await
        .expect_err("missing");
    assert_eq!(err.code(), ErrorCode::NotFound);
}

#[rstest]
#[tokio::test]
async fn folder_names_are_unique_per_owner(folders: FolderService, owner: DocId) {
    folders.add_new_folder(owner, "read").await.expect("create");
    let err = folders
        .add_new_folder(owner, " read ")
        .await
        .expect_err("duplicate");
    assert_eq!(err.code(), ErrorCode::AlreadyExists);

    folders
        .add_new_folder(DocId::random(), "read")
        .await
        .expect("other owner may reuse the name");
}

#[rstest]
#[tokio::test]
async fn blank_folder_name_is_invalid(folders: FolderService, owner: DocId) {
    let err = folders.add_new_folder(owner, "  ").await.expect_err("blank");
    assert_eq!(err.code(), ErrorCode::InvalidArgument);
}

#[rstest]
#[tokio::test]
async fn folders_list_most_recently_updated_first(folders: FolderService, owner: DocId) {
    folders.add_new_folder(owner, "a").await.expect("create");
    folders.add_new_folder(owner, "b").await.expect("create");
    folders
        .add_to_folder(owner, "a", &[DocId::random()])
        .await
        .expect("touch a");

    let names: Vec<String> = folders
        .get_folders(owner)
        .await
        .expect("list")
        .into_iter()
        .map(|folder| folder.fields.name)
        .collect();
    assert_eq!(names, ["a", "b"]);
}

#[rstest]
#[tokio::test]
async fn delete_folder_removes_it(folders: FolderService, owner: DocId) {
    folders.add_new_folder(owner, "gone").await.expect("create");
    let msg = folders.delete_folder(owner, "gone").await.expect("delete");
    assert_eq!(msg.msg, "Folder deleted!");
    assert!(folders.get_folders(owner).await.expect("list").is_empty());
}

#[rstest]
#[tokio::test]
async fn rating_lists_use_their_own_wording(owner: DocId) {
    let ratings = RatingService::new(Arc::new(InMemoryDocumentStore::new(clock())));
    let created = ratings
        .add_new_folder(owner, "5 stars")
        .await
        .expect("create");
    assert_eq!(created.msg, "Rating successfully created!");
    let msg = ratings
        .add_to_folder(owner, "5 stars", &[DocId::random()])
        .await
        .expect("add");
    assert_eq!(msg.msg, "Added item to rating!");
}

//! Concept services over snapshot-backed stores.
//!
//! Membership sets are read, modified and written back as whole fields, so
//! every mutation must survive a restart of the process.

use std::path::Path;
use std::sync::Arc;

use mockable::{Clock, DefaultClock};
use rstest::{fixture, rstest};
use shelfmates::domain::ports::DocumentStore;
use shelfmates::domain::{
    DocId, ErrorCode, FolderService, InvitationQuery, InvitationService, ProfileService, Shelf,
    UserService,
};
use shelfmates::outbound::persistence::FileDocumentStore;
use tempfile::TempDir;

fn store<D: shelfmates::domain::Document>(dir: &Path) -> Arc<dyn DocumentStore<D>> {
    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);
    Arc::new(FileDocumentStore::<D>::open(dir, clock).expect("open store"))
}

#[fixture]
fn data_dir() -> TempDir {
    TempDir::new().expect("temp dir")
}

#[rstest]
#[tokio::test]
async fn folder_items_survive_restart(data_dir: TempDir) {
    let owner = DocId::random();
    let (first, second) = (DocId::random(), DocId::random());
    {
        let folders = FolderService::new(store(data_dir.path()));
        folders
            .add_new_folder(owner, "favourites")
            .await
            .expect("folder created");
        folders
            .add_to_folder(owner, "favourites", &[first, second, first])
            .await
            .expect("items added");
        folders
            .remove_from_folder(owner, "favourites", &[second])
            .await
            .expect("item removed");
    }

    let folders = FolderService::new(store(data_dir.path()));
    let items = folders
        .get_user_folder_contents(owner, "favourites")
        .await
        .expect("contents load");
    assert_eq!(items.as_slice(), &[first]);
}

#[rstest]
#[tokio::test]
async fn accepted_invitation_survives_restart(data_dir: TempDir) {
    let (ada, grace, book) = (DocId::random(), DocId::random(), DocId::random());
    let invitation = {
        let invitations = InvitationService::new(store(data_dir.path()));
        let posted = invitations
            .post_invitation(ada, book, &[grace])
            .await
            .expect("invitation posted");
        invitations
            .accept_invitation(posted.invitation.id, grace)
            .await
            .expect("invitation accepted");
        posted.invitation.id
    };

    let invitations = InvitationService::new(store(data_dir.path()));
    let record = invitations
        .get_invitation_by_id(invitation)
        .await
        .expect("invitation loads");
    assert!(record.fields.users_pending.is_empty());
    assert!(record.fields.users_accepted.contains(&grace));
    assert!(
        invitations
            .get_invitations(InvitationQuery::ReceivedBy(grace))
            .await
            .expect("received list")
            .is_empty()
    );
}

#[rstest]
#[tokio::test]
async fn shelves_and_friends_survive_restart(data_dir: TempDir) {
    let (ada, grace, book) = (DocId::random(), DocId::random(), DocId::random());
    {
        let profiles = ProfileService::new(store(data_dir.path()));
        profiles
            .create_profile(ada, "Ada Lovelace")
            .await
            .expect("profile created");
        profiles
            .add_to_shelf(ada, Shelf::Reading, &[book])
            .await
            .expect("book shelved");
        profiles.add_friend(ada, grace).await.expect("friend added");
    }

    let profiles = ProfileService::new(store(data_dir.path()));
    let profile = profiles.get_profile(ada).await.expect("profile loads");
    assert!(profile.fields.books_reading.contains(&book));
    assert!(profile.fields.friends.contains(&grace));
}

#[rstest]
#[tokio::test]
async fn usernames_stay_unique_across_restart(data_dir: TempDir) {
    UserService::new(store(data_dir.path()))
        .create("ada", "pw")
        .await
        .expect("first sign-up");

    let users = UserService::new(store(data_dir.path()));
    let err = users
        .create("ada", "other")
        .await
        .expect_err("duplicate username rejected");
    assert_eq!(err.code(), ErrorCode::AlreadyExists);
    let public = users
        .authenticate("ada", "pw")
        .await
        .expect("original password still valid");
    assert_eq!(public.username, "ada");
}

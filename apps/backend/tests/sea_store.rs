mod common;

use quill_backend::errors::domain::{ConflictKind, DomainError, NotFoundKind};
use quill_backend::infra::db::connect_and_migrate;
use quill_backend::repos::posts::{NewPost, OwnershipStamp, PostChanges, PostStore};
use quill_backend::repos::users::{AccountChanges, NewAccount, UserStore};
use quill_backend::SeaStore;
use time::OffsetDateTime;
use uuid::Uuid;

async fn store() -> SeaStore {
    let conn = connect_and_migrate("sqlite::memory:")
        .await
        .expect("sqlite in-memory database");
    SeaStore::new(conn)
}

fn account(email: &str) -> NewAccount {
    NewAccount {
        email: email.to_string(),
        fullname: "Sea Writer".to_string(),
        password_hash: Some("$argon2id$v=19$stub".to_string()),
    }
}

fn stamp(id: Uuid) -> OwnershipStamp {
    OwnershipStamp {
        id,
        email: "sea@example.test".to_string(),
        fullname: "Sea Writer".to_string(),
        at: OffsetDateTime::now_utc().replace_nanosecond(0).unwrap(),
    }
}

#[tokio::test]
async fn users_round_trip_and_email_is_unique() {
    let store = store().await;
    let created = UserStore::create(&store, account("sea@example.test")).await.unwrap();

    let by_email = store.find_by_email("sea@example.test").await.unwrap().unwrap();
    assert_eq!(by_email.id, created.id);
    assert_eq!(by_email.password_hash, created.password_hash);

    let err = UserStore::create(&store, account("sea@example.test"))
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Conflict(ConflictKind::UniqueEmail, _)));

    let updated = UserStore::update(
        &store,
        created.id,
        AccountChanges {
            fullname: Some("Renamed".into()),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(updated.fullname, "Renamed");
    assert_eq!(updated.email, "sea@example.test");

    let missing = UserStore::update(&store, Uuid::new_v4(), AccountChanges::default())
        .await
        .unwrap_err();
    assert!(matches!(missing, DomainError::NotFound(NotFoundKind::User, _)));
}

#[tokio::test]
async fn posts_keep_category_order_and_soft_delete() {
    let store = store().await;
    let owner = UserStore::create(&store, account("owner@example.test")).await.unwrap();

    let post = PostStore::create(
        &store,
        NewPost {
            header: "Hello".into(),
            content: "World".into(),
            category: vec!["web".into(), "rust".into()],
            created_by: stamp(owner.id),
        },
    )
    .await
    .unwrap();
    assert_eq!(post.category, vec!["web".to_string(), "rust".to_string()]);

    let loaded = PostStore::find_by_id(&store, post.id).await.unwrap().unwrap();
    assert_eq!(loaded.category, post.category);
    assert_eq!(loaded.created_by.id, owner.id);
    assert!(loaded.updated_by.is_none());

    let edited = PostStore::update(
        &store,
        post.id,
        PostChanges {
            header: None,
            content: Some("Edited".into()),
            category: Some(vec!["rust".into()]),
            updated_by: stamp(owner.id),
        },
    )
    .await
    .unwrap();
    assert_eq!(edited.header, "Hello");
    assert_eq!(edited.content, "Edited");
    assert_eq!(edited.category, vec!["rust".to_string()]);
    assert_eq!(edited.updated_by.map(|s| s.id), Some(owner.id));

    assert_eq!(store.list_by_category("rust").await.unwrap().len(), 1);
    assert!(store.list_by_category("web").await.unwrap().is_empty());
    assert_eq!(store.list_by_owner(owner.id).await.unwrap().len(), 1);

    let deleted = store.soft_delete(post.id).await.unwrap();
    assert!(deleted.is_deleted);
    assert!(PostStore::find_by_id(&store, post.id).await.unwrap().is_none());
    assert!(store.list().await.unwrap().is_empty());
    assert!(matches!(
        store.soft_delete(post.id).await.unwrap_err(),
        DomainError::NotFound(NotFoundKind::Post, _)
    ));
}

#[tokio::test]
async fn post_for_unknown_owner_is_rejected() {
    let store = store().await;
    let err = PostStore::create(
        &store,
        NewPost {
            header: "Orphan".into(),
            content: "No owner".into(),
            category: vec![],
            created_by: stamp(Uuid::new_v4()),
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, DomainError::Validation(_)));
}

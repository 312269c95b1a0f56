use std::sync::Arc;

use roster::db;
use roster::domain::{DomainError, UserRepository};
use roster::infrastructure::SeaOrmUserRepository;
use roster::models::{CreateUser, PageParams, UpdateUser};
use roster::services::UserService;
use roster::services::user_service::EMAIL_TAKEN;

// Helper to create a service and its repository over a fresh in-memory database
async fn setup_service() -> (UserService, Arc<dyn UserRepository>) {
    let db = db::init_db("sqlite::memory:")
        .await
        .expect("Failed to init DB");
    let repo: Arc<dyn UserRepository> = Arc::new(SeaOrmUserRepository::new(db));
    (UserService::new(repo.clone()), repo)
}

fn new_user(name: &str, email: &str, age: Option<i32>) -> CreateUser {
    CreateUser {
        name: name.to_string(),
        email: email.to_string(),
        age,
    }
}

#[tokio::test]
async fn test_create_user_assigns_id_and_timestamps() {
    let (service, _) = setup_service().await;

    let user = service
        .create_user(new_user("Ann Lee", "ann@example.com", Some(30)))
        .await
        .expect("create failed");

    assert!(user.id > 0);
    assert_eq!(user.name, "Ann Lee");
    assert_eq!(user.email, "ann@example.com");
    assert_eq!(user.age, Some(30));
    assert!(user.updated_at >= user.created_at);
}

#[tokio::test]
async fn test_create_duplicate_email_fails() {
    let (service, repo) = setup_service().await;

    service
        .create_user(new_user("First", "same@example.com", None))
        .await
        .unwrap();

    let err = service
        .create_user(new_user("Second", "same@example.com", None))
        .await
        .unwrap_err();

    assert_eq!(err, DomainError::Duplicate(EMAIL_TAKEN.to_string()));
    assert_eq!(repo.count(None).await.unwrap(), 1);
}

#[tokio::test]
async fn test_store_rejects_duplicate_email_without_precheck() {
    let (_, repo) = setup_service().await;

    repo.create(new_user("First", "dup@example.com", None))
        .await
        .unwrap();

    // Bypass the service check: the unique index has the final say
    let err = repo
        .create(new_user("Second", "dup@example.com", None))
        .await
        .unwrap_err();

    assert!(err.is_duplicate(), "expected duplicate, got {:?}", err);
    assert_eq!(repo.count(None).await.unwrap(), 1);
}

#[tokio::test]
async fn test_concurrent_creates_with_same_email_have_one_winner() {
    let (service, repo) = setup_service().await;

    let attempts = (0..4).map(|i| {
        let service = service.clone();
        async move {
            service
                .create_user(new_user(&format!("Racer {}", i), "race@example.com", None))
                .await
        }
    });
    let results = futures::future::join_all(attempts).await;

    let winners = results.iter().filter(|r| r.is_ok()).count();
    assert_eq!(winners, 1);

    for result in results.iter().filter_map(|r| r.as_ref().err()) {
        assert_eq!(*result, DomainError::Duplicate(EMAIL_TAKEN.to_string()));
    }

    assert_eq!(repo.count(None).await.unwrap(), 1);
}

#[tokio::test]
async fn test_get_missing_user_is_not_found() {
    let (service, _) = setup_service().await;

    let err = service.get_user_by_id(42).await.unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_update_age_only_keeps_other_fields() {
    let (service, _) = setup_service().await;

    let created = service
        .create_user(new_user("Ann Lee", "ann@example.com", Some(30)))
        .await
        .unwrap();

    let patch = UpdateUser {
        age: Some(Some(31)),
        ..Default::default()
    };
    let updated = service.update_user(created.id, patch).await.unwrap();

    assert_eq!(updated.id, created.id);
    assert_eq!(updated.name, "Ann Lee");
    assert_eq!(updated.email, "ann@example.com");
    assert_eq!(updated.age, Some(31));
    assert_eq!(updated.created_at, created.created_at);
    assert!(updated.updated_at >= created.updated_at);
}

#[tokio::test]
async fn test_update_can_clear_age() {
    let (service, _) = setup_service().await;

    let created = service
        .create_user(new_user("Ann Lee", "ann@example.com", Some(30)))
        .await
        .unwrap();

    let patch = UpdateUser {
        age: Some(None),
        ..Default::default()
    };
    let updated = service.update_user(created.id, patch).await.unwrap();

    assert_eq!(updated.age, None);
    assert_eq!(updated.name, "Ann Lee");
}

#[tokio::test]
async fn test_update_to_taken_email_fails_and_leaves_record() {
    let (service, _) = setup_service().await;

    service
        .create_user(new_user("Ann", "ann@example.com", None))
        .await
        .unwrap();
    let bob = service
        .create_user(new_user("Bob", "bob@example.com", Some(50)))
        .await
        .unwrap();

    let patch = UpdateUser {
        name: Some("Robert".to_string()),
        email: Some("ann@example.com".to_string()),
        ..Default::default()
    };
    let err = service.update_user(bob.id, patch).await.unwrap_err();
    assert_eq!(err, DomainError::Duplicate(EMAIL_TAKEN.to_string()));

    let unchanged = service.get_user_by_id(bob.id).await.unwrap();
    assert_eq!(unchanged, bob);
}

#[tokio::test]
async fn test_update_with_own_email_is_allowed() {
    let (service, _) = setup_service().await;

    let ann = service
        .create_user(new_user("Ann", "ann@example.com", None))
        .await
        .unwrap();

    let patch = UpdateUser {
        name: Some("Ann Lee".to_string()),
        email: Some("ann@example.com".to_string()),
        ..Default::default()
    };
    let updated = service.update_user(ann.id, patch).await.unwrap();
    assert_eq!(updated.name, "Ann Lee");
}

#[tokio::test]
async fn test_update_missing_user_is_not_found() {
    let (service, _) = setup_service().await;

    let err = service
        .update_user(7, UpdateUser::default())
        .await
        .unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_delete_then_get_and_delete_again() {
    let (service, _) = setup_service().await;

    let user = service
        .create_user(new_user("Ann", "ann@example.com", None))
        .await
        .unwrap();

    assert!(service.delete_user(user.id).await.unwrap());
    assert!(service.get_user_by_id(user.id).await.unwrap_err().is_not_found());
    assert!(service.delete_user(user.id).await.unwrap_err().is_not_found());
}

#[tokio::test]
async fn test_ids_are_not_reused_after_delete() {
    let (service, _) = setup_service().await;

    let first = service
        .create_user(new_user("One", "one@example.com", None))
        .await
        .unwrap();
    service.delete_user(first.id).await.unwrap();

    let second = service
        .create_user(new_user("Two", "two@example.com", None))
        .await
        .unwrap();
    assert!(second.id > first.id);
}

#[tokio::test]
async fn test_pagination_third_page_of_25() {
    let (service, _) = setup_service().await;

    for i in 1..=25 {
        service
            .create_user(new_user(
                &format!("User {:02}", i),
                &format!("user{:02}@example.com", i),
                None,
            ))
            .await
            .unwrap();
    }

    let params = PageParams::new(Some(3), Some(10));
    let (items, total) = service
        .get_users(params.skip(), params.limit(), None)
        .await
        .unwrap();

    assert_eq!(total, 25);
    assert_eq!(items.len(), 5);
    let names: Vec<&str> = items.iter().map(|u| u.name.as_str()).collect();
    assert_eq!(
        names,
        vec!["User 21", "User 22", "User 23", "User 24", "User 25"]
    );
}

#[tokio::test]
async fn test_search_matches_name_or_email_case_insensitively() {
    let (service, repo) = setup_service().await;

    service
        .create_user(new_user("Ann Lee", "lee@example.com", None))
        .await
        .unwrap();
    service
        .create_user(new_user("Xavier", "xann@example.com", None))
        .await
        .unwrap();
    service
        .create_user(new_user("Bob", "bob@example.com", None))
        .await
        .unwrap();

    let (items, total) = service.get_users(0, 10, Some("ann")).await.unwrap();
    let mut names: Vec<String> = items.into_iter().map(|u| u.name).collect();
    names.sort();
    assert_eq!(names, vec!["Ann Lee".to_string(), "Xavier".to_string()]);
    assert_eq!(total, 2);

    let (items, total) = service.get_users(0, 10, Some("ANN")).await.unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(total, 2);

    // Surrounding whitespace is ignored; blank search is no search
    assert_eq!(repo.count(Some(" ann ")).await.unwrap(), 2);
    assert_eq!(repo.count(Some("  ")).await.unwrap(), 3);
}

#[tokio::test]
async fn test_count_matches_unbounded_listing() {
    let (service, repo) = setup_service().await;

    for (name, email) in [
        ("Anna", "anna@example.com"),
        ("Joanne", "jo@example.com"),
        ("Carl", "carl@example.com"),
    ] {
        service
            .create_user(new_user(name, email, None))
            .await
            .unwrap();
    }

    for search in [None, Some("ann"), Some("example"), Some("zzz")] {
        let listed = repo.get_all(0, 1000, search).await.unwrap().len() as u64;
        assert_eq!(repo.count(search).await.unwrap(), listed, "search {:?}", search);
    }
}

//! Tests for the carousel CRUD service.

use std::sync::{Arc, Mutex};

use chrono::{DateTime, TimeZone, Utc};
use rstest::{fixture, rstest};

use super::*;
use crate::domain::ports::MockUserRepository;
use crate::domain::{ErrorCode, PasswordHash, Slide, TransitionType, UserName};
use crate::test_support::MutableClock;

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 4, 5, 6, 7)
        .single()
        .expect("valid fixture timestamp")
}

fn carousel_id(raw: &str) -> CarouselId {
    CarouselId::new(raw).expect("carousel id")
}

fn slide(url: &str) -> Slide {
    Slide {
        url: url.to_owned(),
        transition_type: TransitionType::Fade,
        ..Slide::default()
    }
}

fn draft(id: &str, title: &str) -> CarouselDraft {
    CarouselDraft::try_new(
        carousel_id(id),
        title,
        vec![slide("http://a"), slide("http://b")],
        false,
    )
    .expect("draft")
}

#[fixture]
fn user_id() -> UserId {
    UserId::new("u1").expect("user id")
}

#[fixture]
fn ann(user_id: UserId) -> User {
    User::new(
        user_id,
        UserName::new("ann").expect("name"),
        PasswordHash::from_encoded("fixture$pw"),
    )
}

/// Repository mock that serves `initial` and records every saved document.
fn repo_with(initial: Option<User>, saved: Arc<Mutex<Vec<User>>>) -> MockUserRepository {
    let mut repo = MockUserRepository::new();
    repo.expect_find_by_id()
        .returning(move |_| Ok(initial.clone()));
    repo.expect_save().returning(move |user| {
        saved.lock().expect("saved lock").push(user.clone());
        Ok(())
    });
    repo
}

fn service(repo: MockUserRepository) -> CarouselService {
    CarouselService::new(Arc::new(repo), Arc::new(MutableClock::new(now())))
}

#[rstest]
#[tokio::test]
async fn create_stamps_server_time_and_persists(user_id: UserId, ann: User) {
    let saved = Arc::new(Mutex::new(Vec::new()));
    let service = service(repo_with(Some(ann), Arc::clone(&saved)));

    let carousel = service
        .create_carousel(&user_id, draft("c1", "Trip"))
        .await
        .expect("create");

    assert_eq!(carousel.created_at, now());
    assert_eq!(carousel.slides.len(), 2);
    let saved = saved.lock().expect("saved lock");
    assert_eq!(saved.len(), 1);
    assert_eq!(saved[0].carousels(), std::slice::from_ref(&carousel));
}

#[rstest]
#[tokio::test]
async fn create_rejects_duplicate_carousel_ids(user_id: UserId, mut ann: User) {
    ann.add_carousel(draft("c1", "Trip").into_carousel(now()))
        .expect("seed");
    let saved = Arc::new(Mutex::new(Vec::new()));
    let service = service(repo_with(Some(ann), Arc::clone(&saved)));

    let err = service
        .create_carousel(&user_id, draft("c1", "Again"))
        .await
        .expect_err("duplicate");

    assert_eq!(err.code(), ErrorCode::Conflict);
    assert!(saved.lock().expect("saved lock").is_empty());
}

#[rstest]
#[tokio::test]
async fn operations_on_missing_users_are_not_found(user_id: UserId) {
    let saved = Arc::new(Mutex::new(Vec::new()));
    let service = service(repo_with(None, saved));

    let create = service.create_carousel(&user_id, draft("c1", "Trip")).await;
    let update = service
        .update_carousel(&user_id, &carousel_id("c1"), CarouselPatch::default())
        .await;
    let delete = service.delete_carousel(&user_id, &carousel_id("c1")).await;
    let query = service.get_user(&user_id).await;

    for code in [
        create.map(|_| ()),
        update.map(|_| ()),
        delete,
        query.map(|_| ()),
    ]
    .into_iter()
    .map(|result| result.expect_err("missing user").code())
    {
        assert_eq!(code, ErrorCode::NotFound);
    }
}

#[rstest]
#[tokio::test]
async fn update_is_a_shallow_merge(user_id: UserId, mut ann: User) {
    let original = draft("c1", "Trip").into_carousel(now());
    ann.add_carousel(original.clone()).expect("seed");
    let saved = Arc::new(Mutex::new(Vec::new()));
    let service = service(repo_with(Some(ann), Arc::clone(&saved)));

    let patch = CarouselPatch {
        title: Some("Trip 2".to_owned()),
        active: Some(true),
        ..CarouselPatch::default()
    };
    let merged = service
        .update_carousel(&user_id, &carousel_id("c1"), patch)
        .await
        .expect("update");

    assert_eq!(merged.title, "Trip 2");
    assert!(merged.active);
    assert_eq!(merged.slides, original.slides);
    assert_eq!(merged.created_at, original.created_at);
    assert_eq!(merged.id, original.id);
}

#[rstest]
#[tokio::test]
async fn update_of_unknown_carousel_is_not_found(user_id: UserId, ann: User) {
    let saved = Arc::new(Mutex::new(Vec::new()));
    let service = service(repo_with(Some(ann), Arc::clone(&saved)));

    let err = service
        .update_carousel(&user_id, &carousel_id("c9"), CarouselPatch::default())
        .await
        .expect_err("unknown carousel");

    assert_eq!(err.code(), ErrorCode::NotFound);
    assert!(saved.lock().expect("saved lock").is_empty());
}

#[rstest]
#[tokio::test]
async fn update_rejects_blank_titles_before_loading(user_id: UserId) {
    let mut repo = MockUserRepository::new();
    repo.expect_find_by_id().never();
    let patch = CarouselPatch {
        title: Some("  ".to_owned()),
        ..CarouselPatch::default()
    };

    let err = service(repo)
        .update_carousel(&user_id, &carousel_id("c1"), patch)
        .await
        .expect_err("blank title");
    assert_eq!(err.code(), ErrorCode::InvalidRequest);
}

#[rstest]
#[tokio::test]
async fn deleting_an_unknown_carousel_succeeds_without_saving(user_id: UserId, ann: User) {
    let saved = Arc::new(Mutex::new(Vec::new()));
    let service = service(repo_with(Some(ann), Arc::clone(&saved)));

    service
        .delete_carousel(&user_id, &carousel_id("nope"))
        .await
        .expect("no-op delete");
    assert!(saved.lock().expect("saved lock").is_empty());
}

#[rstest]
#[tokio::test]
async fn delete_removes_and_persists(user_id: UserId, mut ann: User) {
    ann.add_carousel(draft("c1", "Trip").into_carousel(now()))
        .expect("seed");
    ann.add_carousel(draft("c2", "Home").into_carousel(now()))
        .expect("seed");
    let saved = Arc::new(Mutex::new(Vec::new()));
    let service = service(repo_with(Some(ann), Arc::clone(&saved)));

    service
        .delete_carousel(&user_id, &carousel_id("c1"))
        .await
        .expect("delete");

    let saved = saved.lock().expect("saved lock");
    let ids: Vec<&str> = saved[0].carousels().iter().map(|c| c.id.as_ref()).collect();
    assert_eq!(ids, ["c2"]);
}

#[rstest]
#[tokio::test]
async fn save_outages_surface_as_service_unavailable(user_id: UserId, ann: User) {
    let mut repo = MockUserRepository::new();
    repo.expect_find_by_id()
        .return_once(move |_| Ok(Some(ann)));
    repo.expect_save()
        .return_once(|_| Err(UserPersistenceError::connection("pool exhausted")));

    let err = service(repo)
        .create_carousel(&user_id, draft("c1", "Trip"))
        .await
        .expect_err("outage");
    assert_eq!(err.code(), ErrorCode::ServiceUnavailable);
}

#[rstest]
#[case(true)]
#[case(false)]
#[tokio::test]
async fn user_exists_reflects_the_repository(user_id: UserId, ann: User, #[case] present: bool) {
    let saved = Arc::new(Mutex::new(Vec::new()));
    let service = service(repo_with(present.then_some(ann), saved));

    assert_eq!(service.user_exists(&user_id).await.expect("lookup"), present);
}

#[rstest]
#[tokio::test]
async fn delete_persists_a_cleared_dangling_active_reference(user_id: UserId) {
    let dangling = User::from_parts(
        user_id.clone(),
        UserName::new("ann").expect("name"),
        PasswordHash::from_encoded("fixture$pw"),
        Vec::new(),
        Some(draft("c1", "Trip").into_carousel(now())),
    );
    let saved = Arc::new(Mutex::new(Vec::new()));
    let service = service(repo_with(Some(dangling), Arc::clone(&saved)));

    service
        .delete_carousel(&user_id, &carousel_id("c1"))
        .await
        .expect("delete");

    let saved = saved.lock().expect("saved lock");
    assert_eq!(saved.len(), 1);
    assert!(saved[0].active_carousel().is_none());
}

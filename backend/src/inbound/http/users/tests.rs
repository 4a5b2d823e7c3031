//! Tests for account handlers over mocked ports.

use super::*;
use crate::domain::ports::{
    MockCarouselCommand, MockLoginService, MockSignupService, MockUserQuery,
};
use crate::domain::{ErrorCode, UserId, UserName};
use actix_web::cookie::Cookie;
use actix_web::dev::ServiceResponse;
use actix_web::http::StatusCode;
use actix_web::{App, test as actix_test};
use rstest::rstest;
use serde_json::{Value, json};
use std::sync::Arc;

fn projection(id: &str, name: &str) -> UserProjection {
    UserProjection {
        id: UserId::new(id).expect("id"),
        user_name: UserName::new(name).expect("name"),
        carousels: Vec::new(),
        active_carousel: None,
    }
}

struct Ports {
    login: MockLoginService,
    signup: MockSignupService,
    users: MockUserQuery,
}

impl Default for Ports {
    fn default() -> Self {
        Self {
            login: MockLoginService::new(),
            signup: MockSignupService::new(),
            users: MockUserQuery::new(),
        }
    }
}

fn ann_logs_in(ports: &mut Ports) {
    ports
        .login
        .expect_authenticate()
        .returning(|credentials| {
            if credentials.user_name().to_string() == "ann" && credentials.password() == "pw" {
                Ok(projection("u1", "ann"))
            } else {
                Err(Error::unauthorized("incorrect username or password"))
            }
        });
}

fn test_app(
    ports: Ports,
) -> App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let state = HttpState::new(
        Arc::new(ports.login),
        Arc::new(ports.signup),
        Arc::new(MockCarouselCommand::new()),
        Arc::new(ports.users),
    );
    App::new()
        .app_data(web::Data::new(state))
        .wrap(crate::inbound::http::test_utils::test_session_middleware())
        .service(login)
        .service(signup)
        .service(logout)
        .service(get_user)
}

fn session_cookie(res: &ServiceResponse) -> Cookie<'static> {
    res.response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .map(Cookie::into_owned)
        .expect("session cookie set")
}

async fn body_json(res: ServiceResponse) -> Value {
    let body = actix_test::read_body(res).await;
    serde_json::from_slice(&body).expect("json body")
}

#[rstest]
#[case(json!({"password": "pw"}), "userName", "missing_field")]
#[case(json!({"userName": "ann"}), "password", "missing_field")]
#[case(json!({"userName": "  ", "password": "pw"}), "userName", "invalid_value")]
#[case(json!({"userName": "ann", "password": ""}), "password", "invalid_value")]
#[actix_web::test]
async fn login_rejects_incomplete_bodies(
    #[case] body: Value,
    #[case] field: &str,
    #[case] code: &str,
) {
    let app = actix_test::init_service(test_app(Ports::default())).await;
    let req = actix_test::TestRequest::post()
        .uri("/login")
        .set_json(&body)
        .to_request();

    let res = actix_test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let value = body_json(res).await;
    assert_eq!(value["code"], "invalid_request");
    assert_eq!(value["details"]["field"], field);
    assert_eq!(value["details"]["code"], code);
}

#[rstest]
#[actix_web::test]
async fn wrong_password_is_unauthorised_without_a_session() {
    let mut ports = Ports::default();
    ann_logs_in(&mut ports);
    let app = actix_test::init_service(test_app(ports)).await;

    let req = actix_test::TestRequest::post()
        .uri("/login")
        .set_json(json!({"userName": "ann", "password": "nope"}))
        .to_request();
    let res = actix_test::call_service(&app, req).await;

    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    assert!(res.response().cookies().all(|c| c.name() != "session"));
    let value = body_json(res).await;
    assert_eq!(value["message"], "incorrect username or password");
}

#[rstest]
#[actix_web::test]
async fn login_returns_the_user_and_a_working_session() {
    let mut ports = Ports::default();
    ann_logs_in(&mut ports);
    ports
        .users
        .expect_get_user()
        .withf(|id| id.to_string() == "u1")
        .returning(|_| Ok(projection("u1", "ann")));
    let app = actix_test::init_service(test_app(ports)).await;

    let login_res = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/login")
            .set_json(json!({"userName": "ann", "password": "pw"}))
            .to_request(),
    )
    .await;
    assert_eq!(login_res.status(), StatusCode::OK);
    let cookie = session_cookie(&login_res);
    let value = body_json(login_res).await;
    assert_eq!(value["user"]["id"], "u1");
    assert_eq!(value["user"]["userName"], "ann");
    assert!(value["user"].get("passwordHash").is_none());

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri("/getUser/u1")
            .cookie(cookie)
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(body_json(res).await["user"]["activeCarousel"], Value::Null);
}

#[rstest]
#[case(None, StatusCode::UNAUTHORIZED)]
#[case(Some("u2"), StatusCode::FORBIDDEN)]
#[actix_web::test]
async fn get_user_requires_the_owning_session(
    #[case] path_id: Option<&str>,
    #[case] expected: StatusCode,
) {
    let mut ports = Ports::default();
    ann_logs_in(&mut ports);
    ports.users.expect_get_user().never();
    let app = actix_test::init_service(test_app(ports)).await;

    let mut req = actix_test::TestRequest::get();
    match path_id {
        Some(id) => {
            let login_res = actix_test::call_service(
                &app,
                actix_test::TestRequest::post()
                    .uri("/login")
                    .set_json(json!({"userName": "ann", "password": "pw"}))
                    .to_request(),
            )
            .await;
            req = req
                .uri(&format!("/getUser/{id}"))
                .cookie(session_cookie(&login_res));
        }
        None => req = req.uri("/getUser/u1"),
    }

    let res = actix_test::call_service(&app, req.to_request()).await;
    assert_eq!(res.status(), expected);
}

#[rstest]
#[actix_web::test]
async fn signup_answers_created_with_the_projection() {
    let mut ports = Ports::default();
    ports
        .signup
        .expect_signup()
        .withf(|request| {
            request.id().to_string() == "u7" && request.credentials().password() == "pw"
        })
        .returning(|request| {
            Ok(projection(
                request.id().as_ref(),
                request.credentials().user_name().as_ref(),
            ))
        });
    let app = actix_test::init_service(test_app(ports)).await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/signup")
            .set_json(json!({"id": "u7", "userName": " bob ", "password": "pw"}))
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::CREATED);
    let value = body_json(res).await;
    assert_eq!(value["user"]["id"], "u7");
    assert_eq!(value["user"]["userName"], "bob");
    assert_eq!(value["user"]["carousels"], json!([]));
}

#[rstest]
#[actix_web::test]
async fn signup_surfaces_taken_names_as_bad_requests() {
    let mut ports = Ports::default();
    ports
        .signup
        .expect_signup()
        .returning(|_| Err(Error::invalid_request("user name is already taken")));
    let app = actix_test::init_service(test_app(ports)).await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/signup")
            .set_json(json!({"id": "u8", "userName": "ann", "password": "pw"}))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let err: Error = actix_test::read_body_json(res).await;
    assert_eq!(err.code(), ErrorCode::InvalidRequest);
}

#[rstest]
#[actix_web::test]
async fn signup_requires_an_id() {
    let mut ports = Ports::default();
    ports.signup.expect_signup().never();
    let app = actix_test::init_service(test_app(ports)).await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/signup")
            .set_json(json!({"userName": "ann", "password": "pw"}))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(res).await["details"]["field"], "id");
}

#[rstest]
#[actix_web::test]
async fn logout_ends_the_session() {
    let mut ports = Ports::default();
    ann_logs_in(&mut ports);
    ports.users.expect_get_user().never();
    let app = actix_test::init_service(test_app(ports)).await;

    let login_res = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/login")
            .set_json(json!({"userName": "ann", "password": "pw"}))
            .to_request(),
    )
    .await;
    let cookie = session_cookie(&login_res);

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/logout")
            .cookie(cookie.clone())
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(body_json(res).await["message"], "Logged out");

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri("/getUser/u1")
            .cookie(cookie)
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[rstest]
#[actix_web::test]
async fn get_user_for_a_vanished_user_is_unauthorised_and_ends_the_session() {
    let mut ports = Ports::default();
    ann_logs_in(&mut ports);
    ports
        .users
        .expect_get_user()
        .times(1)
        .returning(|id| Err(Error::not_found(format!("user {id} not found"))));
    ports
        .users
        .expect_user_exists()
        .withf(|id| id.to_string() == "u1")
        .times(1)
        .returning(|_| Ok(false));
    let app = actix_test::init_service(test_app(ports)).await;

    let login_res = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/login")
            .set_json(json!({"userName": "ann", "password": "pw"}))
            .to_request(),
    )
    .await;
    let cookie = session_cookie(&login_res);

    let stale = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri("/getUser/u1")
            .cookie(cookie.clone())
            .to_request(),
    )
    .await;
    assert_eq!(stale.status(), StatusCode::UNAUTHORIZED);

    let again = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri("/getUser/u1")
            .cookie(cookie)
            .to_request(),
    )
    .await;
    assert_eq!(again.status(), StatusCode::UNAUTHORIZED);
}

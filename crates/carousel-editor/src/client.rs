//! reqwest client for the carousel backend.
//!
//! The session cookie set by `POST /login` is kept in the client's cookie
//! store and replayed on every later call. Nothing is retried.

use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::draft::{CarouselApi, CarouselSubmitter};
use crate::error::EditorError;
use crate::model::{Carousel, UserProjection};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct LoginBody<'a> {
    user_name: &'a str,
    password: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SignupBody<'a> {
    id: &'a str,
    user_name: &'a str,
    password: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct NewCarouselBody<'a> {
    user_id: &'a str,
    carousel_data: &'a Carousel,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct UpdateCarouselBody<'a> {
    user_id: &'a str,
    carousel_id: &'a str,
    updated_carousel_data: &'a Carousel,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct DeleteCarouselBody<'a> {
    user_id: &'a str,
    carousel_id: &'a str,
}

#[derive(Deserialize)]
struct UserEnvelope {
    user: UserProjection,
}

#[derive(Deserialize)]
struct CarouselEnvelope {
    carousel: Carousel,
}

#[derive(Deserialize)]
struct MessageEnvelope {
    message: String,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

/// HTTP client for the account and carousel routes.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    base_url: Url,
}

impl ApiClient {
    /// Build a client rooted at `base_url`, e.g. `http://localhost:8080/`.
    ///
    /// # Errors
    ///
    /// [`EditorError::Transport`] when the reqwest client cannot be built.
    pub fn new(base_url: Url) -> Result<Self, EditorError> {
        let http = Client::builder().cookie_store(true).build()?;
        Ok(Self { http, base_url })
    }

    /// Log in and keep the session cookie.
    ///
    /// # Errors
    ///
    /// [`EditorError::Api`] with status 401 for bad credentials.
    pub async fn login(
        &self,
        user_name: &str,
        password: &str,
    ) -> Result<UserProjection, EditorError> {
        let response = self
            .http
            .post(self.endpoint(&["login"])?)
            .json(&LoginBody {
                user_name,
                password,
            })
            .send()
            .await?;
        decode::<UserEnvelope>(response).await.map(|body| body.user)
    }

    /// Register a user. Does not log in.
    ///
    /// # Errors
    ///
    /// [`EditorError::Api`] with status 400 for missing fields or a taken
    /// name or id.
    pub async fn signup(
        &self,
        id: &str,
        user_name: &str,
        password: &str,
    ) -> Result<UserProjection, EditorError> {
        let response = self
            .http
            .post(self.endpoint(&["signup"])?)
            .json(&SignupBody {
                id,
                user_name,
                password,
            })
            .send()
            .await?;
        decode::<UserEnvelope>(response).await.map(|body| body.user)
    }

    /// Drop the server-held session.
    ///
    /// # Errors
    ///
    /// [`EditorError::Transport`] when the server cannot be reached.
    pub async fn logout(&self) -> Result<(), EditorError> {
        let response = self.http.post(self.endpoint(&["logout"])?).send().await?;
        decode::<MessageEnvelope>(response).await.map(|_| ())
    }

    /// Delete `carousel_id`; deleting an unknown id succeeds.
    ///
    /// # Errors
    ///
    /// [`EditorError::Api`] with 401 or 403 when the session does not
    /// belong to `user_id`.
    pub async fn delete_carousel(
        &self,
        user_id: &str,
        carousel_id: &str,
    ) -> Result<String, EditorError> {
        let response = self
            .http
            .delete(self.endpoint(&["deleteCarousel"])?)
            .json(&DeleteCarouselBody {
                user_id,
                carousel_id,
            })
            .send()
            .await?;
        decode::<MessageEnvelope>(response).await.map(|body| body.message)
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url, EditorError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| EditorError::Transport {
                message: format!("base URL {} cannot take a path", self.base_url),
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }
}

#[async_trait]
impl CarouselSubmitter for ApiClient {
    async fn create_carousel(
        &self,
        user_id: &str,
        carousel: &Carousel,
    ) -> Result<Carousel, EditorError> {
        let response = self
            .http
            .post(self.endpoint(&["NewCarousel"])?)
            .json(&NewCarouselBody {
                user_id,
                carousel_data: carousel,
            })
            .send()
            .await?;
        decode::<CarouselEnvelope>(response)
            .await
            .map(|body| body.carousel)
    }

    async fn update_carousel(
        &self,
        user_id: &str,
        carousel_id: &str,
        carousel: &Carousel,
    ) -> Result<Carousel, EditorError> {
        let response = self
            .http
            .post(self.endpoint(&["updateCarousel"])?)
            .json(&UpdateCarouselBody {
                user_id,
                carousel_id,
                updated_carousel_data: carousel,
            })
            .send()
            .await?;
        decode::<CarouselEnvelope>(response)
            .await
            .map(|body| body.carousel)
    }
}

#[async_trait]
impl CarouselApi for ApiClient {
    async fn fetch_user(&self, user_id: &str) -> Result<UserProjection, EditorError> {
        let response = self
            .http
            .get(self.endpoint(&["getUser", user_id])?)
            .send()
            .await?;
        decode::<UserEnvelope>(response).await.map(|body| body.user)
    }
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, EditorError> {
    let status = response.status();
    let body = response.bytes().await?;
    if !status.is_success() {
        let err = api_error(status, &body);
        debug!(status = status.as_u16(), error = %err, "request rejected");
        return Err(err);
    }
    serde_json::from_slice(&body).map_err(|err| EditorError::Transport {
        message: format!("unexpected response body: {err}"),
    })
}

fn api_error(status: StatusCode, body: &[u8]) -> EditorError {
    let message = serde_json::from_slice::<ErrorBody>(body).map_or_else(
        |_| status.canonical_reason().unwrap_or("request failed").to_owned(),
        |body| body.message,
    );
    EditorError::Api {
        status: status.as_u16(),
        message,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn error_bodies_supply_the_message() {
        let body = br#"{"code":"forbidden","message":"cannot act on another user's carousels","traceId":"t"}"#;
        assert_eq!(
            api_error(StatusCode::FORBIDDEN, body),
            EditorError::Api {
                status: 403,
                message: "cannot act on another user's carousels".to_owned()
            }
        );
    }

    #[rstest]
    #[case(StatusCode::BAD_REQUEST, b"Json deserialize error", "Bad Request")]
    #[case(StatusCode::SERVICE_UNAVAILABLE, b"", "Service Unavailable")]
    fn other_bodies_fall_back_to_the_reason(
        #[case] status: StatusCode,
        #[case] body: &[u8],
        #[case] message: &str,
    ) {
        assert_eq!(
            api_error(status, body).to_string(),
            format!("server responded with {}: {message}", status.as_u16())
        );
    }

    #[rstest]
    #[case("http://localhost:8080/", &["getUser", "u 1"], "http://localhost:8080/getUser/u%201")]
    #[case("http://localhost:8080/api/", &["login"], "http://localhost:8080/api/login")]
    #[case("http://localhost:8080", &["NewCarousel"], "http://localhost:8080/NewCarousel")]
    fn endpoints_extend_the_base_path(
        #[case] base: &str,
        #[case] segments: &[&str],
        #[case] expected: &str,
    ) {
        let client = ApiClient::new(Url::parse(base).expect("base url")).expect("client");
        assert_eq!(client.endpoint(segments).expect("endpoint").as_str(), expected);
    }
}

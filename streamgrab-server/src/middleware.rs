/* This file is part of the StreamGrab project - https://github.com/streamgrab/streamgrab
*
*  Copyright (C) 2026 StreamGrab contributors
*
*  This program is free software: you can redistribute it and/or modify
*  it under the terms of the GNU Affero General Public License as published by
*  the Free Software Foundation, either version 3 of the License, or
*  (at your option) any later version.
*
*  This program is distributed in the hope that it will be useful,
*  but WITHOUT ANY WARRANTY; without even the implied warranty of
*  MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
*  GNU Affero General Public License for more details.
*
*  You should have received a copy of the GNU Affero General Public License
*  along with this program.  If not, see <https://www.gnu.org/licenses/>.
*/
use std::future::{ready, Ready};

use actix_web::body::{BoxBody, EitherBody, MessageBody};
use actix_web::dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::error::Error;
use actix_web::http::header::{Accept, ContentType, Header};
use futures::{future::LocalBoxFuture, FutureExt};
use log::warn;

use crate::{render, utils::{ErrorBody, ErrorResponseMarker, HeaderMapExt}};

/// Renders [`ErrorBody`] responses as HTML pages, unless the client asked for json
pub struct ErrorRepresentation;

impl<S, B> Transform<S, ServiceRequest> for ErrorRepresentation
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: MessageBody + 'static,
{
    type Response = ServiceResponse<EitherBody<B, BoxBody>>;
    type Error = Error;
    type InitError = ();
    type Transform = ErrorRepresentationInstance<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(ErrorRepresentationInstance { service }))
    }
}

pub struct ErrorRepresentationInstance<S> {
    service: S,
}

impl<S, B> Service<ServiceRequest> for ErrorRepresentationInstance<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: MessageBody + 'static,
{
    type Response = ServiceResponse<EitherBody<B, BoxBody>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let requested_json = Accept::parse(&req).is_ok_and(|a| a.iter().any(|item| item.item.essence_str() == "application/json"));

        let srv = self.service.call(req);

        async move {
            let resp = srv.await?;
            if requested_json || !resp.response().extensions().contains::<ErrorResponseMarker>() {
                return Ok(resp.map_into_left_body())
            }

            // client did not explicitly request json and the response contains an error body
            // - render it as a page
            let resp = resp.map_body(|head, body| {
                match body.try_into_bytes() {
                    Err(body) => {
                        warn!("Failed to read & convert the body of an error response");
                        EitherBody::left(body)
                    },
                    Ok(bytes) => {
                        match serde_json::from_slice::<ErrorBody>(&bytes) {
                            Err(err) => {
                                warn!("Failed to deserialize the error response body: {err}");
                                EitherBody::right(BoxBody::new(bytes))
                            },
                            Ok(error) => {
                                if let Err(err) = head.headers.replace_header(ContentType::html()) {
                                    warn!("Failed to replace the ContentType header: {err}");
                                }
                                EitherBody::right(BoxBody::new(render::error_page(head.status, &error.error)))
                            }
                        }
                    }
                }
            });
            Ok(resp)
        }.boxed_local()
    }
}

#[cfg(test)]
mod tests {
    use actix_web::{http::{header, StatusCode}, test, web, App, HttpResponse};
    use anyhow::anyhow;

    use super::*;
    use crate::utils;

    async fn failing() -> utils::Result<HttpResponse> {
        Err(utils::Error::from(anyhow!("URL is <required>")).set_status(StatusCode::BAD_REQUEST))
    }

    async fn fine() -> HttpResponse {
        HttpResponse::Ok().body("fine")
    }

    #[actix_web::test]
    async fn renders_errors_as_html() {
        let app = test::init_service(App::new().wrap(ErrorRepresentation).route("/", web::get().to(failing))).await;

        let resp = test::call_service(&app, test::TestRequest::get().uri("/").to_request()).await;

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_eq!(resp.headers().get(header::CONTENT_TYPE).unwrap(), "text/html; charset=utf-8");
        let body = test::read_body(resp).await;
        let body = std::str::from_utf8(&body).unwrap();
        assert!(body.contains("400 Bad Request"));
        assert!(body.contains("URL is &lt;required&gt;"));
    }

    #[actix_web::test]
    async fn keeps_json_when_requested() {
        let app = test::init_service(App::new().wrap(ErrorRepresentation).route("/", web::get().to(failing))).await;

        let req = test::TestRequest::get().uri("/").insert_header((header::ACCEPT, "application/json")).to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: utils::ErrorBody = test::read_body_json(resp).await;
        assert_eq!(body.error, "URL is <required>");
    }

    #[actix_web::test]
    async fn leaves_other_responses_alone() {
        let app = test::init_service(App::new().wrap(ErrorRepresentation).route("/", web::get().to(fine))).await;

        let resp = test::call_service(&app, test::TestRequest::get().uri("/").to_request()).await;

        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(test::read_body(resp).await, "fine");
    }
}

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
#![allow(clippy::needless_pass_by_value)]
use actix_web::{get, http::{header::ContentType, StatusCode}, post, web, HttpResponse};
use anyhow::anyhow;
use chrono::DateTime;
use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;
use streamgrab_formats::VideoSummary;

use crate::{built_info, render, service::GrabService, state::AppConfig, utils};

pub type ServiceData = web::Data<GrabService>;
type JsonResult<T> = utils::Result<web::Json<T>>;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::FormConfig::default().error_handler(|err, _req| {
        utils::Error::from(anyhow!("Invalid form submission: {err}")).set_status(StatusCode::BAD_REQUEST).into()
    }))
       .app_data(web::QueryConfig::default().error_handler(|err, _req| {
        utils::Error::from(anyhow!("Invalid query string: {err}")).set_status(StatusCode::BAD_REQUEST).into()
    }))
       .service(home)
       .service(submit)
       .service(web::scope("/api")
           .service(get_formats)
           .service(get_status)
       );
}

fn html(body: String) -> HttpResponse {
    HttpResponse::Ok().insert_header(ContentType::html()).body(body)
}

#[derive(Deserialize)]
struct SubmitForm {
    #[serde(default)]
    user_input: String,
}

#[derive(Deserialize)]
struct FormatsQuery {
    #[serde(default)]
    url: String,
}

#[skip_serializing_none]
#[derive(Serialize, Deserialize)]
pub struct StatusResponse {
    pub server_version: String,
    pub server_git_hash: Option<String>,
    pub server_git_dirty: Option<bool>,
    pub server_build_timestamp: Option<i64>,
    pub server_startup_timestamp: i64,
    pub extractor: String,
    pub extractor_timeout_secs: f64,
}

#[get("/")]
async fn home() -> HttpResponse {
    html(render::home_page())
}

#[post("/")]
async fn submit(service: ServiceData, config: web::Data<AppConfig>, form: web::Form<SubmitForm>) -> utils::Result<HttpResponse> {
    let summary = service.handle(&form.user_input).await
        .map_err(|err| err.into_response_error(config.expose_extractor_errors))?;
    Ok(html(render::video_page(&summary)))
}

#[get("/formats")]
async fn get_formats(service: ServiceData, config: web::Data<AppConfig>, query: web::Query<FormatsQuery>) -> JsonResult<VideoSummary> {
    let summary = service.handle(&query.url).await
        .map_err(|err| err.into_response_error(config.expose_extractor_errors))?;
    Ok(web::Json(summary))
}

#[get("/status")]
async fn get_status(service: ServiceData, config: web::Data<AppConfig>) -> JsonResult<StatusResponse> {
    Ok(web::Json(StatusResponse {
        server_version: built_info::PKG_VERSION.into(),
        server_git_hash: built_info::GIT_COMMIT_HASH.map(std::convert::Into::into),
        server_git_dirty: built_info::GIT_DIRTY,
        server_build_timestamp: DateTime::parse_from_rfc2822(built_info::BUILT_TIME_UTC).ok().map(|t| t.timestamp()),
        server_startup_timestamp: config.startup_timestamp.timestamp(),
        extractor: service.extractor_name().into(),
        extractor_timeout_secs: service.timeout().as_secs_f64(),
    }))
}

#[cfg(test)]
mod tests {
    use std::{sync::atomic::Ordering::Relaxed, time::Duration};

    use actix_web::{http::header, test, App};
    use serde_json::{json, Value};
    use streamgrab_formats::{FormatSelector, HostPrefixFilter};

    use super::*;
    use crate::{middleware::ErrorRepresentation, service::GENERIC_EXTRACTION_ERROR, testing::{FakeExtractor, FakeOutcome}};

    macro_rules! init_app {
        ($outcome:expr, $expose_extractor_errors:expr) => {{
            let extractor = FakeExtractor::new($outcome);
            let service = GrabService::new(
                extractor.clone(),
                FormatSelector::new(HostPrefixFilter::new(["https://rr"])),
                Duration::from_millis(200),
            );
            let config = AppConfig { expose_extractor_errors: $expose_extractor_errors, ..AppConfig::default() };
            let app = test::init_service(
                App::new()
                    .wrap(ErrorRepresentation)
                    .app_data(web::Data::new(config))
                    .app_data(web::Data::new(service))
                    .configure(configure)
            ).await;
            (app, extractor)
        }};
    }

    fn video_json() -> Value {
        json!({
            "title": "Scenario",
            "uploader": "Someone",
            "thumbnail": "https://i.example/t.jpg",
            "duration": 90,
            "formats": [
                {"format_id": "140", "vcodec": "none", "acodec": "aac", "abr": 128, "ext": "m4a", "url": "https://rr.example/a", "filesize": 3_000_000},
                {"format_id": "22", "vcodec": "h264", "acodec": "aac", "format_note": "720p", "ext": "mp4", "url": "https://rr.example/b", "filesize": 20_000_000},
                {"format_id": "95", "vcodec": "h264", "acodec": "aac", "format_note": "720p", "ext": "mp4", "url": "https://manifest.example/hls"}
            ]
        })
    }

    fn submit_request(url: &str) -> test::TestRequest {
        test::TestRequest::post().uri("/").set_form([("user_input", url)])
    }

    #[actix_web::test]
    async fn serves_home_page() {
        let (app, extractor) = init_app!(FakeOutcome::Video(video_json()), false);

        let resp = test::call_service(&app, test::TestRequest::get().uri("/").to_request()).await;

        assert_eq!(resp.status(), StatusCode::OK);
        let body = test::read_body(resp).await;
        assert!(std::str::from_utf8(&body).unwrap().contains(r#"name="user_input""#));
        assert_eq!(extractor.calls.load(Relaxed), 0);
    }

    #[actix_web::test]
    async fn submit_renders_links() {
        let (app, _) = init_app!(FakeOutcome::Video(video_json()), false);

        let resp = test::call_service(&app, submit_request("https://www.youtube.com/watch?v=abc").to_request()).await;

        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(resp.headers().get(header::CONTENT_TYPE).unwrap(), "text/html; charset=utf-8");
        let body = test::read_body(resp).await;
        let body = std::str::from_utf8(&body).unwrap();
        assert!(body.contains("<li>Title: Scenario</li>"));
        assert!(body.contains(r#"href="https://rr.example/a""#));
        assert!(body.contains(r#"href="https://rr.example/b""#));
        assert!(!body.contains("manifest.example"));
    }

    #[actix_web::test]
    async fn empty_submission_is_bad_request() {
        let (app, extractor) = init_app!(FakeOutcome::Video(video_json()), false);

        let resp = test::call_service(&app, submit_request("").to_request()).await;

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body = test::read_body(resp).await;
        assert!(std::str::from_utf8(&body).unwrap().contains("URL is required"));
        assert_eq!(extractor.calls.load(Relaxed), 0);
    }

    #[actix_web::test]
    async fn missing_form_field_is_bad_request() {
        let (app, extractor) = init_app!(FakeOutcome::Video(video_json()), false);

        let req = test::TestRequest::post().uri("/").set_form([("something_else", "x")]).to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_eq!(extractor.calls.load(Relaxed), 0);
    }

    #[actix_web::test]
    async fn extraction_failure_hides_details_by_default() {
        let (app, extractor) = init_app!(FakeOutcome::Fail("ERROR: private detail"), false);

        let req = test::TestRequest::get()
            .uri("/api/formats?url=https%3A%2F%2Fexample.com%2Fv")
            .insert_header((header::ACCEPT, "application/json"))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body: utils::ErrorBody = test::read_body_json(resp).await;
        assert_eq!(body.error, GENERIC_EXTRACTION_ERROR);
        assert_eq!(extractor.calls.load(Relaxed), 1);
    }

    #[actix_web::test]
    async fn extraction_failure_can_expose_details() {
        let (app, _) = init_app!(FakeOutcome::Fail("ERROR: Unsupported URL"), true);

        let resp = test::call_service(&app, submit_request("https://example.com/v").to_request()).await;

        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = test::read_body(resp).await;
        let body = std::str::from_utf8(&body).unwrap();
        assert!(body.contains("500 Internal Server Error"));
        assert!(body.contains("ERROR: Unsupported URL"));
        assert!(!body.contains("Video Details"));
    }

    #[actix_web::test]
    async fn stalled_extraction_is_server_error() {
        let (app, _) = init_app!(FakeOutcome::Hang, false);

        let resp = test::call_service(&app, submit_request("https://example.com/v").to_request()).await;

        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[actix_web::test]
    async fn api_returns_summary() {
        let (app, _) = init_app!(FakeOutcome::Video(video_json()), false);

        let req = test::TestRequest::get().uri("/api/formats?url=https%3A%2F%2Fexample.com%2Fv").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["title"], "Scenario");
        assert_eq!(body["selected_audio_formats"].as_array().unwrap().len(), 1);
        assert_eq!(body["selected_audio_formats"][0]["kind"], "audio");
        assert_eq!(body["selected_audio_formats"][0]["size_mb"], 2.86);
        assert_eq!(body["selected_video_formats"].as_array().unwrap().len(), 1);
        assert_eq!(body["selected_video_formats"][0]["label"], "720p");
        assert_eq!(body["selected_video_formats"][0]["size_mb"], 19.07);
        assert!(body["selected_video_formats"][0].get("bitrate_kbps").is_none());
    }

    #[actix_web::test]
    async fn api_rejects_missing_url() {
        let (app, extractor) = init_app!(FakeOutcome::Video(video_json()), false);

        let req = test::TestRequest::get().uri("/api/formats").insert_header((header::ACCEPT, "application/json")).to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: utils::ErrorBody = test::read_body_json(resp).await;
        assert_eq!(body.error, "URL is required");
        assert_eq!(extractor.calls.load(Relaxed), 0);
    }

    #[actix_web::test]
    async fn reports_status() {
        let (app, _) = init_app!(FakeOutcome::Hang, false);

        let req = test::TestRequest::get().uri("/api/status").to_request();
        let status: StatusResponse = test::call_and_read_body_json(&app, req).await;

        assert_eq!(status.server_version, built_info::PKG_VERSION);
        assert_eq!(status.extractor, "fake");
        assert!((status.extractor_timeout_secs - 0.2).abs() < 1e-9);
    }
}

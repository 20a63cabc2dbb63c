use super::*;
use crate::state::test_helpers::test_app_state;

#[tokio::test]
async fn api_info_reports_version() {
    let Json(info) = api_info().await;
    assert_eq!(info.message, "promptdeck API");
    assert_eq!(info.version, env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn healthz_is_ok() {
    assert_eq!(healthz().await, StatusCode::OK);
}

#[test]
fn app_builds_with_any_origin_and_no_static_dir() {
    let _router: Router = app(test_app_state(), &CorsOrigins::Any, None);
}

#[test]
fn app_builds_with_origin_list_and_missing_static_dir() {
    let origins = CorsOrigins::List(vec!["http://localhost:5173".into(), "bad\norigin".into()]);
    let _router: Router = app(test_app_state(), &origins, Some(Path::new("/nonexistent/promptdeck/dist")));
}

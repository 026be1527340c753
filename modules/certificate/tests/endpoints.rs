use actix_web::{http::StatusCode, test, test::TestRequest, App};
use serde_json::Value;
use signary_module_certificate::endpoints::configure;
use signary_test_context::{certificate_bytes, SignaryContext};
use test_context::test_context;

#[test_context(SignaryContext)]
#[test_log::test(actix_web::test)]
async fn certificate_roundtrip(ctx: &SignaryContext) -> Result<(), anyhow::Error> {
    ctx.ingest_user("alice").await?;

    let app = test::init_service(
        App::new().configure(|svc| configure(svc, ctx.certificates.clone())),
    )
    .await;

    // upload activates for the uploading user
    let data = certificate_bytes("roundtrip");
    let request = TestRequest::post()
        .uri("/api/v1/user/alice/certificate")
        .set_payload(data.clone())
        .to_request();
    let response = test::call_service(&app, request).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let doc: Value = test::read_body_json(response).await;
    let fingerprint = doc["fingerprint"].as_str().unwrap().to_string();
    assert_eq!(fingerprint.len(), 64);

    // it shows up as active
    let request = TestRequest::get()
        .uri("/api/v1/user/alice/certificate")
        .to_request();
    let doc: Value = test::call_and_read_body_json(&app, request).await;
    assert_eq!(doc[0]["fingerprint"], fingerprint.as_str());
    assert_eq!(doc[0]["active"], true);

    // the stored blob comes back unchanged
    let request = TestRequest::get()
        .uri(&format!("/api/v1/certificate/{fingerprint}/download"))
        .to_request();
    let response = test::call_service(&app, request).await;
    assert!(response.status().is_success());
    let body = test::read_body(response).await;
    assert_eq!(body, data);

    // deactivate, the listing reflects it
    let request = TestRequest::delete()
        .uri(&format!("/api/v1/user/alice/certificate/{fingerprint}"))
        .to_request();
    let response = test::call_service(&app, request).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let request = TestRequest::get()
        .uri("/api/v1/user/alice/certificate")
        .to_request();
    let doc: Value = test::call_and_read_body_json(&app, request).await;
    assert_eq!(doc[0]["active"], false);

    // and activate again
    let request = TestRequest::put()
        .uri(&format!("/api/v1/user/alice/certificate/{fingerprint}"))
        .to_request();
    let response = test::call_service(&app, request).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    Ok(())
}

#[test_context(SignaryContext)]
#[test_log::test(actix_web::test)]
async fn unknown_user_is_not_found(ctx: &SignaryContext) -> Result<(), anyhow::Error> {
    let app = test::init_service(
        App::new().configure(|svc| configure(svc, ctx.certificates.clone())),
    )
    .await;

    let request = TestRequest::get()
        .uri("/api/v1/user/nobody/certificate")
        .to_request();
    let response = test::call_service(&app, request).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    // an upload for an unknown user must not create anything
    let request = TestRequest::post()
        .uri("/api/v1/user/nobody/certificate")
        .set_payload(certificate_bytes("nobody"))
        .to_request();
    let response = test::call_service(&app, request).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let doc: Value = test::read_body_json(response).await;
    assert_eq!(doc["error"], "NotFound");

    assert!(ctx.audit.records().is_empty());

    Ok(())
}

#[test_context(SignaryContext)]
#[test_log::test(actix_web::test)]
async fn malformed_fingerprint_is_bad_request(ctx: &SignaryContext) -> Result<(), anyhow::Error> {
    ctx.ingest_user("alice").await?;

    let app = test::init_service(
        App::new().configure(|svc| configure(svc, ctx.certificates.clone())),
    )
    .await;

    let request = TestRequest::put()
        .uri("/api/v1/user/alice/certificate/not-hex")
        .to_request();
    let response = test::call_service(&app, request).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let doc: Value = test::read_body_json(response).await;
    assert_eq!(doc["error"], "InvalidFingerprint");

    Ok(())
}

#[test_context(SignaryContext)]
#[test_log::test(actix_web::test)]
async fn download_missing_certificate(ctx: &SignaryContext) -> Result<(), anyhow::Error> {
    let app = test::init_service(
        App::new().configure(|svc| configure(svc, ctx.certificates.clone())),
    )
    .await;

    let missing = "0".repeat(64);
    let request = TestRequest::get()
        .uri(&format!("/api/v1/certificate/{missing}/download"))
        .to_request();
    let response = test::call_service(&app, request).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    Ok(())
}

#[test_context(SignaryContext)]
#[test_log::test(actix_web::test)]
async fn empty_upload_is_bad_request(ctx: &SignaryContext) -> Result<(), anyhow::Error> {
    ctx.ingest_user("alice").await?;

    let app = test::init_service(
        App::new().configure(|svc| configure(svc, ctx.certificates.clone())),
    )
    .await;

    let request = TestRequest::post()
        .uri("/api/v1/user/alice/certificate")
        .to_request();
    let response = test::call_service(&app, request).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let doc: Value = test::read_body_json(response).await;
    assert_eq!(doc["error"], "EmptyUpload");

    Ok(())
}

use crate::{
    model::{RequiredSignerProjection, SignerOption},
    service::{Error, SignerService},
};
use actix_web::{get, put, web, HttpResponse, Responder};
use utoipa::{IntoParams, OpenApi, ToSchema};

/// mount the "signer" module
pub fn configure(config: &mut web::ServiceConfig, service: SignerService) {
    config
        .app_data(web::Data::new(service))
        .service(get_required_signer)
        .service(put_required_signer);
}

#[derive(OpenApi)]
#[openapi(
    paths(get_required_signer, put_required_signer),
    components(schemas(
        RequiredSignerProjection,
        SignerOption,
        RequiredSignerRequest,
        signary_common::error::ErrorInformation,
    )),
    tags()
)]
pub struct ApiDoc;

#[derive(Clone, Debug, serde::Deserialize, IntoParams)]
pub struct ViewerQuery {
    /// The account looking at the controls.
    pub viewer: String,
}

/// The designated signer to require, or `null` to clear the designation.
#[derive(Clone, Debug, serde::Deserialize, serde::Serialize, ToSchema)]
pub struct RequiredSignerRequest {
    pub username: Option<String>,
}

#[utoipa::path(
    tag = "signer",
    params(
        ("package", Path, description = "Name of the package registration"),
        ViewerQuery,
    ),
    responses(
        (status = 200, description = "The required-signer controls", body = RequiredSignerProjection),
        (status = 404, description = "Unknown package or viewer"),
    )
)]
#[get("/api/v1/package/{package}/required-signer")]
pub async fn get_required_signer(
    service: web::Data<SignerService>,
    path: web::Path<String>,
    web::Query(ViewerQuery { viewer }): web::Query<ViewerQuery>,
) -> Result<impl Responder, Error> {
    let package = path.into_inner();

    Ok(HttpResponse::Ok().json(service.required_signer_controls(&package, &viewer).await?))
}

#[utoipa::path(
    tag = "signer",
    request_body = RequiredSignerRequest,
    params(
        ("package", Path, description = "Name of the package registration"),
        ViewerQuery,
    ),
    responses(
        (status = 204, description = "The required signer was changed"),
        (status = 400, description = "The designated user does not own the package"),
        (status = 403, description = "The viewer may not change the required signer"),
        (status = 404, description = "Unknown package or viewer"),
    )
)]
#[put("/api/v1/package/{package}/required-signer")]
pub async fn put_required_signer(
    service: web::Data<SignerService>,
    path: web::Path<String>,
    web::Query(ViewerQuery { viewer }): web::Query<ViewerQuery>,
    web::Json(request): web::Json<RequiredSignerRequest>,
) -> Result<impl Responder, Error> {
    let package = path.into_inner();

    service
        .set_required_signer(&package, &viewer, request.username.as_deref())
        .await?;

    Ok(HttpResponse::NoContent().finish())
}

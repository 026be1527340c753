use crate::{
    model::{CertificateSummary, UserCertificateSummary},
    service::{blob_path, CertificateService, Error, CONTAINER},
};
use actix_web::{delete, get, post, put, web, HttpResponse, Responder};
use futures::TryStreamExt;
use signary_common::fingerprint::Fingerprint;
use signary_module_storage::service::StorageBackend;
use std::str::FromStr;
use utoipa::OpenApi;

/// mount the "certificate" module
pub fn configure(config: &mut web::ServiceConfig, service: CertificateService) {
    config
        .app_data(web::Data::new(service))
        .service(list_certificates)
        .service(upload_certificate)
        .service(activate_certificate)
        .service(deactivate_certificate)
        .service(download_certificate);
}

#[derive(OpenApi)]
#[openapi(
    paths(
        list_certificates,
        upload_certificate,
        activate_certificate,
        deactivate_certificate,
        download_certificate,
    ),
    components(schemas(
        CertificateSummary,
        UserCertificateSummary,
        signary_common::error::ErrorInformation,
    )),
    tags()
)]
pub struct ApiDoc;

#[utoipa::path(
    tag = "certificate",
    params(
        ("user", Path, description = "Name of the user account"),
    ),
    responses(
        (status = 200, description = "Certificates linked to the account", body = [UserCertificateSummary]),
        (status = 404, description = "The user is not known"),
    )
)]
#[get("/api/v1/user/{user}/certificate")]
pub async fn list_certificates(
    service: web::Data<CertificateService>,
    path: web::Path<String>,
) -> Result<impl Responder, Error> {
    let user = path.into_inner();

    Ok(HttpResponse::Ok().json(service.get_certificates(&user).await?))
}

#[utoipa::path(
    tag = "certificate",
    request_body = Vec<u8>,
    params(
        ("user", Path, description = "Name of the user account"),
    ),
    responses(
        (status = 201, description = "The certificate was stored and activated", body = CertificateSummary),
        (status = 400, description = "The upload was empty or rejected by validation"),
        (status = 404, description = "The user is not known"),
    )
)]
#[post("/api/v1/user/{user}/certificate")]
pub async fn upload_certificate(
    service: web::Data<CertificateService>,
    path: web::Path<String>,
    bytes: web::Bytes,
) -> Result<impl Responder, Error> {
    let user = path.into_inner();

    // resolve the account first, an unknown user must not create anything
    service
        .graph()
        .get_user_by_name(&user, ())
        .await?
        .ok_or_else(|| Error::UserNotFound(user.clone()))?;

    let certificate = service.add_certificate(bytes).await?;
    service
        .activate_certificate(&certificate.fingerprint, &user)
        .await?;

    Ok(HttpResponse::Created().json(certificate))
}

#[utoipa::path(
    tag = "certificate",
    params(
        ("user", Path, description = "Name of the user account"),
        ("fingerprint", Path, description = "SHA-256 fingerprint of the certificate"),
    ),
    responses(
        (status = 204, description = "The certificate is active for the account"),
        (status = 400, description = "The fingerprint is malformed"),
        (status = 404, description = "Unknown user or certificate"),
    )
)]
#[put("/api/v1/user/{user}/certificate/{fingerprint}")]
pub async fn activate_certificate(
    service: web::Data<CertificateService>,
    path: web::Path<(String, String)>,
) -> Result<impl Responder, Error> {
    let (user, fingerprint) = path.into_inner();

    service.activate_certificate(&fingerprint, &user).await?;

    Ok(HttpResponse::NoContent().finish())
}

#[utoipa::path(
    tag = "certificate",
    params(
        ("user", Path, description = "Name of the user account"),
        ("fingerprint", Path, description = "SHA-256 fingerprint of the certificate"),
    ),
    responses(
        (status = 204, description = "The certificate is inactive for the account"),
        (status = 400, description = "The fingerprint is malformed"),
        (status = 404, description = "Unknown user or certificate"),
    )
)]
#[delete("/api/v1/user/{user}/certificate/{fingerprint}")]
pub async fn deactivate_certificate(
    service: web::Data<CertificateService>,
    path: web::Path<(String, String)>,
) -> Result<impl Responder, Error> {
    let (user, fingerprint) = path.into_inner();

    service.deactivate_certificate(&fingerprint, &user).await?;

    Ok(HttpResponse::NoContent().finish())
}

#[utoipa::path(
    tag = "certificate",
    params(
        ("fingerprint", Path, description = "SHA-256 fingerprint of the certificate"),
    ),
    responses(
        (status = 200, description = "Download the certificate file", body = Vec<u8>),
        (status = 404, description = "The certificate could not be found"),
    )
)]
#[get("/api/v1/certificate/{fingerprint}/download")]
pub async fn download_certificate(
    service: web::Data<CertificateService>,
    path: web::Path<String>,
) -> Result<impl Responder, Error> {
    let fingerprint = Fingerprint::from_str(&path.into_inner())?;

    let stream = service
        .storage()
        .clone()
        .retrieve(CONTAINER.to_string(), blob_path(&fingerprint))
        .await
        .map_err(Error::Storage)?
        .ok_or(Error::CertificateNotFound)?;

    Ok(HttpResponse::Ok().streaming(stream.map_err(Error::Storage)))
}

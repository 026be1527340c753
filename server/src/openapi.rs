use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(paths(), components(), tags())]
pub struct ApiDoc;

/// The API document of all mounted modules.
pub fn openapi() -> utoipa::openapi::OpenApi {
    let mut doc = ApiDoc::openapi();

    doc.info.title = "Signary".to_string();
    doc.info.version = env!("CARGO_PKG_VERSION").to_string();

    doc.merge(signary_module_certificate::endpoints::ApiDoc::openapi());
    doc.merge(signary_module_signer::endpoints::ApiDoc::openapi());

    doc
}

use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;
use axum::Router;
use std::sync::Arc;

use crate::{
    models::{
        ConsultationType, CreateDoctor, Doctor, DoctorCreatedResponse, DoctorMessageResponse,
        ErrorResponse, MessageResponse, UpdateDoctor,
    },
    AppState,
};

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::doctors::create_doctor,
        crate::routes::doctors::list_doctors,
        crate::routes::doctors::upload_doctor,
        crate::routes::doctors::update_doctor,
        crate::routes::doctors::delete_doctor,
    ),
    components(
        schemas(
            Doctor, ConsultationType, CreateDoctor, UpdateDoctor,
            DoctorCreatedResponse, DoctorMessageResponse, MessageResponse, ErrorResponse
        )
    ),
    tags(
        (name = "doctors", description = "Doctor record management"),
    ),
    info(
        title = "Medway API",
        version = "0.1.0",
        description = "Doctor directory with portrait uploads"
    )
)]
pub struct ApiDoc;

pub fn create_swagger_router() -> Router<Arc<AppState>> {
    SwaggerUi::new("/swagger-ui")
        .url("/api-docs/openapi.json", ApiDoc::openapi())
        .into()
}

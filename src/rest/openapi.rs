//! OpenAPI specification builder using utoipa.

use utoipa::OpenApi;

use crate::catalog::CatalogData;
use crate::rest::dto::{
    ClockInKind, CreateWizardRequest, HealthResponse, RoleSummary, RolesResponse,
    SelectRoleRequest, SelectionRequest, WizardResponse,
};
use crate::rest::error::ErrorResponse;
use crate::submit::SubmitOutcome;
use crate::types::{ClockInRoleType, SelectOption, ViewFlags, WorkRole};
use crate::wizard::{WizardState, WizardStep, WizardView};

/// OpenAPI documentation for the timeclock REST API
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Timeclock API",
        version = "0.1.0",
        description = "REST API driving the employee clock-in wizard.",
        license(name = "MIT")
    ),
    paths(
        crate::rest::routes::health::health,
        crate::rest::routes::roles::list,
        crate::rest::routes::catalog::get,
        crate::rest::routes::catalog::refresh,
        crate::rest::routes::wizards::create,
        crate::rest::routes::wizards::get_one,
        crate::rest::routes::wizards::delete,
        crate::rest::routes::wizards::select_role,
        crate::rest::routes::wizards::update_selection,
        crate::rest::routes::wizards::next,
        crate::rest::routes::wizards::prev,
        crate::rest::routes::wizards::return_to_previous,
        crate::rest::routes::wizards::submit,
    ),
    components(
        schemas(
            // Response types
            HealthResponse,
            RolesResponse,
            RoleSummary,
            CatalogData,
            WizardResponse,
            WizardView,
            WizardState,
            WizardStep,
            SubmitOutcome,
            ErrorResponse,
            // Shared types
            SelectOption,
            WorkRole,
            ClockInRoleType,
            ViewFlags,
            ClockInKind,
            // Request types
            CreateWizardRequest,
            SelectRoleRequest,
            SelectionRequest,
        )
    ),
    tags(
        (name = "Health", description = "Health check endpoint"),
        (name = "Roles", description = "Role resolution from permission flags"),
        (name = "Catalog", description = "Dropdown reference data"),
        (name = "Wizards", description = "Clock-in wizard lifecycle"),
    )
)]
pub struct ApiDoc;

impl ApiDoc {
    /// Generate the OpenAPI specification as a JSON string
    pub fn json() -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&Self::openapi())
    }
}

//! OpenAPI documentation definition.

use admintool_core::context::Context;
use admintool_core::menu::{Breadcrumb, Method, RouteName};
use admintool_core::table::{ColumnData, Status, TableData};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::handlers::handle_health,
        crate::handlers::handle_menu,
        crate::handlers::handle_context,
        crate::handlers::handle_table,
    ),
    components(schemas(
        RouteName,
        Method,
        Context,
        Breadcrumb,
        TableData,
        ColumnData,
        Status,
    )),
    info(
        title = "admintool API",
        version = "1.0",
        description = "Menu registry, page contexts and report tables of the admin tool"
    )
)]
pub(crate) struct ApiDoc;

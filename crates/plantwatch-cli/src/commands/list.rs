use plantwatch_api_models::endpoints::list_path;
use plantwatch_api_models::{ApiResponse, ListFilters, PaginateData, PaginateRequest, PaginateResponse};
use plantwatch_ui::core::api::Method;
use plantwatch_ui::{HierarchyLevel, HierarchyState};
use serde_json::Value;

use crate::cli::{ListArgs, OutputFormat};
use crate::client::{AppContext, CliError, CliResult};
use crate::output::render_list;

/// Hierarchy filters for the levels that scope `levels`.
fn scoped_filters(state: &HierarchyState, levels: &[HierarchyLevel]) -> ListFilters {
    let mut filters = state.list_filters();
    for level in HierarchyLevel::ALL {
        if levels.contains(&level) {
            continue;
        }
        match level {
            HierarchyLevel::Account => filters.account = None,
            HierarchyLevel::Plant => filters.plant = None,
            HierarchyLevel::Area => filters.area = None,
            HierarchyLevel::System => filters.system = None,
        }
    }
    filters
}

pub(crate) fn build_request(ctx: &AppContext, args: &ListArgs) -> CliResult<PaginateRequest> {
    if args.page == 0 {
        return Err(CliError::validation("page starts at 1"));
    }
    let page_size = args
        .page_size
        .unwrap_or(ctx.session.config().default_page_size);
    if page_size == 0 {
        return Err(CliError::validation("page size must be at least 1"));
    }
    let state = ctx.session.hierarchy().snapshot();
    let filters = ListFilters {
        code: args.code.clone(),
        description: args.description.clone(),
        ..scoped_filters(&state, args.entity.scope())
    };
    Ok(PaginateRequest {
        page: args.page,
        page_size,
        filters,
    })
}

pub(crate) async fn handle_list(ctx: &AppContext, args: &ListArgs, format: OutputFormat) -> CliResult<()> {
    let request = build_request(ctx, args)?;
    let response: ApiResponse<PaginateData<Value>> = ctx
        .call(Method::Get, &list_path(args.entity.resource(), &request), None)
        .await?;
    let page = PaginateResponse::from_data(response.data, &request);
    render_list(&page, format)
}

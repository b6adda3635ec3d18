use plantwatch_api_models::endpoints::{self, assets_outlook_path};
use plantwatch_api_models::{
    ApiResponse, AssetFilter, AssetOutlookDto, ComponentSummary, ComponentSummaryRequest,
    PaginateData,
};
use plantwatch_ui::core::api::Method;
use plantwatch_ui::core::outlook::{
    AssetOutlookState, component_ids, filter_from_hierarchy, merge_summaries, sort_components,
};
use tracing::warn;

use crate::cli::{OutlookArgs, OutputFormat};
use crate::client::{AppContext, CliError, CliResult};
use crate::output::render_outlook;

async fn fetch_page(ctx: &AppContext, state: &mut AssetOutlookState) -> CliResult<()> {
    state.begin_load();
    let path = assets_outlook_path(state.page, state.page_size, &state.filters);
    match ctx
        .call::<ApiResponse<PaginateData<AssetOutlookDto>>>(Method::Get, &path, None)
        .await
    {
        Ok(response) => {
            let data = response.data;
            let total = (data.total > 0).then_some(data.total);
            state.apply_page(data, total);
            Ok(())
        }
        Err(err) => {
            state.apply_error(Some(err.display_message()));
            Err(err)
        }
    }
}

async fn attach_summaries(ctx: &AppContext, state: &mut AssetOutlookState) {
    let ids = component_ids(&state.items);
    if ids.is_empty() {
        return;
    }
    let body = match serde_json::to_value(ComponentSummaryRequest { component_ids: ids }) {
        Ok(body) => body,
        Err(err) => {
            warn!(error = %err, "could not encode summary request");
            return;
        }
    };
    match ctx
        .call::<ApiResponse<Vec<ComponentSummary>>>(Method::Post, endpoints::COMPONENT_SUMMARY, Some(&body))
        .await
    {
        Ok(response) => merge_summaries(&mut state.items, &response.data),
        Err(err) => warn!(error = %err.display_message(), "component summaries unavailable"),
    }
}

pub(crate) async fn handle_outlook(ctx: &AppContext, args: OutlookArgs, format: OutputFormat) -> CliResult<()> {
    if args.page == 0 {
        return Err(CliError::validation("page starts at 1"));
    }
    let mut state = AssetOutlookState::default();
    state.set_page(args.page);
    state.set_page_size(
        args.page_size
            .unwrap_or(ctx.session.config().outlook_page_size),
    );
    state.set_filters(AssetFilter {
        code: args.code,
        description: args.description,
        component_code: args.component_code,
        ..filter_from_hierarchy(&ctx.session.hierarchy().snapshot())
    });

    fetch_page(ctx, &mut state).await?;
    attach_summaries(ctx, &mut state).await;
    if let Some(field) = args.sort {
        sort_components(&mut state.items, field, args.order);
    }
    render_outlook(&state.items, format)
}

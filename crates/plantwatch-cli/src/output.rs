//! Output renderers and formatting helpers for CLI commands.

use std::fmt::Write as _;

use anyhow::anyhow;
use plantwatch_api_models::{AssetOutlookDto, PaginateResponse, User};
use plantwatch_ui::core::outlook::Technology;
use plantwatch_ui::{HierarchyLevel, HierarchyState};
use serde::Serialize;
use serde_json::Value;

use crate::cli::OutputFormat;
use crate::client::{CliError, CliResult};

/// Session summary printed by `whoami`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SessionSummary {
    pub(crate) authenticated: bool,
    pub(crate) two_factor_pending: bool,
    pub(crate) super_admin: bool,
    pub(crate) user: Option<User>,
    pub(crate) hierarchy: HierarchyState,
}

fn to_json<T: Serialize + ?Sized>(value: &T) -> CliResult<String> {
    serde_json::to_string_pretty(value)
        .map_err(|err| CliError::failure(anyhow!("failed to format JSON: {err}")))
}

fn emit<T: Serialize + ?Sized>(value: &T, format: OutputFormat, table: impl FnOnce() -> String) -> CliResult<()> {
    let text = match format {
        OutputFormat::Json => to_json(value)?,
        OutputFormat::Table => table(),
    };
    println!("{}", text.trim_end());
    Ok(())
}

pub(crate) fn render_session(summary: &SessionSummary, format: OutputFormat) -> CliResult<()> {
    emit(summary, format, || format_session(summary))
}

pub(crate) fn render_hierarchy(state: &HierarchyState, format: OutputFormat) -> CliResult<()> {
    emit(state, format, || format_hierarchy(state))
}

pub(crate) fn render_list(page: &PaginateResponse<Value>, format: OutputFormat) -> CliResult<()> {
    emit(page, format, || format_list(page))
}

pub(crate) fn render_outlook(assets: &[AssetOutlookDto], format: OutputFormat) -> CliResult<()> {
    emit(assets, format, || format_outlook(assets))
}

pub(crate) fn format_session(summary: &SessionSummary) -> String {
    let mut out = String::new();
    let status = if summary.authenticated {
        "authenticated"
    } else if summary.two_factor_pending {
        "awaiting second factor"
    } else {
        "logged out"
    };
    let _ = writeln!(out, "status: {status}");
    if let Some(user) = &summary.user {
        let name = user.name.as_deref().unwrap_or("-");
        let email = user.email.as_deref().unwrap_or("-");
        let _ = writeln!(out, "user: {name} <{email}>");
        if let Some(role) = user.role.as_ref().and_then(|role| role.description.as_deref()) {
            let _ = writeln!(out, "role: {role}");
        }
    }
    if summary.super_admin {
        let _ = writeln!(out, "super admin: yes");
    }
    out.push_str(&format_hierarchy(&summary.hierarchy));
    out
}

pub(crate) fn format_hierarchy(state: &HierarchyState) -> String {
    let mut out = String::new();
    for level in HierarchyLevel::ALL {
        let value = state.get(level);
        let shown = match value.id {
            Some(id) if value.readonly => format!("{} (#{id}, fixed)", value.description),
            Some(id) => format!("{} (#{id})", value.description),
            None => "-".to_string(),
        };
        let _ = writeln!(out, "{:<8} {shown}", format!("{level}:"));
    }
    out
}

fn text_field<'a>(row: &'a Value, keys: &[&str]) -> &'a str {
    keys.iter()
        .find_map(|key| row.get(*key).and_then(Value::as_str).filter(|text| !text.is_empty()))
        .unwrap_or("-")
}

pub(crate) fn format_list(page: &PaginateResponse<Value>) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{:>8} {:<16} DESCRIPTION", "ID", "CODE");
    for row in &page.rows {
        let id = row
            .get("id")
            .and_then(Value::as_i64)
            .map_or_else(|| "-".to_string(), |id| id.to_string());
        let _ = writeln!(
            out,
            "{id:>8} {:<16} {}",
            text_field(row, &["code"]),
            text_field(row, &["description", "name", "label", "email"])
        );
    }
    let pages = if page.size == 0 {
        1
    } else {
        page.total.div_ceil(u64::from(page.size)).max(1)
    };
    let _ = writeln!(out, "page {} of {pages} ({} total)", page.page, page.total);
    out
}

pub(crate) fn format_outlook(assets: &[AssetOutlookDto]) -> String {
    let mut out = String::new();
    let mut header = format!("{:<16} {:<12}", "COMPONENT", "TYPE");
    for tech in Technology::ALL {
        let _ = write!(header, " {:<11}", tech.label());
    }
    for asset in assets {
        let _ = writeln!(out, "{} {}", asset.code, asset.description);
        let _ = writeln!(out, "  {}", header.trim_end());
        for component in &asset.components {
            let kind = component
                .component_type
                .as_ref()
                .and_then(|kind| kind.code.as_deref())
                .unwrap_or("-");
            let mut line = format!("{:<16} {kind:<12}", component.code);
            for tech in Technology::ALL {
                let _ = write!(line, " {:<11}", tech.cell_label(component));
            }
            let _ = writeln!(out, "  {}", line.trim_end());
        }
    }
    if assets.is_empty() {
        out.push_str("no assets match the current selection\n");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use plantwatch_api_models::{ComponentOutlookDto, EntityRef};
    use plantwatch_ui::HierarchyValue;
    use serde_json::json;

    #[test]
    fn hierarchy_table_marks_fixed_levels() {
        let state = HierarchyState {
            account: HierarchyValue {
                id: Some(5),
                description: "Acme".into(),
                readonly: true,
            },
            plant: HierarchyValue::selected(2, "North"),
            ..HierarchyState::default()
        };
        let text = format_hierarchy(&state);
        assert!(text.contains("account: Acme (#5, fixed)"));
        assert!(text.contains("plant:   North (#2)"));
        assert!(text.contains("system:  -"));
    }

    #[test]
    fn list_table_falls_back_across_text_fields() {
        let page = PaginateResponse {
            rows: vec![
                json!({"id": 1, "code": "P1", "description": "Boiler"}),
                json!({"id": 2, "name": "Ops"}),
            ],
            page: 1,
            size: 10,
            total: 21,
        };
        let text = format_list(&page);
        assert!(text.contains("Boiler"));
        assert!(text.contains("Ops"));
        assert!(text.contains("page 1 of 3 (21 total)"));
    }

    #[test]
    fn outlook_table_shows_reading_dates() {
        let assets = vec![AssetOutlookDto {
            id: 1,
            code: "PUMP-1".into(),
            description: "Feed pump".into(),
            components: vec![ComponentOutlookDto {
                id: 10,
                code: "MTR".into(),
                component_type: Some(EntityRef {
                    code: Some("MOTOR".into()),
                    ..EntityRef::default()
                }),
                vibdate: Some("2024-03-05T10:00:00Z".into()),
                ..ComponentOutlookDto::default()
            }],
        }];
        let text = format_outlook(&assets);
        assert!(text.starts_with("PUMP-1 Feed pump"));
        assert!(text.contains("MOTOR"));
        assert!(text.contains("2024-03-05"));
        assert!(format_outlook(&[]).contains("no assets"));
    }

    #[test]
    fn session_summary_reports_pending_second_factor() {
        let summary = SessionSummary {
            authenticated: false,
            two_factor_pending: true,
            super_admin: false,
            user: Some(User {
                email: Some("ops@example.com".into()),
                ..User::default()
            }),
            hierarchy: HierarchyState::default(),
        };
        let text = format_session(&summary);
        assert!(text.contains("status: awaiting second factor"));
        assert!(text.contains("<ops@example.com>"));
    }
}

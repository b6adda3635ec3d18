//! Condition-monitoring outlook: technology table, alarm ranking, sorting,
//! summary merge, and the page state behind the outlook view.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use plantwatch_api_models::{
    AlarmData, AssetFilter, AssetOutlookDto, ComponentOutlookDto, ComponentSummary,
    PaginateData,
};

use crate::core::hierarchy::{HierarchyLevel, HierarchyState};

/// Default rows per outlook page.
pub const DEFAULT_OUTLOOK_PAGE_SIZE: u32 = 100;

/// Monitoring technology reported per component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Technology {
    /// Vibration analysis.
    Vib,
    /// Tribology analysis.
    Trib,
    /// Motor current analysis.
    Mce,
    /// IR rotational.
    IrRot,
    /// IR electrical.
    IrElec,
    /// IR structural.
    IrStruc,
    /// UE rotational.
    UeRot,
    /// UE electrical.
    UeElec,
    /// UE leak detection.
    UeLeak,
    /// Balance analysis.
    Bal,
    /// Alignment analysis.
    Algn,
}

impl Technology {
    /// Every technology in table order.
    pub const ALL: [Self; 11] = [
        Self::Vib,
        Self::Trib,
        Self::Mce,
        Self::IrRot,
        Self::IrElec,
        Self::IrStruc,
        Self::UeRot,
        Self::UeElec,
        Self::UeLeak,
        Self::Bal,
        Self::Algn,
    ];

    /// Wire key (also the summary flag field).
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Vib => "vib",
            Self::Trib => "trib",
            Self::Mce => "mce",
            Self::IrRot => "irrot",
            Self::IrElec => "irelec",
            Self::IrStruc => "irstruc",
            Self::UeRot => "uerot",
            Self::UeElec => "ueelec",
            Self::UeLeak => "ueleak",
            Self::Bal => "bal",
            Self::Algn => "algn",
        }
    }

    /// Column header.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Vib => "Vib",
            Self::Trib => "Trib",
            Self::Mce => "MCE",
            Self::IrRot => "IRr",
            Self::IrElec => "IRe",
            Self::IrStruc => "IRs",
            Self::UeRot => "UEr",
            Self::UeElec => "UEe",
            Self::UeLeak => "UEL",
            Self::Bal => "Bal",
            Self::Algn => "Algn",
        }
    }

    /// Column tooltip.
    #[must_use]
    pub const fn tooltip(self) -> &'static str {
        match self {
            Self::Vib => "Vibration Analysis",
            Self::Trib => "Tribology Analysis",
            Self::Mce => "Motor Current Analysis",
            Self::IrRot => "IR Rotational",
            Self::IrElec => "IR Electrical",
            Self::IrStruc => "IR Structural",
            Self::UeRot => "UE Rotational",
            Self::UeElec => "UE Electrical",
            Self::UeLeak => "UE Leak Detection",
            Self::Bal => "Balance Analysis",
            Self::Algn => "Alignment Analysis",
        }
    }

    /// Name of the reading-date field.
    #[must_use]
    pub fn date_field(self) -> String {
        format!("{}date", self.key())
    }

    /// Name of the alarm field.
    #[must_use]
    pub fn alarm_field(self) -> String {
        format!("{}alarm", self.key())
    }

    /// Last reading date of `component` for this technology.
    #[must_use]
    pub fn date(self, component: &ComponentOutlookDto) -> Option<&str> {
        let value = match self {
            Self::Vib => &component.vibdate,
            Self::Trib => &component.tribdate,
            Self::Mce => &component.mcedate,
            Self::IrRot => &component.irrotdate,
            Self::IrElec => &component.irelecdate,
            Self::IrStruc => &component.irstrucdate,
            Self::UeRot => &component.uerotdate,
            Self::UeElec => &component.ueelecdate,
            Self::UeLeak => &component.ueleakdate,
            Self::Bal => &component.baldate,
            Self::Algn => &component.algndate,
        };
        value.as_deref()
    }

    /// Alarm of `component` for this technology.
    #[must_use]
    pub const fn alarm(self, component: &ComponentOutlookDto) -> Option<&AlarmData> {
        let value = match self {
            Self::Vib => &component.vibalarm,
            Self::Trib => &component.tribalarm,
            Self::Mce => &component.mcealarm,
            Self::IrRot => &component.irrotalarm,
            Self::IrElec => &component.irelecalarm,
            Self::IrStruc => &component.irstrucalarm,
            Self::UeRot => &component.uerotalarm,
            Self::UeElec => &component.ueelecalarm,
            Self::UeLeak => &component.ueleakalarm,
            Self::Bal => &component.balalarm,
            Self::Algn => &component.algnalarm,
        };
        value.as_ref()
    }

    /// Summary flag of `component` for this technology.
    #[must_use]
    pub const fn summary_flag(self, component: &ComponentOutlookDto) -> Option<i32> {
        match self {
            Self::Vib => component.vib,
            Self::Trib => component.trib,
            Self::Mce => component.mce,
            Self::IrRot => component.irrot,
            Self::IrElec => component.irelec,
            Self::IrStruc => component.irstruc,
            Self::UeRot => component.uerot,
            Self::UeElec => component.ueelec,
            Self::UeLeak => component.ueleak,
            Self::Bal => component.bal,
            Self::Algn => component.algn,
        }
    }

    /// Table cell text for `component`.
    #[must_use]
    pub fn cell_label(self, component: &ComponentOutlookDto) -> String {
        format_date_label(
            self.date(component),
            self.summary_flag(component),
            component.exist_summary,
        )
    }
}

impl fmt::Display for Technology {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Technology {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let wanted = value.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|tech| tech.key() == wanted)
            .ok_or_else(|| format!("unknown technology '{value}'"))
    }
}

/// Rank of an alarm colour: red 3, yellow 2, green 1, anything else 0.
#[must_use]
pub fn alarm_priority(alarm: Option<&AlarmData>) -> u8 {
    match alarm.map(|alarm| alarm.color.to_ascii_lowercase()).as_deref() {
        Some("red") => 3,
        Some("yellow") => 2,
        Some("green") => 1,
        _ => 0,
    }
}

/// CSS classes for an alarm cell.
#[must_use]
pub fn alarm_class(alarm: Option<&AlarmData>) -> &'static str {
    match alarm_priority(alarm) {
        3 => "text-red-600 font-semibold",
        2 => "text-yellow-600 font-semibold",
        1 => "text-green-600 font-semibold",
        _ => "text-muted-foreground",
    }
}

/// Parse a reading timestamp. Accepts RFC 3339, naive date-times, and plain
/// dates (taken as UTC).
#[must_use]
pub fn parse_reading_date(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Some(parsed.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(value, format) {
            return Some(parsed.and_utc());
        }
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|parsed| parsed.and_utc())
}

/// Cell text for a reading: `-` when missing or unparseable, otherwise the
/// date, starred when a summary exists for it.
#[must_use]
pub fn format_date_label(value: Option<&str>, summary_flag: Option<i32>, exist_summary: bool) -> String {
    let Some(value) = value.filter(|value| !value.is_empty()) else {
        return "-".to_string();
    };
    let label = parse_reading_date(value)
        .map_or_else(|| "-".to_string(), |date| date.format("%Y-%m-%d").to_string());
    if exist_summary && summary_flag == Some(1) {
        format!("{label}*")
    } else {
        label
    }
}

/// Column used to order components within an asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    /// Owning asset code.
    Asset,
    /// Component type code.
    Type,
    /// Component code.
    Component,
    /// Reading date, then alarm rank, for one technology.
    Technology(Technology),
}

impl FromStr for SortField {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "asset" => Ok(Self::Asset),
            "type" => Ok(Self::Type),
            "component" => Ok(Self::Component),
            other => other
                .parse::<Technology>()
                .map(Self::Technology)
                .map_err(|_| format!("unknown sort field '{value}'")),
        }
    }
}

/// Sort direction; `None` keeps server order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    /// Ascending.
    #[default]
    Asc,
    /// Descending.
    Desc,
    /// Unsorted.
    None,
}

impl FromStr for SortOrder {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "asc" => Ok(Self::Asc),
            "desc" => Ok(Self::Desc),
            "none" => Ok(Self::None),
            other => Err(format!("unknown sort order '{other}'")),
        }
    }
}

fn reading_millis(component: &ComponentOutlookDto, tech: Technology) -> i64 {
    tech.date(component)
        .and_then(parse_reading_date)
        .map_or(0, |date| date.timestamp_millis())
}

fn text_key<'a>(component: &'a ComponentOutlookDto, asset: &'a AssetOutlookDto, field: SortField) -> &'a str {
    match field {
        SortField::Asset => &asset.code,
        SortField::Type => component
            .component_type
            .as_ref()
            .and_then(|kind| kind.code.as_deref())
            .unwrap_or(""),
        SortField::Component => &component.code,
        SortField::Technology(_) => "",
    }
}

/// Order two components of `asset`. Technology columns compare reading dates
/// (missing dates sort as the epoch) and break ties on alarm rank; text
/// columns compare codes.
#[must_use]
pub fn compare_components(
    a: &ComponentOutlookDto,
    b: &ComponentOutlookDto,
    asset: &AssetOutlookDto,
    field: SortField,
    order: SortOrder,
) -> Ordering {
    let ascending = match field {
        SortField::Technology(tech) => reading_millis(a, tech)
            .cmp(&reading_millis(b, tech))
            .then_with(|| alarm_priority(tech.alarm(a)).cmp(&alarm_priority(tech.alarm(b)))),
        _ => text_key(a, asset, field).cmp(text_key(b, asset, field)),
    };
    match order {
        SortOrder::Asc => ascending,
        SortOrder::Desc => ascending.reverse(),
        SortOrder::None => Ordering::Equal,
    }
}

/// Sort every asset's components in place (stable).
pub fn sort_components(assets: &mut [AssetOutlookDto], field: SortField, order: SortOrder) {
    if order == SortOrder::None {
        return;
    }
    for asset in assets {
        let mut components = std::mem::take(&mut asset.components);
        components.sort_by(|a, b| compare_components(a, b, asset, field, order));
        asset.components = components;
    }
}

/// Identifiers of every component across `assets`.
#[must_use]
pub fn component_ids(assets: &[AssetOutlookDto]) -> Vec<i64> {
    assets
        .iter()
        .flat_map(|asset| asset.components.iter().map(|component| component.id))
        .collect()
}

/// Copy summary flags onto matching components; components without a summary
/// get `exist_summary = false`.
pub fn merge_summaries(assets: &mut [AssetOutlookDto], summaries: &[ComponentSummary]) {
    let by_id: HashMap<i64, &ComponentSummary> =
        summaries.iter().map(|summary| (summary.id, summary)).collect();
    for component in assets.iter_mut().flat_map(|asset| asset.components.iter_mut()) {
        match by_id.get(&component.id) {
            Some(summary) => {
                component.exist_summary = summary.exist_summary.unwrap_or(false);
                component.vib = summary.vib;
                component.trib = summary.trib;
                component.mce = summary.mce;
                component.irrot = summary.irrot;
                component.irelec = summary.irelec;
                component.irstruc = summary.irstruc;
                component.uerot = summary.uerot;
                component.ueelec = summary.ueelec;
                component.ueleak = summary.ueleak;
                component.bal = summary.bal;
                component.algn = summary.algn;
            }
            None => component.exist_summary = false,
        }
    }
}

/// Asset filter restricted to the selected hierarchy levels.
#[must_use]
pub fn filter_from_hierarchy(state: &HierarchyState) -> AssetFilter {
    let mut filter = AssetFilter::default();
    for (level, reference) in state.id_refs() {
        match level {
            HierarchyLevel::Account => filter.account = reference,
            HierarchyLevel::Plant => filter.plant = reference,
            HierarchyLevel::Area => filter.area = reference,
            HierarchyLevel::System => filter.system = reference,
        }
    }
    filter
}

/// State behind the outlook table.
#[derive(Debug, Clone, PartialEq)]
pub struct AssetOutlookState {
    /// Rows on the current page.
    pub items: Vec<AssetOutlookDto>,
    /// Total assets across pages.
    pub total: u64,
    /// Current page (1-based).
    pub page: u32,
    /// Rows per page.
    pub page_size: u32,
    /// Whether a load is in flight.
    pub loading: bool,
    /// Last load failure.
    pub error: Option<String>,
    /// Server-side filters.
    pub filters: AssetFilter,
    /// Free-text search box.
    pub search: String,
}

impl Default for AssetOutlookState {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            total: 0,
            page: 1,
            page_size: DEFAULT_OUTLOOK_PAGE_SIZE,
            loading: false,
            error: None,
            filters: AssetFilter::default(),
            search: String::new(),
        }
    }
}

impl AssetOutlookState {
    /// Move to `page`.
    pub const fn set_page(&mut self, page: u32) {
        self.page = page;
    }

    /// Change the page size.
    pub const fn set_page_size(&mut self, page_size: u32) {
        self.page_size = page_size;
    }

    /// Update the search text.
    pub fn set_search(&mut self, search: impl Into<String>) {
        self.search = search.into();
    }

    /// Replace the server-side filters.
    pub fn set_filters(&mut self, filters: AssetFilter) {
        self.filters = filters;
    }

    /// Forget the last failure.
    pub fn reset_error(&mut self) {
        self.error = None;
    }

    /// Mark a load as started.
    pub fn begin_load(&mut self) {
        self.loading = true;
        self.error = None;
    }

    /// Store a loaded page. Components start without summaries; the total
    /// falls back to the row count.
    pub fn apply_page(&mut self, data: PaginateData<AssetOutlookDto>, total: Option<u64>) {
        let mut rows = data.records;
        for component in rows.iter_mut().flat_map(|asset| asset.components.iter_mut()) {
            component.exist_summary = false;
        }
        self.total = total.unwrap_or(rows.len() as u64);
        self.items = rows;
        self.loading = false;
    }

    /// Store a load failure.
    pub fn apply_error(&mut self, message: Option<String>) {
        self.loading = false;
        self.error = Some(message.unwrap_or_else(|| "Error loading assets".to_string()));
    }
}

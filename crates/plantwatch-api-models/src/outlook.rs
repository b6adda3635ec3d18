//! Condition-monitoring outlook payloads.
//!
//! Every component carries one `<tech>date` / `<tech>alarm` pair per
//! monitoring technology plus a numeric `<tech>` summary flag; the names match
//! the wire format exactly.

use serde::{Deserialize, Serialize};

use crate::entities::EntityRef;
use crate::pagination::IdRef;

/// Alarm severity attached to a technology reading.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AlarmData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Alarm identifier.
    pub id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Alarm code.
    pub code: Option<String>,
    #[serde(default)]
    /// Colour name (`GREEN`, `YELLOW`, `RED`).
    pub color: String,
}

/// Component row inside an outlook asset.
#[allow(missing_docs)]
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct ComponentOutlookDto {
    pub id: i64,
    pub code: String,
    pub name: Option<String>,
    pub description: Option<String>,
    pub component_type: Option<EntityRef>,
    pub vibdate: Option<String>,
    pub vibalarm: Option<AlarmData>,
    pub tribdate: Option<String>,
    pub tribalarm: Option<AlarmData>,
    pub mcedate: Option<String>,
    pub mcealarm: Option<AlarmData>,
    pub irrotdate: Option<String>,
    pub irrotalarm: Option<AlarmData>,
    pub irelecdate: Option<String>,
    pub irelecalarm: Option<AlarmData>,
    pub irstrucdate: Option<String>,
    pub irstrucalarm: Option<AlarmData>,
    pub uerotdate: Option<String>,
    pub uerotalarm: Option<AlarmData>,
    pub ueelecdate: Option<String>,
    pub ueelecalarm: Option<AlarmData>,
    pub ueleakdate: Option<String>,
    pub ueleakalarm: Option<AlarmData>,
    pub algndate: Option<String>,
    pub algnalarm: Option<AlarmData>,
    pub baldate: Option<String>,
    pub balalarm: Option<AlarmData>,
    /// Whether any technology summary exists for the component.
    pub exist_summary: bool,
    pub vib: Option<i32>,
    pub trib: Option<i32>,
    pub mce: Option<i32>,
    pub irrot: Option<i32>,
    pub irelec: Option<i32>,
    pub irstruc: Option<i32>,
    pub uerot: Option<i32>,
    pub ueelec: Option<i32>,
    pub ueleak: Option<i32>,
    pub bal: Option<i32>,
    pub algn: Option<i32>,
}

/// Asset row with its monitored components.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct AssetOutlookDto {
    /// Asset identifier.
    pub id: i64,
    /// Asset code.
    pub code: String,
    /// Asset description.
    pub description: String,
    /// Components of the asset.
    pub components: Vec<ComponentOutlookDto>,
}

/// Summary flags returned by `component/get-with-flag-exist-summary`.
#[allow(missing_docs)]
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct ComponentSummary {
    pub id: i64,
    pub exist_summary: Option<bool>,
    pub vib: Option<i32>,
    pub trib: Option<i32>,
    pub mce: Option<i32>,
    pub irrot: Option<i32>,
    pub irelec: Option<i32>,
    pub irstruc: Option<i32>,
    pub uerot: Option<i32>,
    pub ueelec: Option<i32>,
    pub ueleak: Option<i32>,
    pub bal: Option<i32>,
    pub algn: Option<i32>,
}

/// Body posted when requesting component summaries.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ComponentSummaryRequest {
    /// Components to look up.
    pub component_ids: Vec<i64>,
}

/// Filters accepted by the asset outlook listing.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AssetFilter {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Asset code substring.
    pub code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Asset description substring.
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Component code substring.
    pub component_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Component description substring.
    pub component_description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Account restriction.
    pub account: Option<IdRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Plant restriction.
    pub plant: Option<IdRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Area restriction.
    pub area: Option<IdRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// System restriction.
    pub system: Option<IdRef>,
}

impl AssetFilter {
    /// Query pairs for the outlook listing. Every filter key is always present
    /// (empty when unset) and components are always included.
    #[must_use]
    pub fn query_pairs(&self, page: u32, page_size: u32) -> Vec<(String, String)> {
        let text = |value: &Option<String>| value.clone().unwrap_or_default();
        let id = |value: Option<IdRef>| value.map(|r| r.id.to_string()).unwrap_or_default();
        vec![
            ("page".to_string(), page.to_string()),
            ("pageSize".to_string(), page_size.to_string()),
            ("filters.code".to_string(), text(&self.code)),
            ("filters.description".to_string(), text(&self.description)),
            ("filters.componentCode".to_string(), text(&self.component_code)),
            (
                "filters.componentDescription".to_string(),
                text(&self.component_description),
            ),
            ("filters.account.id".to_string(), id(self.account)),
            ("filters.plant.id".to_string(), id(self.plant)),
            ("filters.area.id".to_string(), id(self.area)),
            ("filters.system.id".to_string(), id(self.system)),
            ("filters.includeComponent".to_string(), "true".to_string()),
        ]
    }
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::date;

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountInfo {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub properties: Vec<AccountProperty>,
}

impl AccountInfo {
    /// Account property holding the regional API base URL.
    pub const API_ENDPOINT_PROPERTY: &'static str = "ApiEndpoint";

    /// Look up a property value by name.
    pub fn property(&self, name: &str) -> Option<&str> {
        self.properties
            .iter()
            .find(|property| property.name == name)
            .and_then(|property| property.value.as_deref())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountProperty {
    pub name: String,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub value: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddressBook {
    #[serde(default)]
    pub id: i64,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visibility: Option<String>,
    /// Number of contacts the provider reports for this address book.
    #[serde(default)]
    pub contacts: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct KeyVal {
    pub key: String,
    #[serde(default)]
    pub value: Option<String>,
}

impl KeyVal {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: Some(value.into()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opt_in_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email_type: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub data_fields: Vec<KeyVal>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
/// Contact data fields as the provider sends them: a list of key/value pairs.
///
/// Use as the `D` of [`PersonalisedContact`] when no custom decoding is needed.
pub struct DataFields(pub Vec<KeyVal>);

impl DataFields {
    /// Value of the first non-blank entry with the given key.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .filter(|entry| entry.key == key)
            .filter_map(|entry| entry.value.as_deref())
            .find(|value| !value.trim().is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
/// A contact whose `dataFields` are decoded into a caller-defined type.
pub struct PersonalisedContact<D> {
    #[serde(default)]
    pub id: Option<i64>,
    pub email: String,
    #[serde(default)]
    pub opt_in_type: Option<String>,
    #[serde(default)]
    pub email_type: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(rename = "dataFields")]
    pub details: D,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuppressedContact {
    pub suppressed_contact: Contact,
    #[serde(default, deserialize_with = "date::lenient")]
    pub date_removed: Option<DateTime<Utc>>,
    #[serde(default)]
    pub reason: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
/// Bulk import job handle.
pub struct JobStatus {
    pub id: String,
    #[serde(default)]
    pub status: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct JobReport {
    pub new_contacts: Option<u32>,
    pub updated_contacts: Option<u32>,
    pub globally_suppressed: Option<u32>,
    pub invalid_entries: Option<u32>,
    pub duplicate_emails: Option<u32>,
    pub blocked: Option<u32>,
    pub unsubscribed: Option<u32>,
    pub hard_bounced: Option<u32>,
    pub soft_bounced: Option<u32>,
    pub isp_complaints: Option<u32>,
    pub mail_blocked: Option<u32>,
    pub domain_suppressed: Option<u32>,
    pub pending_double_optin: Option<u32>,
    pub failures: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FromAddress {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub email: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CampaignInfo {
    pub id: i64,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub subject: Option<String>,
    #[serde(default)]
    pub from_name: Option<String>,
    #[serde(default)]
    pub from_address: Option<FromAddress>,
    #[serde(default)]
    pub html_content: Option<String>,
    #[serde(default)]
    pub plain_text_content: Option<String>,
    #[serde(default)]
    pub reply_action: Option<String>,
    #[serde(default)]
    pub reply_to_address: Option<String>,
    #[serde(default)]
    pub is_split_test: Option<bool>,
    #[serde(default)]
    pub status: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CampaignSummary {
    #[serde(deserialize_with = "date::lenient")]
    pub date_sent: Option<DateTime<Utc>>,
    pub num_unique_opens: Option<u32>,
    pub num_opens: Option<u32>,
    pub num_total_opens: Option<u32>,
    pub num_clicks: Option<u32>,
    pub num_total_clicks: Option<u32>,
    pub num_page_views: Option<u32>,
    pub num_forwards: Option<u32>,
    pub num_estimated_forwards: Option<u32>,
    pub num_replies: Option<u32>,
    pub num_hard_bounces: Option<u32>,
    pub num_soft_bounces: Option<u32>,
    pub num_unsubscribes: Option<u32>,
    pub num_isp_complaints: Option<u32>,
    pub num_mail_blocks: Option<u32>,
    pub num_sent: Option<u32>,
    pub num_delivered: Option<u32>,
    pub num_recipients_clicked: Option<u32>,
    pub percentage_delivered: Option<f64>,
    pub percentage_unique_opens: Option<f64>,
    pub percentage_opens: Option<f64>,
    pub percentage_unsubscribes: Option<f64>,
    pub percentage_replies: Option<f64>,
    pub percentage_hard_bounces: Option<f64>,
    pub percentage_soft_bounces: Option<f64>,
    pub percentage_users_clicked: Option<f64>,
    pub percentage_clicks_to_opens: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CampaignContactActivity {
    pub contact_id: Option<i64>,
    pub email: Option<String>,
    pub num_opens: Option<u32>,
    pub num_page_views: Option<u32>,
    pub num_clicks: Option<u32>,
    pub num_forwards: Option<u32>,
    pub num_estimated_forwards: Option<u32>,
    pub num_replies: Option<u32>,
    #[serde(deserialize_with = "date::lenient")]
    pub date_sent: Option<DateTime<Utc>>,
    #[serde(deserialize_with = "date::lenient")]
    pub date_first_opened: Option<DateTime<Utc>>,
    #[serde(deserialize_with = "date::lenient")]
    pub date_last_opened: Option<DateTime<Utc>>,
    pub first_open_ip: Option<String>,
    pub unsubscribed: Option<bool>,
    pub soft_bounced: Option<bool>,
    pub hard_bounced: Option<bool>,
}

#[derive(Debug, Clone, PartialEq)]
/// Campaign info stitched together with its summary and contact activities.
pub struct Campaign {
    pub info: CampaignInfo,
    pub summary: Option<CampaignSummary>,
    pub activities: Vec<CampaignContactActivity>,
}

impl From<CampaignInfo> for Campaign {
    fn from(info: CampaignInfo) -> Self {
        Self {
            info,
            summary: None,
            activities: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DataFieldType {
    String,
    Numeric,
    Date,
    Boolean,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum DataFieldVisibility {
    #[default]
    Private,
    Public,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataField {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: DataFieldType,
    #[serde(default)]
    pub visibility: DataFieldVisibility,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<serde_json::Value>,
}

impl DataField {
    /// Private data field without a default value.
    pub fn new(name: impl Into<String>, kind: DataFieldType) -> Self {
        Self {
            name: name.into(),
            kind,
            visibility: DataFieldVisibility::Private,
            default_value: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Program {
    pub id: i64,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default, deserialize_with = "date::lenient")]
    pub date_created: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProgramEnrolment {
    pub program_id: i64,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub contacts: Vec<i64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub address_books: Vec<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgramEnrolment {
    pub id: String,
    #[serde(default)]
    pub program_id: Option<i64>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default, deserialize_with = "date::lenient")]
    pub date_created: Option<DateTime<Utc>>,
    #[serde(default)]
    pub contacts: Vec<i64>,
    #[serde(default)]
    pub address_books: Vec<i64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AggregatedBy {
    AllTime,
    Month,
    Week,
    Day,
}

impl AggregatedBy {
    /// Value sent in the `aggregatedBy` query attribute.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::AllTime => "AllTime",
            Self::Month => "Month",
            Self::Week => "Week",
            Self::Day => "Day",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TransactionalEmailStatistics {
    #[serde(deserialize_with = "date::lenient")]
    pub start_date: Option<DateTime<Utc>>,
    #[serde(deserialize_with = "date::lenient")]
    pub end_date: Option<DateTime<Utc>>,
    pub num_sent: u32,
    pub num_delivered: u32,
    pub num_opens: u32,
    pub num_clicks: u32,
    pub num_isp_complaints: u32,
    pub num_bounces: u32,
}

use serde::Serialize;

use crate::client::DotmailerClient;
use crate::domain::{
    Failure, Outcome, StatisticsQuery, TransactionalEmailStatistics, TriggeredEmail, date,
};
use crate::transport::path;

const END_DATE: &str = "endDate";
const AGGREGATED_BY: &str = "aggregatedBy";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct TriggeredCampaignRequest<'a> {
    to_addresses: &'a [String],
    campaign_id: i64,
    personalization_values: Vec<NameValue<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct NameValue<'a> {
    name: &'a str,
    value: &'a str,
}

#[derive(Clone, Copy)]
/// Triggered (transactional) campaign sends and their statistics.
pub struct TransactionalResource<'a> {
    client: &'a DotmailerClient,
}

impl<'a> TransactionalResource<'a> {
    pub(crate) fn new(client: &'a DotmailerClient) -> Self {
        Self { client }
    }

    /// Send a triggered campaign. The provider answers without a body on success.
    pub async fn send(&self, email: &TriggeredEmail) -> Outcome<()> {
        if email.to.is_empty() {
            return Failure::input("at least one recipient is required").into();
        }

        let request = TriggeredCampaignRequest {
            to_addresses: &email.to,
            campaign_id: email.campaign_id,
            personalization_values: email
                .personalisation
                .iter()
                .map(|(name, value)| NameValue { name, value })
                .collect(),
        };
        let url = self.client.url(path::EMAIL_TRIGGERED_CAMPAIGN);
        self.client
            .post_allowing_empty::<serde_json::Value, _>(&url, &request)
            .await
            .map(|_| ())
    }

    /// Transactional email statistics for the window described by `query`.
    pub async fn statistics(&self, query: &StatisticsQuery) -> Outcome<TransactionalEmailStatistics> {
        let start = date::format_for_path(&query.start, query.round_to_date);
        let mut url = self
            .client
            .url(&path::with_param(path::EMAIL_STATS_SINCE_DATE, &start));
        if let Some(end) = &query.end {
            url = path::add_attribute(&url, END_DATE, &date::format_for_path(end, query.round_to_date));
        }
        if let Some(aggregated_by) = query.aggregated_by {
            url = path::add_attribute(&url, AGGREGATED_BY, aggregated_by.as_str());
        }
        self.client.get(&url).await
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use crate::client::RequestBody;
    use crate::client::testing::{FakeTransport, make_client};
    use crate::domain::AggregatedBy;

    use super::*;

    #[tokio::test]
    async fn send_posts_triggered_campaign_and_accepts_blank_body() {
        let transport = FakeTransport::new(201, "");
        let client = make_client(transport.clone());

        let email = TriggeredEmail::to_one("ann@example.com", 42).with_value("FIRSTNAME", "Ann");
        let outcome = client.transactional().send(&email).await;
        assert_eq!(outcome, Outcome::SuccessEmpty);

        let request = transport.last_request().unwrap();
        assert_eq!(request.url, "https://example.invalid/v2/email/triggered-campaign");
        let RequestBody::Json(json) = request.body else {
            panic!("expected a JSON body");
        };
        let sent: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(
            sent,
            serde_json::json!({
                "toAddresses": ["ann@example.com"],
                "campaignId": 42,
                "personalizationValues": [{"Name": "FIRSTNAME", "Value": "Ann"}]
            })
        );
    }

    #[tokio::test]
    async fn send_without_recipients_is_rejected_locally() {
        let transport = FakeTransport::new(201, "");
        let client = make_client(transport.clone());

        let outcome = client
            .transactional()
            .send(&TriggeredEmail::to_many(Vec::new(), 42))
            .await;
        assert_eq!(outcome.failure().map(|f| f.code().as_str()), Some("ERROR_INPUT"));
        assert!(transport.requests().is_empty());
    }

    #[tokio::test]
    async fn send_reports_provider_errors() {
        let client = make_client(FakeTransport::new(
            400,
            r#"{"message":"Error: ERROR_CAMPAIGN_NOT_FOUND"}"#,
        ));
        let outcome = client
            .transactional()
            .send(&TriggeredEmail::to_one("ann@example.com", 1))
            .await;
        assert_eq!(
            outcome.failure().map(|f| f.code().as_str()),
            Some("ERROR_CAMPAIGN_NOT_FOUND")
        );
    }

    #[tokio::test]
    async fn statistics_adds_optional_attributes() {
        let transport = FakeTransport::new(200, r#"{"numSent": 10, "numDelivered": 9}"#);
        let client = make_client(transport.clone());

        let query = StatisticsQuery::since(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap())
            .until(Utc.with_ymd_and_hms(2024, 1, 31, 0, 0, 0).unwrap())
            .aggregated_by(AggregatedBy::AllTime);
        let stats = client.transactional().statistics(&query).await;

        assert_eq!(stats.data().map(|s| s.num_delivered), Some(9));
        assert_eq!(
            transport.last_request().unwrap().url,
            "https://example.invalid/v2/email/stats/since-date/2024-01-01?endDate=2024-01-31&aggregatedBy=AllTime"
        );
    }
}

use chrono::{DateTime, Utc};

use super::path_date;
use crate::client::DotmailerClient;
use crate::domain::{
    Campaign, CampaignContactActivity, CampaignInfo, CampaignSummary, ListOptions, Listing,
    Outcome,
};
use crate::transport::path;

#[derive(Clone, Copy)]
/// Email campaigns with their summaries and contact activity.
pub struct CampaignResource<'a> {
    client: &'a DotmailerClient,
}

impl<'a> CampaignResource<'a> {
    pub(crate) fn new(client: &'a DotmailerClient) -> Self {
        Self { client }
    }

    /// Campaign infos, without summaries or activities.
    pub async fn list(&self, options: ListOptions) -> Listing<CampaignInfo> {
        let url = self.client.url(path::CAMPAIGNS);
        self.client
            .fetch_all(&url, options.page_size(), options.limit, 0)
            .await
    }

    /// Campaigns with any contact activity since `since`.
    pub async fn list_with_activity_since(
        &self,
        since: DateTime<Utc>,
        options: ListOptions,
    ) -> Listing<CampaignInfo> {
        let resource = path::with_param(
            path::CAMPAIGNS_WITH_ACTIVITY_SINCE,
            &path_date(&since, &options),
        );
        let url = self.client.url(&resource);
        self.client
            .fetch_all(&url, options.page_size(), options.limit, 0)
            .await
    }

    /// Every campaign expanded with [`CampaignResource::get`].
    ///
    /// A campaign whose details cannot be fetched is returned with its listing info only.
    pub async fn list_comprehensive(&self, options: ListOptions) -> Listing<Campaign> {
        let listing = self.list(options).await;
        let requests = listing.requests();
        let (infos, failure) = listing.into_parts();

        let mut campaigns = Vec::with_capacity(infos.len());
        for info in infos {
            let campaign = match self.get(info.id).await {
                Outcome::Success(campaign) => campaign,
                _ => Campaign::from(info),
            };
            campaigns.push(campaign);
        }

        match failure {
            Some(failure) => Listing::partial(campaigns, failure, requests),
            None => Listing::complete(campaigns, requests),
        }
    }

    /// Campaign info with its summary and activities attached when available.
    pub async fn get(&self, id: i64) -> Outcome<Campaign> {
        let info = match self.info(id).await {
            Outcome::Success(info) => info,
            Outcome::SuccessEmpty => return Outcome::SuccessEmpty,
            Outcome::Failure(failure) => return failure.into(),
        };

        let mut campaign = Campaign::from(info);
        campaign.summary = self.summary(id).await.into_data();
        let activities = self.activities(id, ListOptions::default()).await;
        if activities.is_complete() {
            campaign.activities = activities.into_records();
        }
        Outcome::Success(campaign)
    }

    /// Campaign info only, without the summary and activity requests of [`CampaignResource::get`].
    pub async fn info(&self, id: i64) -> Outcome<CampaignInfo> {
        let url = self.client.url(&path::with_id(path::CAMPAIGN, id));
        self.client.get(&url).await
    }

    /// Send and engagement totals of a sent campaign.
    pub async fn summary(&self, id: i64) -> Outcome<CampaignSummary> {
        let url = self.client.url(&path::with_id(path::CAMPAIGN_SUMMARY, id));
        self.client.get(&url).await
    }

    /// Per-contact activity of a campaign.
    pub async fn activities(&self, id: i64, options: ListOptions) -> Listing<CampaignContactActivity> {
        let url = self
            .client
            .url(&path::with_id(path::CAMPAIGN_ACTIVITIES, id));
        self.client
            .fetch_all(&url, options.page_size(), options.limit, 0)
            .await
    }

    /// Per-contact activity of a campaign since `since`.
    pub async fn activities_since(
        &self,
        id: i64,
        since: DateTime<Utc>,
        options: ListOptions,
    ) -> Listing<CampaignContactActivity> {
        let resource = path::with_id_and_param(
            path::CAMPAIGN_ACTIVITIES_SINCE,
            id,
            &path_date(&since, &options),
        );
        let url = self.client.url(&resource);
        self.client
            .fetch_all(&url, options.page_size(), options.limit, 0)
            .await
    }

    /// Replace the campaign identified by `campaign.id`.
    pub async fn update(&self, campaign: &CampaignInfo) -> Outcome<CampaignInfo> {
        let url = self
            .client
            .url(&path::with_id(path::CAMPAIGN, campaign.id));
        self.client.put(&url, campaign).await
    }
}

#[cfg(test)]
mod tests {
    use crate::client::testing::{FakeTransport, make_client};

    use super::*;

    #[tokio::test]
    async fn get_combines_info_summary_and_activities() {
        let transport = FakeTransport::scripted(vec![
            (200, r#"{"id": 3, "name": "Spring sale"}"#),
            (200, r#"{"numSent": 100, "numUniqueOpens": 40, "percentageDelivered": 99.5}"#),
            (200, r#"[{"contactId": 1, "email": "ann@example.com", "numOpens": 2}]"#),
        ]);
        let client = make_client(transport.clone());

        let campaign = client.campaigns().get(3).await.into_data().unwrap();
        assert_eq!(campaign.info.name.as_deref(), Some("Spring sale"));
        assert_eq!(campaign.summary.as_ref().and_then(|s| s.num_sent), Some(100));
        assert_eq!(campaign.activities.len(), 1);

        let urls: Vec<String> = transport.requests().into_iter().map(|r| r.url).collect();
        assert_eq!(
            urls,
            vec![
                "https://example.invalid/v2/campaigns/3",
                "https://example.invalid/v2/campaigns/3/summary",
                "https://example.invalid/v2/campaigns/3/activities?select=1000&skip=0",
            ]
        );
    }

    #[tokio::test]
    async fn get_tolerates_missing_summary_and_activities() {
        let transport = FakeTransport::scripted(vec![
            (200, r#"{"id": 3}"#),
            (404, r#"{"message":"Error: ERROR_CAMPAIGN_NOT_SENT"}"#),
            (500, ""),
        ]);
        let client = make_client(transport);

        let campaign = client.campaigns().get(3).await.into_data().unwrap();
        assert_eq!(campaign.summary, None);
        assert!(campaign.activities.is_empty());
    }

    #[tokio::test]
    async fn get_propagates_info_failure() {
        let client = make_client(FakeTransport::new(
            404,
            r#"{"message":"Error: ERROR_CAMPAIGN_NOT_FOUND"}"#,
        ));
        let outcome = client.campaigns().get(3).await;
        assert_eq!(
            outcome.failure().map(|f| f.code().as_str()),
            Some("ERROR_CAMPAIGN_NOT_FOUND")
        );
    }

    #[tokio::test]
    async fn comprehensive_listing_falls_back_to_info() {
        let transport = FakeTransport::scripted(vec![
            (200, r#"[{"id": 1, "name": "A"}, {"id": 2, "name": "B"}]"#),
            // campaign 1
            (200, r#"{"id": 1, "name": "A"}"#),
            (200, r#"{"numSent": 5}"#),
            (200, "[]"),
            // campaign 2
            (500, r#"{"message":"Error: ERROR_CAMPAIGN_NOT_FOUND"}"#),
        ]);
        let client = make_client(transport);

        let campaigns = client
            .campaigns()
            .list_comprehensive(ListOptions::default())
            .await;

        assert!(campaigns.is_complete());
        let campaigns = campaigns.into_records();
        assert_eq!(campaigns.len(), 2);
        assert_eq!(campaigns[0].summary.as_ref().and_then(|s| s.num_sent), Some(5));
        assert_eq!(campaigns[1].info.name.as_deref(), Some("B"));
        assert_eq!(campaigns[1].summary, None);
    }
}

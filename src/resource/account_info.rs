use crate::client::DotmailerClient;
use crate::domain::{AccountInfo, Outcome};
use crate::transport::path;

#[derive(Clone, Copy)]
/// Account-level information.
pub struct AccountInfoResource<'a> {
    client: &'a DotmailerClient,
}

impl<'a> AccountInfoResource<'a> {
    pub(crate) fn new(client: &'a DotmailerClient) -> Self {
        Self { client }
    }

    /// Account id and properties, including the regional `ApiEndpoint`.
    pub async fn get(&self) -> Outcome<AccountInfo> {
        self.client.get(&self.client.url(path::ACCOUNT_INFO)).await
    }
}

#[cfg(test)]
mod tests {
    use crate::client::testing::{FakeTransport, make_client};

    #[tokio::test]
    async fn get_requests_account_info() {
        let transport = FakeTransport::new(200, r#"{"id": 7, "properties": []}"#);
        let client = make_client(transport.clone());

        let info = client.account_info().get().await;
        assert_eq!(info.data().and_then(|i| i.id), Some(7));
        assert_eq!(
            transport.last_request().unwrap().url,
            "https://example.invalid/v2/account-info"
        );
    }
}

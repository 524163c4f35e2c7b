use crate::client::DotmailerClient;
use crate::domain::{DataField, Outcome};
use crate::transport::path;

#[derive(Clone, Copy)]
/// Contact data field definitions.
pub struct DataFieldResource<'a> {
    client: &'a DotmailerClient,
}

impl<'a> DataFieldResource<'a> {
    pub(crate) fn new(client: &'a DotmailerClient) -> Self {
        Self { client }
    }

    /// All data fields. The endpoint is not paginated.
    pub async fn list(&self) -> Outcome<Vec<DataField>> {
        self.client.get(&self.client.url(path::DATA_FIELDS)).await
    }

    /// Define a new data field.
    pub async fn create(&self, field: &DataField) -> Outcome<DataField> {
        self.client
            .post(&self.client.url(path::DATA_FIELDS), field)
            .await
    }

    /// Delete a data field by name.
    pub async fn delete(&self, name: &str) -> Outcome<()> {
        let url = self.client.url(&path::with_param(path::DATA_FIELD, name));
        self.client.delete(&url).await
    }
}

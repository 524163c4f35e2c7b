use dotmailer::{Credentials, CsvExport, DotmailerClient, ListOptions, Outcome};
use httpmock::prelude::*;
use serde::Serialize;
use serde_json::json;

// Basic auth for apiuser-1@apiconnector.com / s3cret.
const AUTHORIZATION: &str = "Basic YXBpdXNlci0xQGFwaWNvbm5lY3Rvci5jb206czNjcmV0";

fn credentials() -> Credentials {
    Credentials::new("apiuser-1@apiconnector.com", "s3cret").unwrap()
}

fn client_for(server: &MockServer) -> DotmailerClient {
    DotmailerClient::builder(credentials())
        .api_url(server.base_url())
        .build()
        .unwrap()
}

#[tokio::test]
async fn requests_carry_basic_auth_and_decode_json() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/v2/address-books/7")
                .header("authorization", AUTHORIZATION);
            then.status(200)
                .header("content-type", "application/json")
                .body(r#"{"id": 7, "name": "Newsletter", "contacts": 12}"#);
        })
        .await;

    let client = client_for(&server);
    let book = client.address_books().get(7).await.into_data().unwrap();

    mock.assert_async().await;
    assert_eq!(book.name, "Newsletter");
    assert_eq!(book.contacts, 12);
}

#[tokio::test]
async fn listing_follows_pages_until_a_short_page() {
    let server = MockServer::start_async().await;
    let full_page: Vec<_> = (0..1000)
        .map(|i| json!({"id": i, "name": format!("book {i}")}))
        .collect();
    let first = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/v2/address-books")
                .query_param("select", "1000")
                .query_param("skip", "0");
            then.status(200).json_body(json!(full_page));
        })
        .await;
    let second = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/v2/address-books")
                .query_param("select", "1000")
                .query_param("skip", "1000");
            then.status(200)
                .json_body(json!([{"id": 1000, "name": "last"}, {"id": 1001, "name": "really last"}]));
        })
        .await;

    let client = client_for(&server);
    let books = client.address_books().list(ListOptions::default()).await;

    first.assert_async().await;
    second.assert_async().await;
    assert!(books.is_complete());
    assert_eq!(books.requests(), 2);
    assert_eq!(books.records().len(), 1002);
    assert_eq!(books.records()[1001].name, "really last");
}

#[tokio::test]
async fn provider_error_token_becomes_the_failure_code() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/v2/address-books/404");
            then.status(404)
                .body(r#"{"message": "Error: ERROR_ADDRESSBOOK_NOT_FOUND"}"#);
        })
        .await;

    let client = client_for(&server);
    let outcome = client.address_books().get(404).await;

    let failure = outcome.failure().unwrap();
    assert_eq!(failure.code().as_str(), "ERROR_ADDRESSBOOK_NOT_FOUND");
}

#[derive(Serialize)]
struct Subscriber {
    email: String,
    first_name: String,
}

#[tokio::test]
async fn import_uploads_a_multipart_csv_and_removes_it() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/v2/address-books/3/contacts/import")
                .header_exists("authorization")
                .body_contains("name=\"file\"")
                .body_contains("Email,FIRSTNAME")
                .body_contains("ann@example.com,Ann");
            then.status(202)
                .body(r#"{"id": "job-1", "status": "NotFinished"}"#);
        })
        .await;

    let export_dir = tempfile::tempdir().unwrap();
    let client = DotmailerClient::builder(credentials())
        .api_url(server.base_url())
        .export_dir(export_dir.path())
        .build()
        .unwrap();

    let subscribers = vec![Subscriber {
        email: "ann@example.com".to_owned(),
        first_name: "Ann".to_owned(),
    }];
    let export = CsvExport::new()
        .headers(["Email", "FIRSTNAME"])
        .fields(["email", "first_name"]);
    let job = client
        .address_books()
        .import_contacts(3, &subscribers, &export)
        .await
        .into_data()
        .unwrap();

    mock.assert_async().await;
    assert_eq!(job.id, "job-1");
    assert_eq!(std::fs::read_dir(export_dir.path()).unwrap().count(), 0);
}

#[tokio::test]
async fn removing_contacts_from_an_address_book_requires_no_content() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/v2/address-books/3/contacts/delete")
                .json_body(json!([1, 2]));
            then.status(204);
        })
        .await;

    let client = client_for(&server);
    let outcome = client.address_books().delete_contacts(3, &[1, 2]).await;
    assert_eq!(outcome, Outcome::SuccessEmpty);
}

#[tokio::test]
async fn autobuild_switches_to_the_account_endpoint() {
    let server = MockServer::start_async().await;
    let endpoint = server.base_url();
    server
        .mock_async(|when, then| {
            when.method(GET).path("/v2/account-info");
            then.status(200).json_body(json!({
                "id": 1,
                "properties": [
                    {"name": "Name", "type": "String", "value": "Example Ltd"},
                    {"name": "ApiEndpoint", "type": "String", "value": endpoint}
                ]
            }));
        })
        .await;

    let client = DotmailerClient::builder(credentials())
        .api_url(server.base_url())
        .autobuild()
        .await
        .unwrap();
    assert_eq!(client.base_url(), format!("{}/v2", server.base_url()));
}

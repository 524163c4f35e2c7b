use std::io;

use dotmailer::{Credentials, CsvExport, DotmailerClient};
use serde::Serialize;

#[derive(Serialize)]
struct Subscriber {
    email: String,
    first_name: String,
    points: u32,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let var = |name: &str| {
        std::env::var(name).map_err(|_| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("{name} environment variable is required"),
            )
        })
    };
    let credentials = Credentials::new(var("DOTMAILER_USERNAME")?, var("DOTMAILER_PASSWORD")?)?;
    let address_book: i64 = var("DOTMAILER_ADDRESS_BOOK")?.parse()?;

    let client = DotmailerClient::autobuild(credentials).await?;

    let subscribers = vec![
        Subscriber {
            email: "ann@example.com".to_owned(),
            first_name: "Ann".to_owned(),
            points: 10,
        },
        Subscriber {
            email: "bob@example.com".to_owned(),
            first_name: "Bob".to_owned(),
            points: 3,
        },
    ];
    let export = CsvExport::new()
        .headers(["Email", "FIRSTNAME", "POINTS"])
        .fields(["email", "first_name", "points"]);

    let job = client
        .address_books()
        .import_contacts(address_book, &subscribers, &export)
        .await
        .into_result()?;
    let Some(job) = job else {
        println!("import accepted without a job id");
        return Ok(());
    };
    println!("import job {} is {:?}", job.id, job.status);

    let status = client.contacts().import_status(&job.id).await.into_result()?;
    println!("current status: {:?}", status.and_then(|s| s.status));
    Ok(())
}

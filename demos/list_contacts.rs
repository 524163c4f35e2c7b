use std::io;

use dotmailer::{Credentials, DataFields, DotmailerClient, ListOptions, PersonalisedContact};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let username = std::env::var("DOTMAILER_USERNAME").map_err(|_| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            "DOTMAILER_USERNAME environment variable is required",
        )
    })?;
    let password = std::env::var("DOTMAILER_PASSWORD").map_err(|_| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            "DOTMAILER_PASSWORD environment variable is required",
        )
    })?;
    let limit = match std::env::var("DOTMAILER_LIMIT") {
        Ok(raw) => raw.parse()?,
        Err(_) => 100,
    };

    let client = DotmailerClient::autobuild(Credentials::new(username, password)?).await?;

    let contacts = client
        .contacts()
        .list_personalised::<DataFields>(ListOptions::new().with_full_data(true).limit(limit))
        .await;
    for contact in contacts.records() {
        println!("{} {:?}", contact.email, contact.details);
    }
    println!("{} contacts in {} requests", contacts.records().len(), contacts.requests());
    if let Some(failure) = contacts.failure() {
        eprintln!("listing stopped early: {failure}");
    }

    let summary = client
        .contacts()
        .process_all(ListOptions::new(), |batch: Vec<PersonalisedContact<DataFields>>| {
            println!("batch of {}", batch.len());
        })
        .await
        .into_result()?;
    if let Some(summary) = summary {
        println!("streamed {} contacts in {} batches", summary.records, summary.batches);
    }
    Ok(())
}

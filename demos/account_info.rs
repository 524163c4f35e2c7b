use std::io;

use dotmailer::{Credentials, DotmailerClient};

fn env(name: &str) -> Result<String, io::Error> {
    std::env::var(name).map_err(|_| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("{name} environment variable is required"),
        )
    })
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let credentials = Credentials::new(env("DOTMAILER_USERNAME")?, env("DOTMAILER_PASSWORD")?)?;
    let client = DotmailerClient::autobuild(credentials).await?;
    println!("endpoint: {}", client.base_url());

    let Some(info) = client.account_info().get().await.into_result()? else {
        println!("account info is empty");
        return Ok(());
    };
    for property in &info.properties {
        println!(
            "{}: {}",
            property.name,
            property.value.as_deref().unwrap_or_default()
        );
    }
    Ok(())
}

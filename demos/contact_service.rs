//! Example demonstrating a hand-written service adapter.
//!
//! This example shows how to:
//! - Wrap a `Client` in a typed service adapter, one method per endpoint
//! - Build a `MethodDescriptor` per call from static and runtime data
//! - Subscribe a logging interceptor to the request lifecycle
//!
//! Expects a contact API listening on localhost:8080.
//! Run with: `cargo run --example contact_service`

use restbound::{
    Body, Client, Error, Interceptor, MethodDescriptor, RawResponse, Verb,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Debug, Serialize, Deserialize)]
struct Contact {
    name: String,
    email: String,
}

/// Prints each lifecycle event to stdout.
struct LoggingInterceptor;

impl Interceptor for LoggingInterceptor {
    fn on_before_send(&self, request: &reqwest::Request) {
        println!("-> {} {}", request.method(), request.url());
    }

    fn on_response(&self, response: &RawResponse) {
        println!("<- {}", response.status);
    }

    fn on_error(&self, error: &Error) {
        eprintln!("!! {error}");
    }
}

/// A typed adapter for the contact endpoints.
///
/// Each method builds a fresh descriptor and hands it to the client; the
/// adapter itself contains no networking code.
struct ContactService {
    client: Client,
    service_path: &'static str,
}

impl ContactService {
    fn new(client: Client) -> Self {
        Self {
            client,
            service_path: "/api/contact",
        }
    }

    async fn get_contact(&self, name: &str) -> Result<Contact, Error> {
        let descriptor = MethodDescriptor::new(Verb::Get, self.service_path, "/{name}")
            .path_param("name", name);
        self.client.execute(descriptor).await
    }

    async fn list_contacts(&self, starts_with: Option<&str>) -> Result<Vec<Contact>, Error> {
        let descriptor = MethodDescriptor::new(Verb::Get, self.service_path, "/")
            .query_param("startsWith", starts_with)?;
        self.client.execute(descriptor).await
    }

    async fn create_contact(&self, contact: &Contact) -> Result<(), Error> {
        let descriptor = MethodDescriptor::new(Verb::Post, self.service_path, "/")
            .body(Body::serialize(contact)?);
        self.client.execute_unit(descriptor).await
    }

    async fn delete_contact(&self, name: &str) -> Result<(), Error> {
        let descriptor = MethodDescriptor::new(Verb::Delete, self.service_path, "/{name}")
            .path_param("name", name);
        self.client.execute_unit(descriptor).await
    }
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .with_env_filter("restbound=debug,contact_service=info")
        .init();

    let client = Client::builder()
        .base_url("http://localhost:8080")?
        .interceptor(Arc::new(LoggingInterceptor))
        .build()?;

    let service = ContactService::new(client);

    let new_contact = Contact {
        name: "Contact1".to_string(),
        email: "contact1@example.com".to_string(),
    };
    service.create_contact(&new_contact).await?;
    println!("Created {}", new_contact.name);

    let contact = service.get_contact("Contact1").await?;
    println!("Fetched {} <{}>", contact.name, contact.email);

    let matching = service.list_contacts(Some("Con")).await?;
    println!("{} contact(s) starting with 'Con'", matching.len());

    service.delete_contact("Contact1").await?;
    println!("Deleted {}", contact.name);

    Ok(())
}

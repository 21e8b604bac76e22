use crate::infra::{InMemoryStorageGateway, StoreFixture};
use certificados::documents::{DocumentListingService, StoredObject};
use certificados::error::AppError;
use certificados::portal::{render, PortalError, PortalView, RetryAction};
use chrono::{TimeZone, Utc};
use clap::Args;
use std::sync::Arc;

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// NIT to look up against the seeded demo store
    #[arg(long, default_value = "900123456")]
    pub(crate) nit: String,
}

pub(crate) async fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let storage = Arc::new(InMemoryStorageGateway::new(StoreFixture::Objects(
        seeded_objects(),
    )));
    let service = DocumentListingService::new(Some(storage));

    println!("Certificate portal demo (seeded in-memory store)");
    for nit in [args.nit.as_str(), "123", "777777777"] {
        println!("\nLookup for '{nit}':");
        let outcome = service
            .list_documents(nit)
            .await
            .map(|listing| listing.view())
            .map_err(|error| PortalError::new(error.kind(), error.to_string()));
        print_view(&render(outcome));
    }

    Ok(())
}

fn seeded_objects() -> Vec<StoredObject> {
    let created = Utc.with_ymd_and_hms(2024, 8, 1, 10, 0, 0).single();
    vec![
        StoredObject {
            key: "900123456/retencion_fuente_2024.pdf".to_string(),
            size: Some(254_301),
            content_type: Some("application/pdf".to_string()),
            created_at: created,
        },
        StoredObject {
            key: "900123456/certificado_iva_2024.pdf".to_string(),
            size: Some(188_452),
            content_type: Some("application/pdf".to_string()),
            created_at: created,
        },
        StoredObject {
            key: "900123456/certificado_ica_2024.xlsx".to_string(),
            size: None,
            content_type: None,
            created_at: None,
        },
        StoredObject {
            key: "811222333/retencion_fuente_2024.pdf".to_string(),
            size: Some(91_004),
            content_type: Some("application/pdf".to_string()),
            created_at: created,
        },
    ]
}

fn print_view(view: &PortalView) {
    match view {
        PortalView::Documents {
            identifier,
            documents,
            message,
            ..
        } => {
            println!("  {message}");
            for (index, doc) in documents.iter().enumerate() {
                println!(
                    "  {}. {} ({}, {:?}{})",
                    index + 1,
                    doc.name,
                    doc.size_label,
                    doc.kind,
                    doc.created_label
                        .as_deref()
                        .map(|label| format!(", created {label}"))
                        .unwrap_or_default()
                );
                println!("     {}", doc.url);
            }
            println!("  NIT queried: {identifier}");
        }
        PortalView::Empty { identifier } => {
            println!("  No documents available for NIT {identifier}");
        }
        PortalView::Failure {
            kind,
            message,
            details,
            retry,
            ..
        } => {
            println!("  Error ({kind}): {message}");
            if let Some(details) = details {
                println!("  Details: {details}");
            }
            let action = match retry {
                RetryAction::TryAnotherIdentifier => "try another NIT",
                RetryAction::Retry => "retry the request",
                RetryAction::ContactOperator => "contact the platform operator",
            };
            println!("  Suggested action: {action}");
        }
    }
}

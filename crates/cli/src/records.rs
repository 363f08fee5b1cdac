use clap::Subcommand;
use tracing::info;

use crate::di::{Repositories, UseCases};

/// Record payloads use the stored JSON layout, e.g.
/// `{"header":{"name":"abc.flatbo.at.","rrtype":1,"ttl":300},"rdata":{"address":"1.2.3.4"}}`.
#[derive(Subcommand)]
pub enum RecordsCommand {
    /// List the records owned by a subdomain
    List { owner: String },

    /// Add a record
    Add { owner: String, payload: String },

    /// Replace an existing record
    Update {
        owner: String,
        id: i64,
        payload: String,
    },

    /// Delete a record
    Delete { owner: String, id: i64 },
}

pub async fn run(
    command: RecordsCommand,
    repos: &Repositories,
    use_cases: &UseCases,
) -> anyhow::Result<()> {
    match command {
        RecordsCommand::List { owner } => {
            let records = use_cases.get_records.execute(&owner).await?;
            for (id, record) in &records {
                let payload = repos.codec.encode(record)?;
                println!("{id}\t{}", String::from_utf8_lossy(&payload));
            }
            info!(owner = %owner, count = records.len(), "Records listed");
        }
        RecordsCommand::Add { owner, payload } => {
            let record = repos.codec.decode(payload.as_bytes())?;
            let mutation = use_cases.create_record.execute(&owner, record).await?;
            println!("{}\tserial={}", mutation.id, mutation.serial);
        }
        RecordsCommand::Update { owner, id, payload } => {
            let record = repos.codec.decode(payload.as_bytes())?;
            let mutation = use_cases.update_record.execute(&owner, id, record).await?;
            println!("{}\tserial={}", mutation.id, mutation.serial);
        }
        RecordsCommand::Delete { owner, id } => {
            let mutation = use_cases.delete_record.execute(&owner, id).await?;
            println!("{}\tserial={}", mutation.id, mutation.serial);
        }
    }
    Ok(())
}

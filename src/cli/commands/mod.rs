mod report;
mod users;
mod workshops;

pub use report::cmd_report;
pub use users::{cmd_users_add, cmd_users_list, cmd_users_show};
pub use workshops::cmd_workshops_list;

use crate::api::ApiError;

/// Turns a rejected payload into a readable CLI error.
fn describe_rejection(err: ApiError) -> anyhow::Error {
    match err {
        ApiError::InvalidData(details) => {
            let lines: Vec<String> = details
                .iter()
                .map(|d| format!("  {}: {}", d.field, d.message))
                .collect();
            anyhow::anyhow!("Invalid input:\n{}", lines.join("\n"))
        }
        other => anyhow::anyhow!(other.to_string()),
    }
}

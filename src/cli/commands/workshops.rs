//! Workshop listing command handler

use crate::api::WorkshopListQuery;
use crate::config::Config;
use crate::state::SharedState;

use super::describe_rejection;

pub async fn cmd_workshops_list(
    config: &Config,
    status: Option<String>,
    query: Option<String>,
) -> anyhow::Result<()> {
    let filter = WorkshopListQuery {
        q: query,
        status,
        mode: None,
    }
    .validate()
    .map_err(describe_rejection)?;

    let state = SharedState::new(config.clone()).await?;
    let workshops = state.workshop_service.list(filter).await?;

    if workshops.is_empty() {
        println!("No workshops found.");
        return Ok(());
    }

    println!("Workshops ({} total)", workshops.len());
    println!("{:-<70}", "");

    for workshop in workshops {
        let indicator = if workshop.is_fully_booked() { "●" } else { "○" };
        println!(
            "{} [{}] {} ({})",
            indicator, workshop.id, workshop.title, workshop.company
        );
        println!(
            "  {} {} | {} | {} | seats {}/{} | {}",
            workshop.date,
            workshop.time,
            workshop.mode,
            workshop.status,
            workshop.registered_seats,
            workshop.seats,
            workshop.price
        );
    }

    println!();
    println!("Legend: ● Fully booked | ○ Seats available");

    Ok(())
}

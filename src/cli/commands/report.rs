//! Overview report command handler

use crate::config::Config;
use crate::state::SharedState;

pub async fn cmd_report(config: &Config) -> anyhow::Result<()> {
    let state = SharedState::new(config.clone()).await?;
    let overview = state.report_service.overview().await?;

    println!("WorkshopWise Overview");
    println!("{:-<40}", "");
    println!("Users:          {}", overview.total_users);
    for (role, count) in &overview.users_by_role {
        println!("  {role:<12} {count}");
    }
    println!("Workshops:      {}", overview.total_workshops);
    for (status, count) in &overview.workshops_by_status {
        println!("  {status:<12} {count}");
    }
    println!("Seats taken:    {}", overview.total_registrations);
    println!("Seats free:     {}", overview.available_seats);
    println!("Registrations by status:");
    for (status, count) in &overview.registrations_by_status {
        println!("  {status:<12} {count}");
    }

    Ok(())
}

//! Account command handlers

use crate::api::{CreateUserRequest, UserListQuery};
use crate::config::Config;
use crate::state::SharedState;

use super::describe_rejection;

pub async fn cmd_users_list(config: &Config, role: Option<String>) -> anyhow::Result<()> {
    let filter = UserListQuery { role, q: None }
        .validate()
        .map_err(describe_rejection)?;

    let state = SharedState::new(config.clone()).await?;
    let users = state.user_service.list(filter).await?;

    if users.is_empty() {
        println!("No users found.");
        println!();
        println!(
            "Add one with: workshopwise users add <username> --email ... --name ... --password ..."
        );
        return Ok(());
    }

    println!("Users ({} total)", users.len());
    println!("{:-<70}", "");

    for user in users {
        println!(
            "[{}] {} <{}> ({})",
            user.id,
            user.username,
            user.email,
            user.role
        );
        if let Some(company) = &user.company {
            println!("  {} | {}", user.name, company);
        } else {
            println!("  {}", user.name);
        }
    }

    Ok(())
}

pub async fn cmd_users_show(config: &Config, username: &str) -> anyhow::Result<()> {
    let state = SharedState::new(config.clone()).await?;
    let user = state.user_service.get_by_username(username).await?;
    let registrations = state.registration_service.list_for_user(user.id).await?;

    println!("[{}] {} <{}>", user.id, user.username, user.email);
    println!("  Name:    {}", user.name);
    println!("  Role:    {}", user.role);
    if let Some(company) = &user.company {
        println!("  Company: {company}");
    }
    println!("  Joined:  {}", user.created_at);
    println!();

    if registrations.is_empty() {
        println!("No registrations.");
        return Ok(());
    }

    println!("Registrations ({} total)", registrations.len());
    for registration in registrations {
        println!(
            "  #{} workshop {} [{}] {}",
            registration.id,
            registration.workshop_id,
            registration.status,
            registration.registered_at
        );
    }

    Ok(())
}

pub async fn cmd_users_add(config: &Config, request: CreateUserRequest) -> anyhow::Result<()> {
    let user = request.validate().map_err(describe_rejection)?;

    let state = SharedState::new(config.clone()).await?;
    let created = state.user_service.create(user).await?;

    println!(
        "✓ Created {} '{}' with id {}",
        created.role, created.username, created.id
    );
    Ok(())
}

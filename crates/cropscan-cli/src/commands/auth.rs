use anyhow::Result;
use cropscan_application::AppContext;
use cropscan_core::auth::{AuthStatus, LoginCredentials, SignupCredentials};

use super::store_failure;

pub async fn login(ctx: &AppContext, username: String, password: String) -> Result<()> {
    if let Err(e) = ctx
        .auth
        .login(LoginCredentials::new(username, password))
        .await
    {
        return Err(store_failure(e, ctx.auth.state().await.error));
    }
    print_welcome(ctx).await;
    Ok(())
}

pub async fn signup(
    ctx: &AppContext,
    username: String,
    email: String,
    password: String,
) -> Result<()> {
    if let Err(e) = ctx
        .auth
        .signup(SignupCredentials::new(username, email, password))
        .await
    {
        return Err(store_failure(e, ctx.auth.state().await.error));
    }
    print_welcome(ctx).await;
    Ok(())
}

pub async fn logout(ctx: &AppContext) {
    ctx.auth.logout().await;
    println!("Logged out.");
}

pub async fn whoami(ctx: &AppContext) {
    let session = ctx.auth.state().await;
    match (session.status(), session.user) {
        (AuthStatus::Authenticated, Some(user)) => {
            println!("Logged in as {}", user.username);
            if let Some(email) = user.email {
                println!("  email: {email}");
            }
            if let Some(role) = user.role {
                println!("  role:  {role}");
            }
        }
        (AuthStatus::Authenticated, None) => {
            println!("Logged in (session restored from saved token)");
        }
        _ => println!("Not logged in."),
    }
}

async fn print_welcome(ctx: &AppContext) {
    let session = ctx.auth.state().await;
    let name = session
        .user
        .map(|u| u.username)
        .unwrap_or_else(|| "unknown user".to_string());
    println!("Logged in as {name}");
    if session.token.is_none() {
        println!("warning: the backend returned no token; this session will not be remembered");
    }
}

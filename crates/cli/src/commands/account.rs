//! Session commands: login, register, logout, whoami.

use lotus_storefront::StoreError;
use lotus_storefront::state::AppState;

use super::prompt;

/// Sign in and persist the session for later commands.
pub async fn login(state: &AppState, email: &str) -> Result<(), Box<dyn std::error::Error>> {
    let password = prompt("Password")?;

    match state.session().login(state.api(), email, &password).await {
        Ok(identity) => println!("Signed in as {}.", identity.email),
        Err(err @ StoreError::Rejected(_)) => println!("Sign-in failed: {err}"),
        Err(err) => return Err(err.into()),
    }

    Ok(())
}

/// Create an account; on success the new session replaces any prior one.
pub async fn register(state: &AppState, email: &str) -> Result<(), Box<dyn std::error::Error>> {
    let password = prompt("Password (at least 6 characters)")?;
    let confirmation = prompt("Confirm password")?;

    if password != confirmation {
        println!("Passwords do not match.");
        return Ok(());
    }

    match state.session().register(state.api(), email, &password).await {
        Ok(identity) => println!("Account created. Signed in as {}.", identity.email),
        Err(err @ (StoreError::Validation(_) | StoreError::Rejected(_))) => {
            println!("Registration failed: {err}");
        }
        Err(err) => return Err(err.into()),
    }

    Ok(())
}

/// Sign out. Safe to run when already signed out.
pub fn logout(state: &AppState) {
    state.session().logout();
    println!("Signed out.");
}

/// Show the active identity, if any.
pub fn whoami(state: &AppState) {
    match state.session().identity() {
        Some(identity) if identity.is_admin => {
            println!("{} (id {}, admin)", identity.email, identity.id);
        }
        Some(identity) => println!("{} (id {})", identity.email, identity.id),
        None => println!("Not signed in."),
    }
}

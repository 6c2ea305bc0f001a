//! CLI command implementations.

pub mod account;
pub mod cart;
pub mod order;
pub mod shop;

use std::io::{self, Write};

use lotus_storefront::StoreError;

/// Read one line of input after a label.
pub(crate) fn prompt(label: &str) -> io::Result<String> {
    print!("{label}: ");
    io::stdout().flush()?;

    let mut line = String::new();
    io::stdin().read_line(&mut line)?;
    Ok(line.trim().to_string())
}

/// Ask a yes/no question; anything but an explicit yes declines.
pub(crate) fn confirm(question: &str) -> io::Result<bool> {
    print!("{question} [y/N] ");
    io::stdout().flush()?;

    let mut line = String::new();
    io::stdin().read_line(&mut line)?;
    Ok(matches!(line.trim().to_lowercase().as_str(), "y" | "yes"))
}

/// Gate handling for session-bound operations.
///
/// `Unauthenticated` is not a failure of the command, it's a redirect: print
/// the login hint and report "nothing to do". Everything else propagates.
pub(crate) fn or_login_hint<T>(result: Result<T, StoreError>) -> Result<Option<T>, StoreError> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(StoreError::Unauthenticated) => {
            println!("You are not signed in. Run `lotus login <email>` first.");
            Ok(None)
        }
        Err(err) => Err(err),
    }
}

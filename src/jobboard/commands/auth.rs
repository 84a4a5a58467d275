use crate::board::Board;
use crate::commands::{CmdMessage, CmdResult};
use crate::error::{BoardError, Result};
use crate::store::StorageBackend;

use super::helpers::require_field;

pub fn register<B: StorageBackend>(
    board: &mut Board<B>,
    name: &str,
    email: &str,
    password: &str,
) -> Result<CmdResult> {
    let name = require_field("Name", name)?;
    let email = require_field("Email", email)?;
    if !email.contains('@') {
        return Err(BoardError::Validation(format!(
            "'{}' is not an email address",
            email
        )));
    }
    if password.is_empty() {
        return Err(BoardError::Validation("Password is required".to_string()));
    }

    let user = board.identity.register(&name, &email, password)?;
    Ok(CmdResult::default()
        .with_message(CmdMessage::success(format!(
            "Welcome, {}! You are now logged in.",
            user.name
        )))
        .with_user(user))
}

pub fn login<B: StorageBackend>(
    board: &mut Board<B>,
    email: &str,
    password: &str,
) -> Result<CmdResult> {
    if email.trim().is_empty() || password.is_empty() {
        return Err(BoardError::Validation(
            "Email and password are required".to_string(),
        ));
    }
    let user = board.identity.login(email.trim(), password)?;
    Ok(CmdResult::default()
        .with_message(CmdMessage::success(format!("Logged in as {}", user.email)))
        .with_user(user))
}

pub fn logout<B: StorageBackend>(board: &mut Board<B>) -> Result<CmdResult> {
    let was = board.identity.current_user().cloned();
    board.identity.logout()?;
    let message = match was {
        Some(user) => CmdMessage::success(format!("Logged out {}", user.email)),
        None => CmdMessage::info("Not logged in"),
    };
    Ok(CmdResult::default().with_message(message))
}

pub fn whoami<B: StorageBackend>(board: &Board<B>) -> Result<CmdResult> {
    let user = board.require_user()?;
    Ok(CmdResult::default().with_user(user))
}

use std::io::{self, BufRead, Write};

use storefront_client::{Confirm, DeleteOutcome};
use storefront_core::domain::product::ProductId;

use crate::commands::{client_failure, loaded_client, CommandResult};

/// Reads a yes/no answer from stdin.
pub struct StdinConfirm;

impl Confirm for StdinConfirm {
    fn confirm(&self, prompt: &str) -> bool {
        let mut stderr = io::stderr();
        let _ = write!(stderr, "{prompt} [y/N] ");
        let _ = stderr.flush();

        let mut answer = String::new();
        if io::stdin().lock().read_line(&mut answer).is_err() {
            return false;
        }
        is_yes(&answer)
    }
}

struct Preapproved;

impl Confirm for Preapproved {
    fn confirm(&self, _prompt: &str) -> bool {
        true
    }
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

pub fn run(raw_id: &str, assume_yes: bool, base_url: Option<String>) -> CommandResult {
    let id = match ProductId::parse(raw_id) {
        Ok(id) => id,
        Err(error) => {
            return CommandResult::failure("delete", "validation", error.user_message(), 6)
        }
    };
    let (runtime, mut client) = match loaded_client("delete", base_url) {
        Ok(loaded) => loaded,
        Err(failure) => return failure,
    };

    let confirm: &dyn Confirm = if assume_yes { &Preapproved } else { &StdinConfirm };
    match runtime.block_on(client.delete(&id, confirm)) {
        Ok(DeleteOutcome::Deleted) => CommandResult::success("delete", format!("deleted product {id}")),
        Ok(DeleteOutcome::Cancelled) => {
            CommandResult::success("delete", format!("kept product {id}; delete cancelled"))
        }
        Err(error) => client_failure("delete", error),
    }
}

#[cfg(test)]
mod tests {
    use super::is_yes;

    #[test]
    fn only_explicit_yes_confirms() {
        assert!(is_yes("y\n"));
        assert!(is_yes(" YES "));
        assert!(!is_yes(""));
        assert!(!is_yes("n"));
        assert!(!is_yes("sure"));
    }
}

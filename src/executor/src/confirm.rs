use mockall::automock;

/// Asks the operator whether a single operation may go ahead.
#[automock]
pub trait Confirmer {
    fn confirm(&self, prompt: &str) -> bool;
}

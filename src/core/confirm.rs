/// Yes/no gate consulted before destructive operations.
///
/// Returning `false` covers both an explicit "no" and a dismissed prompt.
pub trait ConfirmationPrompt {
    fn confirm(&self, message: &str) -> bool;
}

impl<F> ConfirmationPrompt for F
where
    F: Fn(&str) -> bool,
{
    fn confirm(&self, message: &str) -> bool {
        self(message)
    }
}

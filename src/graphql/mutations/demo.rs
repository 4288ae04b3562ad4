use super::prelude::*;

#[derive(Default)]
pub struct DemoMutations;

#[Object]
impl DemoMutations {
    /// Succeeds only when `input` is exactly "expected"
    async fn user_input_error(&self, input: MaybeUndefined<String>) -> Result<Option<String>> {
        if input.value().map(String::as_str) == Some("expected") {
            return Ok(None);
        }

        // Names of the arguments that were supplied, explicit null included.
        let invalid_args = if input.is_undefined() {
            Vec::new()
        } else {
            vec!["input".to_string()]
        };
        Err(AppError::user_input("Form Arguments invalid", invalid_args).extend())
    }
}

// Configuration validation, run after all sources are merged
pub trait ConfigValidator {
    /// # Errors
    ///
    /// Returns [`crate::ConfigError::ValidationError`] describing the first
    /// rejected setting.
    fn validate(&self) -> crate::error::Result<()>;
}

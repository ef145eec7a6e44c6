use thiserror::Error;

/// Error for loading directive lists and rulesets.
///
/// Returned by [`UniqueMap::from_file()`](crate::UniqueMap::from_file) and,
/// with the `serde` feature, [`Ruleset::from_file()`](crate::Ruleset::from_file)
/// and [`Ruleset::from_toml_str()`](crate::Ruleset::from_toml_str).
/// Evaluation itself never fails: bad data makes a predicate false.
#[derive(Debug, Error)]
pub enum UniquesError {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[cfg(feature = "serde")]
    #[error(transparent)]
    Toml(#[from] toml::de::Error),
}

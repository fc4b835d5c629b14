/// An error resolving the log sink of an intercepted target.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum ResolveError {
    #[error("cannot resolve a log sink for a target without a type name")]
    UnnamedTarget,
}

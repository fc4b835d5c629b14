use crate::StaticCowStr;

/// Rendering settings of a [`LoggingInterceptor`](crate::LoggingInterceptor).
///
/// The settings are fixed once the interceptor is built and only read afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterceptorConfig {
    pub(crate) deep_rendering: bool,
    pub(crate) marker_suffix: Option<StaticCowStr>,
    pub(crate) accessor_prefix: StaticCowStr,
}

impl InterceptorConfig {
    pub const DEFAULT_ACCESSOR_PREFIX: &'static str = "get";

    #[must_use]
    pub const fn new() -> Self {
        Self {
            deep_rendering: false,
            marker_suffix: None,
            accessor_prefix: StaticCowStr::Borrowed(Self::DEFAULT_ACCESSOR_PREFIX),
        }
    }

    /// Enables or disables field-by-field rendering of structured values.
    #[must_use]
    pub fn deep_rendering(mut self, enabled: bool) -> Self {
        self.deep_rendering = enabled;
        self
    }

    /// Only treats structured values as such if their type name ends with `suffix`.
    #[must_use]
    pub fn marker_suffix(mut self, suffix: impl Into<StaticCowStr>) -> Self {
        self.marker_suffix = Some(suffix.into());
        self
    }

    /// Sets the prefix stripped from accessor names to build field labels.
    #[must_use]
    pub fn accessor_prefix(mut self, prefix: impl Into<StaticCowStr>) -> Self {
        self.accessor_prefix = prefix.into();
        self
    }
}

impl Default for InterceptorConfig {
    fn default() -> Self {
        Self::new()
    }
}

//! The [`FromRequest`] trait.

use crate::{ExtractionContext, ExtractionError};

/// Types that can be pulled out of an [`ExtractionContext`].
///
/// # Implementing `FromRequest`
///
/// ```rust
/// use quill_extract::{ExtractionContext, ExtractionError, ExtractionSource, FromRequest};
///
/// struct IfMatch(String);
///
/// impl FromRequest for IfMatch {
///     fn from_request(ctx: &ExtractionContext) -> Result<Self, ExtractionError> {
///         ctx.header("if-match")
///             .map(|v| IfMatch(v.to_string()))
///             .ok_or_else(|| ExtractionError::missing(ExtractionSource::Header, "if-match"))
///     }
/// }
/// ```
///
/// Tuples of extractors are themselves extractors, so a handler can take
/// `(Path<StoryPath>, Json<CreateChapter>)` in one call.
pub trait FromRequest: Sized {
    /// Extracts this type from the request context.
    ///
    /// # Errors
    ///
    /// Returns an [`ExtractionError`] if extraction fails.
    fn from_request(ctx: &ExtractionContext) -> Result<Self, ExtractionError>;
}

// Option<T> makes an extraction best-effort.
impl<T: FromRequest> FromRequest for Option<T> {
    fn from_request(ctx: &ExtractionContext) -> Result<Self, ExtractionError> {
        Ok(T::from_request(ctx).ok())
    }
}

// Result<T, _> lets handlers branch on the failure themselves.
impl<T: FromRequest> FromRequest for Result<T, ExtractionError> {
    fn from_request(ctx: &ExtractionContext) -> Result<Self, ExtractionError> {
        Ok(T::from_request(ctx))
    }
}

macro_rules! impl_from_request_for_tuple {
    ($($T:ident),*) => {
        impl<$($T: FromRequest),*> FromRequest for ($($T,)*) {
            fn from_request(ctx: &ExtractionContext) -> Result<Self, ExtractionError> {
                Ok(($($T::from_request(ctx)?,)*))
            }
        }
    };
}

impl_from_request_for_tuple!(T1);
impl_from_request_for_tuple!(T1, T2);
impl_from_request_for_tuple!(T1, T2, T3);
impl_from_request_for_tuple!(T1, T2, T3, T4);

impl FromRequest for () {
    fn from_request(_ctx: &ExtractionContext) -> Result<Self, ExtractionError> {
        Ok(())
    }
}

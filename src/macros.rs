/// Unwraps a `Result<Option<T>, E>` inside an `Iterator::next` implementation.
/// An error is converted and returned as `Some(Err(..))`.
macro_rules! try_some {
    ($expr:expr) => {
        match $expr {
            Ok(Some(v)) => Some(v),
            Ok(None) => None,
            Err(e) => return Some(Err(From::from(e))),
        }
    };
}

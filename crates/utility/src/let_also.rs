/// Lets a value flow through a closure without breaking a method chain —
/// the `.let {}` idiom, used throughout the query layer to turn a fetched
/// row vec into a response type inline.
pub trait LetAlso: Sized {
    fn let_owned<R>(self, f: impl FnOnce(Self) -> R) -> R {
        f(self)
    }
}

impl<T> LetAlso for T {}

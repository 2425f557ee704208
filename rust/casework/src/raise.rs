//! Foreign errors: panics, their payloads, and values that carry an error.
//!
//! A statement "raises" when it panics or when it evaluates to an `Err`.
//! The kind of what was raised is the Rust type of the panic payload or of
//! the `Err` value, so `raises::<K>` is a downcast. Boxed errors
//! (`Box<dyn Error>` and its `Send`/`Sync` variants) are looked through when
//! the expected kind is itself an error type.

use std::any::Any;
use std::cell::{Cell, RefCell};
use std::error::Error;
use std::fmt;
use std::marker::PhantomData;
use std::panic::{self, AssertUnwindSafe};
use std::sync::OnceLock;

use crate::signal::FailureSignal;

/// Something raised by a statement, with a printable message.
pub struct Raised {
    payload: Box<dyn Any>,
    message: String,
}

impl Raised {
    /// Wrap a caught panic payload.
    pub fn from_panic(payload: Box<dyn Any + Send>) -> Self {
        let message = payload_message(payload.as_ref());
        Self { payload, message }
    }

    /// Wrap an `Err` value.
    pub fn from_error<E>(err: E) -> Self
    where
        E: Any + fmt::Debug,
    {
        let message = format!("{err:?}");
        Self {
            payload: Box::new(err),
            message,
        }
    }

    /// Whether the raised value is of kind `K`.
    pub fn is<K: Any>(&self) -> bool {
        self.payload.is::<K>()
    }

    /// Like [`Raised::is`], but also matches an error of kind `K` inside a
    /// boxed trait object.
    pub fn is_error<K: Error + 'static>(&self) -> bool {
        self.is::<K>() || self.boxed_error().is_some_and(|err| err.is::<K>())
    }

    fn boxed_error(&self) -> Option<&(dyn Error + 'static)> {
        let payload = self.payload.as_ref();
        if let Some(err) = payload.downcast_ref::<Box<dyn Error + Send + Sync>>() {
            Some(&**err as &(dyn Error + 'static))
        } else if let Some(err) = payload.downcast_ref::<Box<dyn Error + Send>>() {
            Some(&**err as &(dyn Error + 'static))
        } else {
            payload.downcast_ref::<Box<dyn Error>>().map(|err| &**err)
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Debug for Raised {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Raised")
            .field("message", &self.message)
            .finish_non_exhaustive()
    }
}

/// Classifies the value a statement evaluated to.
pub trait Raise {
    /// `Some` if the value itself represents a raised error.
    fn into_raised(self) -> Option<Raised>;
}

impl Raise for () {
    fn into_raised(self) -> Option<Raised> {
        None
    }
}

impl<T, E> Raise for Result<T, E>
where
    E: Any + fmt::Debug,
{
    fn into_raised(self) -> Option<Raised> {
        self.err().map(Raised::from_error)
    }
}

impl<T> Raise for Option<T> {
    fn into_raised(self) -> Option<Raised> {
        None
    }
}

macro_rules! never_raises {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Raise for $ty {
                fn into_raised(self) -> Option<Raised> {
                    None
                }
            }
        )*
    };
}

never_raises!(
    bool, char, i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64,
    String, &str,
);

/// A statement's value that has already been classified.
#[derive(Debug)]
pub struct Classified(Option<Raised>);

impl Raise for Classified {
    fn into_raised(self) -> Option<Raised> {
        self.0
    }
}

/// The value of an arbitrary statement, waiting to be classified.
///
/// The raise macros call `(&Evaluated::new(value)).classify()` with both
/// [`ClassifyResult`] and [`ClassifyValue`] in scope. Method resolution picks
/// `ClassifyResult` for a `Result` whose error type is `Any + Debug` and
/// falls back to `ClassifyValue` for any other type.
#[doc(hidden)]
pub struct Evaluated<T>(RefCell<Option<T>>);

impl<T> Evaluated<T> {
    pub fn new(value: T) -> Self {
        Self(RefCell::new(Some(value)))
    }
}

#[doc(hidden)]
pub trait ClassifyResult {
    fn classify(&self) -> Classified;
}

impl<T, E> ClassifyResult for Evaluated<Result<T, E>>
where
    E: Any + fmt::Debug,
{
    fn classify(&self) -> Classified {
        Classified(self.0.borrow_mut().take().and_then(Raise::into_raised))
    }
}

#[doc(hidden)]
pub trait ClassifyValue {
    fn classify(&self) -> Classified;
}

impl<T> ClassifyValue for &Evaluated<T> {
    fn classify(&self) -> Classified {
        Classified(None)
    }
}

/// The kind a raise expectation is waiting for.
///
/// Resolved the same way as [`Evaluated`]: `(&Kind::<K>::expected()).matcher()`
/// looks through boxed errors when `K: Error`, and compares the payload type
/// exactly otherwise.
#[doc(hidden)]
pub struct Kind<K>(PhantomData<fn() -> K>);

impl<K> Kind<K> {
    pub const fn expected() -> Self {
        Self(PhantomData)
    }
}

#[doc(hidden)]
pub trait ErrorKind {
    fn matcher(&self) -> fn(&Raised) -> bool;
}

impl<K: Error + 'static> ErrorKind for Kind<K> {
    fn matcher(&self) -> fn(&Raised) -> bool {
        Raised::is_error::<K>
    }
}

#[doc(hidden)]
pub trait PayloadKind {
    fn matcher(&self) -> fn(&Raised) -> bool;
}

impl<K: Any> PayloadKind for &Kind<K> {
    fn matcher(&self) -> fn(&Raised) -> bool {
        Raised::is::<K>
    }
}

/// Run `f`, reporting whether it panicked or evaluated to an error.
pub fn capture<R, F>(f: F) -> Option<Raised>
where
    R: Raise,
    F: FnOnce() -> R,
{
    match panic::catch_unwind(AssertUnwindSafe(f)) {
        Ok(value) => value.into_raised(),
        Err(payload) => Some(Raised::from_panic(payload)),
    }
}

/// Unwind with `kind` as the panic payload, the equivalent of throwing a
/// typed error. Returns `()` so it can be used as a statement anywhere.
pub fn raise<K: Any + Send>(kind: K) {
    panic::panic_any(kind)
}

/// Best-effort text for a panic payload.
pub fn payload_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&'static str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else if let Some(signal) = payload.downcast_ref::<FailureSignal>() {
        signal.message.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

static FORWARDING_HOOK: OnceLock<()> = OnceLock::new();

thread_local! {
    static QUIET_DEPTH: Cell<usize> = const { Cell::new(0) };
}

/// Silences the panic hook on the current thread while alive.
///
/// Panics inside cases are expected and reported through the run report, so
/// on a thread holding a guard the default hook's stderr output is replaced
/// by a `tracing` event. The process hook is swapped once, for a hook that
/// forwards to its predecessor on every thread without a live guard. Guards
/// nest and may be dropped in any order.
pub struct QuietPanics {
    _thread_bound: PhantomData<*const ()>,
}

impl QuietPanics {
    pub fn install() -> Self {
        FORWARDING_HOOK.get_or_init(|| {
            let previous = panic::take_hook();
            panic::set_hook(Box::new(move |info| {
                if !is_quiet() {
                    return previous(info);
                }
                let message = payload_message(info.payload());
                match info.location() {
                    Some(location) => tracing::debug!(
                        %location,
                        message = %message,
                        "panic inside case"
                    ),
                    None => tracing::debug!(message = %message, "panic inside case"),
                }
            }));
        });
        QUIET_DEPTH.with(|depth| depth.set(depth.get() + 1));
        Self {
            _thread_bound: PhantomData,
        }
    }
}

impl Drop for QuietPanics {
    fn drop(&mut self) {
        QUIET_DEPTH.with(|depth| depth.set(depth.get().saturating_sub(1)));
    }
}

/// Whether a [`QuietPanics`] guard is alive on this thread.
fn is_quiet() -> bool {
    QUIET_DEPTH.try_with(Cell::get).unwrap_or(0) > 0
}

use std::any::Any;
use std::backtrace::BacktraceStatus;
use std::error::Error as StdError;
use std::fmt;

/// An error raised somewhere in request or invocation handling
///
/// Built from any error type through `?`, from an [`anyhow::Error`], or from
/// a caught panic. Remembers the concrete type it was raised as so that the
/// dispatcher can classify it and, under private visibility, report it.
pub struct Fault {
    type_name: &'static str,
    error: anyhow::Error,
}

impl Fault {
    /// Wrap an `anyhow` error whose concrete type is no longer known
    pub fn from_anyhow(error: anyhow::Error) -> Self {
        Self {
            type_name: "Error",
            error,
        }
    }

    /// Build a fault from the payload of a caught panic
    pub fn from_panic(payload: Box<dyn Any + Send + 'static>) -> Self {
        let message = payload
            .downcast_ref::<&str>()
            .map(|s| (*s).to_owned())
            .or_else(|| payload.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "panic with a non-string payload".to_owned());

        Self {
            type_name: "Panic",
            error: anyhow::Error::msg(message),
        }
    }

    /// Short name of the type this fault was raised as
    pub const fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Display message of the outermost error
    pub fn message(&self) -> String {
        self.error.to_string()
    }

    /// Captured stack trace
    ///
    /// Empty unless `RUST_BACKTRACE` or `RUST_LIB_BACKTRACE` enables capture.
    pub fn stack_trace(&self) -> String {
        let backtrace = self.error.backtrace();
        if backtrace.status() == BacktraceStatus::Captured {
            backtrace.to_string()
        } else {
            String::new()
        }
    }

    /// Errors that caused this one, nearest first
    pub fn causes(&self) -> impl Iterator<Item = &(dyn StdError + 'static)> {
        self.error.chain().skip(1)
    }

    /// Attempt to view the raised error as a concrete type
    pub fn downcast_ref<E>(&self) -> Option<&E>
    where
        E: fmt::Display + fmt::Debug + Send + Sync + 'static,
    {
        self.error.downcast_ref::<E>()
    }

    pub fn is<E>(&self) -> bool
    where
        E: fmt::Display + fmt::Debug + Send + Sync + 'static,
    {
        self.error.is::<E>()
    }
}

impl<E> From<E> for Fault
where
    E: StdError + Send + Sync + 'static,
{
    fn from(error: E) -> Self {
        Self {
            type_name: short_type_name::<E>(),
            error: anyhow::Error::new(error),
        }
    }
}

impl fmt::Debug for Fault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Fault")
            .field("type_name", &self.type_name)
            .field("error", &self.error)
            .finish()
    }
}

impl fmt::Display for Fault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.type_name, self.error)
    }
}

/// Last path segment of a type name, without generic arguments
fn short_type_name<T>() -> &'static str {
    let full = std::any::type_name::<T>();
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base)
}

/// Response extension marking a response produced by a raised [`Fault`]
///
/// The HTTP delivery adapter looks for this marker and replaces the
/// response with the classified payload.
#[cfg(feature = "axum")]
#[derive(Debug, Clone)]
pub struct RaisedFault(pub std::sync::Arc<Fault>);

#[cfg(feature = "axum")]
impl axum::response::IntoResponse for Fault {
    fn into_response(self) -> axum::response::Response {
        let mut response = http::StatusCode::INTERNAL_SERVER_ERROR.into_response();
        response
            .extensions_mut()
            .insert(RaisedFault(std::sync::Arc::new(self)));
        response
    }
}

#[cfg(feature = "axum")]
impl axum::response::IntoResponse for crate::ApiError {
    fn into_response(self) -> axum::response::Response {
        Fault::from(self).into_response()
    }
}

use super::WidthOracle;
use crate::core::errors::TableError;
use std::ffi::CString;

unsafe extern "C" {
    fn wcwidth(c: libc::wchar_t) -> libc::c_int;
}

/// Oracle backed by the C library's `wcwidth`.
///
/// Construction switches the process-wide `LC_ALL` locale, so this oracle
/// should only be created from a single-threaded entry point.
#[derive(Debug)]
pub struct LocaleOracle {
    locale: String,
}

impl LocaleOracle {
    /// Activates `locale` (e.g. `C.UTF-8`) for all categories.
    pub fn new(locale: &str) -> Result<Self, TableError> {
        let name = CString::new(locale).map_err(|_| {
            TableError::environment(
                format!("locale name {:?} contains a NUL byte", locale),
                "pass a plain locale name such as C.UTF-8",
            )
        })?;

        // SAFETY: `name` is a valid NUL-terminated string for the call's duration.
        let activated = unsafe { libc::setlocale(libc::LC_ALL, name.as_ptr()) };
        if activated.is_null() {
            return Err(TableError::environment(
                format!("locale {} not found", locale),
                "generate it (e.g. `locale-gen`) or compile on a glibc-based distribution",
            ));
        }

        Ok(Self {
            locale: locale.to_string(),
        })
    }

    pub fn locale(&self) -> &str {
        &self.locale
    }
}

impl WidthOracle for LocaleOracle {
    fn width(&self, codepoint: u32) -> i32 {
        // SAFETY: wcwidth is a pure lookup on its integer argument.
        unsafe { wcwidth(codepoint as libc::wchar_t) }
    }
}

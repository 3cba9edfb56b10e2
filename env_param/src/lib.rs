//! Tuning knobs that are read once from the process environment.
//!
//! An [`EnvParam`] names an environment variable and carries the textual default to use when the
//! variable is absent or unparsable. The value is resolved lazily on first access and cached for
//! the lifetime of the process.
//!
//! ```
//! use env_param::EnvParam;
//! static MIN_EXTENT: EnvParam<i32> = EnvParam::new("DOC_MIN_EXTENT", "5");
//!
//! assert_eq!(MIN_EXTENT.get(), 5);
//! assert_eq!(MIN_EXTENT.name(), "DOC_MIN_EXTENT");
//! ```
//!
//! A value may be forced programmatically with [`EnvParam::set`], as long as the parameter was not
//! read before.
//!
//! ```
//! use env_param::EnvParam;
//! static VERBOSE: EnvParam<bool> = EnvParam::new("DOC_VERBOSE", "false");
//!
//! VERBOSE.set(true);
//! assert!(VERBOSE.get());
//! assert!(VERBOSE.try_set(false).is_err());
//! ```

use once_cell::sync::OnceCell;
use std::env::VarError;
use std::str::FromStr;

pub struct EnvParam<T> {
    cell: OnceCell<T>,
    var: &'static str,
    default: &'static str,
}

impl<T> EnvParam<T> {
    pub const fn new(var: &'static str, default: &'static str) -> EnvParam<T> {
        EnvParam {
            cell: OnceCell::new(),
            var,
            default,
        }
    }

    /// Name of the environment variable backing this parameter.
    pub fn name(&self) -> &'static str {
        self.var
    }

    /// Sets the parameter, failing (and handing back the value) if it was already resolved.
    pub fn try_set(&self, value: T) -> Result<(), T> {
        self.cell.set(value)
    }

    /// Sets the parameter.
    ///
    /// # Panic
    /// Panics if the parameter was already resolved, e.g. by an earlier read.
    pub fn set(&self, value: T) {
        if self.try_set(value).is_err() {
            panic!("[env_param] {} was already resolved and cannot be set", self.var)
        }
    }
}

impl<T: FromStr> EnvParam<T> {
    fn parse_default(&self) -> T {
        match self.default.parse() {
            Ok(value) => value,
            Err(_) => panic!("[env_param] {}: default \"{}\" cannot be parsed", self.var, self.default),
        }
    }

    fn resolve(&self) -> T {
        match std::env::var(self.var) {
            Ok(raw) => match raw.parse() {
                Ok(value) => value,
                Err(_) => {
                    eprintln!(
                        "[env_param] WARNING {}: ignoring unparsable value \"{}\", falling back to \"{}\"",
                        self.var, raw, self.default
                    );
                    self.parse_default()
                }
            },
            Err(VarError::NotPresent) => self.parse_default(),
            Err(err) => {
                eprintln!("[env_param] WARNING {}: {err}, falling back to \"{}\"", self.var, self.default);
                self.parse_default()
            }
        }
    }

    /// Returns a reference to the resolved value, reading the environment on first access.
    ///
    /// # Panic
    /// Panics if the default value cannot be parsed and is needed.
    pub fn get_ref(&self) -> &T {
        self.cell.get_or_init(|| self.resolve())
    }

    /// Returns a copy of the resolved value, reading the environment on first access.
    pub fn get(&self) -> T
    where
        T: Copy,
    {
        *self.get_ref()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    static FROM_ENV: EnvParam<u32> = EnvParam::new("ENV_PARAM_TEST_FROM_ENV", "1");
    static GARBAGE: EnvParam<u32> = EnvParam::new("ENV_PARAM_TEST_GARBAGE", "7");
    static FORCED: EnvParam<f64> = EnvParam::new("ENV_PARAM_TEST_FORCED", "0.5");

    #[test]
    fn reads_environment_once() {
        std::env::set_var("ENV_PARAM_TEST_FROM_ENV", "42");
        assert_eq!(FROM_ENV.get(), 42);
        std::env::set_var("ENV_PARAM_TEST_FROM_ENV", "43");
        assert_eq!(FROM_ENV.get(), 42);
    }

    #[test]
    fn unparsable_value_uses_default() {
        std::env::set_var("ENV_PARAM_TEST_GARBAGE", "not-a-number");
        assert_eq!(GARBAGE.get(), 7);
    }

    #[test]
    fn forced_value_wins() {
        FORCED.set(0.25);
        assert_eq!(FORCED.get(), 0.25);
        assert_eq!(FORCED.try_set(0.75), Err(0.75));
    }
}

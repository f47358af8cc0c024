//! Load `.env` files and read typed configuration back from the environment.
//!
//! [`load_dotenv`] and [`dotenv`] write into the process environment and are
//! `unsafe`, because callers must guarantee no concurrent process-environment
//! access. Call them once during single-threaded startup. [`EnvLoader`] is the
//! safe builder and loads into an in-memory map unless told otherwise.
//!
//! A failed load is quiet by default: it is captured in
//! [`LoadOutcome::Failed`] so a missing `.env` file does not stop the program.
//! Lookups through [`getenv`] and [`Var`] always report a missing key or a
//! failed conversion as an error.

mod env;
mod error;
mod getenv;
mod loader;
mod model;
mod parser;

pub use env::TargetEnv;
pub use error::{BoxError, Error, ParseError, ParseErrorKind};
pub use getenv::{Fallback, Var, getenv, getenv_or, getenv_parsed};
pub use loader::{EnvLoader, dotenv, load_dotenv};
pub use model::{Entry, KeyParsingMode, LoadOutcome, LoadReport};
pub use parser::{parse_str, parse_str_with_mode};

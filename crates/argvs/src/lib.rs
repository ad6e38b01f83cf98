//! Accessor over an already-tokenized argument vector.
//!
//! The first token is taken as the script name. Remaining tokens are split
//! into `key=value` entries (exactly one `=`) and bare flags (no `=`);
//! anything with more than one `=` is dropped. Lookups return a single
//! value, every value for a repeated key, or nothing.
//!
//! This is not a shell parser: there is no quoting, no `--key value` pairing
//! and no grouped short options.
//!
//! # Example
//!
//! ```
//! use argvs::{ArgStore, ArgValue};
//!
//! let argv = ["deploy", "--env=prod", "--tag=a", "--tag=b", "--verbose"];
//! let mut store = ArgStore::from_argv(&argv, argv.len(), true);
//!
//! assert_eq!(store.script(), Some("deploy"));
//! assert_eq!(store.get("env"), Some(ArgValue::from("prod")));
//! assert_eq!(store.get("--tag"), Some(ArgValue::from(vec!["a", "b"])));
//! assert!(store.has_verbose());
//!
//! store.add_arg("region", "eu");
//! assert!(store.remove_arg("tag"));
//! assert_eq!(store.get("tag"), None);
//! ```

mod cell;
mod dashes;
mod options;
mod report;
mod snapshot;
mod store;
mod value;

pub use cell::StoreCell;
pub use dashes::strip_leading_dashes;
pub use options::{DEFAULT_HELP_TOKENS, DEFAULT_VERBOSE_TOKENS, StoreOptions};
pub use report::{ParseReport, ParseStatus};
pub use snapshot::Snapshot;
pub use store::{ArgStore, Entry};
pub use value::ArgValue;

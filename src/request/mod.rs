//! War request parsing and countdown resolution.
//!
//! Turning "word war for 20 minutes at 3:15" into a countdown happens in
//! two stages. The [`grammar`] stage tokenizes and matches the phrase into a
//! [`WarRequest`]; the [`resolver`] stage turns its [`TimeSpec`] into whole
//! minutes against the current wall-clock time.
//!
//! ```
//! use chrono::NaiveDate;
//! use wordwar::request::{parse_war_request, resolve, CountdownLimits, TimeSpec};
//!
//! let request = parse_war_request("word war for 20 minutes at 3:15").unwrap();
//! assert_eq!(request.duration, 20);
//! assert_eq!(request.time, Some(TimeSpec::Clock { hour: 3, minute: 15 }));
//!
//! let now = NaiveDate::from_ymd_opt(2024, 3, 1)
//!     .unwrap()
//!     .and_hms_opt(15, 0, 0)
//!     .unwrap();
//! let countdown = resolve(request.time, now, &CountdownLimits::default()).unwrap();
//! assert_eq!(countdown, 15);
//! ```

pub mod grammar;
pub mod resolver;
pub mod token;

pub use grammar::{parse_time_spec, parse_war_request, WarRequest};
pub use resolver::{minutes_until, resolve, CountdownLimits, TimeSpec};
pub use token::{tokenize, Token};

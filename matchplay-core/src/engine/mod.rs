//! Pure decision logic of the match lifecycle.
//!
//! Nothing in here touches the database. The controller loads the facts,
//! asks an engine what to do, and applies the answer inside a transaction.
//!
//! - [`rating`]: ELO update for a finished match
//! - [`reconciliation`]: comparing the two sides' score claims
//! - [`pairing`]: choosing who plays whom from the queue
//! - [`schedule`]: deadlines and the upcoming-match reminder window
//! - [`timeout`]: bounded resolution of overdue matches

pub mod pairing;
pub mod rating;
pub mod reconciliation;
pub mod schedule;
pub mod timeout;

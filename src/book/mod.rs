//! Round books for the auction engine.
//!
//! ## Components
//!
//! - [`Round`]: slab arena holding a round's participants (Book Splitter)
//! - [`SortedBook`]: one side's entries in priority order (Book Sorter)
//!
//! ## Example
//!
//! ```
//! use double_auction::book::Round;
//! use double_auction::types::Participant;
//!
//! let round = Round::from_participants(vec![
//!     Participant::seller(1, "VNO1", 0, 30, 5),
//!     Participant::seller(2, "VNO2", 0, 10, 5),
//!     Participant::buyer(3, "VNO3", 0, 20, 5),
//! ]).unwrap();
//!
//! let (mut sellers, _buyers) = round.split();
//! sellers.sort();
//! assert_eq!(sellers.price_at(0), Some(10));
//! ```

pub mod round;
pub mod sorted;

pub use round::Round;
pub use sorted::{BookEntry, SortedBook};

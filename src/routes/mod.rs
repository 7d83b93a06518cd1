//! Route handlers. Each takes the raw query (GET) or form body (POST) and
//! returns an HTML fragment.

pub mod cards;
pub mod deck;
pub mod selection;
pub mod util;

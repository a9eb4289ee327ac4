// Application intake and the routes built on top of it.

pub mod extract;
pub mod handlers;

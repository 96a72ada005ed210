//! Ports - interfaces the player application depends on.

pub mod outbound;

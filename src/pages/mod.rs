//! Route-level page components. Views are thin shells: session and network
//! behavior lives in `state` and `net`.

pub mod groups;
pub mod home;
pub mod login;
pub mod recipes;
pub mod register;

pub mod check;
pub mod roster;
pub mod run;

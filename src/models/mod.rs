pub mod doctor;
pub mod responses;

pub use doctor::*;
pub use responses::*;

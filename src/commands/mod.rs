pub mod doctor;
pub mod map;
pub mod validate;

pub mod albums;
pub mod health;
pub mod tracks;

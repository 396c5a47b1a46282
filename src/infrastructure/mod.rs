pub mod imaging;
pub mod providers;

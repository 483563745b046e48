pub mod deploy;
pub mod new;
pub mod sync;
pub mod validate;
pub mod version;

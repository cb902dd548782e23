pub mod read;
pub mod scan;
pub mod syntax;

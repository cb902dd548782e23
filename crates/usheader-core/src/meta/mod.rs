pub mod manifest;
pub mod options;
pub mod record;
pub mod resolve;
pub mod url;

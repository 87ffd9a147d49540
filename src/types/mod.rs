// pocketlinks shared type definitions

pub mod errors;
pub mod link;

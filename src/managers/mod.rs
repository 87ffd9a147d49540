// pocketlinks state managers
// The bookmark store owns the link collection and drives persistence.

pub mod bookmark_store;

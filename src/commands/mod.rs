pub mod acl;
pub mod acl_entry;
pub mod dictionary;
pub mod dictionary_entry;
pub mod service;
pub mod version;

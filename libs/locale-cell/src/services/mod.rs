pub mod store;

pub use store::LocaleStore;

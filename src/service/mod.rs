//! CrudService: generic CRUD over a pluggable store, plus request validation.

mod crud;
mod validation;
pub use crud::CrudService;
pub use validation::RequestValidator;

pub mod access;
pub mod middleware;
pub mod pagination;
pub mod validation;

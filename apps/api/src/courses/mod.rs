// Course catalogue: read endpoints, admin-only creation, seed data.

pub mod handlers;
pub mod seed;

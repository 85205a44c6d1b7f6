// Resume records: CRUD over the resumes table and public share links.

pub mod handlers;
pub mod repository;
pub mod sharing;

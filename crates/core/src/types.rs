/// Primary keys handed out by the persistence layer (BIGSERIAL-compatible).
pub type DbId = i64;

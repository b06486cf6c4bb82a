use uuid::Uuid;

/// Assigns the id for a newly created record: a 128-bit random UUID in
/// hyphenated text form. No persisted state and no coordination; the space is
/// large enough that collisions are negligible in practice.
pub fn new_id() -> String {
    Uuid::new_v4().to_string()
}

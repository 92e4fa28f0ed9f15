use super::*;

#[test]
fn job_id_carries_its_prefix() {
    let id = JobId::new();
    assert!(id.as_str().starts_with(JobId::PREFIX));
}

#[test]
fn job_id_roundtrips_through_string() {
    let id = JobId::new();
    let parsed = JobId::from_string(id.as_str());
    assert_eq!(id, parsed);
}

#[test]
fn worker_id_generate_is_unique_per_call() {
    let a = WorkerId::generate();
    let b = WorkerId::generate();
    assert_ne!(a, b);
}

#[test]
fn master_id_displays_as_its_configured_name() {
    let id = MasterId::new("master-2");
    assert_eq!(id.to_string(), "master-2");
}

use registrar_tools::DistributeError;
use registrar_tools::model::{EnrollmentRecord, GrantRecord, ProfileRecord};
use registrar_tools::registry::ProgramRegistry;
use registrar_tools::resolve::{extract_email, resolve_identity};
use registrar_tools::route::{program_code, route, session};

fn enrollment(contact: &str) -> EnrollmentRecord {
    EnrollmentRecord {
        student_name: "Jane Doe".to_string(),
        contact: contact.to_string(),
        account_name: "CVA 101".to_string(),
        product_name: "CVA Program 2023 FALL".to_string(),
    }
}

fn profile(contact: &str, organization: &str, indigenous: &str) -> ProfileRecord {
    ProfileRecord {
        contact: contact.to_string(),
        organization: organization.to_string(),
        title: "Forester".to_string(),
        phone: "555-0199".to_string(),
        mailing_address: "12 Pine St".to_string(),
        indigenous_declaration: indigenous.to_string(),
    }
}

#[test]
fn email_is_the_third_contact_token_lowercased() {
    let record = enrollment("Ms | Jane@X.org");
    let identity = resolve_identity(&record, &[], &[]).expect("identity resolved");
    assert_eq!(identity.email, "jane@x.org");
    assert_eq!(identity.full_name, "Jane Doe");
}

#[test]
fn extract_email_collapses_whitespace_runs() {
    assert_eq!(
        extract_email("Dr   |   ALICE@EXAMPLE.COM "),
        Some("alice@example.com".to_string())
    );
    assert_eq!(extract_email("onlytwo tokens"), None);
}

#[test]
fn short_contact_field_is_malformed() {
    let record = enrollment("jane@x.org");
    let error = resolve_identity(&record, &[], &[]).expect_err("must be malformed");
    assert!(matches!(
        error,
        DistributeError::MalformedContact { .. }
    ));
}

#[test]
fn enrichment_fields_absent_without_auxiliary_matches() {
    let record = enrollment("Ms | jane@x.org");
    let identity = resolve_identity(&record, &[], &[]).expect("identity resolved");
    assert_eq!(identity.organization, None);
    assert_eq!(identity.indigenous, None);
    assert_eq!(identity.received_grant, None);
    assert_eq!(identity.fields().len(), 2);
}

#[test]
fn last_profile_match_wins() {
    let record = enrollment("Ms | jane@x.org");
    let profiles = vec![
        profile("Ms | jane@x.org", "Old Org", "0"),
        profile("ms | JANE@x.org  ", "New Org", "0"),
        profile("Mr | other@x.org", "Unrelated Org", "0"),
    ];
    let identity = resolve_identity(&record, &profiles, &[]).expect("identity resolved");
    assert_eq!(identity.organization.as_deref(), Some("New Org"));
    assert_eq!(identity.title.as_deref(), Some("Forester"));
}

#[test]
fn last_grant_match_wins_and_sets_flag() {
    let record = enrollment("Ms | jane@x.org");
    let grants = vec![
        GrantRecord {
            email: "jane@x.org".to_string(),
            amount: "500".to_string(),
        },
        GrantRecord {
            email: " JANE@X.ORG ".to_string(),
            amount: "750".to_string(),
        },
    ];
    let identity = resolve_identity(&record, &[], &grants).expect("identity resolved");
    assert_eq!(identity.received_grant.as_deref(), Some("Yes"));
    assert_eq!(identity.grant_amount.as_deref(), Some("750"));
}

#[test]
fn indigenous_flag_maps_trimmed_one_to_yes() {
    let record = enrollment("Ms | jane@x.org");

    let yes = resolve_identity(&record, &[profile("Ms | jane@x.org", "Org", " 1 ")], &[])
        .expect("identity resolved");
    assert_eq!(yes.indigenous.as_deref(), Some("Yes"));

    let no = resolve_identity(&record, &[profile("Ms | jane@x.org", "Org", "0")], &[])
        .expect("identity resolved");
    assert_eq!(no.indigenous.as_deref(), Some("No"));
}

#[test]
fn resolution_is_deterministic() {
    let record = enrollment("Ms | jane@x.org");
    let profiles = vec![profile("Ms | jane@x.org", "Org", "1")];
    let grants = vec![GrantRecord {
        email: "jane@x.org".to_string(),
        amount: "500".to_string(),
    }];
    let first = resolve_identity(&record, &profiles, &grants).expect("first resolution");
    let second = resolve_identity(&record, &profiles, &grants).expect("second resolution");
    assert_eq!(first, second);
}

#[test]
fn routing_splits_code_and_session() {
    assert_eq!(program_code("CVA COURSE X"), Some("CVA"));
    assert_eq!(
        session("CVA Online Micro-Certificate 2023 FALL"),
        Some("2023 FALL".to_string())
    );
    assert_eq!(session("solo"), None);

    let registry = ProgramRegistry::builtin("Registrations");
    let record = enrollment("Ms | jane@x.org");
    let destination = route(&record, &registry).expect("destination resolved");
    assert_eq!(destination.sheet_name, "2023 FALL");
    assert_eq!(
        destination.workbook_path,
        std::path::Path::new("Registrations")
            .join("Climate Vulnerability and Adaptation - Registrations.xlsx")
    );
}

#[test]
fn unknown_program_code_is_fatal_routing_error() {
    let registry = ProgramRegistry::builtin("Registrations");
    let mut record = enrollment("Ms | jane@x.org");
    record.account_name = "NOPE 101".to_string();
    let error = route(&record, &registry).expect_err("must fail to route");
    assert!(matches!(error, DistributeError::UnknownProgram(code) if code == "NOPE"));
}

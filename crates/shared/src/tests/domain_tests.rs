use crate::{
    domain::{
        apply_update, split_full_name, synthesize_created_user, synthesized_email, PageState,
        SearchState, User, UserForm, UserId, DEFAULT_JOB,
    },
    error::ValidationError,
    protocol::{CreateUserResponse, ListUsersResponse, UserDraft, WireId},
};

fn user(id: i64, first: &str, last: &str, job: &str) -> User {
    User {
        id: UserId(id),
        first_name: first.to_string(),
        last_name: last.to_string(),
        email: format!("{}.{}@reqres.in", first.to_lowercase(), last.to_lowercase()),
        avatar: format!("https://reqres.in/img/faces/{id}-image.jpg"),
        job: job.to_string(),
    }
}

fn draft(name: &str, job: &str) -> UserDraft {
    UserDraft {
        name: name.to_string(),
        job: job.to_string(),
    }
}

#[test]
fn prev_and_next_disable_exactly_at_the_boundaries() {
    for total in 1..=6 {
        for page in 1..=total {
            let state = PageState::new(page, total);
            assert_eq!(state.is_first(), page == 1, "page {page} of {total}");
            assert_eq!(state.is_last(), page == total, "page {page} of {total}");
        }
    }
}

#[test]
fn page_offset_stays_within_range() {
    let state = PageState::new(2, 3);
    assert_eq!(state.offset(1), Some(3));
    assert_eq!(state.offset(-1), Some(1));
    assert_eq!(state.offset(2), None);
    assert_eq!(state.offset(-2), None);
    assert_eq!(PageState::new(1, 1).offset(1), None);
}

#[test]
fn extreme_page_offsets_are_out_of_range() {
    let state = PageState::new(2, 3);
    assert_eq!(state.offset(i64::MAX), None);
    assert_eq!(state.offset(i64::MIN), None);
    assert_eq!(PageState::new(u32::MAX, u32::MAX).offset(i64::MAX), None);
}

#[test]
fn page_state_is_clamped_on_construction() {
    let state = PageState::new(0, 0);
    assert_eq!(state.current_page(), 1);
    assert_eq!(state.total_pages(), 1);

    let state = PageState::new(9, 2);
    assert_eq!(state.current_page(), 2);
}

#[test]
fn created_user_is_synthesized_from_the_draft() {
    let created = synthesize_created_user(UserId(512), &draft("Jane Doe", "Engineer"));
    assert_eq!(created.id, UserId(512));
    assert_eq!(created.first_name, "Jane");
    assert_eq!(created.last_name, "Doe");
    assert_eq!(created.job, "Engineer");
    assert_eq!(created.email, "jane.doe@example.com");
    assert_eq!(created.avatar, "https://i.pravatar.cc/150?u=512");
}

#[test]
fn name_splits_at_first_whitespace() {
    assert_eq!(
        split_full_name("Mary Ann Smith"),
        ("Mary".to_string(), "Ann Smith".to_string())
    );
    assert_eq!(
        split_full_name("  Cher "),
        ("Cher".to_string(), String::new())
    );
    assert_eq!(synthesized_email("Mary", "Ann Smith"), "mary.ann.smith@example.com");
    assert_eq!(synthesized_email("Cher", ""), "cher@example.com");
}

#[test]
fn update_rewrites_names_email_and_job_only() {
    let mut target = user(7, "Michael", "Lawson", "Unknown");
    let avatar = target.avatar.clone();

    apply_update(&mut target, &draft("Bob Lee", "Manager"));

    assert_eq!(target.id, UserId(7));
    assert_eq!(target.first_name, "Bob");
    assert_eq!(target.last_name, "Lee");
    assert_eq!(target.email, "bob.lee@example.com");
    assert_eq!(target.job, "Manager");
    assert_eq!(target.avatar, avatar);
}

#[test]
fn search_is_case_insensitive_across_fields() {
    let users = vec![
        user(1, "George", "Bluth", "Engineer"),
        user(2, "Janet", "Weaver", "Designer"),
    ];

    let search = SearchState::new("eng");
    let found = search.filter(&users);
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].id, UserId(1));

    let search = SearchState::new("WEAVER");
    assert_eq!(search.filter(&users)[0].id, UserId(2));

    let search = SearchState::new("reqres.in");
    assert_eq!(search.filter(&users).len(), 2);
}

#[test]
fn blank_search_is_inactive_and_keeps_every_user() {
    let users = vec![user(1, "George", "Bluth", "Engineer")];
    let search = SearchState::new("   ");
    assert!(!search.is_searching());
    assert_eq!(search.filter(&users).len(), 1);
}

#[test]
fn form_validation_requires_names_and_email() {
    let form = UserForm {
        first_name: "Jane".to_string(),
        last_name: "   ".to_string(),
        email: String::new(),
        ..UserForm::default()
    };

    let err = form.validate().expect_err("must reject");
    assert_eq!(err.missing_fields(), &["last name", "email"]);
    assert_eq!(err.to_string(), "Please fill in all required fields");
    assert!(matches!(err, ValidationError::MissingFields(_)));
}

#[test]
fn form_validation_trims_and_defaults_job() {
    let form = UserForm {
        id: None,
        first_name: " Jane ".to_string(),
        last_name: "Doe".to_string(),
        email: "jane@corp.test".to_string(),
        job: "  ".to_string(),
    };

    let draft = form.validate().expect("valid");
    assert_eq!(draft.name, "Jane Doe");
    assert_eq!(draft.job, DEFAULT_JOB);
}

#[test]
fn listing_defaults_missing_job() {
    let body = r#"{
        "page": 2, "per_page": 6, "total": 12, "total_pages": 2,
        "data": [{"id": 7, "email": "michael.lawson@reqres.in", "first_name": "Michael",
                  "last_name": "Lawson", "avatar": "https://reqres.in/img/faces/7-image.jpg"}]
    }"#;
    let parsed: ListUsersResponse = serde_json::from_str(body).expect("parse");
    assert_eq!(parsed.data[0].job, "Unknown");
    assert_eq!(parsed.data[0].id, UserId(7));
}

#[test]
fn created_id_accepts_string_or_number() {
    let parsed: CreateUserResponse = serde_json::from_str(
        r#"{"name":"Jane Doe","job":"Engineer","id":"817","createdAt":"2024-05-01T10:00:00.000Z"}"#,
    )
    .expect("parse");
    assert_eq!(parsed.id.to_user_id(), Some(UserId(817)));
    assert!(parsed.created_at.is_some());

    assert_eq!(WireId::Number(3).to_user_id(), Some(UserId(3)));
    assert_eq!(WireId::Text("abc".to_string()).to_user_id(), None);
}

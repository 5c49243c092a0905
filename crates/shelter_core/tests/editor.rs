use shelter_core::{
    ArgumentError, DeleteOutcome, EditorSession, GatewayError, Gender, PetFields, SaveOutcome,
    StorageGateway,
};

#[test]
fn new_pet_save_inserts_and_switches_to_edit_mode() {
    let gateway = StorageGateway::initialize_in_memory().unwrap();
    let mut session = EditorSession::new_pet();

    session.set_name("  Rex ");
    session.set_breed("Lab");
    session.select_gender_label("Male");
    session.set_weight_text("20");

    let outcome = session.save(&gateway).unwrap();
    let SaveOutcome::Inserted(id) = outcome else {
        panic!("expected insert, got {outcome:?}");
    };
    assert_eq!(outcome.message(), "Pet saved");
    assert!(!session.has_changed());
    assert!(session.can_delete());

    let pet = gateway.get_by_id(id).unwrap();
    assert_eq!(pet.name, "Rex");
    assert_eq!(pet.gender, Gender::Male);
    assert_eq!(pet.weight, 20);
}

#[test]
fn blank_new_pet_is_not_saved() {
    let gateway = StorageGateway::initialize_in_memory().unwrap();
    let mut session = EditorSession::new_pet();

    assert_eq!(session.save(&gateway).unwrap(), SaveOutcome::Skipped);
    assert!(gateway.list_all().unwrap().is_empty());
}

#[test]
fn bad_weight_text_saves_as_zero() {
    let gateway = StorageGateway::initialize_in_memory().unwrap();
    let mut session = EditorSession::new_pet();
    session.set_name("Tom");
    session.set_weight_text("heavy");

    let SaveOutcome::Inserted(id) = session.save(&gateway).unwrap() else {
        panic!("expected insert");
    };
    let pet = gateway.get_by_id(id).unwrap();
    assert_eq!(pet.weight, 0);
    assert_eq!(pet.gender, Gender::Unknown);
}

#[test]
fn nameless_pet_is_rejected_not_swallowed() {
    let gateway = StorageGateway::initialize_in_memory().unwrap();
    let mut session = EditorSession::new_pet();
    session.set_breed("Lab");

    let err = session.save(&gateway).unwrap_err();
    assert!(matches!(err, GatewayError::InvalidArgument(_)));
    assert!(session.has_changed());
    assert!(session.is_new());
}

#[test]
fn editing_existing_pet_updates_and_reports_missing_rows() {
    let gateway = StorageGateway::initialize_in_memory().unwrap();
    let id = gateway
        .insert(
            &PetFields::new()
                .name("Binx")
                .breed("Tabby")
                .gender(Gender::Female)
                .weight(6),
        )
        .unwrap();

    let mut session = EditorSession::open(&gateway, id).unwrap();
    assert!(!session.has_changed());
    assert_eq!(session.form().name, "Binx");

    session.set_weight_text("7");
    assert_eq!(session.save(&gateway).unwrap(), SaveOutcome::Updated);
    assert_eq!(gateway.get_by_id(id).unwrap().weight, 7);

    gateway.delete(id).unwrap();
    session.set_weight_text("8");
    assert_eq!(session.save(&gateway).unwrap(), SaveOutcome::UpdateFailed);
    assert!(session.has_changed());
}

#[test]
fn delete_reports_outcome_and_requires_stored_pet() {
    let gateway = StorageGateway::initialize_in_memory().unwrap();
    let id = gateway
        .insert(&PetFields::new().name("Toto").gender(Gender::Male))
        .unwrap();

    let session = EditorSession::open(&gateway, id).unwrap();
    assert_eq!(session.delete(&gateway).unwrap(), DeleteOutcome::Deleted);
    assert_eq!(
        session.delete(&gateway).unwrap(),
        DeleteOutcome::DeleteFailed
    );

    let err = EditorSession::new_pet().delete(&gateway).unwrap_err();
    assert!(matches!(
        err,
        GatewayError::InvalidArgument(ArgumentError::ItemAddressRequired("delete"))
    ));
}

#[test]
fn opening_missing_pet_fails_with_not_found() {
    let gateway = StorageGateway::initialize_in_memory().unwrap();
    assert!(matches!(
        EditorSession::open(&gateway, 9),
        Err(GatewayError::NotFound(9))
    ));
}

#[test]
fn weight_only_edit_keeps_null_breed() {
    let gateway = StorageGateway::initialize_in_memory().unwrap();
    let id = gateway
        .insert(&PetFields::new().name("Mittens").gender(Gender::Female))
        .unwrap();

    let mut session = EditorSession::open(&gateway, id).unwrap();
    session.set_weight_text("5");
    assert_eq!(session.save(&gateway).unwrap(), SaveOutcome::Updated);

    let pet = gateway.get_by_id(id).unwrap();
    assert_eq!(pet.weight, 5);
    assert_eq!(pet.breed, None);

    session.set_breed("Siamese");
    session.save(&gateway).unwrap();
    assert_eq!(
        gateway.get_by_id(id).unwrap().breed.as_deref(),
        Some("Siamese")
    );

    session.set_breed("");
    session.save(&gateway).unwrap();
    assert_eq!(gateway.get_by_id(id).unwrap().breed.as_deref(), Some(""));
}

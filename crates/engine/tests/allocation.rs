use engine::{
    AllocationSession, EngineError, MoneyCents, NetStanding, SplitSeed, TableMode, WriteTarget,
    resolve_participants,
};

fn money(s: &str) -> MoneyCents {
    s.parse().unwrap()
}

fn open_session(total: &str, members: &[&str], payer: &str, mode: TableMode) -> AllocationSession {
    let participants = resolve_participants(members.iter().copied(), payer);
    AllocationSession::new(participants, payer, money(total), None, mode).unwrap()
}

#[test]
fn default_equal_split_stays_within_tolerance() {
    let session = open_session("100.00", &["alice", "bob", "carol"], "alice", TableMode::Edit);

    for row in session.rows() {
        assert_eq!(row.owed, money("33.33"));
    }

    let summary = session.recompute();
    assert_eq!(summary.sum_owed, money("99.99"));
    assert_eq!(summary.remaining, money("0.01"));
    assert!(summary.is_valid);
    assert!(summary.submit_enabled);
}

#[test]
fn sixty_across_three_members() {
    let session = open_session("60.00", &["alice", "bob", "carol"], "alice", TableMode::Edit);

    let rows = session.rows();
    assert_eq!(rows[0].owed, money("20.00"));
    assert_eq!(rows[0].paid, money("60.00"));
    assert_eq!(rows[0].net, money("40.00"));
    assert_eq!(rows[0].standing(), NetStanding::GetsBack);

    for row in &rows[1..] {
        assert_eq!(row.owed, money("20.00"));
        assert_eq!(row.paid, MoneyCents::ZERO);
        assert_eq!(row.net, money("-20.00"));
        assert_eq!(row.standing(), NetStanding::Owes);
    }

    let summary = session.recompute();
    assert_eq!(summary.remaining, MoneyCents::ZERO);
    assert_eq!(summary.sum_paid, money("60.00"));
    assert!(summary.is_valid);
    assert!(summary.submit_enabled);
}

#[test]
fn stored_split_overrides_the_default() {
    let participants = resolve_participants(["alice", "bob", "carol"], "alice");
    let mut session =
        AllocationSession::new(participants, "alice", money("60.00"), Some(7), TableMode::Edit)
            .unwrap();

    session
        .populate(&[SplitSeed {
            member: "Bob".to_string(),
            owed: 15.0,
            paid: 5.0,
            net: Some(-10.0),
        }])
        .unwrap();

    let bob = session
        .rows()
        .iter()
        .find(|row| row.member.as_str() == "bob")
        .unwrap();
    assert_eq!(bob.owed, money("15.00"));
    assert_eq!(bob.paid, money("5.00"));
    assert_eq!(bob.net, money("-10.00"));

    let carol = session
        .rows()
        .iter()
        .find(|row| row.member.as_str() == "carol")
        .unwrap();
    assert_eq!(carol.owed, money("20.00"));
    assert_eq!(carol.paid, MoneyCents::ZERO);

    let summary = session.recompute();
    assert_eq!(summary.sum_owed, money("55.00"));
    assert_eq!(summary.remaining, money("5.00"));
    assert!(!summary.is_valid);
    assert!(!summary.submit_enabled);

    let err = session.build_write_request("groceries").unwrap_err();
    assert!(matches!(err, EngineError::Unbalanced(_)));
}

#[test]
fn validator_tolerates_exactly_one_cent() {
    let mut session = open_session("10.00", &["alice", "bob"], "alice", TableMode::Edit);

    let summary = session.edit_owed("bob", money("4.99")).unwrap();
    assert_eq!(summary.remaining, money("0.01"));
    assert!(summary.is_valid);

    let summary = session.edit_owed("bob", money("4.98")).unwrap();
    assert_eq!(summary.remaining, money("0.02"));
    assert!(!summary.is_valid);
    assert!(!summary.submit_enabled);
}

#[test]
fn payer_paid_is_locked_to_the_total() {
    let mut session = open_session("60.00", &["alice", "bob"], "alice", TableMode::Edit);

    let err = session.edit_paid("alice", money("10.00")).unwrap_err();
    assert!(matches!(err, EngineError::NotEditable(_)));

    // Stored data cannot unlock it either: populate snaps the payer back.
    session
        .populate(&[SplitSeed {
            member: "alice".to_string(),
            owed: 30.0,
            paid: 12.0,
            net: None,
        }])
        .unwrap();
    let alice = &session.rows()[0];
    assert_eq!(alice.paid, money("60.00"));
    assert_eq!(alice.owed, money("30.00"));

    session.edit_paid("bob", money("10.00")).unwrap();
    assert_eq!(session.rows()[1].paid, money("10.00"));
}

#[test]
fn changing_the_total_discards_manual_edits() {
    let mut session = open_session("60.00", &["alice", "bob", "carol"], "alice", TableMode::Edit);

    session.edit_owed("bob", money("55.00")).unwrap();
    let summary = session.set_total(money("90.00")).unwrap();

    for row in session.rows() {
        assert_eq!(row.owed, money("30.00"));
    }
    assert_eq!(session.rows()[0].paid, money("90.00"));
    assert!(summary.is_valid);
}

#[test]
fn view_mode_rejects_edits() {
    let mut session = open_session("60.00", &["alice", "bob"], "alice", TableMode::View);

    assert!(matches!(
        session.edit_owed("bob", money("1.00")),
        Err(EngineError::NotEditable(_))
    ));
    assert!(matches!(
        session.set_total(money("10.00")),
        Err(EngineError::NotEditable(_))
    ));
}

#[test]
fn near_zero_expense_is_never_submittable() {
    let session = open_session("0.00", &["alice", "bob"], "alice", TableMode::Edit);

    let summary = session.recompute();
    assert!(summary.is_valid);
    assert!(!summary.submit_enabled);
    assert!(session.build_write_request("nothing").is_err());
}

#[test]
fn editing_an_unknown_member_fails() {
    let mut session = open_session("60.00", &["alice", "bob"], "alice", TableMode::Edit);

    assert!(matches!(
        session.edit_owed("mallory", money("1.00")),
        Err(EngineError::KeyNotFound(_))
    ));
}

#[test]
fn payer_must_be_a_participant() {
    let participants = resolve_participants(["alice", "bob"], "alice");
    let result = AllocationSession::new(
        participants,
        "mallory",
        money("60.00"),
        None,
        TableMode::Edit,
    );
    assert!(matches!(result, Err(EngineError::KeyNotFound(_))));
}

#[test]
fn write_request_drops_empty_rows_and_picks_the_target() {
    let participants = resolve_participants(["alice", "bob", "carol"], "alice");
    let mut session =
        AllocationSession::new(participants, "alice", money("60.00"), Some(42), TableMode::Edit)
            .unwrap();

    // Shift carol's share onto bob; carol ends up with nothing owed or paid.
    session.edit_owed("carol", MoneyCents::ZERO).unwrap();
    let summary = session.edit_owed("bob", money("40.00")).unwrap();
    assert!(summary.submit_enabled);

    let request = session.build_write_request("  dinner  ").unwrap();
    assert_eq!(request.target, WriteTarget::Update(42));
    assert_eq!(request.amount, money("60.00"));
    assert_eq!(request.description, "dinner");
    assert_eq!(request.paid_by.as_str(), "alice");
    assert_eq!(request.splits.len(), 2);
    assert!(request.splits.iter().all(|split| split.member.as_str() != "carol"));
}

#[test]
fn blank_description_is_rejected() {
    let session = open_session("60.00", &["alice", "bob", "carol"], "alice", TableMode::Edit);

    assert!(matches!(
        session.build_write_request("   "),
        Err(EngineError::InvalidAmount(_))
    ));
}
